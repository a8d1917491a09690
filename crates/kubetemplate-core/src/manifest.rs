//! Multi-document manifest splitting.
//!
//! A document separator is a line that starts with `---` followed by the end
//! of the line or whitespace. Anything after that whitespace (`--- !!map`,
//! `--- {kind: A}`) belongs to the next document. Spans that contain nothing
//! but whitespace and comment lines are dropped. Document contents are not
//! otherwise inspected.

const SEPARATOR: &[u8] = b"---";

/// Split a multi-document blob into per-document byte spans, in source order.
pub fn split_documents(input: &[u8]) -> Vec<&[u8]> {
    let mut documents = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    while offset < input.len() {
        let end = input[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| offset + i + 1)
            .unwrap_or(input.len());

        if let Some(skip) = separator_len(&input[offset..end]) {
            push_document(&mut documents, &input[start..offset]);
            start = offset + skip;
        }
        offset = end;
    }
    push_document(&mut documents, &input[start..]);

    documents
}

fn push_document<'a>(documents: &mut Vec<&'a [u8]>, span: &'a [u8]) {
    if !is_blank(span) {
        documents.push(span);
    }
}

/// Length of the separator if `line` is one. Inline content after the
/// marker is left for the next document; a trailing comment is not.
fn separator_len(line: &[u8]) -> Option<usize> {
    let rest = line.strip_prefix(SEPARATOR)?;
    if !rest.first().is_none_or(u8::is_ascii_whitespace) {
        return None;
    }
    let content = rest.trim_ascii();
    if content.is_empty() || content.starts_with(b"#") {
        Some(line.len())
    } else {
        Some(SEPARATOR.len())
    }
}

/// True when every line is empty, whitespace, or a comment.
fn is_blank(span: &[u8]) -> bool {
    span.split(|&b| b == b'\n').all(|line| {
        let line = line.trim_ascii();
        line.is_empty() || line.starts_with(b"#")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(input: &str) -> Vec<&str> {
        split_documents(input.as_bytes())
            .into_iter()
            .map(|d| std::str::from_utf8(d).unwrap())
            .collect()
    }

    #[test]
    fn test_single_document() {
        assert_eq!(docs("kind: A\n"), vec!["kind: A\n"]);
    }

    #[test]
    fn test_preserves_order() {
        let input = "kind: A\n---\nkind: B\n---\nkind: C\n";
        assert_eq!(docs(input), vec!["kind: A\n", "kind: B\n", "kind: C\n"]);
    }

    #[test]
    fn test_leading_and_trailing_separators() {
        let input = "---\nkind: A\n---\n";
        assert_eq!(docs(input), vec!["kind: A\n"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_documents(b"").is_empty());
    }

    #[test]
    fn test_only_separators_and_whitespace() {
        let input = "---\n\n   \n---\n\t\n---\n";
        assert!(split_documents(input.as_bytes()).is_empty());
    }

    #[test]
    fn test_comment_only_document_dropped() {
        let input = "# rendered empty\n---\nkind: A\n";
        assert_eq!(docs(input), vec!["kind: A\n"]);
    }

    #[test]
    fn test_separator_with_comment() {
        let input = "kind: A\n--- # second\nkind: B\n";
        assert_eq!(docs(input), vec!["kind: A\n", "kind: B\n"]);
    }

    #[test]
    fn test_inline_content_after_separator() {
        let input = "kind: A\n--- !!map\nkind: B\n--- {kind: C}\n";
        assert_eq!(
            docs(input),
            vec!["kind: A\n", " !!map\nkind: B\n", " {kind: C}\n"]
        );
    }

    #[test]
    fn test_dashes_inside_values_do_not_split() {
        let input = "kind: A\ndata:\n  banner: \"---\"\n  rule: ----\n";
        assert_eq!(docs(input), vec![input]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let input = "kind: A\r\n---\r\nkind: B\r\n";
        assert_eq!(docs(input), vec!["kind: A\r\n", "kind: B\r\n"]);
    }

    #[test]
    fn test_malformed_document_not_dropped() {
        let input = "---\n{{ not yaml\n---\n";
        assert_eq!(docs(input), vec!["{{ not yaml\n"]);
    }
}
