//! Rendering of Go-template manifests.
//!
//! Templates use Go `text/template` syntax. Parameters are fields of the root
//! context (`{{ .Namespace }}`) and `{{ GeneratePassword }}` expands to a fresh
//! random password on every call.

use gtmpl::{Context, FuncError, Template, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::password::generate_password;
use crate::{ConfigError, ConfigResult, TemplateParameters};

/// Render the template file at `path`.
pub fn render_file(path: &Path, params: &TemplateParameters) -> ConfigResult<Vec<u8>> {
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    debug!(template = %path.display(), "rendering template");
    render_str(&name, &source, params).map(String::into_bytes)
}

/// Render template `source`; `name` only identifies it in errors.
///
/// Parameters are exposed as object fields, so a reference to one that was
/// never set fails the render instead of printing `<no value>`.
pub fn render_str(name: &str, source: &str, params: &TemplateParameters) -> ConfigResult<String> {
    let mut tmpl = Template::default();
    tmpl.add_func("GeneratePassword", template_generate_password);
    tmpl.parse(source).map_err(|e| ConfigError::Parse {
        name: name.to_string(),
        message: e.to_string(),
    })?;

    tmpl.render(&context(params))
        .map_err(|e| ConfigError::Render {
            name: name.to_string(),
            message: e.to_string(),
        })
}

fn context(params: &TemplateParameters) -> Context {
    let values: HashMap<String, Value> = params
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect();
    Context::from(Value::Object(values))
}

fn template_generate_password(args: &[Value]) -> Result<Value, FuncError> {
    if !args.is_empty() {
        return Err(FuncError::ExactlyXArgs("GeneratePassword".to_string(), 0));
    }
    let password = generate_password();
    info!(%password, "generated password");
    Ok(Value::String(password))
}
