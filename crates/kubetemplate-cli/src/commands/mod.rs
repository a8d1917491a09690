//! CLI command implementations.

pub mod launch;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use kubetemplate_config::{TemplateParameters, TemplateParametersBuilder, render_file};
use kubetemplate_core::RollbackOrder;
use std::path::PathBuf;

/// Where templates live and the values rendered into them.
#[derive(Args, Debug, Clone)]
pub struct TemplateArgs {
    /// Directory containing the template files [default: templates/ next to the executable]
    #[arg(long, env = "KUBETEMPLATE_YAML_PATH")]
    pub yaml_path: Option<PathBuf>,

    /// Template file to render, relative to the template directory
    #[arg(long = "template", default_value = "app.yaml")]
    pub templates: Vec<PathBuf>,

    /// Namespace in which to create objects
    #[arg(long, default_value = "mynamespace")]
    pub namespace: String,

    /// Disk space to allocate for the persistent volume
    #[arg(long, default_value = "5Gi")]
    pub capacity: String,

    /// Path to use when using a local disk path for the persistent volume
    #[arg(long, default_value = "")]
    pub local_disk_path: String,

    /// Additional template value (Format: KEY=VALUE)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub values: Vec<String>,
}

#[derive(Args, Debug)]
pub struct LaunchArgs {
    #[command(flatten)]
    pub templates: TemplateArgs,

    /// Path to the kubeconfig [default: $KUBECONFIG or ~/.kube/config]
    #[arg(long)]
    pub kube_config: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Order in which created objects are deleted if a later create fails
    #[arg(long, value_enum, default_value_t = RollbackArg::Creation)]
    pub rollback_order: RollbackArg,

    /// Resolve every object against the cluster but create nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Do not print objects as they are created or deleted
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RollbackArg {
    /// Delete in the order objects were created
    Creation,
    /// Delete the most recently created object first
    Reverse,
}

impl From<RollbackArg> for RollbackOrder {
    fn from(arg: RollbackArg) -> Self {
        match arg {
            RollbackArg::Creation => RollbackOrder::CreationOrder,
            RollbackArg::Reverse => RollbackOrder::ReverseCreationOrder,
        }
    }
}

/// A rendered template and the path it came from.
pub struct Rendered {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl TemplateArgs {
    pub fn parameters(&self) -> Result<TemplateParameters> {
        let params = TemplateParametersBuilder::new()
            .with_namespace(&self.namespace)
            .with_capacity(&self.capacity)
            .with_local_disk_path(&self.local_disk_path)
            .with_assignments(&self.values)?
            .build();
        Ok(params)
    }

    pub fn template_dir(&self) -> Result<PathBuf> {
        if let Some(path) = &self.yaml_path {
            return Ok(path.clone());
        }
        // Templates ship in a directory next to the executable.
        let exe = std::env::current_exe().context("Failed to locate the executable")?;
        let dir = exe
            .parent()
            .context("Executable has no parent directory")?
            .join("templates");
        Ok(dir)
    }
}

/// Render every requested template, in the order given.
pub fn render_templates(args: &TemplateArgs) -> Result<Vec<Rendered>> {
    let params = args.parameters()?;
    let dir = args.template_dir()?;

    args.templates
        .iter()
        .map(|template| {
            let path = dir.join(template);
            let contents = render_file(&path, &params)
                .with_context(|| format!("Failed to render template: {}", path.display()))?;
            Ok(Rendered { path, contents })
        })
        .collect()
}

/// Print rendered templates as one multi-document stream.
pub fn render(args: &TemplateArgs) -> Result<()> {
    for rendered in render_templates(args)? {
        println!("# Source: {}", rendered.path.display());
        println!("{}", String::from_utf8_lossy(&rendered.contents).trim_end());
        println!("---");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        templates: TemplateArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::parse_from(["kubetemplate"]);
        let params = cli.templates.parameters().unwrap();

        assert_eq!(cli.templates.templates, vec![PathBuf::from("app.yaml")]);
        assert_eq!(params.namespace(), Some("mynamespace"));
        assert_eq!(params.get("Capacity"), Some("5Gi"));
        assert_eq!(params.get("LocalDiskPath"), Some(""));
    }

    #[test]
    fn test_set_overrides() {
        let cli = TestCli::parse_from([
            "kubetemplate",
            "--namespace",
            "prod",
            "--set",
            "Replicas=3",
        ]);
        let params = cli.templates.parameters().unwrap();

        assert_eq!(params.namespace(), Some("prod"));
        assert_eq!(params.get("Replicas"), Some("3"));
    }

    #[test]
    fn test_render_templates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ns.yaml"), "name: {{ .Namespace }}\n").unwrap();
        std::fs::write(dir.path().join("pv.yaml"), "storage: {{ .Capacity }}\n").unwrap();

        let cli = TestCli::parse_from([
            "kubetemplate",
            "--yaml-path",
            dir.path().to_str().unwrap(),
            "--template",
            "ns.yaml",
            "--template",
            "pv.yaml",
        ]);
        let rendered = render_templates(&cli.templates).unwrap();

        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].contents, b"name: mynamespace\n");
        assert_eq!(rendered[1].contents, b"storage: 5Gi\n");
    }

    #[test]
    fn test_missing_template_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = TestCli::parse_from([
            "kubetemplate",
            "--yaml-path",
            dir.path().to_str().unwrap(),
        ]);
        assert!(render_templates(&cli.templates).is_err());
    }

    fn bundled_kinds(extra: &[&str]) -> Vec<String> {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates");
        let mut args = vec!["kubetemplate", "--yaml-path", dir];
        args.extend_from_slice(extra);
        let cli = TestCli::parse_from(args);

        let rendered = render_templates(&cli.templates).unwrap();
        kubetemplate_core::split_documents(&rendered[0].contents)
            .into_iter()
            .map(|doc| kubetemplate_deployer::decode(doc).unwrap().1.kind)
            .collect()
    }

    #[test]
    fn test_bundled_template_decodes() {
        assert_eq!(
            bundled_kinds(&[]),
            vec![
                "Namespace",
                "Secret",
                "PersistentVolumeClaim",
                "StatefulSet"
            ]
        );
        assert_eq!(
            bundled_kinds(&["--local-disk-path", "/mnt/disks/ssd0"]),
            vec![
                "Namespace",
                "Secret",
                "PersistentVolume",
                "PersistentVolumeClaim",
                "StatefulSet"
            ]
        );
    }

    #[test]
    fn test_rollback_arg_conversion() {
        assert_eq!(
            RollbackOrder::from(RollbackArg::Creation),
            RollbackOrder::CreationOrder
        );
        assert_eq!(
            RollbackOrder::from(RollbackArg::Reverse),
            RollbackOrder::ReverseCreationOrder
        );
    }
}
