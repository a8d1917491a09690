//! Launch command: render, resolve, then create transactionally.

use anyhow::{Context, Result};
use kubetemplate_core::{Launch, Transaction};
use kubetemplate_deployer::{ClusterConnection, LauncherFactory};
use tracing::{info, warn};

use super::{LaunchArgs, render_templates};

pub async fn launch(args: LaunchArgs) -> Result<()> {
    let rendered = render_templates(&args.templates)?;

    let connection =
        ClusterConnection::connect(args.kube_config.as_deref(), args.context.as_deref())
            .await
            .context("Failed to connect to the cluster")?;

    let factory = LauncherFactory::connect(&connection)
        .await
        .context("Failed to discover cluster API resources")?
        .with_echo(!args.quiet);

    // Every document is resolved before anything is created.
    let mut launchers = Vec::new();
    for template in &rendered {
        let resolved = factory
            .launchers(&template.contents)
            .with_context(|| format!("Failed to resolve manifests in {}", template.path.display()))?;
        launchers.extend(resolved);
    }

    if args.dry_run {
        for launcher in &launchers {
            println!("would create {}", launcher.display_name());
            if !args.quiet {
                println!("{}\n", serde_json::to_string_pretty(launcher.object())?);
            }
        }
        info!(count = launchers.len(), "dry run, nothing created");
        return Ok(());
    }

    let mut tx = Transaction::new(launchers).with_rollback_order(args.rollback_order.into());
    if let Err(failure) = tx.apply().await {
        for error in &failure.rollback_errors {
            warn!(error = %error.report(), "object may have been left behind");
        }
        return Err(failure).context("Launch failed and was rolled back");
    }

    println!("Created {} object(s)", tx.launched().len());
    Ok(())
}
