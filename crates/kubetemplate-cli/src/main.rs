//! kubetemplate CLI tool.

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{LaunchArgs, TemplateArgs};

#[derive(Parser)]
#[command(name = "kubetemplate")]
#[command(
    about = "Render manifest templates and create them in Kubernetes, rolling back on failure",
    long_about = None
)]
struct Cli {
    /// Log output format
    #[arg(
        long,
        env = "KUBETEMPLATE_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text,
        global = true
    )]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Render templates and create every object, deleting them all if one fails
    Launch(LaunchArgs),
    /// Render templates to stdout without contacting a cluster
    Render {
        #[command(flatten)]
        templates: TemplateArgs,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Commands::Launch(args) => {
            commands::launch::launch(args).await?;
        }
        Commands::Render { templates } => {
            commands::render(&templates)?;
        }
    }

    Ok(())
}
