//! Trigger build CLI tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use triggers_compiler::ProjectProperties;

mod commands;

#[derive(Parser)]
#[command(name = "triggers")]
#[command(about = "Compile trigger declarations into build pipelines", long_about = None)]
struct Cli {
    /// Root directory of generated trigger projects and archives
    #[arg(long, env = "TRIGGERS_BUILD_ROOT", default_value = "build", global = true)]
    build_root: PathBuf,

    /// Client name passed to templates
    #[arg(long, env = "TRIGGERS_CLIENT_NAME", global = true)]
    client_name: Option<String>,

    /// System name passed to templates
    #[arg(long, env = "TRIGGERS_SYSTEM_NAME", global = true)]
    system_name: Option<String>,

    /// Release version the triggers deploy
    #[arg(long, env = "TRIGGERS_RELEASE", global = true)]
    release: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a trigger declaration
    Validate {
        /// Path to the declaration file
        #[arg(default_value = "triggers.kdl")]
        path: PathBuf,
    },
    /// Show the compiled pipeline of every trigger
    Plan {
        /// Path to the declaration file
        #[arg(default_value = "triggers.kdl")]
        path: PathBuf,
        /// Print the pipelines as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the wrapper and template files of every trigger
    Generate {
        /// Path to the declaration file
        #[arg(default_value = "triggers.kdl")]
        path: PathBuf,
    },
}

impl Cli {
    fn properties(&self) -> ProjectProperties {
        ProjectProperties {
            client_name: self.client_name.clone(),
            release: self.release.clone(),
            system_name: self.system_name.clone(),
            ..ProjectProperties::new(&self.build_root)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let properties = cli.properties();

    match &cli.command {
        Commands::Validate { path } => {
            commands::validate(path, properties)?;
        }
        Commands::Plan { path, json } => {
            commands::plan::run(path, properties, *json)?;
        }
        Commands::Generate { path } => {
            commands::generate::run(path, properties).await?;
        }
    }

    Ok(())
}
