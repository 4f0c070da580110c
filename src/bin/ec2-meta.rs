//! CLI binary for the ec2-meta crate.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ec2_meta::{Ec2Metadata, DEFAULT_BASE_URL};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ec2-meta")]
#[command(
    author,
    version,
    about = "Detect AWS EC2 and fetch identifying instance metadata"
)]
struct Cli {
    /// Metadata service base URL (override for testing)
    #[arg(short, long, default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the metadata service and report detection via exit status
    Detect,

    /// Run a full discovery attempt and print the metadata record
    Fetch {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown format: {}", s)),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // One-time diagnostics initialization; must happen exactly once per
    // process, before any discovery attempt runs.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Detect => {
            let meta = Ec2Metadata::discover_with_base_url(&cli.base_url).await?;
            info!(
                instance_id = %meta.instance_id(),
                instance_type = %meta.instance_type(),
                availability_zone = %meta.availability_zone(),
                "detected AWS EC2 instance"
            );
            Ok(())
        }

        Commands::Fetch { format } => {
            let meta = Ec2Metadata::discover_with_base_url(&cli.base_url).await?;
            match format {
                OutputFormat::Text => println!("{}", meta),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&meta)?),
            }
            Ok(())
        }
    }
}
