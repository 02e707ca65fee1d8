//! Diabetes Triage - Main Entry Point

use clap::Parser;
use diabetes_triage::cli::{Cli, Commands, cmd_serve, cmd_train};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diabetes_triage=info,triage=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train { out, metrics, seed, version, test_size, data } => {
            cmd_train(out, metrics, seed, &version, test_size, data)?;
        }
        Commands::Serve { host, port } => {
            cmd_serve(host, port).await?;
        }
    }

    Ok(())
}
