//! imgmeta worker binary
//!
//! Reads one invocation event (the notification envelope) as JSON from
//! `--event <path>` or stdin, writes metadata sidecars, and prints the
//! processing summary as JSON on stdout.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use imgmeta_core::Config;
use imgmeta_storage::create_storage;
use imgmeta_worker::{init_tracing, BatchProcessor, NotificationEnvelope};
use tokio::io::AsyncReadExt;

#[derive(Parser)]
#[command(
    name = "imgmeta-worker",
    about = "Write image metadata sidecars for storage notifications"
)]
struct Cli {
    /// Path to the event JSON; read from stdin when omitted
    #[arg(long)]
    event: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format());

    tracing::info!(
        environment = %config.environment(),
        production = config.is_production(),
        storage_backend = %config.storage_backend(),
        "Starting imgmeta worker"
    );

    let raw = match cli.event {
        Some(ref path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read event file {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read event from stdin")?;
            buffer
        }
    };

    let envelope = NotificationEnvelope::from_json(&raw)
        .context("Event is not a valid notification envelope")?;

    let storage = create_storage(&config)
        .await
        .context("Failed to initialize storage backend")?;

    let summary = BatchProcessor::new(storage).process(&envelope).await;

    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
