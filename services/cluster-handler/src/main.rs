//! kubeprov Cluster Handler
//!
//! Runs one orchestrator activation: reads a lifecycle event envelope, applies
//! it (or checks its completion) against the remote cluster API, and writes the
//! response envelope to stdout. Logs go to stderr.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kubeprov_cluster_api::HttpClusterApi;
use kubeprov_cluster_handler::config::Config;
use kubeprov_cluster_handler::{is_complete, on_event};
use kubeprov_events::LifecycleEvent;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Lifecycle handler for a managed Kubernetes cluster.
#[derive(Debug, Parser)]
#[command(name = "cluster-handler")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply a create, update or delete event.
    OnEvent(EventArgs),

    /// Check whether the last event has converged.
    IsComplete(EventArgs),
}

#[derive(Debug, Args)]
struct EventArgs {
    /// Path to the event envelope (JSON). Reads stdin when omitted.
    #[arg(long, short)]
    event: Option<PathBuf>,
}

impl EventArgs {
    fn read_event(&self) -> Result<LifecycleEvent> {
        let json = match &self.event {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read event from {:?}", path))?,
            None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read event from stdin")?;
                buf
            }
        };

        LifecycleEvent::from_json(&json).context("Failed to parse event")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize tracing; stdout is reserved for the response envelope
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    info!(api_url = %config.api_url, "Configuration loaded");

    let credentials = config.credentials();
    let api = Arc::new(
        HttpClusterApi::new(&config.api_url, config.request_timeout, credentials.as_ref())
            .context("Failed to create cluster API client")?,
    );

    let output = match &cli.command {
        Command::OnEvent(args) => {
            let event = args.read_event()?;
            let response = on_event(api, &event).await?;
            serde_json::to_string_pretty(&response)?
        }
        Command::IsComplete(args) => {
            let event = args.read_event()?;
            let response = is_complete(api, &event).await?;
            serde_json::to_string_pretty(&response)?
        }
    };

    println!("{}", output);
    Ok(())
}
