//! Idle game client binary.
//!
//! Loads a content pack, queues the requested actions and fights, then
//! fast-forwards and/or runs the simulation in real time while printing
//! notifications. The final state is printed on exit.
//!
//! # Examples
//!
//! ```bash
//! # Chop ten logs instantly, then fight chickens for a minute
//! cargo run -p idle-client -- -a chop_oak:10 --fast-forward 30 -f chicken --realtime 60
//! ```

mod cli;
mod config;
mod report;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use idle_core::{ActionId, EnemyId};
use idle_runtime::{Event, Runtime, RuntimeConfig, Topic};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env();
    run(cli, config).await
}

async fn run(cli: Cli, config: ClientConfig) -> Result<()> {
    let content_dir = cli
        .content
        .clone()
        .or(config.content_dir.clone())
        .unwrap_or_else(|| idle_content::SAMPLE_DATA_DIR.into());
    tracing::info!(content_dir = %content_dir.display(), "starting idle client");

    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            frame_interval: config.frame_interval,
            ..RuntimeConfig::default()
        })
        .content_dir(&content_dir)
        .build()
        .await
        .with_context(|| format!("failed to start with content from {}", content_dir.display()))?;

    let handle = runtime.handle();
    let mut notifications = handle.subscribe(Topic::Notifications);
    let printer = tokio::spawn(async move {
        loop {
            match notifications.recv().await {
                Ok(Event::Notification(notification)) => {
                    println!("{}", report::notification_line(&notification));
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notification output fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    for spec in &cli.actions {
        handle
            .add_action(ActionId::new(spec.id.as_str()), spec.amount)
            .await
            .with_context(|| format!("cannot queue action '{}'", spec.id))?;
    }
    for spec in &cli.fights {
        handle
            .add_combat_action(EnemyId::new(spec.id.as_str()), spec.amount)
            .await
            .with_context(|| format!("cannot queue fight '{}'", spec.id))?;
    }

    if let Some(seconds) = cli.fast_forward {
        let duration = seconds_to_duration(seconds)?;
        let report = handle.fast_forward(duration).await?;
        tracing::info!(steps = report.steps, seconds, "fast-forwarded");
    }

    if let Some(seconds) = cli.realtime {
        let duration = seconds_to_duration(seconds)?;
        tracing::info!(seconds, "running in real time, ctrl-c to stop");
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = tokio::signal::ctrl_c() => tracing::info!("interrupted"),
        }
    }

    let snapshot = handle.snapshot().await?;
    drop(handle);
    runtime.shutdown().await?;
    printer.await.context("notification printer panicked")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        report::print_summary(&snapshot);
    }

    tracing::info!("client shutdown complete");
    Ok(())
}

fn seconds_to_duration(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds).with_context(|| format!("invalid duration {seconds}s"))
}
