//! Command-line flags.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::Parser;
use idle_core::Amount;

/// Headless idle game client
#[derive(Debug, Parser)]
#[command(name = "idle")]
#[command(about = "Queue actions and run the idle simulation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Content directory holding game.toml and catalog.ron/json
    #[arg(short, long, value_name = "DIR")]
    pub content: Option<PathBuf>,

    /// Production action to queue, optionally with an amount (e.g. chop_oak:10)
    #[arg(short, long = "action", value_name = "ID[:AMOUNT]")]
    pub actions: Vec<QueueSpec>,

    /// Enemy to fight, optionally with an amount (e.g. chicken:inf)
    #[arg(short, long = "fight", value_name = "ID[:AMOUNT]")]
    pub fights: Vec<QueueSpec>,

    /// Skip the game clock ahead this many seconds right after queueing
    #[arg(long, value_name = "SECONDS")]
    pub fast_forward: Option<f64>,

    /// Then let the simulation run in real time for this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub realtime: Option<f64>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

/// An id with an amount; the amount defaults to infinite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueSpec {
    pub id: String,
    pub amount: Amount,
}

impl FromStr for QueueSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (id, amount) = match s.split_once(':') {
            Some((id, amount)) => {
                let amount = amount
                    .parse()
                    .with_context(|| format!("invalid amount '{amount}'"))?;
                (id, amount)
            }
            None => (s, Amount::Infinite),
        };
        if id.is_empty() {
            bail!("missing id in '{s}'");
        }
        Ok(Self {
            id: id.to_owned(),
            amount,
        })
    }
}
