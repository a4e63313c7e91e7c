//! Agent Arena tournament runner.
//!
//! Mints a seeded set of agents, plays a number of rounds, and prints the
//! standings and battle history (or, with `--snapshot`, the full ledger) as
//! JSON on stdout. Logs go to stderr and honour `RUST_LOG`.

mod cli;
mod config;
mod tournament;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;
use crate::config::SimConfig;
use crate::tournament::Tournament;

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimConfig::default(),
    }
    .with_overrides(&args);
    tracing::info!(
        seed = config.seed,
        agents = config.agents,
        rounds = config.rounds,
        "starting tournament"
    );

    let mut tournament = Tournament::new(&config)?;
    tournament.play(config.rounds)?;
    tracing::info!(
        battles = tournament.engine().battle_count(),
        "tournament finished"
    );

    let json = if args.snapshot {
        serde_json::to_string_pretty(&tournament.snapshot())
    } else {
        serde_json::to_string_pretty(&tournament.report())
    }
    .context("serializing results")?;
    println!("{json}");
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
