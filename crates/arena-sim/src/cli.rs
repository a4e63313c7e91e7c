//! Command line arguments.
//!
//! Every flag is optional; a flag that is given overrides the matching
//! value from the config file, which in turn overrides the defaults.

use std::path::PathBuf;

use clap::Parser;

/// Runs a seeded Agent Arena tournament and prints the results as JSON.
#[derive(Parser, Debug, Default)]
#[command(name = "arena-sim")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON tournament config file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seed for the randomness source.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Number of agents to mint.
    #[arg(short, long)]
    pub agents: Option<u64>,

    /// Number of rounds to play.
    #[arg(short, long)]
    pub rounds: Option<u32>,

    /// Print the full ledger snapshot instead of the standings.
    #[arg(long)]
    pub snapshot: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_overrides() {
        let args = Args::parse_from(["arena-sim", "--seed", "9", "-a", "6", "--snapshot"]);
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.agents, Some(6));
        assert_eq!(args.rounds, None);
        assert!(args.snapshot);
    }

    #[test]
    fn no_flags_means_no_overrides() {
        let args = Args::parse_from(["arena-sim"]);
        assert!(args.config.is_none());
        assert!(args.seed.is_none());
        assert!(!args.snapshot);
    }
}
