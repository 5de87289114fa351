//! Command-line interface for monty_hall.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use monty_hall::Strategy;

/// Monty Hall - play the game or simulate it a million times
#[derive(Parser, Debug)]
#[command(name = "monty_hall")]
#[command(about = "Interactive Monty Hall game with persistent statistics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file (optional)
    #[arg(short, long, global = true, default_value = "monty_hall.toml")]
    pub config: PathBuf,

    /// Override the statistics database path
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play interactively in the terminal
    Play {
        /// Number of doors (clamped to 3..=16)
        #[arg(short, long)]
        doors: Option<usize>,
    },

    /// Run many rounds under a fixed strategy
    Simulate {
        /// Number of doors (clamped to 3..=16)
        #[arg(short, long)]
        doors: Option<usize>,

        /// Rounds to play
        #[arg(short, long, default_value = "10000")]
        rounds: u64,

        /// Contestant strategy: stay, switch or random
        #[arg(short, long, default_value = "switch")]
        strategy: Strategy,

        /// Add simulated rounds to the persistent statistics
        #[arg(long)]
        record: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the persistent statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Zero the persistent statistics
    ResetStats {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
