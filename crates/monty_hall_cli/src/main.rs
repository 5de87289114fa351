//! Monty Hall - Unified CLI
//!
//! Interactive play, batch simulation and statistics maintenance.

#![warn(missing_docs)]

use std::io::{self, BufRead, Write};

use anyhow::{Result, bail};
use clap::Parser;
use monty_hall::{Decision, GameEngine, MemoryStore, Statistics, Strategy, rules};
use monty_hall_cli::cli::{Cli, Command};
use monty_hall_cli::{AppConfig, SqliteStatsStore, simulate, tui};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // The TUI installs its own file logger
    if !matches!(cli.command, Command::Play { .. }) {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,monty_hall=debug")),
            )
            .with_writer(io::stderr)
            .init();
    }

    let config = AppConfig::load_or_default(&cli.config)?.with_overrides(None, cli.db_path);

    match cli.command {
        Command::Play { doors } => tui::run_tui(config.with_overrides(doors, None)).await,
        Command::Simulate {
            doors,
            rounds,
            strategy,
            record,
            json,
            seed,
        } => {
            run_simulation(
                config.with_overrides(doors, None),
                rounds,
                strategy,
                record,
                json,
                seed,
            )
            .await
        }
        Command::Stats { json } => show_stats(&config, json),
        Command::ResetStats { yes } => reset_stats(&config, yes),
    }
}

/// Run a batch simulation and print the report
#[instrument(skip(config), fields(db_path = %config.db_path()))]
async fn run_simulation(
    config: AppConfig,
    rounds: u64,
    strategy: Strategy,
    record: bool,
    json: bool,
    seed: Option<u64>,
) -> Result<()> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let door_count = config.doors();
    let chunk = *config.simulation_chunk();

    info!(%door_count, rounds, %strategy, record, "Starting simulation");

    let report = if record {
        let store = SqliteStatsStore::open(config.db_path().clone())?;
        let mut engine = GameEngine::new(door_count, rng, store);
        simulate::run_chunked(&mut engine, strategy, rounds, chunk, true).await?
    } else {
        let mut engine = GameEngine::new(door_count, rng, MemoryStore::new());
        simulate::run_chunked(&mut engine, strategy, rounds, chunk, false).await?
    };

    if json {
        println!("{}", simulate::render_json(&report)?);
    } else {
        print!("{}", simulate::render_text(&report));
    }
    Ok(())
}

/// Print the persisted statistics
#[instrument(skip(config), fields(db_path = %config.db_path()))]
fn show_stats(config: &AppConfig, json: bool) -> Result<()> {
    let store = SqliteStatsStore::open(config.db_path().clone())?;
    let stats = Statistics::load(&store);
    let last_updated = store.last_updated()?;

    if json {
        let value = serde_json::json!({
            "statistics": stats,
            "stay_win_rate": stats.win_rate(Decision::Stay),
            "switch_win_rate": stats.win_rate(Decision::Switch),
            "overall_win_rate": stats.overall_win_rate(),
            "last_updated": last_updated,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let door_count = config.doors();
    println!("Statistics in {}", store.db_path());
    println!("  rounds played: {}", stats.total_rounds());
    for (decision, wins, rounds) in [
        (Decision::Stay, stats.stay_wins(), stats.stay_rounds()),
        (Decision::Switch, stats.switch_wins(), stats.switch_rounds()),
    ] {
        println!(
            "  {:<6} {:>8} / {:<8} {:>6.2}%  (theory with {} doors: {:.2}%)",
            decision,
            wins,
            rounds,
            stats.win_rate(decision),
            door_count,
            rules::theoretical_win_rate(door_count, decision) * 100.0
        );
    }
    println!("  overall win rate: {:.2}%", stats.overall_win_rate());
    match last_updated {
        Some(at) => println!("  last updated: {} UTC", at.format("%Y-%m-%d %H:%M:%S")),
        None => println!("  never updated"),
    }
    Ok(())
}

/// Zero the persisted statistics after confirmation
#[instrument(skip(config), fields(db_path = %config.db_path()))]
fn reset_stats(config: &AppConfig, yes: bool) -> Result<()> {
    if !yes && !confirm(&format!("Reset all statistics in {}? [y/N] ", config.db_path()))? {
        println!("Reset cancelled");
        return Ok(());
    }

    let store = SqliteStatsStore::open(config.db_path().clone())?;
    let mut engine = GameEngine::new(config.doors(), StdRng::from_os_rng(), store);
    if !engine.reset_statistics() {
        bail!("Failed to write zeroed statistics to {}", config.db_path());
    }

    info!("Statistics reset");
    println!("Statistics reset");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer)? == 0 {
        warn!("No answer on stdin, treating as no");
        return Ok(false);
    }
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}
