//! Terminal UI for interactive play.

mod app;
mod input;
mod ui;

pub use app::{App, DoorCard, DoorFace};

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use monty_hall::{GameEngine, RandomSource, StatsStore};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, instrument};

use crate::config::AppConfig;
use crate::db;

const TICK: Duration = Duration::from_millis(50);

/// Runs the interactive game until the player quits.
#[instrument(skip(config))]
pub async fn run_tui(config: AppConfig) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create("monty_hall_tui.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,monty_hall=debug")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(door_count = %config.doors(), db_path = %config.db_path(), "Starting Monty Hall TUI");

    let store = db::open_or_memory(config.db_path());
    let engine = GameEngine::new(config.doors(), StdRng::from_os_rng(), store);
    let mut app = App::new(engine, config.reveal_delay(), config.auto_restart());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!(
        total_rounds = app.engine().statistics().total_rounds(),
        "TUI closed"
    );
    res
}

/// Draw, poll input, advance the animation; repeat until quit.
async fn run_app<B, R, S>(terminal: &mut Terminal<B>, app: &mut App<R, S>) -> Result<()>
where
    B: ratatui::backend::Backend,
    B::Error: Send + Sync + 'static,
    R: RandomSource,
    S: StatsStore,
{
    loop {
        let cards = app.door_cards();
        terminal.draw(|f| {
            ui::draw(
                f,
                &cards,
                app.door_count(),
                app.engine().statistics(),
                app.status(),
            )
        })?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, Instant::now());
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }

        app.tick(Instant::now());
        tokio::task::yield_now().await;
    }
}
