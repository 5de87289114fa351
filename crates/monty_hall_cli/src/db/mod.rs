//! SQLite persistence for cumulative statistics.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{NewStatistic, StatisticRow};
pub use repository::SqliteStatsStore;

use monty_hall::{MemoryStore, StatsStore};
use tracing::{instrument, warn};

/// Opens the SQLite store, falling back to process-local counters if the
/// database is unusable.
#[instrument]
pub fn open_or_memory(db_path: &str) -> Box<dyn StatsStore> {
    match SqliteStatsStore::open(db_path.to_string()) {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(error = %e, "Statistics database unavailable, counters will not persist");
            Box::new(MemoryStore::new())
        }
    }
}
