//! Monty Hall application: terminal game, batch simulator and SQLite
//! statistics store built on the `monty_hall` engine.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod db;
pub mod simulate;
pub mod tui;

pub use config::{AppConfig, ConfigError, MAX_DOORS, MIN_DOORS, clamp_door_count};
pub use db::{DbError, SqliteStatsStore};
