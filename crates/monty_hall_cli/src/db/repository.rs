//! Key-value statistics store backed by SQLite.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use monty_hall::{StatsStore, StoreError};
use tracing::{debug, info, instrument};

use crate::db::{DbError, NewStatistic, StatisticRow, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Statistics store persisted in a SQLite database file.
///
/// A connection is opened per operation; the store itself only holds the
/// path.
#[derive(Debug, Clone)]
pub struct SqliteStatsStore {
    db_path: String,
}

impl SqliteStatsStore {
    /// Creates a store for the database at the given path without touching it.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Self {
        info!(path = %db_path, "Creating SqliteStatsStore");
        Self { db_path }
    }

    /// Opens the database, creating it and applying migrations as needed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the file cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        let store = Self::new(db_path);
        store.run_migrations()?;
        Ok(store)
    }

    /// Returns the database path.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Reads one counter row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_value(&self, name: &str) -> Result<Option<StatisticRow>, DbError> {
        let mut conn = self.connection()?;

        let row = schema::statistics::table
            .filter(schema::statistics::name.eq(name))
            .select(StatisticRow::as_select())
            .first(&mut conn)
            .optional()?;

        debug!(found = row.is_some(), "Counter looked up");
        Ok(row)
    }

    /// Writes one counter, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn put_value(&self, name: &str, value: i64) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let row = NewStatistic::new(name.to_string(), value, Utc::now().naive_utc());

        diesel::replace_into(schema::statistics::table)
            .values(&row)
            .execute(&mut conn)?;

        debug!("Counter stored");
        Ok(())
    }

    /// Lists every stored counter, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<StatisticRow>, DbError> {
        let mut conn = self.connection()?;

        let rows = schema::statistics::table
            .order(schema::statistics::name.asc())
            .select(StatisticRow::as_select())
            .load(&mut conn)?;

        info!(count = rows.len(), "Counters loaded");
        Ok(rows)
    }

    /// Most recent write to any counter, or `None` for an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn last_updated(&self) -> Result<Option<NaiveDateTime>, DbError> {
        let mut conn = self.connection()?;

        let latest = schema::statistics::table
            .select(diesel::dsl::max(schema::statistics::updated_at))
            .first::<Option<NaiveDateTime>>(&mut conn)?;

        Ok(latest)
    }
}

impl StatsStore for SqliteStatsStore {
    fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
        Ok(self.get_value(key)?.map(|row| *row.value()))
    }

    fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        Ok(self.put_value(key, value)?)
    }
}
