//! Database models for the key-value statistics table.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::db::schema;

/// One stored counter.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::statistics)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StatisticRow {
    name: String,
    value: i64,
    updated_at: NaiveDateTime,
}

/// Insertable counter; replaces any existing row with the same name.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::statistics)]
pub struct NewStatistic {
    name: String,
    value: i64,
    updated_at: NaiveDateTime,
}
