//! Win/loss statistics and their persistence contract.

mod counters;
mod store;

pub use counters::{StatKey, Statistics};
pub use store::{MemoryStore, StatsStore, StoreError};
