//! Cumulative win/loss counters.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};
use tracing::{debug, info, instrument, warn};

use super::{StatsStore, StoreError};
use crate::Decision;

/// Persisted counter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StatKey {
    /// Rounds won after staying.
    StayWins,
    /// Rounds won after switching.
    SwitchWins,
    /// Rounds resolved by staying.
    StayRounds,
    /// Rounds resolved by switching.
    SwitchRounds,
    /// All resolved rounds.
    TotalRounds,
}

impl StatKey {
    /// Returns the store key.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Cumulative statistics across rounds and sessions.
///
/// Counters only grow, except through [`Statistics::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Statistics {
    stay_wins: u64,
    switch_wins: u64,
    stay_rounds: u64,
    switch_rounds: u64,
    total_rounds: u64,
}

impl Statistics {
    /// Returns all-zero counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rounds won after staying.
    pub fn stay_wins(&self) -> u64 {
        self.stay_wins
    }

    /// Rounds won after switching.
    pub fn switch_wins(&self) -> u64 {
        self.switch_wins
    }

    /// Rounds resolved by staying.
    pub fn stay_rounds(&self) -> u64 {
        self.stay_rounds
    }

    /// Rounds resolved by switching.
    pub fn switch_rounds(&self) -> u64 {
        self.switch_rounds
    }

    /// All resolved rounds.
    pub fn total_rounds(&self) -> u64 {
        self.total_rounds
    }

    /// All rounds won, whichever decision.
    pub fn wins(&self) -> u64 {
        self.stay_wins + self.switch_wins
    }

    /// Returns the counter stored under `key`.
    pub fn get(&self, key: StatKey) -> u64 {
        match key {
            StatKey::StayWins => self.stay_wins,
            StatKey::SwitchWins => self.switch_wins,
            StatKey::StayRounds => self.stay_rounds,
            StatKey::SwitchRounds => self.switch_rounds,
            StatKey::TotalRounds => self.total_rounds,
        }
    }

    fn slot(&mut self, key: StatKey) -> &mut u64 {
        match key {
            StatKey::StayWins => &mut self.stay_wins,
            StatKey::SwitchWins => &mut self.switch_wins,
            StatKey::StayRounds => &mut self.stay_rounds,
            StatKey::SwitchRounds => &mut self.switch_rounds,
            StatKey::TotalRounds => &mut self.total_rounds,
        }
    }

    /// Counts one resolved round.
    #[instrument(skip(self))]
    pub fn record(&mut self, decision: Decision, won: bool) {
        self.total_rounds += 1;
        match decision {
            Decision::Stay => {
                self.stay_rounds += 1;
                if won {
                    self.stay_wins += 1;
                }
            }
            Decision::Switch => {
                self.switch_rounds += 1;
                if won {
                    self.switch_wins += 1;
                }
            }
        }
    }

    /// Zeroes every counter.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        info!(total_rounds = self.total_rounds, "Resetting statistics");
        *self = Self::default();
    }

    /// Win percentage (0.0–100.0) for rounds resolved with `decision`.
    pub fn win_rate(&self, decision: Decision) -> f64 {
        let (wins, rounds) = match decision {
            Decision::Stay => (self.stay_wins, self.stay_rounds),
            Decision::Switch => (self.switch_wins, self.switch_rounds),
        };
        percentage(wins, rounds)
    }

    /// Win percentage (0.0–100.0) over all rounds.
    pub fn overall_win_rate(&self) -> f64 {
        percentage(self.wins(), self.total_rounds)
    }

    /// Loads counters from `store`. Missing or unreadable keys count as 0.
    #[instrument(skip(store))]
    pub fn load<S: StatsStore + ?Sized>(store: &S) -> Self {
        let mut stats = Self::default();
        for key in StatKey::iter() {
            let value = match store.get(key.as_str()) {
                Ok(Some(value)) => u64::try_from(value).unwrap_or_else(|_| {
                    warn!(key = key.as_str(), value, "Negative counter in store, using 0");
                    0
                }),
                Ok(None) => 0,
                Err(e) => {
                    warn!(key = key.as_str(), error = %e, "Failed to read counter, using 0");
                    0
                }
            };
            *stats.slot(key) = value;
        }
        debug!(?stats, "Statistics loaded");
        stats
    }

    /// Writes every counter to `store`.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`]; later keys are still attempted.
    #[instrument(skip(self, store))]
    pub fn save<S: StatsStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        let mut first_error = None;
        for key in StatKey::iter() {
            let value = i64::try_from(self.get(key)).unwrap_or(i64::MAX);
            if let Err(e) = store.set(key.as_str(), value) {
                warn!(key = key.as_str(), error = %e, "Failed to write counter");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => {
                debug!(total_rounds = self.total_rounds, "Statistics saved");
                Ok(())
            }
        }
    }
}

fn percentage(wins: u64, rounds: u64) -> f64 {
    if rounds == 0 {
        0.0
    } else {
        (wins as f64 / rounds as f64) * 100.0
    }
}
