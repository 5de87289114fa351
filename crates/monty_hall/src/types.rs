//! Core domain types: doors, door counts, decisions and phases.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::instrument;

use crate::GameError;

/// A door, identified by its zero-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Door(usize);

impl Door {
    /// Creates a door from a zero-based index.
    ///
    /// The index is not range-checked here; operations that take a door
    /// validate it against the round's [`DoorCount`].
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the zero-based index.
    pub const fn index(self) -> usize {
        self.0
    }

    /// Returns the one-based number shown to players.
    pub const fn number(self) -> usize {
        self.0 + 1
    }
}

impl std::fmt::Display for Door {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "door {}", self.number())
    }
}

impl From<usize> for Door {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Number of doors in a round.
///
/// Always at least [`DoorCount::MIN`], so that after the host opens
/// `count - 2` doors there is still one door to switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct DoorCount(usize);

impl DoorCount {
    /// Smallest door count that leaves a switch option.
    pub const MIN: usize = 3;

    /// The classical three-door puzzle.
    pub const CLASSIC: Self = Self(3);

    /// Validates a door count.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidDoorCount`] when `count < 3`.
    #[instrument]
    pub fn new(count: usize) -> Result<Self, GameError> {
        if count < Self::MIN {
            Err(GameError::InvalidDoorCount(count))
        } else {
            Ok(Self(count))
        }
    }

    /// Returns the raw count.
    pub const fn get(self) -> usize {
        self.0
    }

    /// Returns true if `door` is one of the doors in `[0, count)`.
    pub const fn contains(self, door: Door) -> bool {
        door.0 < self.0
    }

    /// Iterates over every door in index order.
    pub fn doors(self) -> impl Iterator<Item = Door> {
        (0..self.0).map(Door)
    }

    /// Number of doors the host opens once a door is selected.
    pub const fn reveal_count(self) -> usize {
        self.0 - 2
    }
}

impl Default for DoorCount {
    fn default() -> Self {
        Self::CLASSIC
    }
}

impl TryFrom<usize> for DoorCount {
    type Error = GameError;

    fn try_from(count: usize) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

impl From<DoorCount> for usize {
    fn from(count: DoorCount) -> Self {
        count.0
    }
}

impl std::fmt::Display for DoorCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The contestant's choice once the host has opened doors.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Decision {
    /// Keep the originally selected door.
    Stay,
    /// Move to the one remaining unopened door.
    Switch,
}

/// Stage of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Phase {
    /// Waiting for the contestant to pick a door.
    Select,
    /// Doors revealed; waiting for stay or switch.
    Decide,
    /// Outcome known.
    Resolved,
}
