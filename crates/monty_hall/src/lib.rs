//! Monty Hall - type-safe round state machine and probability model.
//!
//! A round moves strictly through three phases:
//!
//! - **Select**: the car is placed; the contestant picks a door
//! - **Decide**: the host has opened all but one other door; stay or switch
//! - **Resolved**: the outcome is known and counted in the statistics
//!
//! Randomness and persistence are injected through [`RandomSource`] and
//! [`StatsStore`], so the same engine drives interactive play, batch
//! simulation, and deterministic tests.
//!
//! # Example
//!
//! ```
//! use monty_hall::{Decision, Door, DoorCount, GameEngine, MemoryStore, ScriptedRandom};
//!
//! # fn main() -> Result<(), monty_hall::GameError> {
//! // Car behind door index 1.
//! let rng = ScriptedRandom::new([1]);
//! let mut engine = GameEngine::new(DoorCount::CLASSIC, rng, MemoryStore::new());
//!
//! let revealed = engine.select_door(Door::new(0))?;
//! assert_eq!(revealed, &[Door::new(2)]);
//! assert!((engine.probability_of(Door::new(1))? - 2.0 / 3.0).abs() < 1e-12);
//!
//! let outcome = engine.resolve_round(Decision::Switch)?;
//! assert!(outcome.won());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod contracts;
mod engine;
mod error;
pub mod invariants;
mod random;
mod round;
pub mod rules;
mod simulation;
mod stats;
mod typestate;
mod types;

pub use contracts::{Contract, DoorInRange, ResolveContract, SelectContract, SwitchTargetClosed};
pub use engine::GameEngine;
pub use error::GameError;
pub use random::{RandomSource, ScriptedRandom};
pub use round::Round;
pub use simulation::{SimulationReport, Strategy, run_rounds, simulate};
pub use stats::{MemoryStore, StatKey, Statistics, StatsStore, StoreError};
pub use typestate::{Outcome, RoundDecide, RoundResolved, RoundSelect};
pub use types::{Decision, Door, DoorCount, Phase};
