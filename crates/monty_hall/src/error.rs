//! Errors raised by round operations.

use crate::Phase;

/// Error that can occur when validating or applying a round operation.
///
/// A rejected operation never changes engine state.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// An operation was invoked in a phase where it is not legal.
    #[display("Cannot {} during the {} phase", operation, phase)]
    InvalidPhaseTransition {
        /// The rejected operation.
        operation: &'static str,
        /// The phase the round was in.
        phase: Phase,
    },

    /// Fewer than three doors were requested.
    #[display("A round needs at least 3 doors, got {}", _0)]
    InvalidDoorCount(usize),

    /// The door index is outside `[0, door_count)`.
    #[display("Door index {} is out of range for {} doors", door, door_count)]
    InvalidDoorIndex {
        /// The rejected index.
        door: usize,
        /// Doors in the current round.
        door_count: usize,
    },

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for GameError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_error_message_names_operation() {
        let err = GameError::InvalidPhaseTransition {
            operation: "resolve_round",
            phase: Phase::Select,
        };
        assert_eq!(err.to_string(), "Cannot resolve_round during the SELECT phase");
    }

    #[test]
    fn test_door_errors_render() {
        let err = GameError::InvalidDoorIndex {
            door: 7,
            door_count: 3,
        };
        assert_eq!(err.to_string(), "Door index 7 is out of range for 3 doors");
        assert_eq!(
            GameError::InvalidDoorCount(2).to_string(),
            "A round needs at least 3 doors, got 2"
        );
    }
}
