//! Contract-based validation for round transitions.
//!
//! Contracts define correctness through preconditions and postconditions.
//! They formalize the Hoare-style reasoning: {P} action {Q}

use tracing::{instrument, warn};

use crate::invariants::{DecideInvariants, InvariantSet, InvariantViolation, ResolvedInvariants};
use crate::typestate::{RoundDecide, RoundResolved, RoundSelect};
use crate::{Decision, Door, GameError};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for a transition
/// from state `S` under action `A`.
pub trait Contract<S, A> {
    /// State produced by the transition.
    type Next;

    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), GameError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &Self::Next) -> Result<(), GameError>;
}

fn violation_error(violations: Vec<InvariantViolation>) -> GameError {
    let descriptions = violations
        .iter()
        .map(|v| v.description.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    warn!(%descriptions, "Postcondition failed");
    GameError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
}

// ─────────────────────────────────────────────────────────────
//  Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the selected door exists in this round.
pub struct DoorInRange;

impl DoorInRange {
    /// Rejects doors outside `[0, door_count)`.
    #[instrument(skip(round))]
    pub fn check(door: &Door, round: &RoundSelect) -> Result<(), GameError> {
        if round.door_count().contains(*door) {
            Ok(())
        } else {
            Err(GameError::InvalidDoorIndex {
                door: door.index(),
                door_count: round.door_count().get(),
            })
        }
    }
}

/// Precondition: a switch has somewhere to go.
pub struct SwitchTargetClosed;

impl SwitchTargetClosed {
    /// Rejects rounds whose alternative door is open or equals the selection.
    #[instrument(skip(round))]
    pub fn check(round: &RoundDecide) -> Result<(), GameError> {
        let alternative = round.alternative();
        if alternative == round.selected() || round.revealed().contains(&alternative) {
            Err(GameError::InvariantViolation(format!(
                "Switch target {} is not a closed alternative",
                alternative
            )))
        } else {
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Select Contract
// ─────────────────────────────────────────────────────────────

/// Contract for picking a door.
///
/// Preconditions:
/// - Door must be in range
///
/// Postconditions:
/// - Car and door count unchanged
/// - Car and selection never revealed
/// - Exactly `door_count - 2` doors revealed
pub struct SelectContract;

impl Contract<RoundSelect, Door> for SelectContract {
    type Next = RoundDecide;

    fn pre(round: &RoundSelect, door: &Door) -> Result<(), GameError> {
        DoorInRange::check(door, round)
    }

    fn post(before: &RoundSelect, after: &RoundDecide) -> Result<(), GameError> {
        if before.car_door() != after.car_door() || before.door_count() != after.door_count() {
            return Err(GameError::InvariantViolation(
                "Postcondition failed: car moved during reveal".to_string(),
            ));
        }
        DecideInvariants::check_all(after).map_err(violation_error)?;
        SwitchTargetClosed::check(after)
    }
}

// ─────────────────────────────────────────────────────────────
//  Resolve Contract
// ─────────────────────────────────────────────────────────────

/// Contract for staying or switching.
///
/// Preconditions:
/// - A closed switch target exists
///
/// Postconditions:
/// - Reveal unchanged
/// - Outcome consistent with decision and car position
pub struct ResolveContract;

impl Contract<RoundDecide, Decision> for ResolveContract {
    type Next = RoundResolved;

    fn pre(round: &RoundDecide, _decision: &Decision) -> Result<(), GameError> {
        SwitchTargetClosed::check(round)
    }

    fn post(before: &RoundDecide, after: &RoundResolved) -> Result<(), GameError> {
        if before.revealed() != after.revealed() {
            return Err(GameError::InvariantViolation(
                "Postcondition failed: reveal changed during resolution".to_string(),
            ));
        }
        ResolvedInvariants::check_all(after).map_err(violation_error)
    }
}
