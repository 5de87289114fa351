//! First-class invariants for Monty Hall rounds.
//!
//! Invariants are logical properties that must hold once the host has
//! opened doors. They are checked as postconditions in debug builds and can
//! be tested independently.

use crate::typestate::{RoundDecide, RoundResolved};
use crate::{Door, DoorCount};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of two to four invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);

/// Read access shared by rounds that have revealed doors.
pub trait RevealedRound {
    /// Number of doors.
    fn door_count(&self) -> DoorCount;
    /// Door hiding the car.
    fn car_door(&self) -> Door;
    /// Door the contestant currently holds.
    fn held_door(&self) -> Door;
    /// Doors opened by the host.
    fn revealed_doors(&self) -> &[Door];
}

impl RevealedRound for RoundDecide {
    fn door_count(&self) -> DoorCount {
        self.door_count
    }

    fn car_door(&self) -> Door {
        self.car_door
    }

    fn held_door(&self) -> Door {
        self.selected
    }

    fn revealed_doors(&self) -> &[Door] {
        &self.revealed
    }
}

impl RevealedRound for RoundResolved {
    fn door_count(&self) -> DoorCount {
        self.door_count
    }

    fn car_door(&self) -> Door {
        self.car_door
    }

    fn held_door(&self) -> Door {
        self.outcome.final_door()
    }

    fn revealed_doors(&self) -> &[Door] {
        &self.revealed
    }
}

pub mod outcome_consistent;
pub mod reveal_count;
pub mod reveal_safety;

pub use outcome_consistent::OutcomeConsistentInvariant;
pub use reveal_count::RevealCountInvariant;
pub use reveal_safety::{CarHiddenInvariant, HeldDoorClosedInvariant};

/// Invariants of a round in the decide phase.
pub type DecideInvariants = (
    CarHiddenInvariant,
    HeldDoorClosedInvariant,
    RevealCountInvariant,
);

/// Invariants of a resolved round.
pub type ResolvedInvariants = (
    CarHiddenInvariant,
    HeldDoorClosedInvariant,
    RevealCountInvariant,
    OutcomeConsistentInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typestate::RoundSelect;
    use crate::{Decision, ScriptedRandom};

    fn decide_round() -> RoundDecide {
        let mut rng = ScriptedRandom::default();
        RoundSelect::with_car(DoorCount::new(6).unwrap(), Door::new(4))
            .unwrap()
            .select(Door::new(1), &mut rng)
            .unwrap()
    }

    #[test]
    fn test_invariant_set_holds_after_select() {
        assert!(DecideInvariants::check_all(&decide_round()).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_resolve() {
        let resolved = decide_round().resolve(Decision::Switch).unwrap();
        assert!(ResolvedInvariants::check_all(&resolved).is_ok());
    }

    #[test]
    fn test_invariant_set_detects_violations() {
        let mut round = decide_round();
        // Corrupt the reveal: open the car and drop a door.
        round.revealed[0] = Door::new(4);
        round.revealed.pop();

        let violations = DecideInvariants::check_all(&round).unwrap_err();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_two_invariants_as_set() {
        type TwoInvariants = (CarHiddenInvariant, RevealCountInvariant);
        assert!(TwoInvariants::check_all(&decide_round()).is_ok());
    }
}
