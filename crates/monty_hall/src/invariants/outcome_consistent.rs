//! The recorded outcome agrees with the doors.

use super::Invariant;
use crate::Decision;
use crate::typestate::RoundResolved;

/// Invariant: the outcome follows from the decision and the car position.
///
/// Staying keeps the initial door, switching moves to a different one, and
/// the round is won exactly when the final door hides the car.
pub struct OutcomeConsistentInvariant;

impl Invariant<RoundResolved> for OutcomeConsistentInvariant {
    fn holds(round: &RoundResolved) -> bool {
        let outcome = round.outcome();

        let moved_correctly = match outcome.decision() {
            Decision::Stay => outcome.final_door() == outcome.initial(),
            Decision::Switch => outcome.final_door() != outcome.initial(),
        };

        moved_correctly
            && outcome.car_door() == round.car_door()
            && outcome.won() == (outcome.final_door() == round.car_door())
    }

    fn description() -> &'static str {
        "Outcome matches the decision and the car position"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typestate::RoundSelect;
    use crate::{Door, DoorCount, ScriptedRandom};

    #[test]
    fn test_resolved_rounds_hold() {
        for decision in [Decision::Stay, Decision::Switch] {
            for pick in 0..3 {
                let mut rng = ScriptedRandom::default();
                let resolved = RoundSelect::with_car(DoorCount::CLASSIC, Door::new(1))
                    .unwrap()
                    .select(Door::new(pick), &mut rng)
                    .unwrap()
                    .resolve(decision)
                    .unwrap();
                assert!(OutcomeConsistentInvariant::holds(&resolved));
            }
        }
    }

    #[test]
    fn test_tampered_car_violates() {
        let mut rng = ScriptedRandom::default();
        let mut resolved = RoundSelect::with_car(DoorCount::CLASSIC, Door::new(1))
            .unwrap()
            .select(Door::new(0), &mut rng)
            .unwrap()
            .resolve(Decision::Stay)
            .unwrap();
        resolved.car_door = Door::new(0);
        assert!(!OutcomeConsistentInvariant::holds(&resolved));
    }
}
