//! Reveal count invariant: all doors but two are open.

use super::{Invariant, RevealedRound};

/// Invariant: exactly `door_count - 2` distinct, in-range doors are open.
///
/// This leaves the held door plus exactly one alternative closed.
pub struct RevealCountInvariant;

impl<S: RevealedRound> Invariant<S> for RevealCountInvariant {
    fn holds(round: &S) -> bool {
        let door_count = round.door_count();
        let revealed = round.revealed_doors();

        if revealed.len() != door_count.reveal_count() {
            return false;
        }
        if !revealed.iter().all(|door| door_count.contains(*door)) {
            return false;
        }

        let mut sorted = revealed.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        sorted.len() == revealed.len()
    }

    fn description() -> &'static str {
        "Exactly door_count - 2 distinct doors are open"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typestate::{RoundDecide, RoundSelect};
    use crate::{Door, DoorCount, ScriptedRandom};

    fn round() -> RoundDecide {
        let mut rng = ScriptedRandom::new([3, 1, 2]);
        RoundSelect::with_car(DoorCount::new(7).unwrap(), Door::new(6))
            .unwrap()
            .select(Door::new(0), &mut rng)
            .unwrap()
    }

    #[test]
    fn test_complete_reveal_holds() {
        assert!(RevealCountInvariant::holds(&round()));
    }

    #[test]
    fn test_duplicate_reveal_violates() {
        let mut round = round();
        round.revealed[1] = round.revealed[0];
        assert!(!RevealCountInvariant::holds(&round));
    }

    #[test]
    fn test_out_of_range_reveal_violates() {
        let mut round = round();
        round.revealed[0] = Door::new(40);
        assert!(!RevealCountInvariant::holds(&round));
    }
}
