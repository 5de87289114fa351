//! The host never opens the car door or the contestant's door.

use super::{Invariant, RevealedRound};

/// Invariant: the car door is in range and never revealed.
pub struct CarHiddenInvariant;

impl<S: RevealedRound> Invariant<S> for CarHiddenInvariant {
    fn holds(round: &S) -> bool {
        let car = round.car_door();
        round.door_count().contains(car) && !round.revealed_doors().contains(&car)
    }

    fn description() -> &'static str {
        "The car door is in range and never opened by the host"
    }
}

/// Invariant: the door the contestant holds is never revealed.
pub struct HeldDoorClosedInvariant;

impl<S: RevealedRound> Invariant<S> for HeldDoorClosedInvariant {
    fn holds(round: &S) -> bool {
        let held = round.held_door();
        round.door_count().contains(held) && !round.revealed_doors().contains(&held)
    }

    fn description() -> &'static str {
        "The contestant's door is in range and never opened by the host"
    }
}
