//! Runtime view over the three round typestates.

use serde::{Deserialize, Serialize};

use crate::typestate::{RoundDecide, RoundResolved, RoundSelect};
use crate::{Door, DoorCount, GameError, Phase, rules};

/// A round in any phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Round {
    /// Waiting for a pick.
    Select(RoundSelect),
    /// Waiting for stay or switch.
    Decide(RoundDecide),
    /// Outcome known.
    Resolved(RoundResolved),
}

impl Round {
    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        match self {
            Self::Select(_) => Phase::Select,
            Self::Decide(_) => Phase::Decide,
            Self::Resolved(_) => Phase::Resolved,
        }
    }

    /// Returns the number of doors.
    pub fn door_count(&self) -> DoorCount {
        match self {
            Self::Select(round) => round.door_count(),
            Self::Decide(round) => round.door_count(),
            Self::Resolved(round) => round.door_count(),
        }
    }

    /// Returns the door hiding the car.
    pub fn car_door(&self) -> Door {
        match self {
            Self::Select(round) => round.car_door(),
            Self::Decide(round) => round.car_door(),
            Self::Resolved(round) => round.car_door(),
        }
    }

    /// Returns the door the contestant currently holds, if any.
    ///
    /// After a switch this is the door switched to.
    pub fn selected_door(&self) -> Option<Door> {
        match self {
            Self::Select(_) => None,
            Self::Decide(round) => Some(round.selected()),
            Self::Resolved(round) => Some(round.outcome().final_door()),
        }
    }

    /// Returns the door picked before the reveal, if any.
    pub fn initial_selection(&self) -> Option<Door> {
        match self {
            Self::Select(_) => None,
            Self::Decide(round) => Some(round.selected()),
            Self::Resolved(round) => Some(round.outcome().initial()),
        }
    }

    /// Returns the doors the host opened, in reveal order.
    pub fn revealed_doors(&self) -> &[Door] {
        match self {
            Self::Select(_) => &[],
            Self::Decide(round) => round.revealed(),
            Self::Resolved(round) => round.revealed(),
        }
    }

    /// Returns true if the host opened `door`.
    pub fn is_revealed(&self, door: Door) -> bool {
        self.revealed_doors().contains(&door)
    }

    /// Probability that `door` hides the car given what the contestant knows.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidDoorIndex`] if `door` is out of range.
    pub fn probability_of(&self, door: Door) -> Result<f64, GameError> {
        let door_count = self.door_count();
        if !door_count.contains(door) {
            return Err(GameError::InvalidDoorIndex {
                door: door.index(),
                door_count: door_count.get(),
            });
        }

        Ok(match self {
            Self::Select(_) => rules::prior(door_count),
            Self::Decide(round) => round.probability_of(door),
            Self::Resolved(round) => round.probability_of(door),
        })
    }

    /// Probability for every door, in index order.
    pub fn probabilities(&self) -> Vec<f64> {
        self.door_count()
            .doors()
            .map(|door| self.probability_of(door).unwrap_or(0.0))
            .collect()
    }
}

impl From<RoundSelect> for Round {
    fn from(round: RoundSelect) -> Self {
        Self::Select(round)
    }
}

impl From<RoundDecide> for Round {
    fn from(round: RoundDecide) -> Self {
        Self::Decide(round)
    }
}

impl From<RoundResolved> for Round {
    fn from(round: RoundResolved) -> Self {
        Self::Resolved(round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Decision, ScriptedRandom};

    #[test]
    fn test_select_phase_is_uniform() {
        let round: Round = RoundSelect::with_car(DoorCount::new(4).unwrap(), Door::new(0))
            .unwrap()
            .into();
        assert_eq!(round.phase(), Phase::Select);
        assert_eq!(round.probabilities(), vec![0.25; 4]);
        assert_eq!(round.selected_door(), None);
        assert!(round.revealed_doors().is_empty());
    }

    #[test]
    fn test_out_of_range_probability_rejected() {
        let round: Round = RoundSelect::with_car(DoorCount::CLASSIC, Door::new(0))
            .unwrap()
            .into();
        assert!(matches!(
            round.probability_of(Door::new(3)),
            Err(GameError::InvalidDoorIndex { door: 3, door_count: 3 })
        ));
    }

    #[test]
    fn test_resolved_switch_reports_final_and_initial() {
        let mut rng = ScriptedRandom::default();
        let round: Round = RoundSelect::with_car(DoorCount::CLASSIC, Door::new(1))
            .unwrap()
            .select(Door::new(0), &mut rng)
            .unwrap()
            .resolve(Decision::Switch)
            .unwrap()
            .into();
        assert_eq!(round.phase(), Phase::Resolved);
        assert_eq!(round.initial_selection(), Some(Door::new(0)));
        assert_eq!(round.selected_door(), Some(Door::new(1)));
        assert!(round.is_revealed(Door::new(2)));
    }

    #[test]
    fn test_round_serializes_with_phase_tag() {
        let round: Round = RoundSelect::with_car(DoorCount::CLASSIC, Door::new(2))
            .unwrap()
            .into();
        let json = serde_json::to_value(&round).unwrap();
        assert_eq!(json["phase"], "select");
        assert_eq!(json["car_door"], 2);
    }
}
