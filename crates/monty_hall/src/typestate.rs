//! Phase-specific typestate structs for a Monty Hall round.
//!
//! Each phase is its own type with phase-specific fields. A `RoundDecide`
//! ALWAYS has a selection and a complete reveal, and a `RoundResolved`
//! ALWAYS has an outcome, not `Option<Outcome>`.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::contracts::{Contract, ResolveContract, SelectContract};
use crate::{Decision, Door, DoorCount, GameError, RandomSource, rules};

// ─────────────────────────────────────────────────────────────
//  Select Phase
// ─────────────────────────────────────────────────────────────

/// Round waiting for the contestant's first pick.
///
/// The car is placed; nothing is selected or revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSelect {
    pub(crate) door_count: DoorCount,
    pub(crate) car_door: Door,
}

impl RoundSelect {
    /// Deals a new round, placing the car uniformly at random.
    #[instrument(skip(rng))]
    pub fn deal<R>(door_count: DoorCount, rng: &mut R) -> Self
    where
        R: RandomSource + ?Sized,
    {
        let car_door = Door::new(rng.below(door_count.get()));
        debug!(%door_count, car = car_door.index(), "Round dealt");
        Self {
            door_count,
            car_door,
        }
    }

    /// Builds a round with a known car position.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidDoorIndex`] if the car is out of range.
    #[instrument]
    pub fn with_car(door_count: DoorCount, car_door: Door) -> Result<Self, GameError> {
        if !door_count.contains(car_door) {
            return Err(GameError::InvalidDoorIndex {
                door: car_door.index(),
                door_count: door_count.get(),
            });
        }
        Ok(Self {
            door_count,
            car_door,
        })
    }

    /// Returns the number of doors.
    pub fn door_count(&self) -> DoorCount {
        self.door_count
    }

    /// Returns the door hiding the car.
    pub fn car_door(&self) -> Door {
        self.car_door
    }

    /// Selects a door and lets the host open all but one of the others.
    ///
    /// Contract enforcement:
    /// - Preconditions checked always (door in range)
    /// - Postconditions checked in debug builds only
    #[instrument(skip(self, rng), fields(car = self.car_door.index()))]
    pub fn select<R>(self, door: Door, rng: &mut R) -> Result<RoundDecide, GameError>
    where
        R: RandomSource + ?Sized,
    {
        SelectContract::pre(&self, &door)?;

        let revealed = rules::host_reveals(self.door_count, self.car_door, door, rng);
        let alternative = rules::switch_target(self.door_count, door, &revealed).ok_or_else(|| {
            GameError::InvariantViolation("Reveal left no unique switch target".to_string())
        })?;

        let next = RoundDecide {
            door_count: self.door_count,
            car_door: self.car_door,
            selected: door,
            alternative,
            revealed,
        };

        #[cfg(debug_assertions)]
        SelectContract::post(&self, &next)?;

        Ok(next)
    }
}

// ─────────────────────────────────────────────────────────────
//  Decide Phase
// ─────────────────────────────────────────────────────────────

/// Round waiting for stay or switch.
///
/// Invariants enforced on entry:
/// - exactly `door_count - 2` doors revealed
/// - neither the car nor the selection is revealed
/// - `alternative` is the single other unopened door
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundDecide {
    pub(crate) door_count: DoorCount,
    pub(crate) car_door: Door,
    pub(crate) selected: Door,
    pub(crate) alternative: Door,
    pub(crate) revealed: Vec<Door>,
}

impl RoundDecide {
    /// Returns the number of doors.
    pub fn door_count(&self) -> DoorCount {
        self.door_count
    }

    /// Returns the door hiding the car.
    pub fn car_door(&self) -> Door {
        self.car_door
    }

    /// Returns the contestant's pick.
    pub fn selected(&self) -> Door {
        self.selected
    }

    /// Returns the unopened door a switch would move to.
    pub fn alternative(&self) -> Door {
        self.alternative
    }

    /// Returns the opened doors in reveal order.
    pub fn revealed(&self) -> &[Door] {
        &self.revealed
    }

    /// Probability that `door` hides the car given the reveals so far.
    pub fn probability_of(&self, door: Door) -> f64 {
        rules::conditional(self.door_count, self.selected, &self.revealed, door)
    }

    /// Applies the contestant's decision and settles the round.
    #[instrument(skip(self), fields(selected = self.selected.index(), car = self.car_door.index()))]
    pub fn resolve(self, decision: Decision) -> Result<RoundResolved, GameError> {
        ResolveContract::pre(&self, &decision)?;

        let final_door = match decision {
            Decision::Stay => self.selected,
            Decision::Switch => self.alternative,
        };
        let won = final_door == self.car_door;

        let next = RoundResolved {
            door_count: self.door_count,
            car_door: self.car_door,
            revealed: self.revealed.clone(),
            outcome: Outcome {
                decision,
                initial: self.selected,
                final_door,
                car_door: self.car_door,
                won,
            },
        };

        #[cfg(debug_assertions)]
        ResolveContract::post(&self, &next)?;

        debug!(final_door = final_door.index(), won, "Round resolved");
        Ok(next)
    }
}

// ─────────────────────────────────────────────────────────────
//  Resolved Phase
// ─────────────────────────────────────────────────────────────

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    decision: Decision,
    initial: Door,
    final_door: Door,
    car_door: Door,
    won: bool,
}

impl Outcome {
    /// Returns the contestant's decision.
    pub fn decision(&self) -> Decision {
        self.decision
    }

    /// Returns the door picked before the reveal.
    pub fn initial(&self) -> Door {
        self.initial
    }

    /// Returns the door held after the decision.
    pub fn final_door(&self) -> Door {
        self.final_door
    }

    /// Returns the door hiding the car.
    pub fn car_door(&self) -> Door {
        self.car_door
    }

    /// Returns true if the final door hides the car.
    pub fn won(&self) -> bool {
        self.won
    }

    /// Returns true if the first pick was already the car.
    pub fn first_pick_correct(&self) -> bool {
        self.initial == self.car_door
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verdict = if self.won { "won" } else { "lost" };
        write!(
            f,
            "{} from {} to {}: {} (car behind {})",
            self.decision, self.initial, self.final_door, verdict, self.car_door
        )
    }
}

/// Round settled - outcome determined.
///
/// The outcome is ALWAYS present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResolved {
    pub(crate) door_count: DoorCount,
    pub(crate) car_door: Door,
    pub(crate) revealed: Vec<Door>,
    pub(crate) outcome: Outcome,
}

impl RoundResolved {
    /// Returns the number of doors.
    pub fn door_count(&self) -> DoorCount {
        self.door_count
    }

    /// Returns the door hiding the car.
    pub fn car_door(&self) -> Door {
        self.car_door
    }

    /// Returns the doors the host opened, in reveal order.
    pub fn revealed(&self) -> &[Door] {
        &self.revealed
    }

    /// Returns the outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Ground truth: 1 for the car door, 0 elsewhere.
    pub fn probability_of(&self, door: Door) -> f64 {
        if door == self.car_door { 1.0 } else { 0.0 }
    }

    /// Deals the next round with the same door count.
    #[instrument(skip(self, rng))]
    pub fn restart<R>(self, rng: &mut R) -> RoundSelect
    where
        R: RandomSource + ?Sized,
    {
        RoundSelect::deal(self.door_count, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedRandom;

    fn five() -> DoorCount {
        DoorCount::new(5).unwrap()
    }

    #[test]
    fn test_deal_uses_first_draw_for_car() {
        let mut rng = ScriptedRandom::new([2]);
        let round = RoundSelect::deal(five(), &mut rng);
        assert_eq!(round.car_door(), Door::new(2));
    }

    #[test]
    fn test_with_car_rejects_out_of_range() {
        assert!(matches!(
            RoundSelect::with_car(DoorCount::CLASSIC, Door::new(3)),
            Err(GameError::InvalidDoorIndex { door: 3, door_count: 3 })
        ));
    }

    #[test]
    fn test_select_out_of_range_rejected() {
        let round = RoundSelect::with_car(DoorCount::CLASSIC, Door::new(0)).unwrap();
        let mut rng = ScriptedRandom::default();
        assert!(matches!(
            round.select(Door::new(9), &mut rng),
            Err(GameError::InvalidDoorIndex { door: 9, .. })
        ));
    }

    #[test]
    fn test_stay_on_car_wins() {
        let mut rng = ScriptedRandom::new([0]);
        let round = RoundSelect::with_car(five(), Door::new(3)).unwrap();
        let decide = round.select(Door::new(3), &mut rng).unwrap();
        assert_eq!(decide.revealed().len(), 3);

        let resolved = decide.resolve(Decision::Stay).unwrap();
        let outcome = resolved.outcome();
        assert!(outcome.won());
        assert!(outcome.first_pick_correct());
        assert_eq!(outcome.final_door(), Door::new(3));
    }

    #[test]
    fn test_switch_away_from_car_loses() {
        let mut rng = ScriptedRandom::new([1]);
        let round = RoundSelect::with_car(DoorCount::CLASSIC, Door::new(2)).unwrap();
        let decide = round.select(Door::new(2), &mut rng).unwrap();
        let alternative = decide.alternative();
        assert_ne!(alternative, Door::new(2));

        let outcome = decide.resolve(Decision::Switch).unwrap().outcome();
        assert!(!outcome.won());
        assert_eq!(outcome.final_door(), alternative);
    }

    #[test]
    fn test_resolved_probability_is_ground_truth() {
        let mut rng = ScriptedRandom::default();
        let resolved = RoundSelect::with_car(DoorCount::CLASSIC, Door::new(1))
            .unwrap()
            .select(Door::new(0), &mut rng)
            .unwrap()
            .resolve(Decision::Stay)
            .unwrap();
        assert_eq!(resolved.probability_of(Door::new(1)), 1.0);
        assert_eq!(resolved.probability_of(Door::new(0)), 0.0);
        assert_eq!(resolved.probability_of(Door::new(2)), 0.0);
    }

    #[test]
    fn test_restart_keeps_door_count() {
        let mut rng = ScriptedRandom::new([0, 0, 4]);
        let resolved = RoundSelect::deal(five(), &mut rng)
            .select(Door::new(1), &mut rng)
            .unwrap()
            .resolve(Decision::Switch)
            .unwrap();
        let next = resolved.restart(&mut rng);
        assert_eq!(next.door_count(), five());
    }

    #[test]
    fn test_outcome_display() {
        let mut rng = ScriptedRandom::default();
        let outcome = RoundSelect::with_car(DoorCount::CLASSIC, Door::new(1))
            .unwrap()
            .select(Door::new(0), &mut rng)
            .unwrap()
            .resolve(Decision::Switch)
            .unwrap()
            .outcome();
        assert_eq!(
            outcome.to_string(),
            "switch from door 1 to door 2: won (car behind door 2)"
        );
    }
}
