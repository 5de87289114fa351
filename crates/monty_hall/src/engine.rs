//! The game engine: one round at a time plus cumulative statistics.

use tracing::{debug, info, instrument, warn};

use crate::typestate::RoundSelect;
use crate::{
    Decision, Door, DoorCount, GameError, Outcome, Phase, RandomSource, Round, Statistics,
    StatsStore, Strategy,
};

/// Owns the current round, the statistics, and both collaborators.
///
/// Every operation either applies completely or returns an error and
/// leaves the engine untouched.
#[derive(Debug)]
pub struct GameEngine<R, S> {
    round: Round,
    statistics: Statistics,
    rng: R,
    store: S,
    autosave: bool,
}

impl<R: RandomSource, S: StatsStore> GameEngine<R, S> {
    /// Creates an engine, loads statistics from `store` and deals the first
    /// round.
    #[instrument(skip(rng, store))]
    pub fn new(door_count: DoorCount, mut rng: R, store: S) -> Self {
        let statistics = Statistics::load(&store);
        let round = RoundSelect::deal(door_count, &mut rng).into();
        info!(
            %door_count,
            total_rounds = statistics.total_rounds(),
            "Game engine ready"
        );
        Self {
            round,
            statistics,
            rng,
            store,
            autosave: true,
        }
    }

    /// Returns the current round.
    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.round.phase()
    }

    /// Returns the number of doors in the current round.
    pub fn door_count(&self) -> DoorCount {
        self.round.door_count()
    }

    /// Returns the cumulative statistics.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Returns the persistence collaborator.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns true if counters are written after every resolved round.
    pub fn autosave(&self) -> bool {
        self.autosave
    }

    /// Enables or suspends writing counters after every resolved round.
    pub fn set_autosave(&mut self, autosave: bool) {
        debug!(autosave, "Autosave changed");
        self.autosave = autosave;
    }

    /// Deals a fresh round with `door_count` doors. Legal in any phase.
    ///
    /// Statistics are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidDoorCount`] if `door_count < 3`.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn start_round(&mut self, door_count: usize) -> Result<&Round, GameError> {
        let door_count = DoorCount::new(door_count)?;
        self.round = RoundSelect::deal(door_count, &mut self.rng).into();
        Ok(&self.round)
    }

    /// Deals a fresh round keeping the current door count.
    #[instrument(skip(self))]
    pub fn restart(&mut self) -> &Round {
        let door_count = self.door_count();
        self.round = RoundSelect::deal(door_count, &mut self.rng).into();
        &self.round
    }

    /// Picks a door; the host then opens all but one of the others.
    ///
    /// Returns the opened doors in reveal order, for sequential display.
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidPhaseTransition`] outside the select phase
    /// - [`GameError::InvalidDoorIndex`] if `door` is out of range
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn select_door(&mut self, door: Door) -> Result<&[Door], GameError> {
        let Round::Select(round) = &self.round else {
            return Err(self.phase_error("select_door"));
        };

        let decide = round.clone().select(door, &mut self.rng)?;
        info!(
            selected = door.index(),
            revealed = ?decide.revealed(),
            "Door selected, host revealed"
        );
        self.round = decide.into();
        Ok(self.round.revealed_doors())
    }

    /// Stays or switches, settles the round and updates statistics.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidPhaseTransition`] outside the decide phase.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn resolve_round(&mut self, decision: Decision) -> Result<Outcome, GameError> {
        let Round::Decide(round) = &self.round else {
            return Err(self.phase_error("resolve_round"));
        };

        let resolved = round.clone().resolve(decision)?;
        let outcome = resolved.outcome();
        self.statistics.record(decision, outcome.won());
        self.round = resolved.into();

        info!(
            %decision,
            won = outcome.won(),
            final_door = outcome.final_door().index(),
            total_rounds = self.statistics.total_rounds(),
            "Round resolved"
        );

        if self.autosave {
            self.save_statistics();
        }
        Ok(outcome)
    }

    /// Probability that `door` hides the car in the current phase.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidDoorIndex`] if `door` is out of range.
    pub fn probability_of(&self, door: Door) -> Result<f64, GameError> {
        self.round.probability_of(door)
    }

    /// Probability for every door, in index order.
    pub fn probabilities(&self) -> Vec<f64> {
        self.round.probabilities()
    }

    /// Zeroes all counters and persists immediately.
    ///
    /// Callers must confirm with the user first. Returns false if the
    /// zeroed counters could not be written; the in-memory reset still holds.
    #[instrument(skip(self))]
    pub fn reset_statistics(&mut self) -> bool {
        self.statistics.reset();
        self.save_statistics()
    }

    /// Writes the counters to the store.
    ///
    /// Failures are logged and otherwise ignored; returns true on success.
    #[instrument(skip(self))]
    pub fn save_statistics(&mut self) -> bool {
        match self.statistics.save(&mut self.store) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Statistics not persisted, keeping in-memory counters");
                false
            }
        }
    }

    /// Plays one full round under `strategy` through the same operations
    /// an interactive player uses.
    ///
    /// The initial pick is uniform over all doors.
    ///
    /// # Errors
    ///
    /// Propagates errors from the round operations.
    #[instrument(skip(self))]
    pub fn play_round(&mut self, strategy: Strategy) -> Result<Outcome, GameError> {
        let door_count = self.restart().door_count();
        let pick = Door::new(self.rng.below(door_count.get()));
        self.select_door(pick)?;
        let decision = strategy.decide(&mut self.rng);
        self.resolve_round(decision)
    }

    fn phase_error(&self, operation: &'static str) -> GameError {
        let phase = self.phase();
        warn!(operation, %phase, "Operation rejected in current phase");
        GameError::InvalidPhaseTransition { operation, phase }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, ScriptedRandom};

    fn engine(draws: impl IntoIterator<Item = usize>) -> GameEngine<ScriptedRandom, MemoryStore> {
        GameEngine::new(DoorCount::CLASSIC, ScriptedRandom::new(draws), MemoryStore::new())
    }

    #[test]
    fn test_new_engine_starts_in_select() {
        let engine = engine([2]);
        assert_eq!(engine.phase(), Phase::Select);
        assert_eq!(engine.round().car_door(), Door::new(2));
        assert_eq!(engine.statistics().total_rounds(), 0);
    }

    #[test]
    fn test_start_round_rejects_two_doors() {
        let mut engine = engine([0]);
        let before = engine.round().clone();
        assert_eq!(engine.start_round(2).unwrap_err(), GameError::InvalidDoorCount(2));
        assert_eq!(engine.round(), &before);
    }

    #[test]
    fn test_select_twice_rejected() {
        let mut engine = engine([1]);
        engine.select_door(Door::new(0)).unwrap();
        let before = engine.round().clone();

        assert_eq!(
            engine.select_door(Door::new(1)).unwrap_err(),
            GameError::InvalidPhaseTransition {
                operation: "select_door",
                phase: Phase::Decide,
            }
        );
        assert_eq!(engine.round(), &before);
    }

    #[test]
    fn test_invalid_door_leaves_state() {
        let mut engine = engine([1]);
        let before = engine.round().clone();
        assert!(matches!(
            engine.select_door(Door::new(3)),
            Err(GameError::InvalidDoorIndex { door: 3, door_count: 3 })
        ));
        assert_eq!(engine.round(), &before);
    }

    #[test]
    fn test_resolve_updates_stats_and_store() {
        let mut engine = engine([1]);
        engine.select_door(Door::new(0)).unwrap();
        let outcome = engine.resolve_round(Decision::Switch).unwrap();

        assert!(outcome.won());
        assert_eq!(engine.phase(), Phase::Resolved);
        assert_eq!(engine.statistics().switch_wins(), 1);
        assert_eq!(engine.store().get("switch_wins").unwrap(), Some(1));
        assert_eq!(engine.store().get("total_rounds").unwrap(), Some(1));
    }

    #[test]
    fn test_suspended_autosave_skips_store() {
        let mut engine = engine([1]);
        engine.set_autosave(false);
        engine.select_door(Door::new(0)).unwrap();
        engine.resolve_round(Decision::Stay).unwrap();

        assert_eq!(engine.statistics().stay_rounds(), 1);
        assert!(engine.store().is_empty());
        assert!(engine.save_statistics());
        assert_eq!(engine.store().get("stay_rounds").unwrap(), Some(1));
    }

    #[test]
    fn test_reset_statistics_persists_zeroes() {
        let mut engine = engine([1]);
        engine.select_door(Door::new(0)).unwrap();
        engine.resolve_round(Decision::Switch).unwrap();

        assert!(engine.reset_statistics());
        assert_eq!(engine.statistics(), &Statistics::default());
        assert_eq!(engine.store().get("switch_wins").unwrap(), Some(0));
        assert_eq!(engine.phase(), Phase::Resolved);
    }

    #[test]
    fn test_resolved_round_requires_restart() {
        let mut engine = engine([1]);
        engine.select_door(Door::new(0)).unwrap();
        engine.resolve_round(Decision::Stay).unwrap();

        assert!(matches!(
            engine.resolve_round(Decision::Stay),
            Err(GameError::InvalidPhaseTransition { phase: Phase::Resolved, .. })
        ));
        assert!(matches!(
            engine.select_door(Door::new(0)),
            Err(GameError::InvalidPhaseTransition { phase: Phase::Resolved, .. })
        ));

        engine.restart();
        assert_eq!(engine.phase(), Phase::Select);
        assert_eq!(engine.statistics().total_rounds(), 1);
    }

    #[test]
    fn test_play_round_counts_one_round() {
        let mut engine = engine([]);
        let outcome = engine.play_round(Strategy::Switch).unwrap();
        assert_eq!(outcome.decision(), Decision::Switch);
        assert_eq!(engine.statistics().total_rounds(), 1);
        assert_eq!(engine.phase(), Phase::Resolved);
    }
}
