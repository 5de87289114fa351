//! Batch simulation of many rounds under a fixed strategy.
//!
//! Simulated rounds go through [`GameEngine::play_round`], which uses the
//! same deal, reveal and resolve operations as interactive play.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::{info, instrument};

use crate::{Decision, DoorCount, GameEngine, GameError, Outcome, RandomSource, StatsStore, rules};

/// How a simulated contestant decides.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Strategy {
    /// Always keep the first pick.
    Stay,
    /// Always switch.
    #[default]
    Switch,
    /// Flip a fair coin every round.
    Random,
}

impl Strategy {
    /// Returns this round's decision.
    pub fn decide<R>(self, rng: &mut R) -> Decision
    where
        R: RandomSource + ?Sized,
    {
        match self {
            Self::Stay => Decision::Stay,
            Self::Switch => Decision::Switch,
            Self::Random => {
                if rng.below(2) == 0 {
                    Decision::Stay
                } else {
                    Decision::Switch
                }
            }
        }
    }
}

/// Tallies of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    door_count: DoorCount,
    strategy: Strategy,
    rounds: u64,
    wins: u64,
    first_pick_wins: u64,
    stay_rounds: u64,
    stay_wins: u64,
    switch_rounds: u64,
    switch_wins: u64,
}

impl SimulationReport {
    /// Creates an empty report.
    pub fn new(door_count: DoorCount, strategy: Strategy) -> Self {
        Self {
            door_count,
            strategy,
            rounds: 0,
            wins: 0,
            first_pick_wins: 0,
            stay_rounds: 0,
            stay_wins: 0,
            switch_rounds: 0,
            switch_wins: 0,
        }
    }

    /// Adds one round.
    pub fn record(&mut self, outcome: &Outcome) {
        self.rounds += 1;
        if outcome.won() {
            self.wins += 1;
        }
        if outcome.first_pick_correct() {
            self.first_pick_wins += 1;
        }
        match outcome.decision() {
            Decision::Stay => {
                self.stay_rounds += 1;
                if outcome.won() {
                    self.stay_wins += 1;
                }
            }
            Decision::Switch => {
                self.switch_rounds += 1;
                if outcome.won() {
                    self.switch_wins += 1;
                }
            }
        }
    }

    /// Number of doors per round.
    pub fn door_count(&self) -> DoorCount {
        self.door_count
    }

    /// Strategy used.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Rounds played.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Rounds won.
    pub fn wins(&self) -> u64 {
        self.wins
    }

    /// Rounds whose first pick was the car.
    pub fn first_pick_wins(&self) -> u64 {
        self.first_pick_wins
    }

    /// Rounds (and wins) resolved with `decision`.
    pub fn by_decision(&self, decision: Decision) -> (u64, u64) {
        match decision {
            Decision::Stay => (self.stay_rounds, self.stay_wins),
            Decision::Switch => (self.switch_rounds, self.switch_wins),
        }
    }

    /// Fraction of rounds won, in `[0, 1]`.
    pub fn win_rate(&self) -> f64 {
        ratio(self.wins, self.rounds)
    }

    /// Fraction of rounds whose first pick was the car.
    pub fn first_pick_rate(&self) -> f64 {
        ratio(self.first_pick_wins, self.rounds)
    }

    /// Fraction of `decision` rounds that were won.
    pub fn decision_win_rate(&self, decision: Decision) -> f64 {
        let (rounds, wins) = self.by_decision(decision);
        ratio(wins, rounds)
    }

    /// Long-run win rate predicted for this report's strategy.
    pub fn expected_win_rate(&self) -> f64 {
        match self.strategy {
            Strategy::Stay => rules::theoretical_win_rate(self.door_count, Decision::Stay),
            Strategy::Switch => rules::theoretical_win_rate(self.door_count, Decision::Switch),
            Strategy::Random => {
                (rules::theoretical_win_rate(self.door_count, Decision::Stay)
                    + rules::theoretical_win_rate(self.door_count, Decision::Switch))
                    / 2.0
            }
        }
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Plays `rounds` rounds and adds them to `report`.
///
/// Each round completes before the next starts. Counters are persisted
/// according to the engine's autosave setting.
///
/// # Errors
///
/// Stops at the first [`GameError`].
#[instrument(skip(engine, report))]
pub fn run_rounds<R, S>(
    engine: &mut GameEngine<R, S>,
    strategy: Strategy,
    rounds: u64,
    report: &mut SimulationReport,
) -> Result<(), GameError>
where
    R: RandomSource,
    S: StatsStore,
{
    for _ in 0..rounds {
        let outcome = engine.play_round(strategy)?;
        report.record(&outcome);
    }
    Ok(())
}

/// Plays `rounds` rounds with autosave suspended, then saves once.
///
/// # Errors
///
/// Stops at the first [`GameError`]; rounds already played stay counted.
#[instrument(skip(engine))]
pub fn simulate<R, S>(
    engine: &mut GameEngine<R, S>,
    strategy: Strategy,
    rounds: u64,
) -> Result<SimulationReport, GameError>
where
    R: RandomSource,
    S: StatsStore,
{
    let mut report = SimulationReport::new(engine.door_count(), strategy);
    let autosave = engine.autosave();
    engine.set_autosave(false);

    let result = run_rounds(engine, strategy, rounds, &mut report);

    engine.set_autosave(autosave);
    if autosave {
        engine.save_statistics();
    }
    result?;

    info!(
        rounds = report.rounds(),
        wins = report.wins(),
        win_rate = %format!("{:.4}", report.win_rate()),
        "Simulation finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, ScriptedRandom};
    use std::str::FromStr;

    #[test]
    fn test_random_strategy_uses_coin() {
        let mut rng = ScriptedRandom::new([0, 1]);
        assert_eq!(Strategy::Random.decide(&mut rng), Decision::Stay);
        assert_eq!(Strategy::Random.decide(&mut rng), Decision::Switch);
        assert_eq!(Strategy::Stay.decide(&mut rng), Decision::Stay);
    }

    #[test]
    fn test_strategy_parses() {
        assert_eq!(Strategy::from_str("random").unwrap(), Strategy::Random);
        assert!(Strategy::from_str("sometimes").is_err());
    }

    #[test]
    fn test_simulate_saves_once_at_end() {
        let mut engine = GameEngine::new(DoorCount::CLASSIC, ScriptedRandom::default(), MemoryStore::new());
        let report = simulate(&mut engine, Strategy::Stay, 25).unwrap();

        assert_eq!(report.rounds(), 25);
        assert_eq!(report.by_decision(Decision::Stay).0, 25);
        assert_eq!(engine.statistics().stay_rounds(), 25);
        assert_eq!(engine.store().get("stay_rounds").unwrap(), Some(25));
        assert!(engine.autosave());
    }

    #[test]
    fn test_expected_rates() {
        let report = SimulationReport::new(DoorCount::new(4).unwrap(), Strategy::Random);
        assert!((report.expected_win_rate() - 0.5).abs() < 1e-12);
        assert_eq!(report.win_rate(), 0.0);
    }
}
