//! Chunked batch simulation and report rendering.

use std::fmt::Write as _;

use monty_hall::{
    Decision, GameEngine, GameError, RandomSource, SimulationReport, StatsStore, Strategy,
    run_rounds, rules,
};
use tracing::{debug, info, instrument};

/// Plays `rounds` rounds in chunks of `chunk`, yielding to the runtime
/// between chunks.
///
/// Autosave is suspended for the whole batch. When `persist` is set the
/// counters are flushed once per chunk instead of once per round.
///
/// # Errors
///
/// Propagates the first [`GameError`] raised by a round.
#[instrument(skip(engine), fields(door_count = %engine.door_count()))]
pub async fn run_chunked<R, S>(
    engine: &mut GameEngine<R, S>,
    strategy: Strategy,
    rounds: u64,
    chunk: u64,
    persist: bool,
) -> Result<SimulationReport, GameError>
where
    R: RandomSource,
    S: StatsStore,
{
    let chunk = chunk.max(1);
    let autosave = engine.autosave();
    engine.set_autosave(false);

    let mut report = SimulationReport::new(engine.door_count(), strategy);
    let mut remaining = rounds;
    let mut result = Ok(());

    while remaining > 0 {
        let batch = remaining.min(chunk);
        result = run_rounds(engine, strategy, batch, &mut report);
        if persist {
            engine.save_statistics();
        }
        if result.is_err() {
            break;
        }
        remaining -= batch;
        debug!(played = report.rounds(), remaining, "Chunk finished");
        tokio::task::yield_now().await;
    }

    engine.set_autosave(autosave);
    result?;

    info!(
        rounds = report.rounds(),
        wins = report.wins(),
        win_rate = %format!("{:.4}", report.win_rate()),
        "Batch simulation finished"
    );
    Ok(report)
}

/// Human-readable report with theoretical rates alongside observed ones.
pub fn render_text(report: &SimulationReport) -> String {
    let door_count = report.door_count();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Strategy {} over {} rounds with {} doors",
        report.strategy(),
        report.rounds(),
        door_count
    );
    let _ = writeln!(
        out,
        "  won {:>10}  {:>6.2}%  (expected {:.2}%)",
        report.wins(),
        report.win_rate() * 100.0,
        report.expected_win_rate() * 100.0
    );
    let _ = writeln!(
        out,
        "  first pick correct {:>6.2}%  (expected {:.2}%)",
        report.first_pick_rate() * 100.0,
        rules::prior(door_count) * 100.0
    );

    for decision in [Decision::Stay, Decision::Switch] {
        let (rounds, wins) = report.by_decision(decision);
        if rounds == 0 {
            continue;
        }
        let _ = writeln!(
            out,
            "  {:<6} {:>8} / {:<8} {:>6.2}%  (expected {:.2}%)",
            decision,
            wins,
            rounds,
            report.decision_win_rate(decision) * 100.0,
            rules::theoretical_win_rate(door_count, decision) * 100.0
        );
    }
    out
}

/// Report as pretty-printed JSON.
///
/// # Errors
///
/// Returns the serializer error.
pub fn render_json(report: &SimulationReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use monty_hall::{DoorCount, MemoryStore, ScriptedRandom};

    fn engine() -> GameEngine<ScriptedRandom, MemoryStore> {
        GameEngine::new(DoorCount::CLASSIC, ScriptedRandom::default(), MemoryStore::new())
    }

    #[tokio::test]
    async fn test_chunked_run_plays_every_round() {
        let mut engine = engine();
        let report = run_chunked(&mut engine, Strategy::Stay, 25, 10, false)
            .await
            .unwrap();

        assert_eq!(report.rounds(), 25);
        assert_eq!(engine.statistics().stay_rounds(), 25);
        assert!(engine.store().is_empty());
        assert!(engine.autosave());
    }

    #[tokio::test]
    async fn test_persisted_run_flushes_counters() {
        let mut engine = engine();
        run_chunked(&mut engine, Strategy::Switch, 7, 3, true)
            .await
            .unwrap();
        assert_eq!(engine.store().get("switch_rounds").unwrap(), Some(7));
        assert_eq!(engine.store().get("total_rounds").unwrap(), Some(7));
    }

    #[tokio::test]
    async fn test_zero_chunk_is_treated_as_one() {
        let mut engine = engine();
        let report = run_chunked(&mut engine, Strategy::Random, 4, 0, false)
            .await
            .unwrap();
        assert_eq!(report.rounds(), 4);
    }

    #[tokio::test]
    async fn test_text_report_mentions_expected_rate() {
        let mut engine = engine();
        let report = run_chunked(&mut engine, Strategy::Switch, 3, 10, false)
            .await
            .unwrap();
        let text = render_text(&report);
        assert!(text.starts_with("Strategy switch over 3 rounds with 3 doors"));
        assert!(text.contains("(expected 66.67%)"));
        assert!(!text.contains("stay "));
    }

    #[tokio::test]
    async fn test_json_report_fields() {
        let mut engine = engine();
        let report = run_chunked(&mut engine, Strategy::Stay, 2, 10, false)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
        assert_eq!(json["strategy"], "stay");
        assert_eq!(json["rounds"], 2);
        assert_eq!(json["door_count"], 3);
    }
}
