//! Application state and logic.

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use monty_hall::{
    Decision, Door, DoorCount, GameEngine, Outcome, Phase, RandomSource, Round, StatsStore, rules,
};
use tracing::{debug, info, instrument};

use super::input;
use crate::config::{MAX_DOORS, MIN_DOORS};

/// What a door currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorFace {
    /// Still closed.
    Closed,
    /// Opened, nothing behind it.
    Goat,
    /// Opened, the prize.
    Car,
}

/// Everything the renderer needs to draw one door.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorCard {
    /// Which door.
    pub door: Door,
    /// What is visible.
    pub face: DoorFace,
    /// Probability of the car given the doors opened so far.
    pub probability: f64,
    /// Held by the contestant.
    pub picked: bool,
    /// Under the selection cursor.
    pub under_cursor: bool,
}

/// Main application state.
///
/// Host reveals are computed in one step by the engine; the app only paces
/// how many of them are shown.
pub struct App<R, S> {
    engine: GameEngine<R, S>,
    cursor: usize,
    shown_reveals: usize,
    last_reveal_at: Option<Instant>,
    reveal_delay: Duration,
    auto_restart: Option<Duration>,
    resolved_at: Option<Instant>,
    last_outcome: Option<Outcome>,
    confirm_reset: bool,
    status: String,
    should_quit: bool,
}

const SELECT_PROMPT: &str = "Pick a door: arrows or digits, Enter to choose";
const DECIDE_PROMPT: &str = "Stay (s) or switch (w)?";

impl<R: RandomSource, S: StatsStore> App<R, S> {
    /// Creates a new application around `engine`.
    pub fn new(engine: GameEngine<R, S>, reveal_delay: Duration, auto_restart: Option<Duration>) -> Self {
        Self {
            engine,
            cursor: 0,
            shown_reveals: 0,
            last_reveal_at: None,
            reveal_delay,
            auto_restart,
            resolved_at: None,
            last_outcome: None,
            confirm_reset: false,
            status: SELECT_PROMPT.to_string(),
            should_quit: false,
        }
    }

    /// Gets the engine.
    pub fn engine(&self) -> &GameEngine<R, S> {
        &self.engine
    }

    /// Gets the current round.
    pub fn round(&self) -> &Round {
        self.engine.round()
    }

    /// Gets the cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Gets the current status message.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Outcome of the round just resolved.
    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    /// True while waiting for the reset confirmation.
    pub fn confirm_reset(&self) -> bool {
        self.confirm_reset
    }

    /// True once the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Host-opened doors visible so far, in reveal order.
    pub fn shown_reveals(&self) -> &[Door] {
        let revealed = self.engine.round().revealed_doors();
        &revealed[..self.shown_reveals.min(revealed.len())]
    }

    /// True while the host is still opening doors.
    pub fn is_revealing(&self) -> bool {
        self.engine.phase() == Phase::Decide
            && self.shown_reveals < self.engine.round().revealed_doors().len()
    }

    /// Handles one key press.
    #[instrument(skip(self, now))]
    pub fn handle_key(&mut self, key: KeyCode, now: Instant) {
        if self.confirm_reset {
            self.confirm_reset = false;
            if matches!(key, KeyCode::Char('y') | KeyCode::Char('Y')) {
                self.status = if self.engine.reset_statistics() {
                    "Statistics reset".to_string()
                } else {
                    "Statistics reset for this session only (store unavailable)".to_string()
                };
            } else {
                self.status = "Reset cancelled".to_string();
            }
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                info!("User quit");
                self.should_quit = true;
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Home | KeyCode::End => {
                self.cursor = input::move_cursor(self.cursor, key, self.engine.door_count());
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(index) = input::digit_door(c, self.engine.door_count()) {
                    self.cursor = index;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.engine.phase() {
                Phase::Select => self.select(now),
                Phase::Decide => self.finish_reveal(),
                Phase::Resolved => self.new_round(),
            },
            KeyCode::Char('s') => self.decide(Decision::Stay, now),
            KeyCode::Char('w') => self.decide(Decision::Switch, now),
            KeyCode::Char('n') => self.new_round(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.change_doors(1),
            KeyCode::Char('-') => self.change_doors(-1),
            KeyCode::Char('r') => {
                self.confirm_reset = true;
                self.status = "Reset all statistics? (y/N)".to_string();
            }
            _ => {}
        }
    }

    /// Advances the reveal animation and the automatic restart.
    pub fn tick(&mut self, now: Instant) {
        if self.is_revealing() {
            let due = self
                .last_reveal_at
                .is_none_or(|at| now.saturating_duration_since(at) >= self.reveal_delay);
            if due {
                self.shown_reveals += 1;
                self.last_reveal_at = Some(now);
                debug!(shown = self.shown_reveals, "Door opened");
                if !self.is_revealing() {
                    self.status = DECIDE_PROMPT.to_string();
                }
            }
        }

        if let (Some(delay), Some(at)) = (self.auto_restart, self.resolved_at) {
            if now.saturating_duration_since(at) >= delay {
                debug!("Automatic restart");
                self.new_round();
            }
        }
    }

    /// Per-door view of the current round.
    pub fn door_cards(&self) -> Vec<DoorCard> {
        let round = self.engine.round();
        let door_count = round.door_count();
        let shown = self.shown_reveals();

        door_count
            .doors()
            .map(|door| {
                let (face, probability) = match round {
                    Round::Select(_) => (DoorFace::Closed, rules::prior(door_count)),
                    Round::Decide(decide) => {
                        let face = if shown.contains(&door) {
                            DoorFace::Goat
                        } else {
                            DoorFace::Closed
                        };
                        let p = rules::conditional(door_count, decide.selected(), shown, door);
                        (face, p)
                    }
                    Round::Resolved(resolved) => {
                        let face = if door == resolved.car_door() {
                            DoorFace::Car
                        } else {
                            DoorFace::Goat
                        };
                        (face, resolved.probability_of(door))
                    }
                };
                DoorCard {
                    door,
                    face,
                    probability,
                    picked: round.selected_door() == Some(door),
                    under_cursor: round.phase() == Phase::Select && door.index() == self.cursor,
                }
            })
            .collect()
    }

    fn select(&mut self, now: Instant) {
        match self.engine.select_door(Door::new(self.cursor)) {
            Ok(revealed) => {
                let count = revealed.len();
                self.shown_reveals = 0;
                self.last_reveal_at = Some(now);
                if self.reveal_delay.is_zero() {
                    self.shown_reveals = count;
                    self.status = DECIDE_PROMPT.to_string();
                } else {
                    self.status = format!("The host opens {} door(s)...", count);
                }
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn finish_reveal(&mut self) {
        if self.is_revealing() {
            self.shown_reveals = self.engine.round().revealed_doors().len();
            self.status = DECIDE_PROMPT.to_string();
        }
    }

    fn decide(&mut self, decision: Decision, now: Instant) {
        if self.is_revealing() {
            self.status = "Wait for the host to finish opening doors".to_string();
            return;
        }
        match self.engine.resolve_round(decision) {
            Ok(outcome) => {
                self.cursor = outcome.final_door().index();
                self.status = format!(
                    "{} {}",
                    outcome,
                    if self.auto_restart.is_some() {
                        "- next round starting soon"
                    } else {
                        "- press n for a new round"
                    }
                );
                self.last_outcome = Some(outcome);
                self.resolved_at = Some(now);
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn new_round(&mut self) {
        self.engine.restart();
        self.clear_round_view();
    }

    fn change_doors(&mut self, delta: isize) {
        let current = self.engine.door_count().get();
        let target = current.saturating_add_signed(delta);
        if !(MIN_DOORS..=MAX_DOORS).contains(&target) {
            self.status = format!("Door count must stay between {} and {}", MIN_DOORS, MAX_DOORS);
            return;
        }
        match self.engine.start_round(target) {
            Ok(_) => {
                self.clear_round_view();
                self.cursor = self.cursor.min(target - 1);
                self.status = format!("{} doors. {}", target, SELECT_PROMPT);
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn clear_round_view(&mut self) {
        self.shown_reveals = 0;
        self.last_reveal_at = None;
        self.resolved_at = None;
        self.last_outcome = None;
        self.cursor = self.cursor.min(self.engine.door_count().get() - 1);
        self.status = SELECT_PROMPT.to_string();
    }

    /// Door count of the current round.
    pub fn door_count(&self) -> DoorCount {
        self.engine.door_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monty_hall::{MemoryStore, ScriptedRandom};

    fn app(door_count: usize, draws: &[usize], delay_ms: u64) -> App<ScriptedRandom, MemoryStore> {
        let engine = GameEngine::new(
            DoorCount::new(door_count).unwrap(),
            ScriptedRandom::new(draws.iter().copied()),
            MemoryStore::new(),
        );
        App::new(engine, Duration::from_millis(delay_ms), None)
    }

    #[test]
    fn test_select_then_switch() {
        // Car behind door index 1.
        let mut app = app(3, &[1], 0);
        let now = Instant::now();

        app.handle_key(KeyCode::Enter, now);
        assert_eq!(app.engine().phase(), Phase::Decide);
        assert_eq!(app.shown_reveals(), &[Door::new(2)]);

        app.handle_key(KeyCode::Char('w'), now);
        assert_eq!(app.engine().phase(), Phase::Resolved);
        assert!(app.last_outcome().unwrap().won());
        assert_eq!(app.cursor(), 1);
        assert_eq!(app.engine().statistics().switch_wins(), 1);
    }

    #[test]
    fn test_reveals_are_paced() {
        // Car 2, pick 0, five doors: three reveals shown one per delay.
        let mut app = app(5, &[2, 0, 0, 0], 100);
        let start = Instant::now();

        app.handle_key(KeyCode::Enter, start);
        assert!(app.is_revealing());
        assert!(app.shown_reveals().is_empty());

        app.tick(start + Duration::from_millis(50));
        assert!(app.shown_reveals().is_empty());

        app.tick(start + Duration::from_millis(100));
        assert_eq!(app.shown_reveals().len(), 1);

        app.handle_key(KeyCode::Char('s'), start + Duration::from_millis(120));
        assert_eq!(app.engine().phase(), Phase::Decide);
        assert_eq!(app.status(), "Wait for the host to finish opening doors");

        app.tick(start + Duration::from_millis(200));
        app.tick(start + Duration::from_millis(300));
        assert!(!app.is_revealing());
        assert_eq!(app.shown_reveals(), app.round().revealed_doors());
        assert_eq!(app.status(), DECIDE_PROMPT);
    }

    #[test]
    fn test_partial_reveal_probabilities() {
        let mut app = app(5, &[2, 0, 0, 0], 100);
        let start = Instant::now();
        app.handle_key(KeyCode::Enter, start);
        app.tick(start + Duration::from_millis(100));

        let cards = app.door_cards();
        let total: f64 = cards.iter().map(|c| c.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((cards[0].probability - 0.2).abs() < 1e-9);
        assert!(cards[0].picked);
        assert_eq!(cards.iter().filter(|c| c.face == DoorFace::Goat).count(), 1);
    }

    #[test]
    fn test_enter_skips_animation() {
        let mut app = app(6, &[3], 1_000);
        let now = Instant::now();
        app.handle_key(KeyCode::Enter, now);
        app.handle_key(KeyCode::Enter, now);
        assert!(!app.is_revealing());
        assert_eq!(app.shown_reveals().len(), 4);
    }

    #[test]
    fn test_resolved_cards_show_car() {
        let mut app = app(3, &[0], 0);
        let now = Instant::now();
        app.handle_key(KeyCode::Right, now);
        app.handle_key(KeyCode::Enter, now);
        app.handle_key(KeyCode::Char('s'), now);

        let cards = app.door_cards();
        assert_eq!(cards[0].face, DoorFace::Car);
        assert_eq!(cards[0].probability, 1.0);
        assert!(cards[1].picked);
        assert!(cards.iter().all(|c| !c.under_cursor));
    }

    #[test]
    fn test_door_count_keys_bounded() {
        let mut app = app(3, &[], 0);
        let now = Instant::now();
        app.handle_key(KeyCode::Char('-'), now);
        assert_eq!(app.door_count().get(), 3);
        assert!(app.status().starts_with("Door count must stay"));

        app.handle_key(KeyCode::Char('+'), now);
        assert_eq!(app.door_count().get(), 4);
        assert_eq!(app.engine().phase(), Phase::Select);
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let mut app = app(3, &[1], 0);
        let now = Instant::now();
        app.handle_key(KeyCode::Enter, now);
        app.handle_key(KeyCode::Char('w'), now);

        app.handle_key(KeyCode::Char('r'), now);
        assert!(app.confirm_reset());
        app.handle_key(KeyCode::Char('n'), now);
        assert_eq!(app.status(), "Reset cancelled");
        assert_eq!(app.engine().statistics().total_rounds(), 1);

        app.handle_key(KeyCode::Char('r'), now);
        app.handle_key(KeyCode::Char('y'), now);
        assert_eq!(app.engine().statistics().total_rounds(), 0);
    }

    #[test]
    fn test_decide_in_select_phase_reports_error() {
        let mut app = app(3, &[1], 0);
        app.handle_key(KeyCode::Char('w'), Instant::now());
        assert_eq!(app.engine().phase(), Phase::Select);
        assert!(app.status().contains("resolve_round"));
    }

    #[test]
    fn test_auto_restart() {
        let engine = GameEngine::new(DoorCount::CLASSIC, ScriptedRandom::new([1]), MemoryStore::new());
        let mut app = App::new(engine, Duration::ZERO, Some(Duration::from_secs(2)));
        let start = Instant::now();
        app.handle_key(KeyCode::Enter, start);
        app.handle_key(KeyCode::Char('s'), start);

        app.tick(start + Duration::from_secs(1));
        assert_eq!(app.engine().phase(), Phase::Resolved);
        app.tick(start + Duration::from_secs(2));
        assert_eq!(app.engine().phase(), Phase::Select);
        assert!(app.last_outcome().is_none());
    }

    #[test]
    fn test_quit() {
        let mut app = app(3, &[], 0);
        app.handle_key(KeyCode::Char('q'), Instant::now());
        assert!(app.should_quit());
    }
}
