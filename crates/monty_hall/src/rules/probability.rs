//! Conditional probability of the car being behind a door.

use crate::{Decision, Door, DoorCount};

/// Probability of any single door before the host opens anything.
pub fn prior(door_count: DoorCount) -> f64 {
    1.0 / door_count.get() as f64
}

/// Probability of `door` hiding the car once the host has opened `revealed`.
///
/// The selected door keeps its prior, revealed doors drop to zero, and the
/// remaining mass `1 - prior` is split evenly over the other unopened doors.
pub fn conditional(door_count: DoorCount, selected: Door, revealed: &[Door], door: Door) -> f64 {
    if door == selected {
        return prior(door_count);
    }
    if revealed.contains(&door) {
        return 0.0;
    }

    let unopened_others = door_count.get() - 1 - revealed.len();
    if unopened_others == 0 {
        return 0.0;
    }
    (1.0 - prior(door_count)) / unopened_others as f64
}

/// Long-run win rate of always making `decision` with `door_count` doors.
pub fn theoretical_win_rate(door_count: DoorCount, decision: Decision) -> f64 {
    match decision {
        Decision::Stay => prior(door_count),
        Decision::Switch => 1.0 - prior(door_count),
    }
}
