//! Host reveal logic.

use tracing::{debug, instrument};

use crate::{Door, DoorCount, RandomSource};

/// Chooses the doors the host opens after the contestant picks `selected`.
///
/// The host never opens the car door or the selected door. Candidates are
/// drawn uniformly one at a time until `door_count - 2` doors are open, so
/// exactly one unopened door remains besides the selection. The returned
/// order is the draw order.
#[instrument(skip(rng))]
pub fn host_reveals<R>(door_count: DoorCount, car_door: Door, selected: Door, rng: &mut R) -> Vec<Door>
where
    R: RandomSource + ?Sized,
{
    let mut candidates: Vec<Door> = door_count
        .doors()
        .filter(|door| *door != car_door && *door != selected)
        .collect();

    let target = door_count.reveal_count();
    let mut revealed = Vec::with_capacity(target);

    while revealed.len() < target {
        let pick = rng.below(candidates.len());
        revealed.push(candidates.swap_remove(pick));
    }

    debug!(?revealed, "Host reveal order drawn");
    revealed
}

/// Returns the door a switch moves to: the one door that is neither
/// `selected` nor revealed.
///
/// Returns `None` only if the reveal left no alternative or more than one.
#[instrument(skip(revealed))]
pub fn switch_target(door_count: DoorCount, selected: Door, revealed: &[Door]) -> Option<Door> {
    let mut remaining = door_count
        .doors()
        .filter(|door| *door != selected && !revealed.contains(door));

    match (remaining.next(), remaining.next()) {
        (Some(door), None) => Some(door),
        _ => None,
    }
}
