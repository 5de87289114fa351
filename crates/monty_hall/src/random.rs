//! Uniform random-integer sources.
//!
//! The engine never reaches for a global generator. Every draw goes through
//! a [`RandomSource`] supplied by the caller, so tests can replay exact
//! car placements and reveal orders.

use std::collections::VecDeque;

use tracing::trace;

/// A source of uniform integers.
pub trait RandomSource {
    /// Returns an integer drawn uniformly from `[0, n)`.
    ///
    /// Callers guarantee `n > 0`.
    fn below(&mut self, n: usize) -> usize;
}

impl<R: rand::Rng + ?Sized> RandomSource for R {
    fn below(&mut self, n: usize) -> usize {
        self.random_range(0..n)
    }
}

/// Replays a fixed sequence of draws.
///
/// Each draw is reduced modulo the requested bound. Once the script is
/// exhausted every draw returns 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    draws: VecDeque<usize>,
}

impl ScriptedRandom {
    /// Creates a source that returns `draws` in order.
    pub fn new(draws: impl IntoIterator<Item = usize>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    /// Number of scripted draws not yet consumed.
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn below(&mut self, n: usize) -> usize {
        let value = self.draws.pop_front().unwrap_or(0) % n;
        trace!(n, value, "Scripted draw");
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_scripted_draws_in_order() {
        let mut source = ScriptedRandom::new([2, 0, 1]);
        assert_eq!(source.below(3), 2);
        assert_eq!(source.below(3), 0);
        assert_eq!(source.remaining(), 1);
        assert_eq!(source.below(3), 1);
        assert_eq!(source.below(3), 0);
    }

    #[test]
    fn test_scripted_draw_reduced_to_bound() {
        let mut source = ScriptedRandom::new([7]);
        assert_eq!(source.below(5), 2);
    }

    #[test]
    fn test_rng_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 1..20 {
            for _ in 0..50 {
                assert!(rng.below(n) < n);
            }
        }
    }
}
