//! Monty Hall rules: host behaviour and probability model.

mod probability;
mod reveal;

pub use probability::{conditional, prior, theoretical_win_rate};
pub use reveal::{host_reveals, switch_target};
