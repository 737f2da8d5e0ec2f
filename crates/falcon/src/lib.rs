#![warn(clippy::unwrap_used)]

//! FALCON reinforcement head: three-channel fusion ART, ε-greedy action
//! selection, and the TD-FALCON SARSA layer with eligibility traces.

pub mod falcon;
pub mod rules;
pub mod td;

pub use falcon::FalconEngine;
pub use rules::{FalconRules, FusedInput, FusedWeight};
pub use td::TdFalcon;
