#![warn(clippy::unwrap_used)]

//! Resonance-search engine: the generic learn/predict state machine, the
//! category store, the bounded-parallel scan executor, and the ART variant
//! catalog built on top of them.

pub mod engine;
pub mod machine;
pub mod rules;
pub mod scan;
pub mod store;
pub mod variants;

pub use engine::ArtEngine;
pub use machine::Proposal;
pub use rules::{ArtRules, MatchDecision};
pub use scan::{ScanCache, ScanExecutor};
pub use store::{Category, CategorySnapshot, CategoryStore};
pub use variants::art1::{art1, Art1, Art1Rules};
pub use variants::art2::{art2, Art2, Art2Rules, Art2Weight};
pub use variants::artstar::ArtStar;
pub use variants::binary_fuzzy::{binary_fuzzy_art, BinaryFuzzyArt, BinaryFuzzyRules};
pub use variants::dual_vigilance::{dual_vigilance_art, DualVigilanceArt, DualVigilanceRules};
pub use variants::fuzzy::{fuzzy_art, FuzzyArt, FuzzyRules, FuzzyWeight};
pub use variants::gaussian::{gaussian_art, GaussianArt, GaussianRules, GaussianWeight};
pub use variants::hypersphere::{
    hypersphere_art, HypersphereArt, HypersphereRules, HypersphereWeight,
};
pub use variants::quadratic::{quadratic_art, QuadraticArt, QuadraticRules, QuadraticWeight};
pub use variants::topoart::TopoArt;
