#![warn(clippy::unwrap_used)]

//! ARTMAP supervision: map field, SimpleARTMAP for discrete labels, and the
//! two-module ARTMAP for pattern targets.

pub mod artmap;
pub mod map_field;
pub mod supervisor;

use resonance_core::config::ExecutionConfig;
use resonance_core::params::{ArtMapParams, FuzzyParams, GaussianParams};
use resonance_core::ArtResult;
use resonance_engine::{FuzzyRules, GaussianRules};

pub use artmap::ArtMap;
pub use map_field::MapField;
pub use supervisor::{SimpleArtMap, TrainOutcome};

/// SimpleARTMAP over a fuzzy input module.
pub type FuzzyArtMap = SimpleArtMap<FuzzyRules>;

/// SimpleARTMAP over a Gaussian input module.
pub type GaussianArtMap = SimpleArtMap<GaussianRules>;

pub fn fuzzy_artmap(
    input_dim: usize,
    fuzzy: FuzzyParams,
    params: ArtMapParams,
    config: ExecutionConfig,
) -> ArtResult<FuzzyArtMap> {
    SimpleArtMap::new(FuzzyRules::new(input_dim, fuzzy)?, params, config)
}

pub fn gaussian_artmap(
    input_dim: usize,
    gaussian: GaussianParams,
    params: ArtMapParams,
    config: ExecutionConfig,
) -> ArtResult<GaussianArtMap> {
    SimpleArtMap::new(GaussianRules::new(input_dim, gaussian)?, params, config)
}
