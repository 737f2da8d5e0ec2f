//! Binary fuzzy ART — the fast-learning fuzzy specialization over {0, 1}
//! inputs, with bitset weights so intersections run on popcount.

use crate::engine::ArtEngine;
use crate::rules::ArtRules;
use crate::scan::fingerprint_words;
use resonance_core::config::ExecutionConfig;
use resonance_core::params::FuzzyParams;
use resonance_core::{ArtError, ArtResult};
use resonance_kernels::{bin_and_count, BitVector, SimdPolicy};

/// Rules for binary fuzzy ART. Inputs are raw length-D {0, 1} vectors;
/// complement coding is applied internally (the complement of a binary
/// vector is binary), so weights are 2D-bit sets.
#[derive(Debug, Clone)]
pub struct BinaryFuzzyRules {
    params: FuzzyParams,
    input_dim: usize,
}

impl BinaryFuzzyRules {
    pub fn new(input_dim: usize, params: FuzzyParams) -> ArtResult<Self> {
        params.validate()?;
        if input_dim < 1 {
            return Err(ArtError::parameter("input_dim", "must be >= 1"));
        }
        if params.learning_rate != 1.0 {
            return Err(ArtError::parameter(
                "learning_rate",
                "binary fuzzy ART is fast-learning only (learning_rate = 1)",
            ));
        }
        Ok(Self { params, input_dim })
    }

    pub fn params(&self) -> &FuzzyParams {
        &self.params
    }

    fn pack_complement_coded(&self, input: &[f64]) -> ArtResult<BitVector> {
        if input.len() != self.input_dim {
            return Err(ArtError::input_shape(format!(
                "expected dimension {}, got {}",
                self.input_dim,
                input.len()
            )));
        }
        let mut coded = Vec::with_capacity(input.len() * 2);
        coded.extend_from_slice(input);
        coded.extend(input.iter().map(|x| 1.0 - x));
        BitVector::from_unit_floats(&coded).ok_or_else(|| {
            ArtError::input_shape("binary variants require components in {0, 1}")
        })
    }
}

impl ArtRules for BinaryFuzzyRules {
    type Weight = BitVector;
    type Prepared = BitVector;

    fn input_dimensions(&self) -> usize {
        self.input_dim
    }

    fn baseline_vigilance(&self) -> f64 {
        self.params.vigilance
    }

    fn prepare(&self, input: &[f64]) -> ArtResult<BitVector> {
        self.pack_complement_coded(input)
    }

    fn fingerprint(&self, prepared: &BitVector) -> u64 {
        fingerprint_words(prepared.words().iter().copied())
    }

    fn activation(&self, prepared: &BitVector, weight: &BitVector, _policy: SimdPolicy) -> f64 {
        let overlap = bin_and_count(prepared, weight) as f64;
        overlap / (self.params.choice_alpha + weight.count_ones() as f64)
    }

    fn match_score(&self, prepared: &BitVector, weight: &BitVector, _policy: SimdPolicy) -> f64 {
        // |I| is exactly D for complement-coded binary input
        bin_and_count(prepared, weight) as f64 / self.input_dim as f64
    }

    fn update(&self, prepared: &BitVector, weight: &BitVector, _policy: SimdPolicy) -> BitVector {
        prepared.and(weight)
    }

    fn create(&self, prepared: &BitVector) -> BitVector {
        prepared.clone()
    }
}

/// A ready-to-use binary fuzzy ART engine.
pub type BinaryFuzzyArt = ArtEngine<BinaryFuzzyRules>;

pub fn binary_fuzzy_art(
    input_dim: usize,
    params: FuzzyParams,
    config: ExecutionConfig,
) -> ArtResult<BinaryFuzzyArt> {
    ArtEngine::new(BinaryFuzzyRules::new(input_dim, params)?, config)
}
