//! ART-1 — the original binary-pattern network, bitset-backed.

use crate::engine::ArtEngine;
use crate::rules::ArtRules;
use crate::scan::fingerprint_words;
use resonance_core::config::ExecutionConfig;
use resonance_core::params::Art1Params;
use resonance_core::{ArtError, ArtResult};
use resonance_kernels::{bin_and_count, BitVector, SimdPolicy};

/// Rules for ART-1 over raw length-D {0, 1} inputs. Weights are D-bit sets;
/// no complement coding.
#[derive(Debug, Clone)]
pub struct Art1Rules {
    params: Art1Params,
    input_dim: usize,
}

impl Art1Rules {
    pub fn new(input_dim: usize, params: Art1Params) -> ArtResult<Self> {
        params.validate()?;
        if input_dim < 1 {
            return Err(ArtError::parameter("input_dim", "must be >= 1"));
        }
        Ok(Self { params, input_dim })
    }

    pub fn params(&self) -> &Art1Params {
        &self.params
    }
}

impl ArtRules for Art1Rules {
    type Weight = BitVector;
    type Prepared = BitVector;

    fn input_dimensions(&self) -> usize {
        self.input_dim
    }

    fn baseline_vigilance(&self) -> f64 {
        self.params.vigilance
    }

    fn prepare(&self, input: &[f64]) -> ArtResult<BitVector> {
        if input.len() != self.input_dim {
            return Err(ArtError::input_shape(format!(
                "expected dimension {}, got {}",
                self.input_dim,
                input.len()
            )));
        }
        BitVector::from_unit_floats(input)
            .ok_or_else(|| ArtError::input_shape("ART-1 requires components in {0, 1}"))
    }

    fn fingerprint(&self, prepared: &BitVector) -> u64 {
        fingerprint_words(prepared.words().iter().copied())
    }

    fn activation(&self, prepared: &BitVector, weight: &BitVector, _policy: SimdPolicy) -> f64 {
        let overlap = bin_and_count(prepared, weight) as f64;
        overlap / (self.params.l + weight.count_ones() as f64)
    }

    fn match_score(&self, prepared: &BitVector, weight: &BitVector, _policy: SimdPolicy) -> f64 {
        let input_norm = prepared.count_ones();
        if input_norm == 0 {
            // the empty pattern is vacuously contained in any prototype
            return 1.0;
        }
        bin_and_count(prepared, weight) as f64 / input_norm as f64
    }

    fn update(&self, prepared: &BitVector, weight: &BitVector, _policy: SimdPolicy) -> BitVector {
        prepared.and(weight)
    }

    fn create(&self, prepared: &BitVector) -> BitVector {
        prepared.clone()
    }
}

/// A ready-to-use ART-1 engine.
pub type Art1 = ArtEngine<Art1Rules>;

pub fn art1(input_dim: usize, params: Art1Params, config: ExecutionConfig) -> ArtResult<Art1> {
    ArtEngine::new(Art1Rules::new(input_dim, params)?, config)
}
