//! Fuzzy ART — the workhorse variant over complement-coded unit inputs.

use crate::engine::ArtEngine;
use crate::rules::ArtRules;
use crate::scan::input_fingerprint;
use resonance_core::config::ExecutionConfig;
use resonance_core::params::FuzzyParams;
use resonance_core::{ArtError, ArtResult};
use resonance_kernels::{complement_code, fuzzy_min_sum, l1_norm, SimdPolicy};

/// Dense complement-coded weight; every component stays in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyWeight(pub Vec<f64>);

impl FuzzyWeight {
    pub fn components(&self) -> &[f64] {
        &self.0
    }
}

/// Rules for Fuzzy ART over raw length-D inputs in [0, 1]; complement
/// coding is applied internally, so weights have length 2D.
#[derive(Debug, Clone)]
pub struct FuzzyRules {
    params: FuzzyParams,
    input_dim: usize,
}

impl FuzzyRules {
    pub fn new(input_dim: usize, params: FuzzyParams) -> ArtResult<Self> {
        params.validate()?;
        if input_dim < 1 {
            return Err(ArtError::parameter("input_dim", "must be >= 1"));
        }
        Ok(Self { params, input_dim })
    }

    pub fn params(&self) -> &FuzzyParams {
        &self.params
    }

    /// Update with an explicit rate, for layers that blend a second-best
    /// category at a slower pace.
    pub fn update_with_rate(
        &self,
        prepared: &[f64],
        weight: &FuzzyWeight,
        rate: f64,
        policy: SimdPolicy,
    ) -> FuzzyWeight {
        let _ = policy;
        FuzzyWeight(
            prepared
                .iter()
                .zip(weight.0.iter())
                .map(|(i, w)| rate * i.min(*w) + (1.0 - rate) * w)
                .collect(),
        )
    }

    pub(crate) fn validate_unit_input(&self, input: &[f64]) -> ArtResult<()> {
        if input.len() != self.input_dim {
            return Err(ArtError::input_shape(format!(
                "expected dimension {}, got {}",
                self.input_dim,
                input.len()
            )));
        }
        for (i, &v) in input.iter().enumerate() {
            if !(0.0..=1.0).contains(&v) || v.is_nan() {
                return Err(ArtError::input_shape(format!(
                    "component {i} = {v} is outside [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

impl ArtRules for FuzzyRules {
    type Weight = FuzzyWeight;
    type Prepared = Vec<f64>;

    fn input_dimensions(&self) -> usize {
        self.input_dim
    }

    fn baseline_vigilance(&self) -> f64 {
        self.params.vigilance
    }

    fn prepare(&self, input: &[f64]) -> ArtResult<Vec<f64>> {
        self.validate_unit_input(input)?;
        Ok(complement_code(input))
    }

    fn fingerprint(&self, prepared: &Vec<f64>) -> u64 {
        input_fingerprint(prepared)
    }

    fn activation(&self, prepared: &Vec<f64>, weight: &FuzzyWeight, policy: SimdPolicy) -> f64 {
        let overlap = fuzzy_min_sum(prepared, &weight.0, policy);
        overlap / (self.params.choice_alpha + l1_norm(&weight.0, policy))
    }

    fn match_score(&self, prepared: &Vec<f64>, weight: &FuzzyWeight, policy: SimdPolicy) -> f64 {
        // |I| is exactly D for complement-coded input
        fuzzy_min_sum(prepared, &weight.0, policy) / self.input_dim as f64
    }

    fn update(&self, prepared: &Vec<f64>, weight: &FuzzyWeight, policy: SimdPolicy) -> FuzzyWeight {
        self.update_with_rate(prepared, weight, self.params.learning_rate, policy)
    }

    fn create(&self, prepared: &Vec<f64>) -> FuzzyWeight {
        FuzzyWeight(prepared.clone())
    }
}

/// A ready-to-use Fuzzy ART engine.
pub type FuzzyArt = ArtEngine<FuzzyRules>;

/// Convenience constructor mirroring the parameter defaults.
pub fn fuzzy_art(input_dim: usize, params: FuzzyParams, config: ExecutionConfig) -> ArtResult<FuzzyArt> {
    ArtEngine::new(FuzzyRules::new(input_dim, params)?, config)
}
