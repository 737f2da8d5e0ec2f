//! Dual-vigilance Fuzzy ART — a lower threshold admits predictions, an
//! upper one gates learning.

use crate::engine::ArtEngine;
use crate::rules::{ArtRules, MatchDecision};
use crate::scan::input_fingerprint;
use crate::variants::fuzzy::FuzzyWeight;
use resonance_core::config::ExecutionConfig;
use resonance_core::params::DualVigilanceParams;
use resonance_core::{ArtError, ArtResult};
use resonance_kernels::{complement_code, fuzzy_min_sum, l1_norm, SimdPolicy};

/// Rules for dual-vigilance Fuzzy ART. Same weight layout and kernels as
/// fuzzy ART; only the vigilance decision differs.
#[derive(Debug, Clone)]
pub struct DualVigilanceRules {
    params: DualVigilanceParams,
    input_dim: usize,
}

impl DualVigilanceRules {
    pub fn new(input_dim: usize, params: DualVigilanceParams) -> ArtResult<Self> {
        params.validate()?;
        if input_dim < 1 {
            return Err(ArtError::parameter("input_dim", "must be >= 1"));
        }
        Ok(Self { params, input_dim })
    }

    pub fn params(&self) -> &DualVigilanceParams {
        &self.params
    }
}

impl ArtRules for DualVigilanceRules {
    type Weight = FuzzyWeight;
    type Prepared = Vec<f64>;

    fn input_dimensions(&self) -> usize {
        self.input_dim
    }

    fn baseline_vigilance(&self) -> f64 {
        self.params.rho_high
    }

    fn prepare(&self, input: &[f64]) -> ArtResult<Vec<f64>> {
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
        Ok(complement_code(input))
    }

    fn fingerprint(&self, prepared: &Vec<f64>) -> u64 {
        input_fingerprint(prepared)
    }

    fn activation(&self, prepared: &Vec<f64>, weight: &FuzzyWeight, policy: SimdPolicy) -> f64 {
        let overlap = fuzzy_min_sum(prepared, weight.components(), policy);
        overlap / (self.params.choice_alpha + l1_norm(weight.components(), policy))
    }

    fn match_score(&self, prepared: &Vec<f64>, weight: &FuzzyWeight, policy: SimdPolicy) -> f64 {
        fuzzy_min_sum(prepared, weight.components(), policy) / self.input_dim as f64
    }

    /// Two-threshold decision; the machine's effective vigilance is ignored
    /// because this variant is never driven by match tracking.
    fn decide(&self, match_score: f64, _rho_effective: f64) -> MatchDecision {
        if match_score >= self.params.rho_high {
            MatchDecision::Resonate
        } else if match_score >= self.params.rho_low {
            MatchDecision::Boundary
        } else {
            MatchDecision::Reject
        }
    }

    fn update(&self, prepared: &Vec<f64>, weight: &FuzzyWeight, _policy: SimdPolicy) -> FuzzyWeight {
        let beta = self.params.learning_rate;
        FuzzyWeight(
            prepared
                .iter()
                .zip(weight.components().iter())
                .map(|(i, w)| beta * i.min(*w) + (1.0 - beta) * w)
                .collect(),
        )
    }

    fn create(&self, prepared: &Vec<f64>) -> FuzzyWeight {
        FuzzyWeight(prepared.clone())
    }
}

/// A ready-to-use dual-vigilance engine.
pub type DualVigilanceArt = ArtEngine<DualVigilanceRules>;

pub fn dual_vigilance_art(
    input_dim: usize,
    params: DualVigilanceParams,
    config: ExecutionConfig,
) -> ArtResult<DualVigilanceArt> {
    ArtEngine::new(DualVigilanceRules::new(input_dim, params)?, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(rho_low: f64, rho_high: f64) -> DualVigilanceArt {
        let params = DualVigilanceParams {
            rho_low,
            rho_high,
            ..Default::default()
        };
        dual_vigilance_art(2, params, ExecutionConfig::default()).expect("engine")
    }

    #[test]
    fn test_close_input_updates_winner() {
        let mut art = engine(0.4, 0.8);
        art.learn(&[0.5, 0.5]).expect("learn");
        let outcome = art.learn(&[0.52, 0.5]).expect("learn");
        assert_eq!(outcome.index(), Some(0));
        assert_eq!(art.category_count(), 1);
    }

    #[test]
    fn test_boundary_input_creates_but_still_predicts() {
        let mut art = engine(0.4, 0.9);
        art.learn(&[0.5, 0.5]).expect("learn");

        // match = 0.875: above rho_low, below rho_high
        let probe = [0.25, 0.5];
        let p = art.predict(&probe).expect("predict");
        assert_eq!(p.index(), Some(0));

        let outcome = art.learn(&probe).expect("learn");
        match outcome {
            resonance_core::LearnOutcome::Resonance { index, created, .. } => {
                assert!(created);
                assert_eq!(index, 1);
            }
            other => panic!("expected commit, got {other:?}"),
        }
    }

    #[test]
    fn test_far_input_rejected_for_prediction() {
        let mut art = engine(0.6, 0.9);
        art.learn(&[0.1, 0.1]).expect("learn");
        let p = art.predict(&[0.9, 0.9]).expect("predict");
        assert!(p.is_no_match());
    }
}
