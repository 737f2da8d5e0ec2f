//! ART-2 — analog patterns with contrast enhancement and noise suppression.

use crate::engine::ArtEngine;
use crate::rules::ArtRules;
use crate::scan::input_fingerprint;
use resonance_core::config::ExecutionConfig;
use resonance_core::params::Art2Params;
use resonance_core::stats::PerformanceTracker;
use resonance_core::{ArtError, ArtResult};
use resonance_kernels::{dot, l2_norm, SimdPolicy};

/// Unit-norm prototype of the preprocessed input stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Art2Weight(pub Vec<f64>);

impl Art2Weight {
    pub fn components(&self) -> &[f64] {
        &self.0
    }
}

/// Rules for ART-2 over raw non-negative length-D inputs. Preprocessing
/// normalizes to unit length, zeroes components below the contrast
/// threshold Θ, and renormalizes; prototypes track a running average of the
/// preprocessed stream.
#[derive(Debug, Clone)]
pub struct Art2Rules {
    params: Art2Params,
    input_dim: usize,
}

impl Art2Rules {
    pub fn new(input_dim: usize, params: Art2Params) -> ArtResult<Self> {
        params.validate()?;
        if input_dim < 1 {
            return Err(ArtError::parameter("input_dim", "must be >= 1"));
        }
        Ok(Self { params, input_dim })
    }

    pub fn params(&self) -> &Art2Params {
        &self.params
    }

    fn preprocess(&self, input: &[f64], policy: SimdPolicy) -> ArtResult<Vec<f64>> {
        if input.len() != self.input_dim {
            return Err(ArtError::input_shape(format!(
                "expected dimension {}, got {}",
                self.input_dim,
                input.len()
            )));
        }
        for (i, &v) in input.iter().enumerate() {
            if !(v.is_finite() && v >= 0.0) {
                return Err(ArtError::input_shape(format!(
                    "component {i} = {v} must be finite and non-negative"
                )));
            }
        }
        let norm = l2_norm(input, policy);
        if norm == 0.0 {
            return Err(ArtError::input_shape("ART-2 rejects the zero vector"));
        }

        let scaled: Vec<f64> = input.iter().map(|v| v / (norm + self.params.epsilon)).collect();
        let mut contrasted: Vec<f64> = scaled
            .iter()
            .map(|&v| if v >= self.params.theta { v } else { 0.0 })
            .collect();
        let contrast_norm = l2_norm(&contrasted, policy);
        if contrast_norm == 0.0 {
            // every component sits below Θ; fall back to the scaled signal
            contrasted = scaled;
        }
        let final_norm = l2_norm(&contrasted, policy).max(self.params.epsilon);
        Ok(contrasted.into_iter().map(|v| v / final_norm).collect())
    }
}

impl ArtRules for Art2Rules {
    type Weight = Art2Weight;
    type Prepared = Vec<f64>;

    fn input_dimensions(&self) -> usize {
        self.input_dim
    }

    fn baseline_vigilance(&self) -> f64 {
        self.params.vigilance
    }

    fn prepare(&self, input: &[f64]) -> ArtResult<Vec<f64>> {
        self.preprocess(input, SimdPolicy::scalar())
    }

    fn fingerprint(&self, prepared: &Vec<f64>) -> u64 {
        input_fingerprint(prepared)
    }

    fn activation(&self, prepared: &Vec<f64>, weight: &Art2Weight, policy: SimdPolicy) -> f64 {
        // both sides are unit-norm and non-negative, so this is the cosine
        dot(prepared, &weight.0, policy).clamp(0.0, 1.0)
    }

    fn match_score(&self, prepared: &Vec<f64>, weight: &Art2Weight, policy: SimdPolicy) -> f64 {
        self.activation(prepared, weight, policy)
    }

    fn update(&self, prepared: &Vec<f64>, weight: &Art2Weight, policy: SimdPolicy) -> Art2Weight {
        let beta = self.params.learning_rate;
        let blended: Vec<f64> = weight
            .0
            .iter()
            .zip(prepared.iter())
            .map(|(w, p)| (1.0 - beta) * w + beta * p)
            .collect();
        let norm = l2_norm(&blended, policy).max(self.params.epsilon);
        Art2Weight(blended.into_iter().map(|v| v / norm).collect())
    }

    fn create(&self, prepared: &Vec<f64>) -> Art2Weight {
        Art2Weight(prepared.clone())
    }

    fn record_update_telemetry(&self, tracker: &PerformanceTracker) {
        tracker.record_attention_update();
    }
}

/// A ready-to-use ART-2 engine.
pub type Art2 = ArtEngine<Art2Rules>;

pub fn art2(input_dim: usize, params: Art2Params, config: ExecutionConfig) -> ArtResult<Art2> {
    ArtEngine::new(Art2Rules::new(input_dim, params)?, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(vigilance: f64, theta: f64) -> Art2 {
        let params = Art2Params {
            vigilance,
            theta,
            ..Default::default()
        };
        art2(3, params, ExecutionConfig::default()).expect("engine")
    }

    #[test]
    fn test_zero_vector_rejected() {
        let mut art = engine(0.9, 0.1);
        assert!(art.learn(&[0.0, 0.0, 0.0]).is_err());
        assert!(art.learn(&[-1.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_scale_invariance() {
        let mut art = engine(0.9, 0.1);
        art.learn(&[1.0, 2.0, 0.5]).expect("learn");
        // the same direction at a different magnitude lands in the same category
        let p = art.predict(&[2.0, 4.0, 1.0]).expect("predict");
        assert_eq!(p.index(), Some(0));
        assert_eq!(art.category_count(), 1);
    }

    #[test]
    fn test_contrast_suppresses_weak_components() {
        let mut art = engine(0.9, 0.3);
        art.learn(&[1.0, 0.05, 0.0]).expect("learn");
        let w = art.category(0).expect("category").weight;
        // the weak middle component was zeroed by Θ
        assert_eq!(w.components()[1], 0.0);
        assert!((l2_norm(w.components(), SimdPolicy::scalar()) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_directions_split() {
        let mut art = engine(0.8, 0.1);
        art.learn(&[1.0, 0.0, 0.0]).expect("learn");
        art.learn(&[0.0, 1.0, 0.0]).expect("learn");
        assert_eq!(art.category_count(), 2);
    }

    #[test]
    fn test_update_counts_as_attention_adjustment() {
        let mut art = engine(0.5, 0.1);
        art.learn(&[1.0, 1.0, 0.0]).expect("learn");
        art.learn(&[1.0, 0.9, 0.0]).expect("learn");
        assert!(art.performance_stats().attention_weight_updates >= 1);
    }
}
