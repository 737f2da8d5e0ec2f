//! Quadratic-neuron ART — categories as adaptive quadratic discriminants
//! with a bounded scale.

use crate::engine::ArtEngine;
use crate::rules::ArtRules;
use crate::scan::input_fingerprint;
use ndarray::{Array1, Array2, ArrayView1};
use resonance_core::config::ExecutionConfig;
use resonance_core::params::QuadraticParams;
use resonance_core::{ArtError, ArtResult};
use resonance_kernels::SimdPolicy;

/// Quadratic prototype: bias vector b, linear map W, and scale s clamped to
/// [s_min, s_max].
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticWeight {
    bias: Array1<f64>,
    map: Array2<f64>,
    scale: f64,
}

impl QuadraticWeight {
    pub fn bias(&self) -> &Array1<f64> {
        &self.bias
    }

    pub fn map(&self) -> &Array2<f64> {
        &self.map
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Rules for the quadratic-neuron variant over raw length-D inputs.
#[derive(Debug, Clone)]
pub struct QuadraticRules {
    params: QuadraticParams,
    input_dim: usize,
}

impl QuadraticRules {
    pub fn new(input_dim: usize, params: QuadraticParams) -> ArtResult<Self> {
        params.validate()?;
        if input_dim < 1 {
            return Err(ArtError::parameter("input_dim", "must be >= 1"));
        }
        Ok(Self { params, input_dim })
    }

    pub fn params(&self) -> &QuadraticParams {
        &self.params
    }

    fn residual(&self, prepared: &[f64], weight: &QuadraticWeight) -> Array1<f64> {
        let x = ArrayView1::from(prepared);
        weight.map.dot(&x) - &weight.bias
    }
}

impl ArtRules for QuadraticRules {
    type Weight = QuadraticWeight;
    type Prepared = Vec<f64>;

    fn input_dimensions(&self) -> usize {
        self.input_dim
    }

    fn baseline_vigilance(&self) -> f64 {
        self.params.vigilance
    }

    fn prepare(&self, input: &[f64]) -> ArtResult<Vec<f64>> {
        if input.len() != self.input_dim {
            return Err(ArtError::input_shape(format!(
                "expected dimension {}, got {}",
                self.input_dim,
                input.len()
            )));
        }
        if let Some((i, v)) = input.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ArtError::input_shape(format!(
                "component {i} = {v} is not finite"
            )));
        }
        Ok(input.to_vec())
    }

    fn fingerprint(&self, prepared: &Vec<f64>) -> u64 {
        input_fingerprint(prepared)
    }

    fn activation(
        &self,
        prepared: &Vec<f64>,
        weight: &QuadraticWeight,
        _policy: SimdPolicy,
    ) -> f64 {
        let residual = self.residual(prepared, weight);
        let sq = residual.dot(&residual);
        (-sq / (weight.scale * weight.scale)).exp()
    }

    fn match_score(
        &self,
        prepared: &Vec<f64>,
        weight: &QuadraticWeight,
        policy: SimdPolicy,
    ) -> f64 {
        self.activation(prepared, weight, policy)
    }

    fn update(
        &self,
        prepared: &Vec<f64>,
        weight: &QuadraticWeight,
        _policy: SimdPolicy,
    ) -> QuadraticWeight {
        let x = ArrayView1::from(prepared.as_slice());
        let residual = self.residual(prepared, weight);

        // b chases Wx
        let bias = &weight.bias + &residual.mapv(|r| self.params.beta_b * r);

        // W descends the squared residual, step normalized by the input energy
        let regularizer = 1.0 + x.dot(&x);
        let mut map = weight.map.clone();
        for r in 0..self.input_dim {
            let step = self.params.beta_w * residual[r] / regularizer;
            for c in 0..self.input_dim {
                map[[r, c]] -= step * x[c];
            }
        }

        let error = residual.dot(&residual).sqrt();
        let scale = (weight.scale + self.params.beta_s * (error - weight.scale))
            .clamp(self.params.s_min, self.params.s_max);

        QuadraticWeight { bias, map, scale }
    }

    fn create(&self, prepared: &Vec<f64>) -> QuadraticWeight {
        QuadraticWeight {
            bias: Array1::from_vec(prepared.clone()),
            map: Array2::eye(self.input_dim),
            scale: self.params.s_init,
        }
    }
}

/// A ready-to-use quadratic-neuron engine.
pub type QuadraticArt = ArtEngine<QuadraticRules>;

pub fn quadratic_art(
    input_dim: usize,
    params: QuadraticParams,
    config: ExecutionConfig,
) -> ArtResult<QuadraticArt> {
    ArtEngine::new(QuadraticRules::new(input_dim, params)?, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(vigilance: f64) -> QuadraticArt {
        let params = QuadraticParams {
            vigilance,
            ..Default::default()
        };
        quadratic_art(2, params, ExecutionConfig::default()).expect("engine")
    }

    #[test]
    fn test_fresh_category_peaks_at_its_input() {
        let mut art = engine(0.6);
        art.learn(&[0.3, 0.7]).expect("learn");
        // W = I, b = x, so the committing input scores exactly 1
        let p = art.predict(&[0.3, 0.7]).expect("predict");
        match p {
            resonance_core::PredictOutcome::Resonance { activation, .. } => {
                assert!((activation - 1.0).abs() < 1e-12);
            }
            other => panic!("expected resonance, got {other:?}"),
        }
    }

    #[test]
    fn test_scale_stays_clamped() {
        let params = QuadraticParams::default();
        let mut art = engine(0.0);
        art.learn(&[0.0, 0.0]).expect("learn");
        for _ in 0..50 {
            art.learn(&[5.0, -5.0]).expect("learn");
        }
        let s = art.category(0).expect("category").weight.scale();
        assert!(s >= params.s_min && s <= params.s_max);
    }

    #[test]
    fn test_distant_input_splits() {
        let mut art = engine(0.6);
        art.learn(&[0.0, 0.0]).expect("learn");
        art.learn(&[4.0, 4.0]).expect("learn");
        assert_eq!(art.category_count(), 2);
    }

    #[test]
    fn test_repeated_input_tightens_fit() {
        let mut art = engine(0.3);
        art.learn(&[0.5, 0.5]).expect("learn");
        art.learn(&[0.7, 0.5]).expect("learn");
        let before = art.category(0).expect("category").weight;
        let residual_before = {
            let rules = art.rules().clone();
            let r = rules.residual(&[0.7, 0.5], &before);
            r.dot(&r)
        };
        art.learn(&[0.7, 0.5]).expect("learn");
        let after = art.category(0).expect("category").weight;
        let residual_after = {
            let rules = art.rules().clone();
            let r = rules.residual(&[0.7, 0.5], &after);
            r.dot(&r)
        };
        assert!(residual_after <= residual_before);
    }
}
