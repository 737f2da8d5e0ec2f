//! Gaussian ART — categories as diagonal Gaussians with incremental
//! mean/variance estimates.

use crate::engine::ArtEngine;
use crate::rules::ArtRules;
use crate::scan::input_fingerprint;
use resonance_core::config::ExecutionConfig;
use resonance_core::params::GaussianParams;
use resonance_core::{ArtError, ArtResult};
use resonance_kernels::{gaussian_logpdf, weighted_sqr_distance, SimdPolicy};

/// Diagonal Gaussian prototype. The inverse variances and log-determinant
/// are cached so a scan costs one weighted quadratic form per category.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianWeight {
    mean: Vec<f64>,
    variance: Vec<f64>,
    inv_variance: Vec<f64>,
    log_det: f64,
    count: u64,
}

impl GaussianWeight {
    fn from_moments(mean: Vec<f64>, variance: Vec<f64>, count: u64) -> Self {
        let inv_variance: Vec<f64> = variance.iter().map(|v| 1.0 / v).collect();
        let log_det = variance.iter().map(|v| v.ln()).sum();
        Self {
            mean,
            variance,
            inv_variance,
            log_det,
            count,
        }
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn variance(&self) -> &[f64] {
        &self.variance
    }

    /// Samples absorbed, including the committing one.
    pub fn sample_count(&self) -> u64 {
        self.count
    }

    /// Log-determinant of the diagonal covariance.
    pub fn log_determinant(&self) -> f64 {
        self.log_det
    }
}

/// Rules for Gaussian ART over raw length-D inputs; no complement coding.
#[derive(Debug, Clone)]
pub struct GaussianRules {
    params: GaussianParams,
    input_dim: usize,
}

impl GaussianRules {
    pub fn new(input_dim: usize, params: GaussianParams) -> ArtResult<Self> {
        params.validate()?;
        if input_dim < 1 {
            return Err(ArtError::parameter("input_dim", "must be >= 1"));
        }
        Ok(Self { params, input_dim })
    }

    pub fn params(&self) -> &GaussianParams {
        &self.params
    }

    fn validate(&self, input: &[f64]) -> ArtResult<()> {
        if input.len() != self.input_dim {
            return Err(ArtError::input_shape(format!(
                "expected dimension {}, got {}",
                self.input_dim,
                input.len()
            )));
        }
        if let Some((i, v)) = input
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(ArtError::input_shape(format!(
                "component {i} = {v} is not finite"
            )));
        }
        Ok(())
    }
}

impl ArtRules for GaussianRules {
    type Weight = GaussianWeight;
    type Prepared = Vec<f64>;

    fn input_dimensions(&self) -> usize {
        self.input_dim
    }

    fn baseline_vigilance(&self) -> f64 {
        self.params.vigilance
    }

    fn prepare(&self, input: &[f64]) -> ArtResult<Vec<f64>> {
        self.validate(input)?;
        Ok(input.to_vec())
    }

    fn fingerprint(&self, prepared: &Vec<f64>) -> u64 {
        input_fingerprint(prepared)
    }

    fn activation(&self, prepared: &Vec<f64>, weight: &GaussianWeight, policy: SimdPolicy) -> f64 {
        // γ flattens the likelihood without changing the ranking
        let logpdf = gaussian_logpdf(
            prepared,
            &weight.mean,
            &weight.inv_variance,
            weight.log_det,
            policy,
        );
        (self.params.gamma * logpdf).exp()
    }

    fn match_score(&self, prepared: &Vec<f64>, weight: &GaussianWeight, policy: SimdPolicy) -> f64 {
        // per-dimension normalized Mahalanobis similarity in (0, 1]
        let mahalanobis =
            weighted_sqr_distance(prepared, &weight.mean, &weight.inv_variance, policy);
        (-0.5 * mahalanobis / self.input_dim as f64).exp()
    }

    fn update(
        &self,
        prepared: &Vec<f64>,
        weight: &GaussianWeight,
        _policy: SimdPolicy,
    ) -> GaussianWeight {
        let count = weight.count + 1;
        let n = count as f64;
        let floor = self.params.rho_b;

        let mut mean = Vec::with_capacity(self.input_dim);
        let mut variance = Vec::with_capacity(self.input_dim);
        for i in 0..self.input_dim {
            let delta = prepared[i] - weight.mean[i];
            let new_mean = weight.mean[i] + delta / n;
            let new_var =
                ((n - 1.0) * weight.variance[i] + delta * (prepared[i] - new_mean)) / n;
            mean.push(new_mean);
            variance.push(new_var.max(floor));
        }

        GaussianWeight::from_moments(mean, variance, count)
    }

    fn create(&self, prepared: &Vec<f64>) -> GaussianWeight {
        let initial_var = (self.params.rho_a * self.params.rho_a).max(self.params.rho_b);
        GaussianWeight::from_moments(
            prepared.clone(),
            vec![initial_var; self.input_dim],
            1,
        )
    }
}

/// A ready-to-use Gaussian ART engine.
pub type GaussianArt = ArtEngine<GaussianRules>;

pub fn gaussian_art(
    input_dim: usize,
    params: GaussianParams,
    config: ExecutionConfig,
) -> ArtResult<GaussianArt> {
    ArtEngine::new(GaussianRules::new(input_dim, params)?, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(vigilance: f64) -> GaussianArt {
        let params = GaussianParams {
            vigilance,
            ..Default::default()
        };
        gaussian_art(2, params, ExecutionConfig::default()).expect("engine")
    }

    #[test]
    fn test_mean_tracks_arithmetic_mean() {
        let mut art = engine(0.1);
        let samples = [[0.1, 0.2], [0.2, 0.3], [0.3, 0.1]];
        for s in &samples {
            let outcome = art.learn(s).expect("learn");
            assert_eq!(outcome.index(), Some(0));
        }

        let w = art.category(0).expect("category").weight;
        assert_eq!(w.sample_count(), 3);
        let expected = [(0.1 + 0.2 + 0.3) / 3.0, (0.2 + 0.3 + 0.1) / 3.0];
        for i in 0..2 {
            assert!((w.mean()[i] - expected[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sample_count_strictly_increases() {
        let mut art = engine(0.1);
        let mut last = 0;
        for step in 0..5 {
            art.learn(&[0.5 + 0.001 * step as f64, 0.5]).expect("learn");
            let count = art.category(0).expect("category").weight.sample_count();
            assert!(count > last);
            last = count;
        }
    }

    #[test]
    fn test_variance_floor_bounds_determinant() {
        let params = GaussianParams::default();
        let mut art = engine(0.1);
        // identical samples drive raw variance to zero; the floor holds
        for _ in 0..10 {
            art.learn(&[0.4, 0.6]).expect("learn");
        }
        let w = art.category(0).expect("category").weight;
        for &v in w.variance() {
            assert!(v >= params.rho_b);
        }
        assert!(w.log_determinant() >= 2.0 * params.rho_b.ln());
    }

    #[test]
    fn test_separated_clusters_form_two_categories() {
        let mut art = engine(0.7);
        for s in [[0.1, 0.1], [0.12, 0.09], [0.11, 0.12]] {
            art.learn(&s).expect("learn");
        }
        for s in [[0.9, 0.9], [0.88, 0.91], [0.92, 0.89]] {
            art.learn(&s).expect("learn");
        }
        assert_eq!(art.category_count(), 2);

        let p = art.predict(&[0.12, 0.12]).expect("predict");
        assert_eq!(p.index(), Some(0));
        let p = art.predict(&[0.88, 0.88]).expect("predict");
        assert_eq!(p.index(), Some(1));
    }

    #[test]
    fn test_non_finite_input_is_shape_error() {
        let mut art = engine(0.5);
        assert!(art.learn(&[f64::INFINITY, 0.0]).is_err());
    }
}
