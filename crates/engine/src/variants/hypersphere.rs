//! Hypersphere ART — categories as bounded spheres that only ever grow.

use crate::engine::ArtEngine;
use crate::rules::ArtRules;
use crate::scan::input_fingerprint;
use resonance_core::config::ExecutionConfig;
use resonance_core::params::HypersphereParams;
use resonance_core::{ArtError, ArtResult};
use resonance_kernels::{euclidean, SimdPolicy};

/// Sphere prototype: a center and a monotonically non-decreasing radius.
#[derive(Debug, Clone, PartialEq)]
pub struct HypersphereWeight {
    center: Vec<f64>,
    radius: f64,
}

impl HypersphereWeight {
    pub fn center(&self) -> &[f64] {
        &self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

/// Rules for Hypersphere ART over raw length-D inputs.
#[derive(Debug, Clone)]
pub struct HypersphereRules {
    params: HypersphereParams,
}

impl HypersphereRules {
    pub fn new(params: HypersphereParams) -> ArtResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &HypersphereParams {
        &self.params
    }
}

impl ArtRules for HypersphereRules {
    type Weight = HypersphereWeight;
    type Prepared = Vec<f64>;

    fn input_dimensions(&self) -> usize {
        self.params.input_dimensions
    }

    fn baseline_vigilance(&self) -> f64 {
        self.params.vigilance
    }

    fn prepare(&self, input: &[f64]) -> ArtResult<Vec<f64>> {
        if input.len() != self.params.input_dimensions {
            return Err(ArtError::input_shape(format!(
                "expected dimension {}, got {}",
                self.params.input_dimensions,
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
        weight: &HypersphereWeight,
        policy: SimdPolicy,
    ) -> f64 {
        1.0 / (1.0 + euclidean(prepared, &weight.center, policy))
    }

    fn match_score(
        &self,
        prepared: &Vec<f64>,
        weight: &HypersphereWeight,
        policy: SimdPolicy,
    ) -> f64 {
        // how much of the radius budget the absorbed sphere would consume
        let distance = euclidean(prepared, &weight.center, policy);
        (1.0 - weight.radius.max(distance) / self.params.radius_bound).max(0.0)
    }

    fn update(
        &self,
        prepared: &Vec<f64>,
        weight: &HypersphereWeight,
        policy: SimdPolicy,
    ) -> HypersphereWeight {
        let distance = euclidean(prepared, &weight.center, policy);
        let beta = self.params.learning_rate;

        // the center moves only by the part of the gap outside the sphere
        let pull = if distance > 0.0 {
            (beta / 2.0) * (1.0 - weight.radius.min(distance) / distance)
        } else {
            0.0
        };
        let center: Vec<f64> = weight
            .center
            .iter()
            .zip(prepared.iter())
            .map(|(c, x)| c + pull * (x - c))
            .collect();

        let moved_distance = euclidean(prepared, &center, policy);
        let radius = weight
            .radius
            .max(moved_distance * self.params.expansion_factor)
            .min(self.params.radius_bound)
            .max(weight.radius);

        HypersphereWeight { center, radius }
    }

    fn create(&self, prepared: &Vec<f64>) -> HypersphereWeight {
        HypersphereWeight {
            center: prepared.clone(),
            radius: 0.0,
        }
    }

    fn max_categories(&self) -> Option<usize> {
        Some(self.params.max_categories)
    }
}

/// A ready-to-use Hypersphere ART engine.
pub type HypersphereArt = ArtEngine<HypersphereRules>;

pub fn hypersphere_art(
    params: HypersphereParams,
    config: ExecutionConfig,
) -> ArtResult<HypersphereArt> {
    ArtEngine::new(HypersphereRules::new(params)?, config)
}
