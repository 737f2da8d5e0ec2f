//! Parameter value objects for every ART family.
//!
//! Each record is validated at construction and immutable afterwards;
//! `with_*` derivations replace exactly one field and re-validate, so an
//! invalid value can never reach a training loop.

use crate::error::{ArtError, ArtResult};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn check_unit_interval(field: &str, value: f64) -> ArtResult<()> {
    if !(0.0..=1.0).contains(&value) || value.is_nan() {
        return Err(ArtError::parameter(
            field,
            format!("must lie in [0, 1], got {value}"),
        ));
    }
    Ok(())
}

fn check_half_open_unit(field: &str, value: f64) -> ArtResult<()> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(ArtError::parameter(
            field,
            format!("must lie in (0, 1], got {value}"),
        ));
    }
    Ok(())
}

fn check_positive(field: &str, value: f64) -> ArtResult<()> {
    if !(value > 0.0) {
        return Err(ArtError::parameter(
            field,
            format!("must be > 0, got {value}"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Fuzzy family
// ---------------------------------------------------------------------------

/// Parameters for Fuzzy ART and its binary specialization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FuzzyParams {
    /// Minimum match required for resonance.
    pub vigilance: f64,
    /// Learning rate β; 1.0 is fast learning.
    pub learning_rate: f64,
    /// Choice parameter α in the activation denominator.
    pub choice_alpha: f64,
}

impl FuzzyParams {
    pub fn new(vigilance: f64, learning_rate: f64, choice_alpha: f64) -> ArtResult<Self> {
        let params = Self {
            vigilance,
            learning_rate,
            choice_alpha,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> ArtResult<()> {
        check_unit_interval("vigilance", self.vigilance)?;
        check_half_open_unit("learning_rate", self.learning_rate)?;
        check_positive("choice_alpha", self.choice_alpha)
    }

    pub fn with_vigilance(self, vigilance: f64) -> ArtResult<Self> {
        Self::new(vigilance, self.learning_rate, self.choice_alpha)
    }

    pub fn with_learning_rate(self, learning_rate: f64) -> ArtResult<Self> {
        Self::new(self.vigilance, learning_rate, self.choice_alpha)
    }

    pub fn with_choice_alpha(self, choice_alpha: f64) -> ArtResult<Self> {
        Self::new(self.vigilance, self.learning_rate, choice_alpha)
    }
}

impl Default for FuzzyParams {
    fn default() -> Self {
        Self {
            vigilance: 0.75,
            learning_rate: 1.0,
            choice_alpha: 1e-3,
        }
    }
}

// ---------------------------------------------------------------------------
// ART-1
// ---------------------------------------------------------------------------

/// Parameters for ART-1 over binary inputs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Art1Params {
    pub vigilance: f64,
    /// Uncommitted-node bias L; must exceed 1 so new categories stay viable.
    pub l: f64,
}

impl Art1Params {
    pub fn new(vigilance: f64, l: f64) -> ArtResult<Self> {
        let params = Self { vigilance, l };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> ArtResult<()> {
        check_unit_interval("vigilance", self.vigilance)?;
        if !(self.l > 1.0) {
            return Err(ArtError::parameter(
                "l",
                format!("must be > 1, got {}", self.l),
            ));
        }
        Ok(())
    }

    pub fn with_vigilance(self, vigilance: f64) -> ArtResult<Self> {
        Self::new(vigilance, self.l)
    }

    pub fn with_l(self, l: f64) -> ArtResult<Self> {
        Self::new(self.vigilance, l)
    }
}

impl Default for Art1Params {
    fn default() -> Self {
        Self {
            vigilance: 0.75,
            l: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// ART-2
// ---------------------------------------------------------------------------

/// Parameters for ART-2 with contrast enhancement and noise suppression.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Art2Params {
    pub vigilance: f64,
    pub learning_rate: f64,
    /// Contrast threshold Θ; components below it are suppressed to zero.
    pub theta: f64,
    /// Noise floor ε added before normalization.
    pub epsilon: f64,
}

impl Art2Params {
    pub fn new(vigilance: f64, learning_rate: f64, theta: f64, epsilon: f64) -> ArtResult<Self> {
        let params = Self {
            vigilance,
            learning_rate,
            theta,
            epsilon,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> ArtResult<()> {
        check_unit_interval("vigilance", self.vigilance)?;
        check_half_open_unit("learning_rate", self.learning_rate)?;
        check_unit_interval("theta", self.theta)?;
        check_half_open_unit("epsilon", self.epsilon)
    }

    pub fn with_vigilance(self, vigilance: f64) -> ArtResult<Self> {
        Self::new(vigilance, self.learning_rate, self.theta, self.epsilon)
    }

    pub fn with_theta(self, theta: f64) -> ArtResult<Self> {
        Self::new(self.vigilance, self.learning_rate, theta, self.epsilon)
    }
}

impl Default for Art2Params {
    fn default() -> Self {
        Self {
            vigilance: 0.9,
            learning_rate: 0.1,
            theta: 0.1,
            epsilon: 1e-4,
        }
    }
}

// ---------------------------------------------------------------------------
// Gaussian ART
// ---------------------------------------------------------------------------

/// Parameters for Gaussian ART with diagonal covariance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GaussianParams {
    /// Match threshold ρ applied to the Mahalanobis-derived match score.
    pub vigilance: f64,
    /// Discount γ applied to the category prior in the activation.
    pub gamma: f64,
    /// Initial per-dimension standard deviation for a fresh category.
    pub rho_a: f64,
    /// Variance floor; every diagonal entry stays >= rho_b².
    pub rho_b: f64,
}

impl GaussianParams {
    pub fn new(vigilance: f64, gamma: f64, rho_a: f64, rho_b: f64) -> ArtResult<Self> {
        let params = Self {
            vigilance,
            gamma,
            rho_a,
            rho_b,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> ArtResult<()> {
        check_unit_interval("vigilance", self.vigilance)?;
        check_half_open_unit("gamma", self.gamma)?;
        check_positive("rho_a", self.rho_a)?;
        check_positive("rho_b", self.rho_b)?;
        if self.rho_b > self.rho_a * self.rho_a {
            return Err(ArtError::parameter(
                "rho_b",
                format!(
                    "variance floor {} exceeds initial variance {}",
                    self.rho_b,
                    self.rho_a * self.rho_a
                ),
            ));
        }
        Ok(())
    }

    pub fn with_vigilance(self, vigilance: f64) -> ArtResult<Self> {
        Self::new(vigilance, self.gamma, self.rho_a, self.rho_b)
    }

    pub fn with_gamma(self, gamma: f64) -> ArtResult<Self> {
        Self::new(self.vigilance, gamma, self.rho_a, self.rho_b)
    }
}

impl Default for GaussianParams {
    fn default() -> Self {
        Self {
            vigilance: 0.5,
            gamma: 1.0,
            rho_a: 0.5,
            rho_b: 0.05,
        }
    }
}

// ---------------------------------------------------------------------------
// Hypersphere ART
// ---------------------------------------------------------------------------

/// Parameters for Hypersphere ART.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HypersphereParams {
    pub vigilance: f64,
    pub learning_rate: f64,
    pub choice_alpha: f64,
    pub input_dimensions: usize,
    /// Hard cap on category count; exceeding it is a capacity error.
    pub max_categories: usize,
    /// Multiplier applied to the post-move distance when growing the radius.
    pub expansion_factor: f64,
    /// Largest admissible radius; also scales the match criterion.
    pub radius_bound: f64,
}

impl HypersphereParams {
    pub fn new(
        vigilance: f64,
        learning_rate: f64,
        input_dimensions: usize,
        max_categories: usize,
    ) -> ArtResult<Self> {
        let params = Self {
            vigilance,
            learning_rate,
            input_dimensions,
            max_categories,
            ..Default::default()
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> ArtResult<()> {
        check_unit_interval("vigilance", self.vigilance)?;
        check_half_open_unit("learning_rate", self.learning_rate)?;
        check_positive("choice_alpha", self.choice_alpha)?;
        check_positive("radius_bound", self.radius_bound)?;
        if self.input_dimensions < 1 {
            return Err(ArtError::parameter("input_dimensions", "must be >= 1"));
        }
        if self.max_categories < 1 {
            return Err(ArtError::parameter("max_categories", "must be >= 1"));
        }
        if self.expansion_factor < 1.0 {
            return Err(ArtError::parameter(
                "expansion_factor",
                format!("must be >= 1, got {}", self.expansion_factor),
            ));
        }
        Ok(())
    }

    pub fn with_vigilance(self, vigilance: f64) -> ArtResult<Self> {
        let params = Self { vigilance, ..self };
        params.validate()?;
        Ok(params)
    }

    pub fn with_expansion_factor(self, expansion_factor: f64) -> ArtResult<Self> {
        let params = Self {
            expansion_factor,
            ..self
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_radius_bound(self, radius_bound: f64) -> ArtResult<Self> {
        let params = Self {
            radius_bound,
            ..self
        };
        params.validate()?;
        Ok(params)
    }
}

impl Default for HypersphereParams {
    fn default() -> Self {
        Self {
            vigilance: 0.5,
            learning_rate: 0.5,
            choice_alpha: 1e-3,
            input_dimensions: 2,
            max_categories: 1024,
            expansion_factor: 1.0,
            radius_bound: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Quadratic neuron
// ---------------------------------------------------------------------------

/// Parameters for the quadratic-neuron variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuadraticParams {
    pub vigilance: f64,
    /// Update rate for the bias vector b.
    pub beta_b: f64,
    /// Update rate for the linear map W.
    pub beta_w: f64,
    /// Update rate for the scale s.
    pub beta_s: f64,
    /// Initial scale for a fresh category.
    pub s_init: f64,
    /// Lower clamp for the adaptive scale.
    pub s_min: f64,
    /// Upper clamp for the adaptive scale.
    pub s_max: f64,
}

impl QuadraticParams {
    pub fn new(vigilance: f64, beta_b: f64, beta_w: f64, beta_s: f64) -> ArtResult<Self> {
        let params = Self {
            vigilance,
            beta_b,
            beta_w,
            beta_s,
            ..Default::default()
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> ArtResult<()> {
        check_unit_interval("vigilance", self.vigilance)?;
        check_half_open_unit("beta_b", self.beta_b)?;
        check_half_open_unit("beta_w", self.beta_w)?;
        check_half_open_unit("beta_s", self.beta_s)?;
        check_positive("s_min", self.s_min)?;
        if self.s_max < self.s_min {
            return Err(ArtError::parameter(
                "s_max",
                format!("must be >= s_min ({}), got {}", self.s_min, self.s_max),
            ));
        }
        if !(self.s_min..=self.s_max).contains(&self.s_init) {
            return Err(ArtError::parameter(
                "s_init",
                format!(
                    "must lie in [s_min, s_max] = [{}, {}], got {}",
                    self.s_min, self.s_max, self.s_init
                ),
            ));
        }
        Ok(())
    }

    pub fn with_vigilance(self, vigilance: f64) -> ArtResult<Self> {
        let params = Self { vigilance, ..self };
        params.validate()?;
        Ok(params)
    }
}

impl Default for QuadraticParams {
    fn default() -> Self {
        Self {
            vigilance: 0.6,
            beta_b: 0.1,
            beta_w: 0.05,
            beta_s: 0.05,
            s_init: 1.0,
            s_min: 1e-2,
            s_max: 10.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Dual vigilance
// ---------------------------------------------------------------------------

/// Parameters for dual-vigilance Fuzzy ART.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DualVigilanceParams {
    /// Lower threshold; below it an input is rejected outright.
    pub rho_low: f64,
    /// Upper threshold; at or above it the winner resonates and learns.
    pub rho_high: f64,
    pub learning_rate: f64,
    pub choice_alpha: f64,
}

impl DualVigilanceParams {
    pub fn new(rho_low: f64, rho_high: f64, learning_rate: f64) -> ArtResult<Self> {
        let params = Self {
            rho_low,
            rho_high,
            learning_rate,
            ..Default::default()
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> ArtResult<()> {
        check_unit_interval("rho_low", self.rho_low)?;
        check_unit_interval("rho_high", self.rho_high)?;
        check_half_open_unit("learning_rate", self.learning_rate)?;
        check_positive("choice_alpha", self.choice_alpha)?;
        if self.rho_low >= self.rho_high {
            return Err(ArtError::parameter(
                "rho_low",
                format!(
                    "must be < rho_high ({}), got {}",
                    self.rho_high, self.rho_low
                ),
            ));
        }
        Ok(())
    }

    pub fn with_thresholds(self, rho_low: f64, rho_high: f64) -> ArtResult<Self> {
        let params = Self {
            rho_low,
            rho_high,
            ..self
        };
        params.validate()?;
        Ok(params)
    }
}

impl Default for DualVigilanceParams {
    fn default() -> Self {
        Self {
            rho_low: 0.4,
            rho_high: 0.8,
            learning_rate: 1.0,
            choice_alpha: 1e-3,
        }
    }
}

// ---------------------------------------------------------------------------
// TopoART
// ---------------------------------------------------------------------------

/// Parameters for TopoART with two coupled components.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TopoParams {
    /// Vigilance of component A (fast learner).
    pub vigilance_a: f64,
    /// Vigilance of component B (slow, permanence-gated learner).
    pub vigilance_b: f64,
    pub learning_rate: f64,
    /// Learning rate for the second-best A category.
    pub beta_second: f64,
    pub choice_alpha: f64,
    /// Wins required within one permanence window before B learns a sample.
    pub phi: usize,
    /// Cycle length of the permanence window.
    pub tau: usize,
}

impl TopoParams {
    pub fn new(vigilance_a: f64, vigilance_b: f64, phi: usize, tau: usize) -> ArtResult<Self> {
        let params = Self {
            vigilance_a,
            vigilance_b,
            phi,
            tau,
            ..Default::default()
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> ArtResult<()> {
        check_unit_interval("vigilance_a", self.vigilance_a)?;
        check_unit_interval("vigilance_b", self.vigilance_b)?;
        check_half_open_unit("learning_rate", self.learning_rate)?;
        check_half_open_unit("beta_second", self.beta_second)?;
        check_positive("choice_alpha", self.choice_alpha)?;
        if self.phi < 1 {
            return Err(ArtError::parameter("phi", "must be >= 1"));
        }
        if self.tau < 1 {
            return Err(ArtError::parameter("tau", "must be >= 1"));
        }
        Ok(())
    }

    pub fn with_phi(self, phi: usize) -> ArtResult<Self> {
        let params = Self { phi, ..self };
        params.validate()?;
        Ok(params)
    }
}

impl Default for TopoParams {
    fn default() -> Self {
        Self {
            vigilance_a: 0.7,
            vigilance_b: 0.85,
            learning_rate: 1.0,
            beta_second: 0.6,
            choice_alpha: 1e-3,
            phi: 3,
            tau: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// ARTSTAR
// ---------------------------------------------------------------------------

/// Parameters for ARTSTAR, the stability-regulated fuzzy variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArtStarParams {
    /// Starting vigilance; regulation keeps it inside [rho_min, rho_max].
    pub vigilance: f64,
    pub rho_min: f64,
    pub rho_max: f64,
    pub learning_rate: f64,
    pub choice_alpha: f64,
    /// Weight given to long-lived, frequently used categories.
    pub stability_bias: f64,
    /// Weight given to raw activation regardless of history.
    pub adaptability_bias: f64,
    /// Step applied to vigilance per regulation event.
    pub regulation_rate: f64,
    /// Usage count below which a category is prunable.
    pub pruning_threshold: u64,
    /// Cycles a category must have lived before it is prunable.
    pub min_category_age: u64,
    /// Samples per maintenance window.
    pub performance_window_size: usize,
    /// Match success rate the regulator steers toward.
    pub target_success_rate: f64,
}

impl ArtStarParams {
    pub fn new(vigilance: f64, rho_min: f64, rho_max: f64) -> ArtResult<Self> {
        let params = Self {
            vigilance,
            rho_min,
            rho_max,
            ..Default::default()
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> ArtResult<()> {
        check_unit_interval("vigilance", self.vigilance)?;
        check_unit_interval("rho_min", self.rho_min)?;
        check_unit_interval("rho_max", self.rho_max)?;
        check_half_open_unit("learning_rate", self.learning_rate)?;
        check_positive("choice_alpha", self.choice_alpha)?;
        check_unit_interval("stability_bias", self.stability_bias)?;
        check_unit_interval("adaptability_bias", self.adaptability_bias)?;
        check_half_open_unit("regulation_rate", self.regulation_rate)?;
        check_unit_interval("target_success_rate", self.target_success_rate)?;
        if self.rho_min > self.rho_max {
            return Err(ArtError::parameter(
                "rho_min",
                format!("must be <= rho_max ({}), got {}", self.rho_max, self.rho_min),
            ));
        }
        if !(self.rho_min..=self.rho_max).contains(&self.vigilance) {
            return Err(ArtError::parameter(
                "vigilance",
                format!(
                    "must lie in [rho_min, rho_max] = [{}, {}], got {}",
                    self.rho_min, self.rho_max, self.vigilance
                ),
            ));
        }
        if self.performance_window_size < 1 {
            return Err(ArtError::parameter("performance_window_size", "must be >= 1"));
        }
        Ok(())
    }

    pub fn with_vigilance(self, vigilance: f64) -> ArtResult<Self> {
        let params = Self { vigilance, ..self };
        params.validate()?;
        Ok(params)
    }

    pub fn with_pruning_threshold(self, pruning_threshold: u64) -> ArtResult<Self> {
        let params = Self {
            pruning_threshold,
            ..self
        };
        params.validate()?;
        Ok(params)
    }
}

impl Default for ArtStarParams {
    fn default() -> Self {
        Self {
            vigilance: 0.6,
            rho_min: 0.3,
            rho_max: 0.9,
            learning_rate: 1.0,
            choice_alpha: 1e-3,
            stability_bias: 0.5,
            adaptability_bias: 0.5,
            regulation_rate: 0.05,
            pruning_threshold: 2,
            min_category_age: 50,
            performance_window_size: 32,
            target_success_rate: 0.7,
        }
    }
}

// ---------------------------------------------------------------------------
// ARTMAP
// ---------------------------------------------------------------------------

/// Parameters for the ARTMAP supervisor layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArtMapParams {
    /// Vigilance applied to the map field itself.
    pub map_vigilance: f64,
    /// Vigilance module A returns to after each sample.
    pub baseline_vigilance: f64,
    /// Increment ε added above the winner's match during match tracking.
    pub vigilance_increment: f64,
    /// Ceiling for raised vigilance.
    pub max_vigilance: f64,
    /// Match-tracking restarts allowed per sample.
    pub max_search_attempts: usize,
    pub enable_match_tracking: bool,
}

impl ArtMapParams {
    pub fn new(baseline_vigilance: f64, vigilance_increment: f64) -> ArtResult<Self> {
        let params = Self {
            baseline_vigilance,
            vigilance_increment,
            ..Default::default()
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> ArtResult<()> {
        check_unit_interval("map_vigilance", self.map_vigilance)?;
        check_unit_interval("baseline_vigilance", self.baseline_vigilance)?;
        check_half_open_unit("vigilance_increment", self.vigilance_increment)?;
        check_unit_interval("max_vigilance", self.max_vigilance)?;
        if self.max_vigilance < self.baseline_vigilance {
            return Err(ArtError::parameter(
                "max_vigilance",
                format!(
                    "must be >= baseline_vigilance ({}), got {}",
                    self.baseline_vigilance, self.max_vigilance
                ),
            ));
        }
        if self.max_search_attempts < 1 {
            return Err(ArtError::parameter("max_search_attempts", "must be >= 1"));
        }
        Ok(())
    }

    pub fn with_baseline_vigilance(self, baseline_vigilance: f64) -> ArtResult<Self> {
        let params = Self {
            baseline_vigilance,
            ..self
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_max_search_attempts(self, max_search_attempts: usize) -> ArtResult<Self> {
        let params = Self {
            max_search_attempts,
            ..self
        };
        params.validate()?;
        Ok(params)
    }
}

impl Default for ArtMapParams {
    fn default() -> Self {
        Self {
            map_vigilance: 0.9,
            baseline_vigilance: 0.5,
            vigilance_increment: 1e-4,
            max_vigilance: 1.0,
            max_search_attempts: 32,
            enable_match_tracking: true,
        }
    }
}

// ---------------------------------------------------------------------------
// FALCON / TD-FALCON
// ---------------------------------------------------------------------------

/// Parameters for the three-channel FALCON head.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FalconParams {
    pub vigilance: f64,
    pub learning_rate: f64,
    pub choice_alpha: f64,
    /// Channel contribution weights; must sum to 1.
    pub gamma_state: f64,
    pub gamma_action: f64,
    pub gamma_reward: f64,
    /// Exploration probability for ε-greedy action selection.
    pub exploration_rate: f64,
    /// Seed for the engine-owned random generator.
    pub seed: u64,
}

impl FalconParams {
    pub fn new(
        vigilance: f64,
        gamma_state: f64,
        gamma_action: f64,
        gamma_reward: f64,
    ) -> ArtResult<Self> {
        let params = Self {
            vigilance,
            gamma_state,
            gamma_action,
            gamma_reward,
            ..Default::default()
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> ArtResult<()> {
        check_unit_interval("vigilance", self.vigilance)?;
        check_half_open_unit("learning_rate", self.learning_rate)?;
        check_positive("choice_alpha", self.choice_alpha)?;
        check_unit_interval("gamma_state", self.gamma_state)?;
        check_unit_interval("gamma_action", self.gamma_action)?;
        check_unit_interval("gamma_reward", self.gamma_reward)?;
        check_unit_interval("exploration_rate", self.exploration_rate)?;
        let sum = self.gamma_state + self.gamma_action + self.gamma_reward;
        if (sum - 1.0).abs() > 1e-9 {
            return Err(ArtError::parameter(
                "gamma",
                format!("channel weights must sum to 1, got {sum}"),
            ));
        }
        Ok(())
    }

    pub fn with_exploration_rate(self, exploration_rate: f64) -> ArtResult<Self> {
        let params = Self {
            exploration_rate,
            ..self
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_seed(self, seed: u64) -> ArtResult<Self> {
        let params = Self { seed, ..self };
        params.validate()?;
        Ok(params)
    }
}

impl Default for FalconParams {
    fn default() -> Self {
        Self {
            vigilance: 0.8,
            learning_rate: 1.0,
            choice_alpha: 1e-3,
            gamma_state: 0.5,
            gamma_action: 0.3,
            gamma_reward: 0.2,
            exploration_rate: 0.1,
            seed: 0x5eed,
        }
    }
}

/// SARSA parameters layered on FALCON by TD-FALCON.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TdParams {
    /// TD step size α.
    pub alpha_td: f64,
    /// Discount γ on the successor estimate.
    pub gamma_td: f64,
    /// Eligibility-trace decay λ; 0 disables traces.
    pub lambda: f64,
    /// Traces below this magnitude are dropped.
    pub trace_threshold: f64,
}

impl TdParams {
    pub fn new(alpha_td: f64, gamma_td: f64, lambda: f64) -> ArtResult<Self> {
        let params = Self {
            alpha_td,
            gamma_td,
            lambda,
            ..Default::default()
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> ArtResult<()> {
        check_half_open_unit("alpha_td", self.alpha_td)?;
        check_unit_interval("gamma_td", self.gamma_td)?;
        check_unit_interval("lambda", self.lambda)?;
        check_positive("trace_threshold", self.trace_threshold)
    }

    pub fn with_lambda(self, lambda: f64) -> ArtResult<Self> {
        let params = Self { lambda, ..self };
        params.validate()?;
        Ok(params)
    }
}

impl Default for TdParams {
    fn default() -> Self {
        Self {
            alpha_td: 0.5,
            gamma_td: 0.9,
            lambda: 0.3,
            trace_threshold: 1e-6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1. Construction validation ---------------------------------------------

    #[test]
    fn test_fuzzy_params_validate_ranges() {
        assert!(FuzzyParams::new(0.5, 1.0, 0.01).is_ok());
        assert!(FuzzyParams::new(1.5, 1.0, 0.01).is_err());
        assert!(FuzzyParams::new(0.5, 0.0, 0.01).is_err());
        assert!(FuzzyParams::new(0.5, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_art1_requires_l_above_one() {
        assert!(Art1Params::new(0.9, 2.0).is_ok());
        assert!(Art1Params::new(0.9, 1.0).is_err());
    }

    #[test]
    fn test_dual_vigilance_ordering_enforced() {
        assert!(DualVigilanceParams::new(0.3, 0.8, 1.0).is_ok());
        assert!(DualVigilanceParams::new(0.8, 0.3, 1.0).is_err());
        assert!(DualVigilanceParams::new(0.5, 0.5, 1.0).is_err());
    }

    #[test]
    fn test_artstar_vigilance_must_sit_inside_band() {
        assert!(ArtStarParams::new(0.6, 0.3, 0.9).is_ok());
        assert!(ArtStarParams::new(0.2, 0.3, 0.9).is_err());
        assert!(ArtStarParams::new(0.6, 0.9, 0.3).is_err());
    }

    #[test]
    fn test_falcon_gammas_must_sum_to_one() {
        assert!(FalconParams::new(0.8, 0.5, 0.3, 0.2).is_ok());
        assert!(FalconParams::new(0.8, 0.5, 0.5, 0.2).is_err());
    }

    // 2. Derivations ---------------------------------------------------------

    #[test]
    fn test_with_derivation_replaces_one_field() {
        let base = FuzzyParams::default();
        let derived = base.with_vigilance(0.9).unwrap();
        assert_eq!(derived.vigilance, 0.9);
        assert_eq!(derived.learning_rate, base.learning_rate);
        assert_eq!(derived.choice_alpha, base.choice_alpha);
        // original untouched
        assert_eq!(base.vigilance, FuzzyParams::default().vigilance);
    }

    #[test]
    fn test_with_derivation_revalidates() {
        let base = FuzzyParams::default();
        assert!(base.with_vigilance(-0.1).is_err());

        let artmap = ArtMapParams::default();
        assert!(artmap.with_max_search_attempts(0).is_err());
    }

    #[test]
    fn test_defaults_are_valid() {
        FuzzyParams::default().validate().unwrap();
        Art1Params::default().validate().unwrap();
        Art2Params::default().validate().unwrap();
        GaussianParams::default().validate().unwrap();
        HypersphereParams::default().validate().unwrap();
        QuadraticParams::default().validate().unwrap();
        DualVigilanceParams::default().validate().unwrap();
        TopoParams::default().validate().unwrap();
        ArtStarParams::default().validate().unwrap();
        ArtMapParams::default().validate().unwrap();
        FalconParams::default().validate().unwrap();
        TdParams::default().validate().unwrap();
    }
}
