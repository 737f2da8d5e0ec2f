//! Fusion rules: three complement-coded channels scored through one
//! resonance search.

use resonance_core::params::FalconParams;
use resonance_core::{ArtError, ArtResult};
use resonance_engine::scan::input_fingerprint;
use resonance_engine::ArtRules;
use resonance_kernels::{complement_code, fuzzy_min_sum, l1_norm, SimdPolicy};

/// One fused category: complement-coded state, action, and reward channels.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedWeight {
    state: Vec<f64>,
    action: Vec<f64>,
    reward: Vec<f64>,
}

impl FusedWeight {
    pub fn state(&self) -> &[f64] {
        &self.state
    }

    pub fn action(&self) -> &[f64] {
        &self.action
    }

    pub fn reward(&self) -> &[f64] {
        &self.reward
    }

    /// Center of the complement-coded reward interval [w₀, 1 − w₁].
    pub fn reward_center(&self) -> f64 {
        ((self.reward[0] + 1.0 - self.reward[1]) / 2.0).clamp(0.0, 1.0)
    }

    /// Same state/action knowledge with the reward collapsed onto `center`.
    pub fn with_reward_center(&self, center: f64) -> Self {
        let center = center.clamp(0.0, 1.0);
        Self {
            state: self.state.clone(),
            action: self.action.clone(),
            reward: vec![center, 1.0 - center],
        }
    }
}

/// A validated, channel-coded input. Queries that only know the state and
/// action leave the reward side empty.
#[derive(Debug, Clone)]
pub struct FusedInput {
    pub(crate) state: Vec<f64>,
    pub(crate) action: Vec<f64>,
    pub(crate) reward: Option<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub struct FalconRules {
    params: FalconParams,
    state_dim: usize,
    action_dim: usize,
}

impl FalconRules {
    pub fn new(state_dim: usize, action_dim: usize, params: FalconParams) -> ArtResult<Self> {
        params.validate()?;
        if state_dim < 1 || action_dim < 1 {
            return Err(ArtError::parameter(
                "dimensions",
                "state and action dimensions must be >= 1",
            ));
        }
        Ok(Self {
            params,
            state_dim,
            action_dim,
        })
    }

    fn check_unit(channel: &str, values: &[f64]) -> ArtResult<()> {
        for (i, &v) in values.iter().enumerate() {
            if !(0.0..=1.0).contains(&v) || v.is_nan() {
                return Err(ArtError::input_shape(format!(
                    "{channel} component {i} = {v} is outside [0, 1]"
                )));
            }
        }
        Ok(())
    }

    /// Encode a state/action query with an unknown reward.
    pub fn prepare_state_action(&self, state: &[f64], action: &[f64]) -> ArtResult<FusedInput> {
        if state.len() != self.state_dim || action.len() != self.action_dim {
            return Err(ArtError::input_shape(format!(
                "expected state {} / action {}, got {} / {}",
                self.state_dim,
                self.action_dim,
                state.len(),
                action.len()
            )));
        }
        Self::check_unit("state", state)?;
        Self::check_unit("action", action)?;
        Ok(FusedInput {
            state: complement_code(state),
            action: complement_code(action),
            reward: None,
        })
    }

    fn channel_activation(&self, input: &[f64], weight: &[f64], policy: SimdPolicy) -> f64 {
        fuzzy_min_sum(input, weight, policy) / (self.params.choice_alpha + l1_norm(weight, policy))
    }

    fn channel_match(input: &[f64], weight: &[f64], raw_dim: usize, policy: SimdPolicy) -> f64 {
        fuzzy_min_sum(input, weight, policy) / raw_dim as f64
    }

    /// Activation over the state and action channels only, with the channel
    /// weights renormalized so the score stays comparable.
    pub fn partial_activation(
        &self,
        prepared: &FusedInput,
        weight: &FusedWeight,
        policy: SimdPolicy,
    ) -> f64 {
        let gamma_total = self.params.gamma_state + self.params.gamma_action;
        (self.params.gamma_state * self.channel_activation(&prepared.state, &weight.state, policy)
            + self.params.gamma_action
                * self.channel_activation(&prepared.action, &weight.action, policy))
            / gamma_total
    }

    /// Match over the state and action channels only (the reward side is a
    /// don't-care for value queries).
    pub fn partial_match(
        &self,
        prepared: &FusedInput,
        weight: &FusedWeight,
        policy: SimdPolicy,
    ) -> f64 {
        Self::channel_match(&prepared.state, &weight.state, self.state_dim, policy).min(
            Self::channel_match(&prepared.action, &weight.action, self.action_dim, policy),
        )
    }
}

impl ArtRules for FalconRules {
    type Weight = FusedWeight;
    type Prepared = FusedInput;

    fn input_dimensions(&self) -> usize {
        self.state_dim + self.action_dim + 1
    }

    fn baseline_vigilance(&self) -> f64 {
        self.params.vigilance
    }

    fn prepare(&self, input: &[f64]) -> ArtResult<FusedInput> {
        let expected = self.state_dim + self.action_dim + 1;
        if input.len() != expected {
            return Err(ArtError::input_shape(format!(
                "expected fused dimension {expected}, got {}",
                input.len()
            )));
        }
        let (state, rest) = input.split_at(self.state_dim);
        let (action, reward) = rest.split_at(self.action_dim);
        Self::check_unit("state", state)?;
        Self::check_unit("action", action)?;
        Self::check_unit("reward", reward)?;
        Ok(FusedInput {
            state: complement_code(state),
            action: complement_code(action),
            reward: Some(complement_code(reward)),
        })
    }

    fn fingerprint(&self, prepared: &FusedInput) -> u64 {
        let mut all = prepared.state.clone();
        all.extend_from_slice(&prepared.action);
        if let Some(reward) = &prepared.reward {
            all.extend_from_slice(reward);
        }
        input_fingerprint(&all)
    }

    fn activation(&self, prepared: &FusedInput, weight: &FusedWeight, policy: SimdPolicy) -> f64 {
        let mut score = self.params.gamma_state
            * self.channel_activation(&prepared.state, &weight.state, policy)
            + self.params.gamma_action
                * self.channel_activation(&prepared.action, &weight.action, policy);
        if let Some(reward) = &prepared.reward {
            score +=
                self.params.gamma_reward * self.channel_activation(reward, &weight.reward, policy);
        }
        score
    }

    fn match_score(&self, prepared: &FusedInput, weight: &FusedWeight, policy: SimdPolicy) -> f64 {
        let mut lowest =
            Self::channel_match(&prepared.state, &weight.state, self.state_dim, policy).min(
                Self::channel_match(&prepared.action, &weight.action, self.action_dim, policy),
            );
        if let Some(reward) = &prepared.reward {
            lowest = lowest.min(Self::channel_match(reward, &weight.reward, 1, policy));
        }
        lowest
    }

    fn update(&self, prepared: &FusedInput, weight: &FusedWeight, _policy: SimdPolicy) -> FusedWeight {
        let beta = self.params.learning_rate;
        let blend = |input: &[f64], current: &[f64]| -> Vec<f64> {
            input
                .iter()
                .zip(current.iter())
                .map(|(i, w)| beta * i.min(*w) + (1.0 - beta) * w)
                .collect()
        };
        FusedWeight {
            state: blend(&prepared.state, &weight.state),
            action: blend(&prepared.action, &weight.action),
            reward: match &prepared.reward {
                Some(reward) => blend(reward, &weight.reward),
                None => weight.reward.clone(),
            },
        }
    }

    fn create(&self, prepared: &FusedInput) -> FusedWeight {
        FusedWeight {
            state: prepared.state.clone(),
            action: prepared.action.clone(),
            reward: prepared
                .reward
                .clone()
                .unwrap_or_else(|| vec![0.5, 0.5]),
        }
    }
}
