//! FALCON — a three-channel fusion ART for reinforcement learning.
//!
//! State, action, and reward enter as one fused pattern; each channel is
//! complement-coded separately and contributes to the activation through
//! its channel weight γ. Action selection is ε-greedy over the action
//! space with a seeded generator, so runs are reproducible.

use crate::rules::{FalconRules, FusedInput, FusedWeight};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use resonance_core::config::ExecutionConfig;
use resonance_core::outcome::LearnOutcome;
use resonance_core::params::FalconParams;
use resonance_core::stats::PerformanceStats;
use resonance_core::{ArtError, ArtResult};
use resonance_engine::ArtEngine;
use resonance_kernels::SimdPolicy;
use tracing::debug;

/// How an action scored against the learned categories.
#[derive(Debug, Clone, Copy)]
struct ActionScore {
    /// True when some category resonates on the state and action channels.
    known: bool,
    q: f64,
}

pub struct FalconEngine {
    engine: ArtEngine<FalconRules>,
    params: FalconParams,
    state_dim: usize,
    action_dim: usize,
    policy: SimdPolicy,
    rng: StdRng,
}

impl FalconEngine {
    pub fn new(
        state_dim: usize,
        action_dim: usize,
        params: FalconParams,
        config: ExecutionConfig,
    ) -> ArtResult<Self> {
        params.validate()?;
        let policy = SimdPolicy::new(config.enable_simd);
        let rules = FalconRules::new(state_dim, action_dim, params)?;
        Ok(Self {
            engine: ArtEngine::new(rules, config)?,
            params,
            state_dim,
            action_dim,
            policy,
            rng: StdRng::seed_from_u64(params.seed),
        })
    }

    fn fused(&self, state: &[f64], action: &[f64], reward: f64) -> ArtResult<Vec<f64>> {
        if state.len() != self.state_dim {
            return Err(ArtError::input_shape(format!(
                "state dimension {} != {}",
                state.len(),
                self.state_dim
            )));
        }
        if action.len() != self.action_dim {
            return Err(ArtError::input_shape(format!(
                "action dimension {} != {}",
                action.len(),
                self.action_dim
            )));
        }
        let mut fused = Vec::with_capacity(self.state_dim + self.action_dim + 1);
        fused.extend_from_slice(state);
        fused.extend_from_slice(action);
        fused.push(reward);
        Ok(fused)
    }

    /// Absorb one (state, action, reward) experience.
    pub fn learn(
        &mut self,
        state: &[f64],
        action: &[f64],
        reward: f64,
    ) -> ArtResult<LearnOutcome<FusedWeight>> {
        let fused = self.fused(state, action, reward)?;
        self.engine.learn(&fused)
    }

    fn score_action(&self, state: &[f64], action: &[f64]) -> ArtResult<ActionScore> {
        let rules = self.engine.rules();
        let prepared: FusedInput = rules.prepare_state_action(state, action)?;
        let policy = self.policy;
        let vigilance = self.params.vigilance;

        Ok(self.engine.read_categories(|view| {
            let mut best: Option<(f64, &FusedWeight, bool)> = None;
            for category in view {
                let activation = rules.partial_activation(&prepared, &category.weight, policy);
                let resonant = rules.partial_match(&prepared, &category.weight, policy) > vigilance;
                let better = match best {
                    Some((current, _, current_resonant)) => {
                        (resonant, activation) > (current_resonant, current)
                    }
                    None => true,
                };
                if better {
                    best = Some((activation, &category.weight, resonant));
                }
            }
            match best {
                Some((_, weight, resonant)) => ActionScore {
                    known: resonant,
                    q: weight.reward_center(),
                },
                None => ActionScore {
                    known: false,
                    q: 0.0,
                },
            }
        }))
    }

    /// Estimated return for taking `action` in `state`, bounded to [0, 1].
    pub fn predict_q(&self, state: &[f64], action: &[f64]) -> ArtResult<f64> {
        Ok(self.score_action(state, action)?.q.clamp(0.0, 1.0))
    }

    /// ε-greedy selection over the action space. Exploitation prefers
    /// actions backed by a resonating category, highest Q̂ first, ties to
    /// the lowest index.
    pub fn select_action(&mut self, state: &[f64], action_space: &[Vec<f64>]) -> ArtResult<usize> {
        if action_space.is_empty() {
            return Err(ArtError::NullContract(
                "action space must not be empty".into(),
            ));
        }

        if self.rng.gen::<f64>() < self.params.exploration_rate {
            let choice = self.rng.gen_range(0..action_space.len());
            debug!(action = choice, "exploring");
            return Ok(choice);
        }

        let scores: Vec<ArtResult<ActionScore>> = if action_space.len() >= 8 {
            action_space
                .par_iter()
                .map(|action| self.score_action(state, action))
                .collect()
        } else {
            action_space
                .iter()
                .map(|action| self.score_action(state, action))
                .collect()
        };

        let mut best_index = 0usize;
        let mut best: Option<(bool, f64)> = None;
        for (index, score) in scores.into_iter().enumerate() {
            let score = score?;
            let key = (score.known, score.q);
            let better = match best {
                Some(current) => key > current,
                None => true,
            };
            if better {
                best = Some(key);
                best_index = index;
            }
        }
        Ok(best_index)
    }

    pub fn category_count(&self) -> usize {
        self.engine.category_count()
    }

    pub fn params(&self) -> &FalconParams {
        &self.params
    }

    pub fn performance_stats(&self) -> PerformanceStats {
        self.engine.performance_stats()
    }

    /// Pull one category's reward estimate toward `target` by `rate`,
    /// outside a resonance cycle. Used by the temporal-difference layer to
    /// propagate credit along eligibility traces.
    pub fn reinforce(&mut self, category: usize, target: f64, rate: f64) -> ArtResult<()> {
        let snapshot = self
            .engine
            .category(category)
            .ok_or_else(|| ArtError::input_shape(format!("category {category} out of range")))?;
        let adjusted = snapshot
            .weight
            .with_reward_center(snapshot.weight.reward_center() + rate * (target - snapshot.weight.reward_center()));
        self.engine.install_weight(category, adjusted)
    }

    pub fn clear(&mut self) -> ArtResult<()> {
        self.engine.clear()
    }

    pub fn close(&mut self) {
        self.engine.close();
    }

    pub fn is_closed(&self) -> bool {
        self.engine.is_closed()
    }
}
