//! TD-FALCON: SARSA targets and TD(λ) eligibility traces on top of the
//! fusion head.

use crate::falcon::FalconEngine;
use dashmap::DashMap;
use resonance_core::config::ExecutionConfig;
use resonance_core::params::{FalconParams, TdParams};
use resonance_core::{ArtError, ArtResult};
use tracing::debug;

pub struct TdFalcon {
    falcon: FalconEngine,
    td: TdParams,
    /// Eligibility per (category, action-index) pair, in [0, 1].
    traces: DashMap<(usize, usize), f64>,
}

impl TdFalcon {
    pub fn new(
        state_dim: usize,
        action_dim: usize,
        falcon: FalconParams,
        td: TdParams,
        config: ExecutionConfig,
    ) -> ArtResult<Self> {
        td.validate()?;
        Ok(Self {
            falcon: FalconEngine::new(state_dim, action_dim, falcon, config)?,
            td,
            traces: DashMap::new(),
        })
    }

    /// One SARSA step: the agent took `action_index` in `state`, observed
    /// `reward`, and will take `next_action_index` in `next_state`.
    /// Returns the category that absorbed the experience.
    pub fn sarsa_step(
        &mut self,
        state: &[f64],
        action_index: usize,
        reward: f64,
        next_state: &[f64],
        next_action_index: usize,
        action_space: &[Vec<f64>],
    ) -> ArtResult<usize> {
        if action_space.is_empty() {
            return Err(ArtError::NullContract(
                "action space must not be empty".into(),
            ));
        }
        if action_index >= action_space.len() || next_action_index >= action_space.len() {
            return Err(ArtError::input_shape(format!(
                "action index out of range for action space of {}",
                action_space.len()
            )));
        }

        // bootstrap from the successor pair
        let q_next = self
            .falcon
            .predict_q(next_state, &action_space[next_action_index])?;
        let target = (reward + self.td.gamma_td * q_next).clamp(0.0, 1.0);

        let outcome = self
            .falcon
            .learn(state, &action_space[action_index], target)?;
        let category = match outcome.index() {
            Some(index) => index,
            None => {
                return Err(ArtError::Capacity(
                    "fusion module refused to commit the experience".into(),
                ))
            }
        };

        self.traces.insert((category, action_index), 1.0);

        // propagate the target along every other active trace
        let step = self.td.alpha_td;
        let active: Vec<((usize, usize), f64)> = self
            .traces
            .iter()
            .filter(|entry| *entry.key() != (category, action_index))
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        for ((traced_category, _), trace) in active {
            if traced_category < self.falcon.category_count() {
                self.falcon
                    .reinforce(traced_category, target, step * trace)?;
            }
        }

        // decay and drop spent traces
        let decay = self.td.gamma_td * self.td.lambda;
        self.traces.alter_all(|_, value| value * decay);
        let threshold = self.td.trace_threshold;
        self.traces.retain(|_, value| *value >= threshold);

        debug!(
            category,
            target,
            traces = self.traces.len(),
            "SARSA step absorbed"
        );
        Ok(category)
    }

    /// ε-greedy action selection, delegated to the fusion head.
    pub fn select_action(&mut self, state: &[f64], action_space: &[Vec<f64>]) -> ArtResult<usize> {
        self.falcon.select_action(state, action_space)
    }

    pub fn predict_q(&self, state: &[f64], action: &[f64]) -> ArtResult<f64> {
        self.falcon.predict_q(state, action)
    }

    /// Active (category, action) traces, sorted for stable inspection.
    pub fn active_traces(&self) -> Vec<((usize, usize), f64)> {
        let mut traces: Vec<_> = self
            .traces
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        traces.sort_by_key(|(key, _)| *key);
        traces
    }

    pub fn category_count(&self) -> usize {
        self.falcon.category_count()
    }

    pub fn td_params(&self) -> &TdParams {
        &self.td
    }

    pub fn clear(&mut self) -> ArtResult<()> {
        self.falcon.clear()?;
        self.traces.clear();
        Ok(())
    }

    pub fn close(&mut self) {
        self.falcon.close();
    }
}
