//! TopoART — two coupled fuzzy components with an emergent topology graph.
//!
//! Component A learns every sample at full speed. Component B only learns a
//! sample once its A-side winner has collected φ wins inside the current
//! permanence window (a tumbling window of τ cycles), so B holds the
//! noise-filtered structure. Edges connect successive A winners.

use crate::rules::ArtRules;
use crate::variants::fuzzy::{fuzzy_art, FuzzyArt};
use resonance_core::config::ExecutionConfig;
use resonance_core::outcome::{LearnOutcome, PredictOutcome};
use resonance_core::params::{FuzzyParams, TopoParams};
use resonance_core::stats::PerformanceStats;
use resonance_core::ArtResult;
use resonance_kernels::SimdPolicy;
use std::collections::HashSet;
use tracing::debug;

pub struct TopoArt {
    params: TopoParams,
    a: FuzzyArt,
    b: FuzzyArt,
    /// Wins per A category inside the current permanence window.
    win_counts: Vec<u64>,
    cycles: u64,
    prev_winner: Option<usize>,
    edges: HashSet<(usize, usize)>,
}

impl TopoArt {
    pub fn new(input_dim: usize, params: TopoParams, config: ExecutionConfig) -> ArtResult<Self> {
        params.validate()?;
        let fuzzy_a = FuzzyParams {
            vigilance: params.vigilance_a,
            learning_rate: params.learning_rate,
            choice_alpha: params.choice_alpha,
        };
        let fuzzy_b = FuzzyParams {
            vigilance: params.vigilance_b,
            ..fuzzy_a
        };
        Ok(Self {
            params,
            a: fuzzy_art(input_dim, fuzzy_a, config.clone())?,
            b: fuzzy_art(input_dim, fuzzy_b, config)?,
            win_counts: Vec::new(),
            cycles: 0,
            prev_winner: None,
            edges: HashSet::new(),
        })
    }

    /// One learning cycle across both components.
    pub fn learn(&mut self, input: &[f64]) -> ArtResult<LearnOutcome<()>> {
        self.cycles += 1;
        if self.cycles % self.params.tau as u64 == 0 {
            // tumbling permanence window
            self.win_counts.iter_mut().for_each(|c| *c = 0);
        }

        let (winner, activation, created) = match self.a.learn(input)? {
            LearnOutcome::Resonance {
                index,
                activation,
                created,
                ..
            } => (index, activation, created),
            LearnOutcome::NoMatch => return Ok(LearnOutcome::NoMatch),
        };

        if self.win_counts.len() < self.a.category_count() {
            self.win_counts.resize(self.a.category_count(), 0);
        }
        self.win_counts[winner] += 1;

        self.nudge_second_best(input, winner)?;

        // permanence gate for the slow component
        if self.win_counts[winner] >= self.params.phi as u64 {
            self.b.learn(input)?;
        }

        if let Some(prev) = self.prev_winner {
            if prev != winner {
                let edge = (prev.min(winner), prev.max(winner));
                if self.edges.insert(edge) {
                    self.a.tracker().record_topology_adjustment();
                    debug!(from = edge.0, to = edge.1, "topology edge added");
                }
            }
        }
        self.prev_winner = Some(winner);

        Ok(LearnOutcome::Resonance {
            index: winner,
            activation,
            created,
            weight: (),
        })
    }

    /// Blend the runner-up toward the input at the slower second-best rate.
    fn nudge_second_best(&mut self, input: &[f64], winner: usize) -> ArtResult<()> {
        let rules = self.a.rules().clone();
        let prepared = rules.prepare(input)?;
        let policy = SimdPolicy::new(self.a.execution_config().enable_simd);

        let runner_up = self.a.read_categories(|view| {
            let mut best: Option<(usize, f64)> = None;
            for (index, category) in view.iter().enumerate() {
                if index == winner {
                    continue;
                }
                let match_score = rules.match_score(&prepared, &category.weight, policy);
                if match_score < self.params.vigilance_a {
                    continue;
                }
                let activation = rules.activation(&prepared, &category.weight, policy);
                let better = match best {
                    Some((_, current)) => activation > current,
                    None => true,
                };
                if better {
                    best = Some((index, activation));
                }
            }
            best.map(|(index, _)| (index, view[index].weight.clone()))
        });

        if let Some((index, weight)) = runner_up {
            let nudged =
                rules.update_with_rate(&prepared, &weight, self.params.beta_second, policy);
            self.a.install_weight(index, nudged)?;
        }
        Ok(())
    }

    /// Classify against the fast component.
    pub fn predict(&self, input: &[f64]) -> ArtResult<PredictOutcome> {
        self.a.predict(input)
    }

    /// Classify against the noise-filtered component.
    pub fn predict_filtered(&self, input: &[f64]) -> ArtResult<PredictOutcome> {
        self.b.predict(input)
    }

    pub fn category_count(&self) -> usize {
        self.a.category_count()
    }

    pub fn filtered_category_count(&self) -> usize {
        self.b.category_count()
    }

    /// Committed topology edges between A categories, sorted for stable
    /// iteration.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<_> = self.edges.iter().copied().collect();
        edges.sort_unstable();
        edges
    }

    pub fn params(&self) -> &TopoParams {
        &self.params
    }

    pub fn performance_stats(&self) -> PerformanceStats {
        self.a.performance_stats()
    }

    pub fn clear(&mut self) -> ArtResult<()> {
        self.a.clear()?;
        self.b.clear()?;
        self.win_counts.clear();
        self.edges.clear();
        self.prev_winner = None;
        self.cycles = 0;
        Ok(())
    }

    pub fn close(&mut self) {
        self.a.close();
        self.b.close();
    }
}
