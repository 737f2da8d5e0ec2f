//! Two-module ARTMAP: module A clusters inputs, module B clusters targets,
//! and the map field associates A categories with B categories.

use crate::map_field::MapField;
use crate::supervisor::TrainOutcome;
use resonance_core::config::ExecutionConfig;
use resonance_core::params::ArtMapParams;
use resonance_core::{ArtError, ArtResult};
use resonance_engine::{ArtEngine, ArtRules, Proposal};
use resonance_kernels::SimdPolicy;
use tracing::{debug, warn};

/// Supervised pairing of two ART modules for dense (pattern) targets.
pub struct ArtMap<A: ArtRules, B: ArtRules> {
    module_a: ArtEngine<A>,
    module_b: ArtEngine<B>,
    map: MapField,
    params: ArtMapParams,
    trained: bool,
}

impl<A: ArtRules, B: ArtRules> ArtMap<A, B> {
    pub fn new(
        rules_a: A,
        rules_b: B,
        params: ArtMapParams,
        config: ExecutionConfig,
    ) -> ArtResult<Self> {
        params.validate()?;
        Ok(Self {
            module_a: ArtEngine::new(rules_a, config.clone())?,
            module_b: ArtEngine::new(rules_b, config)?,
            map: MapField::new(),
            params,
            trained: false,
        })
    }

    /// Whether `target` is an acceptable stand-in for the B category an A
    /// winner already maps to.
    fn map_field_accepts(&self, target: &[f64], mapped_b: usize) -> ArtResult<bool> {
        let weight = match self.module_b.category(mapped_b) {
            Some(snapshot) => snapshot.weight,
            None => return Ok(false),
        };
        let rules = self.module_b.rules();
        let prepared = rules.prepare(target)?;
        let policy = SimdPolicy::new(self.module_b.execution_config().enable_simd);
        Ok(rules.match_score(&prepared, &weight, policy) > self.params.map_vigilance)
    }

    /// Learn one (input, target) pattern pair.
    pub fn train_one(&mut self, input: &[f64], target: &[f64]) -> ArtResult<TrainOutcome> {
        self.module_a.bump_ages();

        // the target side resonates first, at module B's own vigilance
        let b_index = match self
            .module_b
            .learn(target)?
        {
            resonance_core::LearnOutcome::Resonance { index, .. } => index,
            resonance_core::LearnOutcome::NoMatch => {
                return Err(ArtError::Capacity(
                    "target module refused to commit the pattern".into(),
                ))
            }
        };

        let mut rho = self.params.baseline_vigilance;
        for attempt in 0..self.params.max_search_attempts {
            match self.module_a.propose(input, rho)? {
                Proposal::Existing {
                    index, match_score, ..
                }
                | Proposal::Boundary {
                    index, match_score, ..
                } => match self.map.label_of(index) {
                    Some(mapped) if mapped == b_index => {
                        self.module_a.commit_update(index, input)?;
                        self.trained = true;
                        return Ok(TrainOutcome::Committed { index });
                    }
                    Some(mapped) => {
                        if self.map_field_accepts(target, mapped)? {
                            // close enough on the B side: no conflict
                            self.module_a.commit_update(index, input)?;
                            self.trained = true;
                            return Ok(TrainOutcome::Committed { index });
                        }
                        if !self.params.enable_match_tracking {
                            warn!(category = index, "map-field conflict; sample dropped");
                            return Ok(TrainOutcome::Discarded);
                        }
                        rho = (match_score + self.params.vigilance_increment)
                            .min(self.params.max_vigilance);
                        self.module_a.tracker().record_vigilance_adjustment();
                        debug!(attempt, vigilance = rho, "match tracking restart");
                    }
                    None => {
                        self.module_a.commit_update(index, input)?;
                        self.map.install(index, b_index);
                        self.trained = true;
                        return Ok(TrainOutcome::Committed { index });
                    }
                },
                Proposal::Exhausted => {
                    let (index, _) = self.module_a.commit_new(input)?;
                    self.map.install(index, b_index);
                    self.trained = true;
                    return Ok(TrainOutcome::Committed { index });
                }
            }
        }

        warn!(
            attempts = self.params.max_search_attempts,
            "match tracking exhausted its search attempts; sample dropped"
        );
        Ok(TrainOutcome::Discarded)
    }

    pub fn fit(&mut self, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> ArtResult<Vec<TrainOutcome>> {
        self.clear()?;
        self.partial_fit(inputs, targets)
    }

    pub fn partial_fit(
        &mut self,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
    ) -> ArtResult<Vec<TrainOutcome>> {
        if inputs.is_empty() {
            return Err(ArtError::input_shape("fit requires at least one sample"));
        }
        if inputs.len() != targets.len() {
            return Err(ArtError::input_shape(format!(
                "inputs ({}) and targets ({}) differ in length",
                inputs.len(),
                targets.len()
            )));
        }
        inputs
            .iter()
            .zip(targets.iter())
            .map(|(input, target)| self.train_one(input, target))
            .collect()
    }

    /// Predicted B prototype for one input; `None` is the no-match refusal.
    pub fn predict_one(&self, input: &[f64]) -> ArtResult<Option<B::Weight>> {
        if !self.trained {
            return Err(ArtError::lifecycle(
                "predict requires a trained map field; call fit first",
            ));
        }
        match self.module_a.propose(input, self.params.baseline_vigilance)? {
            Proposal::Existing { index, .. } | Proposal::Boundary { index, .. } => {
                Ok(self
                    .map
                    .label_of(index)
                    .and_then(|b_index| self.module_b.category(b_index))
                    .map(|snapshot| snapshot.weight))
            }
            Proposal::Exhausted => Ok(None),
        }
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    pub fn category_count_a(&self) -> usize {
        self.module_a.category_count()
    }

    pub fn category_count_b(&self) -> usize {
        self.module_b.category_count()
    }

    pub fn clear(&mut self) -> ArtResult<()> {
        self.module_a.clear()?;
        self.module_b.clear()?;
        self.map.clear();
        self.trained = false;
        Ok(())
    }

    pub fn close(&mut self) {
        self.module_a.close();
        self.module_b.close();
    }
}
