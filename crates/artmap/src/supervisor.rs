//! SimpleARTMAP: one ART module classifying into discrete labels through a
//! map field, with match-tracking conflict resolution.

use crate::map_field::MapField;
use resonance_core::config::ExecutionConfig;
use resonance_core::params::ArtMapParams;
use resonance_core::stats::PerformanceStats;
use resonance_core::{ArtError, ArtResult};
use resonance_engine::{ArtEngine, ArtRules, Proposal};
use tracing::{debug, info, warn};

/// How one training sample ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainOutcome {
    /// The sample was absorbed by category `index`.
    Committed { index: usize },
    /// Match tracking ran out of search attempts; the sample was dropped
    /// without touching the store or the map field.
    Discarded,
}

/// Supervised classifier pairing an ART module with a label map field.
pub struct SimpleArtMap<R: ArtRules> {
    module_a: ArtEngine<R>,
    map: MapField,
    params: ArtMapParams,
    trained: bool,
}

impl<R: ArtRules> SimpleArtMap<R> {
    pub fn new(rules: R, params: ArtMapParams, config: ExecutionConfig) -> ArtResult<Self> {
        params.validate()?;
        let module_a = ArtEngine::new(rules, config)?;
        info!(
            engine = %module_a.id(),
            baseline = params.baseline_vigilance,
            increment = params.vigilance_increment,
            "ARTMAP supervisor initialized"
        );
        Ok(Self {
            module_a,
            map: MapField::new(),
            params,
            trained: false,
        })
    }

    /// Learn one (input, label) pair. Conflicting labels raise module A's
    /// vigilance just above the offending match and restart the search.
    pub fn train_one(&mut self, input: &[f64], label: usize) -> ArtResult<TrainOutcome> {
        self.module_a.bump_ages();
        let mut rho = self.params.baseline_vigilance;

        for attempt in 0..self.params.max_search_attempts {
            match self.module_a.propose(input, rho)? {
                Proposal::Existing {
                    index, match_score, ..
                }
                | Proposal::Boundary {
                    index, match_score, ..
                } => match self.map.label_of(index) {
                    Some(existing) if existing == label => {
                        self.module_a.commit_update(index, input)?;
                        self.trained = true;
                        return Ok(TrainOutcome::Committed { index });
                    }
                    Some(existing) => {
                        if !self.params.enable_match_tracking {
                            warn!(
                                category = index,
                                expected = label,
                                found = existing,
                                "label conflict with match tracking disabled; sample dropped"
                            );
                            return Ok(TrainOutcome::Discarded);
                        }
                        rho = (match_score + self.params.vigilance_increment)
                            .min(self.params.max_vigilance);
                        self.module_a.tracker().record_vigilance_adjustment();
                        debug!(
                            attempt,
                            category = index,
                            vigilance = rho,
                            "match tracking raised vigilance"
                        );
                    }
                    None => {
                        self.module_a.commit_update(index, input)?;
                        self.map.install(index, label);
                        self.trained = true;
                        return Ok(TrainOutcome::Committed { index });
                    }
                },
                Proposal::Exhausted => {
                    let (index, _) = self.module_a.commit_new(input)?;
                    self.map.install(index, label);
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

    /// Train from scratch: clears previous state first.
    pub fn fit(&mut self, inputs: &[Vec<f64>], labels: &[usize]) -> ArtResult<Vec<TrainOutcome>> {
        self.clear()?;
        self.partial_fit(inputs, labels)
    }

    /// Incremental training over an already-fitted supervisor.
    pub fn partial_fit(
        &mut self,
        inputs: &[Vec<f64>],
        labels: &[usize],
    ) -> ArtResult<Vec<TrainOutcome>> {
        if inputs.is_empty() {
            return Err(ArtError::input_shape("fit requires at least one sample"));
        }
        if inputs.len() != labels.len() {
            return Err(ArtError::input_shape(format!(
                "inputs ({}) and labels ({}) differ in length",
                inputs.len(),
                labels.len()
            )));
        }
        inputs
            .iter()
            .zip(labels.iter())
            .map(|(input, &label)| self.train_one(input, label))
            .collect()
    }

    /// Predicted label for one input; `None` is the no-match refusal.
    pub fn predict_one(&self, input: &[f64]) -> ArtResult<Option<usize>> {
        if !self.trained {
            return Err(ArtError::lifecycle(
                "predict requires a trained map field; call fit first",
            ));
        }
        match self.module_a.propose(input, self.params.baseline_vigilance)? {
            Proposal::Existing { index, .. } | Proposal::Boundary { index, .. } => {
                Ok(self.map.label_of(index))
            }
            Proposal::Exhausted => Ok(None),
        }
    }

    pub fn predict(&self, inputs: &[Vec<f64>]) -> ArtResult<Vec<Option<usize>>> {
        inputs.iter().map(|input| self.predict_one(input)).collect()
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    pub fn category_count(&self) -> usize {
        self.module_a.category_count()
    }

    pub fn map_field(&self) -> &MapField {
        &self.map
    }

    pub fn params(&self) -> &ArtMapParams {
        &self.params
    }

    pub fn performance_stats(&self) -> PerformanceStats {
        self.module_a.performance_stats()
    }

    pub fn clear(&mut self) -> ArtResult<()> {
        self.module_a.clear()?;
        self.map.clear();
        self.trained = false;
        Ok(())
    }

    pub fn close(&mut self) {
        self.module_a.close();
    }

    pub fn is_closed(&self) -> bool {
        self.module_a.is_closed()
    }
}
