//! The unsupervised ART engine: one rules instance, one category store, one
//! scan executor, one counter block.
//!
//! Operations serialize per engine instance; the internal locks exist so a
//! single operation can fan its scan across pool workers, not to support
//! concurrent callers.

use crate::machine::{self, Proposal};
use crate::rules::ArtRules;
use crate::scan::{ScanCache, ScanExecutor};
use crate::store::{Category, CategorySnapshot, CategoryStore};
use parking_lot::Mutex;
use resonance_core::config::ExecutionConfig;
use resonance_core::outcome::{LearnOutcome, PredictOutcome};
use resonance_core::stats::{PerformanceStats, PerformanceTracker};
use resonance_core::{ArtError, ArtResult};
use resonance_kernels::SimdPolicy;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

pub struct ArtEngine<R: ArtRules> {
    id: Uuid,
    rules: R,
    store: CategoryStore<R::Weight>,
    scan: ScanExecutor,
    cache: Mutex<ScanCache>,
    tracker: Arc<PerformanceTracker>,
    config: ExecutionConfig,
    policy: SimdPolicy,
    closed: bool,
}

impl<R: ArtRules> ArtEngine<R> {
    /// Build an engine: validates the execution config and acquires the
    /// worker pool up front.
    pub fn new(rules: R, config: ExecutionConfig) -> ArtResult<Self> {
        config.validate()?;
        let scan = ScanExecutor::new(&config)?;
        let policy = SimdPolicy::new(config.enable_simd);
        let id = Uuid::new_v4();

        info!(
            engine = %id,
            input_dimensions = rules.input_dimensions(),
            parallelism = config.parallelism_level,
            simd = policy.vectorized(),
            "ART engine initialized"
        );

        Ok(Self {
            id,
            rules,
            store: CategoryStore::new(),
            scan,
            cache: Mutex::new(ScanCache::new(
                config.max_cache_size,
                config.memory_optimization_threshold,
            )),
            tracker: Arc::new(PerformanceTracker::new()),
            config,
            policy,
            closed: false,
        })
    }

    /// Build with the default execution configuration.
    pub fn with_defaults(rules: R) -> ArtResult<Self> {
        Self::new(rules, ExecutionConfig::default())
    }

    fn ensure_open(&self) -> ArtResult<()> {
        if self.closed {
            return Err(ArtError::lifecycle("engine has been closed"));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Core operations
    // -----------------------------------------------------------------------

    /// One learning cycle: resonate with an existing category and adapt it,
    /// or commit the input as a new category.
    pub fn learn(&mut self, input: &[f64]) -> ArtResult<LearnOutcome<R::Weight>> {
        self.ensure_open()?;
        let started = Instant::now();
        let prepared = self.rules.prepare(input)?;
        self.store.bump_ages();

        let proposal = self.propose_prepared(&prepared, self.rules.baseline_vigilance())?;
        let outcome = match proposal {
            Proposal::Existing {
                index, activation, ..
            } => {
                let weight = self.commit_update_prepared(index, &prepared);
                LearnOutcome::Resonance {
                    index,
                    activation,
                    created: false,
                    weight,
                }
            }
            Proposal::Boundary { .. } | Proposal::Exhausted => {
                let (index, weight, activation) = self.commit_new_prepared(&prepared)?;
                LearnOutcome::Resonance {
                    index,
                    activation,
                    created: true,
                    weight,
                }
            }
        };

        self.tracker
            .record_operation(started.elapsed().as_micros() as u64);
        Ok(outcome)
    }

    /// Classification without adaptation. Refusal is the `NoMatch` outcome,
    /// never an error.
    pub fn predict(&self, input: &[f64]) -> ArtResult<PredictOutcome> {
        self.ensure_open()?;
        let started = Instant::now();
        let prepared = self.rules.prepare(input)?;

        let proposal = self.propose_prepared(&prepared, self.rules.baseline_vigilance())?;
        let outcome = match proposal {
            Proposal::Existing {
                index, activation, ..
            }
            | Proposal::Boundary {
                index, activation, ..
            } => PredictOutcome::Resonance { index, activation },
            Proposal::Exhausted => PredictOutcome::NoMatch,
        };

        self.tracker
            .record_operation(started.elapsed().as_micros() as u64);
        Ok(outcome)
    }

    /// Learn a whole batch in order. An empty batch is an input error.
    pub fn fit(&mut self, inputs: &[Vec<f64>]) -> ArtResult<Vec<LearnOutcome<R::Weight>>> {
        if inputs.is_empty() {
            return Err(ArtError::input_shape("fit requires at least one input"));
        }
        inputs.iter().map(|input| self.learn(input)).collect()
    }

    /// Predict a whole batch in order.
    pub fn predict_batch(&self, inputs: &[Vec<f64>]) -> ArtResult<Vec<PredictOutcome>> {
        inputs.iter().map(|input| self.predict(input)).collect()
    }

    // -----------------------------------------------------------------------
    // Supervisor building blocks (ARTMAP, TopoART, reinforcement heads)
    // -----------------------------------------------------------------------

    /// Run the search at an explicit effective vigilance without committing
    /// anything. Match tracking restarts simply call this again with a
    /// raised value.
    pub fn propose(&self, input: &[f64], rho_effective: f64) -> ArtResult<Proposal> {
        self.ensure_open()?;
        let prepared = self.rules.prepare(input)?;
        self.propose_prepared(&prepared, rho_effective)
    }

    /// Commit an input into an existing category. Pairs with [`Self::propose`].
    pub fn commit_update(&mut self, index: usize, input: &[f64]) -> ArtResult<R::Weight> {
        self.ensure_open()?;
        if index >= self.store.len() {
            return Err(ArtError::input_shape(format!(
                "category index {index} out of range"
            )));
        }
        let prepared = self.rules.prepare(input)?;
        Ok(self.commit_update_prepared(index, &prepared))
    }

    /// Commit an input as a fresh category. Pairs with [`Self::propose`].
    pub fn commit_new(&mut self, input: &[f64]) -> ArtResult<(usize, R::Weight)> {
        self.ensure_open()?;
        let prepared = self.rules.prepare(input)?;
        let (index, weight, _) = self.commit_new_prepared(&prepared)?;
        Ok((index, weight))
    }

    /// Age every category by one cycle. Engines bump ages inside `learn`;
    /// supervisors driving propose/commit directly bump once per sample.
    pub fn bump_ages(&self) {
        self.store.bump_ages();
    }

    /// Replace a category weight outside a resonance cycle (reinforcement
    /// adjustments). Usage counts are untouched.
    pub fn install_weight(&mut self, index: usize, weight: R::Weight) -> ArtResult<()> {
        self.ensure_open()?;
        if index >= self.store.len() {
            return Err(ArtError::input_shape(format!(
                "category index {index} out of range"
            )));
        }
        self.store.replace_weight(index, weight);
        self.cache.lock().invalidate(index);
        Ok(())
    }

    /// Run `f` against the scan-scoped read view of all categories.
    pub fn read_categories<T>(&self, f: impl FnOnce(&[Category<R::Weight>]) -> T) -> T {
        self.store.with_view(f)
    }

    fn propose_prepared(&self, prepared: &R::Prepared, rho_effective: f64) -> ArtResult<Proposal> {
        let mut cache = self.cache.lock();
        self.store.with_view(|view| {
            machine::propose(
                &self.rules,
                view,
                prepared,
                rho_effective,
                &self.scan,
                &mut cache,
                &self.tracker,
                self.policy,
            )
        })
    }

    fn commit_update_prepared(&self, index: usize, prepared: &R::Prepared) -> R::Weight {
        let current = self
            .store
            .weight(index)
            .expect("winner index is in range for the scanned view");
        let updated = self.rules.update(prepared, &current, self.policy);
        self.store.install(index, updated.clone());
        self.cache.lock().invalidate(index);
        self.rules.record_update_telemetry(&self.tracker);
        debug!(engine = %self.id, category = index, "category updated");
        updated
    }

    fn commit_new_prepared(&self, prepared: &R::Prepared) -> ArtResult<(usize, R::Weight, f64)> {
        if let Some(cap) = self.rules.max_categories() {
            if self.store.len() >= cap {
                return Err(ArtError::Capacity(format!(
                    "category capacity {cap} reached"
                )));
            }
        }
        let weight = self.rules.create(prepared);
        let activation = self.rules.activation(prepared, &weight, self.policy);
        self.tracker.record_vector_ops(1, self.policy.vectorized());
        let index = self.store.push(weight.clone());
        self.tracker.set_category_count(self.store.len() as u64);
        debug!(engine = %self.id, category = index, "category committed");
        Ok((index, weight, activation))
    }

    // -----------------------------------------------------------------------
    // Introspection and lifecycle
    // -----------------------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn execution_config(&self) -> &ExecutionConfig {
        &self.config
    }

    pub fn category_count(&self) -> usize {
        self.store.len()
    }

    pub fn category(&self, index: usize) -> Option<CategorySnapshot<R::Weight>> {
        self.store.snapshot(index)
    }

    pub fn categories(&self) -> Vec<CategorySnapshot<R::Weight>> {
        self.store.snapshots()
    }

    pub fn performance_stats(&self) -> PerformanceStats {
        self.tracker.snapshot()
    }

    pub fn reset_performance_tracking(&self) {
        self.tracker.reset();
        self.tracker.set_category_count(self.store.len() as u64);
    }

    /// Shared counter handle for supervisors layered over this engine.
    pub fn tracker(&self) -> Arc<PerformanceTracker> {
        Arc::clone(&self.tracker)
    }

    /// Drop every category. The engine stays usable.
    pub fn clear(&mut self) -> ArtResult<()> {
        self.ensure_open()?;
        self.store.clear();
        self.cache.lock().clear();
        self.tracker.set_category_count(0);
        info!(engine = %self.id, "engine cleared");
        Ok(())
    }

    /// Prune categories failing `keep`; maintenance paths only. Indices
    /// compact afterwards.
    pub fn prune(&mut self, keep: impl Fn(&Category<R::Weight>) -> bool) -> usize {
        let removed = self.store.prune(keep);
        if removed > 0 {
            self.cache.lock().clear();
            self.tracker.record_pruning(removed as u64);
            self.tracker.set_category_count(self.store.len() as u64);
        }
        removed
    }

    /// Release the worker pool and refuse further operations. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.scan.shutdown();
        self.cache.lock().clear();
        info!(engine = %self.id, "engine closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<R: ArtRules> Drop for ArtEngine<R> {
    fn drop(&mut self) {
        self.close();
    }
}
