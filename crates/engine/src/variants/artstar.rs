//! ARTSTAR — fuzzy ART with stability-weighted ranking, a self-regulating
//! vigilance band, and maintenance-point pruning.

use crate::rules::ArtRules;
use crate::scan::{ScanCache, ScanExecutor};
use crate::store::{CategorySnapshot, CategoryStore};
use crate::variants::fuzzy::{FuzzyRules, FuzzyWeight};
use parking_lot::Mutex;
use resonance_core::config::ExecutionConfig;
use resonance_core::outcome::{LearnOutcome, PredictOutcome};
use resonance_core::params::{ArtStarParams, FuzzyParams};
use resonance_core::stats::{PerformanceStats, PerformanceTracker};
use resonance_core::{ArtError, ArtResult};
use resonance_kernels::SimdPolicy;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

pub struct ArtStar {
    id: Uuid,
    params: ArtStarParams,
    rules: FuzzyRules,
    store: CategoryStore<FuzzyWeight>,
    scan: ScanExecutor,
    cache: Mutex<ScanCache>,
    tracker: Arc<PerformanceTracker>,
    policy: SimdPolicy,
    current_vigilance: f64,
    window_samples: usize,
    window_successes: usize,
    closed: bool,
}

impl ArtStar {
    pub fn new(input_dim: usize, params: ArtStarParams, config: ExecutionConfig) -> ArtResult<Self> {
        params.validate()?;
        config.validate()?;
        let fuzzy = FuzzyParams {
            vigilance: params.vigilance,
            learning_rate: params.learning_rate,
            choice_alpha: params.choice_alpha,
        };
        let id = Uuid::new_v4();
        info!(
            engine = %id,
            vigilance = params.vigilance,
            band = ?(params.rho_min, params.rho_max),
            "ARTSTAR engine initialized"
        );
        Ok(Self {
            id,
            current_vigilance: params.vigilance,
            rules: FuzzyRules::new(input_dim, fuzzy)?,
            store: CategoryStore::new(),
            scan: ScanExecutor::new(&config)?,
            cache: Mutex::new(ScanCache::new(
                config.max_cache_size,
                config.memory_optimization_threshold,
            )),
            tracker: Arc::new(PerformanceTracker::new()),
            policy: SimdPolicy::new(config.enable_simd),
            params,
            window_samples: 0,
            window_successes: 0,
            closed: false,
        })
    }

    fn ensure_open(&self) -> ArtResult<()> {
        if self.closed {
            return Err(ArtError::lifecycle("engine has been closed"));
        }
        Ok(())
    }

    /// Stability-weighted ranking. The ranking depends on ages and usage
    /// counts, which move every cycle, so the cache never outlives one call.
    #[allow(clippy::ptr_arg)]
    fn rank_weighted(&self, prepared: &Vec<f64>) -> ArtResult<Vec<(usize, f64, FuzzyWeight)>> {
        let mut cache = self.cache.lock();
        cache.clear();
        let stability_bias = self.params.stability_bias;
        let adaptability_bias = self.params.adaptability_bias;
        let rules = &self.rules;
        let policy = self.policy;

        self.store.with_view(|view| {
            let ranked = self.scan.rank(
                view,
                &mut cache,
                &self.tracker,
                policy.vectorized(),
                |_, category| {
                    let activation = rules.activation(prepared, &category.weight, policy);
                    let stability =
                        (category.usage as f64 / (category.age + 1) as f64).min(1.0);
                    activation * (adaptability_bias + stability_bias * stability)
                },
            )?;
            Ok(ranked
                .into_iter()
                .map(|r| (r.index, r.activation, view[r.index].weight.clone()))
                .collect())
        })
    }

    /// One learning cycle at the currently regulated vigilance.
    pub fn learn(&mut self, input: &[f64]) -> ArtResult<LearnOutcome<FuzzyWeight>> {
        self.ensure_open()?;
        let started = Instant::now();
        let prepared = self.rules.prepare(input)?;
        self.store.bump_ages();

        let mut resonated: Option<(usize, f64, FuzzyWeight)> = None;
        for (index, activation, weight) in self.rank_weighted(&prepared)? {
            let match_score = self.rules.match_score(&prepared, &weight, self.policy);
            self.tracker.record_vector_ops(1, self.policy.vectorized());
            if match_score > self.current_vigilance {
                let updated = self.rules.update(&prepared, &weight, self.policy);
                self.store.install(index, updated.clone());
                resonated = Some((index, activation, updated));
                break;
            }
        }

        let outcome = match resonated {
            Some((index, activation, weight)) => {
                self.window_successes += 1;
                LearnOutcome::Resonance {
                    index,
                    activation,
                    created: false,
                    weight,
                }
            }
            None => {
                let weight = FuzzyWeight(prepared.clone());
                let index = self.store.push(weight.clone());
                self.tracker.set_category_count(self.store.len() as u64);
                LearnOutcome::Resonance {
                    index,
                    activation: 1.0,
                    created: true,
                    weight,
                }
            }
        };

        self.window_samples += 1;
        if self.window_samples >= self.params.performance_window_size {
            self.regulate();
            self.maintain();
        }

        self.tracker
            .record_operation(started.elapsed().as_micros() as u64);
        Ok(outcome)
    }

    /// Steer vigilance toward the target success rate, inside the band.
    fn regulate(&mut self) {
        let rate = self.window_successes as f64 / self.window_samples as f64;
        let before = self.current_vigilance;
        if rate < self.params.target_success_rate {
            self.current_vigilance -= self.params.regulation_rate;
        } else {
            self.current_vigilance += self.params.regulation_rate;
        }
        self.current_vigilance = self
            .current_vigilance
            .clamp(self.params.rho_min, self.params.rho_max);

        if (self.current_vigilance - before).abs() > 0.0 {
            self.tracker.record_vigilance_adjustment();
        }
        self.tracker.record_stability_regulation();
        debug!(
            engine = %self.id,
            success_rate = rate,
            vigilance = self.current_vigilance,
            "vigilance regulated"
        );

        self.window_samples = 0;
        self.window_successes = 0;
    }

    /// Maintenance point: decay usage so stale categories become prunable,
    /// then prune conjunctively (old enough and rarely used).
    fn maintain(&mut self) {
        self.store.maintain(|category| {
            category.usage /= 2;
        });

        let min_age = self.params.min_category_age;
        let threshold = self.params.pruning_threshold;
        let removed = self
            .store
            .prune(|category| !(category.age > min_age && category.usage < threshold));
        if removed > 0 {
            self.cache.lock().clear();
            self.tracker.record_pruning(removed as u64);
            self.tracker.set_category_count(self.store.len() as u64);
            info!(engine = %self.id, removed, "pruned stale categories");
        }
    }

    /// Classification at the regulated vigilance; never mutates.
    pub fn predict(&self, input: &[f64]) -> ArtResult<PredictOutcome> {
        self.ensure_open()?;
        let prepared = self.rules.prepare(input)?;

        for (index, activation, weight) in self.rank_weighted(&prepared)? {
            let match_score = self.rules.match_score(&prepared, &weight, self.policy);
            self.tracker.record_vector_ops(1, self.policy.vectorized());
            if match_score > self.current_vigilance {
                return Ok(PredictOutcome::Resonance { index, activation });
            }
        }
        Ok(PredictOutcome::NoMatch)
    }

    pub fn category_count(&self) -> usize {
        self.store.len()
    }

    pub fn category(&self, index: usize) -> Option<CategorySnapshot<FuzzyWeight>> {
        self.store.snapshot(index)
    }

    pub fn current_vigilance(&self) -> f64 {
        self.current_vigilance
    }

    pub fn params(&self) -> &ArtStarParams {
        &self.params
    }

    pub fn performance_stats(&self) -> PerformanceStats {
        self.tracker.snapshot()
    }

    pub fn clear(&mut self) -> ArtResult<()> {
        self.ensure_open()?;
        self.store.clear();
        self.cache.lock().clear();
        self.tracker.set_category_count(0);
        self.current_vigilance = self.params.vigilance;
        self.window_samples = 0;
        self.window_successes = 0;
        Ok(())
    }

    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.scan.shutdown();
        self.cache.lock().clear();
        info!(engine = %self.id, "ARTSTAR engine closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ArtStarParams {
        ArtStarParams {
            vigilance: 0.6,
            rho_min: 0.3,
            rho_max: 0.9,
            performance_window_size: 4,
            min_category_age: 3,
            pruning_threshold: 1,
            ..Default::default()
        }
    }

    fn engine(params: ArtStarParams) -> ArtStar {
        ArtStar::new(2, params, ExecutionConfig::default()).expect("engine")
    }

    #[test]
    fn test_learns_and_counts_categories() {
        let mut art = engine(params());
        art.learn(&[0.1, 0.1]).expect("learn");
        art.learn(&[0.9, 0.9]).expect("learn");
        assert_eq!(art.category_count(), 2);
    }

    #[test]
    fn test_vigilance_stays_inside_band() {
        let mut art = engine(params());
        // a stream of scattered inputs forces many regulation events
        for i in 0..64 {
            let x = (i % 10) as f64 / 10.0;
            let y = ((i * 7) % 10) as f64 / 10.0;
            art.learn(&[x, y]).expect("learn");
        }
        let rho = art.current_vigilance();
        assert!((0.3..=0.9).contains(&rho));
        assert!(art.performance_stats().stability_regulations > 0);
    }

    #[test]
    fn test_all_matches_raise_vigilance() {
        let mut art = engine(params());
        for _ in 0..8 {
            art.learn(&[0.5, 0.5]).expect("learn");
        }
        // every sample after the first resonates, so regulation pushes up
        assert!(art.current_vigilance() > 0.6);
    }

    #[test]
    fn test_pruning_removes_stale_categories() {
        let mut art = engine(ArtStarParams {
            min_category_age: 2,
            pruning_threshold: 2,
            performance_window_size: 8,
            ..params()
        });
        art.learn(&[0.9, 0.9]).expect("learn");
        // hammer a different region so the first category ages without wins
        for _ in 0..7 {
            art.learn(&[0.1, 0.1]).expect("learn");
        }
        assert!(art.performance_stats().pruning_operations >= 1);
        assert!(art.category_count() <= 2);
    }

    #[test]
    fn test_close_then_learn_is_lifecycle_error() {
        let mut art = engine(params());
        art.close();
        art.close();
        let err = art.learn(&[0.1, 0.1]).unwrap_err();
        assert!(matches!(err, ArtError::Lifecycle(_)));
    }
}
