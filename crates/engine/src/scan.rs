//! Bounded-parallel activation scan with a per-operation cache.
//!
//! The executor owns the engine's rayon pool. Below the parallel threshold
//! the scan is a plain loop; above it the uncached categories are sharded
//! across the pool and merged back into ascending-index order, so the
//! observable ranking is identical either way.

use crate::store::Category;
use rayon::prelude::*;
use resonance_core::config::ExecutionConfig;
use resonance_core::stats::PerformanceTracker;
use resonance_core::{ArtError, ArtResult};
use std::collections::HashMap;
use tracing::debug;

/// One category with its activation, after the scan.
#[derive(Debug, Clone, Copy)]
pub struct RankedCategory {
    pub index: usize,
    pub activation: f64,
}

/// FNV-1a over the raw bit patterns; identical inputs share a fingerprint.
pub fn input_fingerprint(values: &[f64]) -> u64 {
    fingerprint_words(values.iter().map(|v| v.to_bits()))
}

/// FNV-1a over packed words, for bitset-encoded inputs.
pub fn fingerprint_words(words: impl IntoIterator<Item = u64>) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for word in words {
        for byte in word.to_le_bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
    }
    hash
}

/// Memoized activations for one input fingerprint.
///
/// The cache only ever holds values the scan would recompute identically, so
/// eviction policy affects performance, never outcomes. Entries are dropped
/// whenever the referenced weight changes.
#[derive(Debug)]
pub struct ScanCache {
    fingerprint: u64,
    values: HashMap<usize, f64>,
    capacity: usize,
    retain_fraction: f64,
}

impl ScanCache {
    pub fn new(capacity: usize, retain_fraction: f64) -> Self {
        Self {
            fingerprint: 0,
            values: HashMap::new(),
            capacity,
            retain_fraction,
        }
    }

    /// Point the cache at a new input; entries from a different input are
    /// discarded wholesale.
    pub fn rekey(&mut self, fingerprint: u64) {
        if self.fingerprint != fingerprint {
            self.fingerprint = fingerprint;
            self.values.clear();
        }
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(&index).copied()
    }

    fn insert(&mut self, index: usize, activation: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.values.len() >= self.capacity {
            // Shed down to the configured fraction; which entries survive is
            // immaterial because every entry is recomputable.
            let target = (self.capacity as f64 * self.retain_fraction) as usize;
            let mut kept = 0usize;
            self.values.retain(|_, _| {
                kept += 1;
                kept <= target
            });
        }
        self.values.insert(index, activation);
    }

    /// Drop one category's memoized activation after its weight changed.
    pub fn invalidate(&mut self, index: usize) {
        self.values.remove(&index);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.fingerprint = 0;
    }
}

/// Executes activation scans over a store view.
pub struct ScanExecutor {
    pool: Option<rayon::ThreadPool>,
    parallel_threshold: usize,
}

impl ScanExecutor {
    pub fn new(config: &ExecutionConfig) -> ArtResult<Self> {
        let pool = if config.parallelism_level > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.parallelism_level)
                .build()
                .map_err(|e| ArtError::Internal(anyhow::anyhow!(e)))?;
            Some(pool)
        } else {
            None
        };
        Ok(Self {
            pool,
            parallel_threshold: config.parallel_threshold,
        })
    }

    /// Release the worker pool. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        self.pool = None;
    }

    /// Rank every category by descending activation (ties by ascending
    /// index). `activation_of` must be pure; the scan may evaluate it from
    /// pool workers.
    pub fn rank<W, F>(
        &self,
        view: &[Category<W>],
        cache: &mut ScanCache,
        tracker: &PerformanceTracker,
        simd: bool,
        activation_of: F,
    ) -> ArtResult<Vec<RankedCategory>>
    where
        W: Send + Sync,
        F: Fn(usize, &Category<W>) -> f64 + Send + Sync,
    {
        let mut ranked = Vec::with_capacity(view.len());
        let mut missing = Vec::new();

        for index in 0..view.len() {
            match cache.get(index) {
                Some(activation) => {
                    tracker.record_cache_hit();
                    ranked.push(RankedCategory { index, activation });
                }
                None => missing.push(index),
            }
        }

        let computed: Vec<RankedCategory> = if self.pool.is_some()
            && missing.len() >= self.parallel_threshold
        {
            let pool = self.pool.as_ref().expect("pool presence checked above");
            let tasks = missing.len().min(pool.current_num_threads());
            tracker.record_parallel_tasks(tasks as u64);
            debug!(categories = missing.len(), tasks, "parallel activation scan");
            pool.install(|| {
                missing
                    .par_iter()
                    .map(|&index| RankedCategory {
                        index,
                        activation: activation_of(index, &view[index]),
                    })
                    .collect()
            })
        } else {
            missing
                .iter()
                .map(|&index| RankedCategory {
                    index,
                    activation: activation_of(index, &view[index]),
                })
                .collect()
        };

        tracker.record_vector_ops(computed.len() as u64, simd);

        for entry in &computed {
            if !entry.activation.is_finite() {
                return Err(ArtError::Numeric(format!(
                    "activation for category {} is not finite",
                    entry.index
                )));
            }
            cache.insert(entry.index, entry.activation);
        }
        tracker.record_cache_size(cache.len() as u64);

        ranked.extend(computed);
        ranked.sort_by(|a, b| {
            b.activation
                .total_cmp(&a.activation)
                .then(a.index.cmp(&b.index))
        });
        Ok(ranked)
    }
}
