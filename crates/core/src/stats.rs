//! Performance counters kept by every engine instance.
//!
//! All counters are monotonic between resets and cheap enough to bump from
//! scan workers. Snapshots are plain records suitable for serialization.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Point-in-time view of an engine's counters.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceStats {
    pub total_vector_operations: u64,
    pub simd_operations: u64,
    /// Fraction of vector operations that took a vectorized path.
    pub simd_utilization: f64,
    pub total_parallel_tasks: u64,
    /// Largest per-operation activation cache observed since reset.
    pub cache_size: u64,
    pub category_count: u64,
    pub avg_compute_time_ms: f64,
    pub throughput_ops_per_sec: f64,
    pub attention_weight_updates: u64,
    pub topology_adjustments: u64,
    pub pruning_operations: u64,
    pub vigilance_adjustments: u64,
    pub stability_regulations: u64,
    /// Activation-cache hits that skipped a rescan.
    pub convergence_optimizations: u64,
    pub captured_at: DateTime<Utc>,
}

/// Shared counter block. One per engine; cloned handles share the counters.
#[derive(Debug)]
pub struct PerformanceTracker {
    vector_operations: AtomicU64,
    simd_operations: AtomicU64,
    parallel_tasks: AtomicU64,
    cache_watermark: AtomicU64,
    category_count: AtomicU64,
    operations: AtomicU64,
    compute_time_micros: AtomicU64,
    attention_weight_updates: AtomicU64,
    topology_adjustments: AtomicU64,
    pruning_operations: AtomicU64,
    vigilance_adjustments: AtomicU64,
    stability_regulations: AtomicU64,
    convergence_optimizations: AtomicU64,
    epoch: Mutex<Instant>,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self {
            vector_operations: AtomicU64::new(0),
            simd_operations: AtomicU64::new(0),
            parallel_tasks: AtomicU64::new(0),
            cache_watermark: AtomicU64::new(0),
            category_count: AtomicU64::new(0),
            operations: AtomicU64::new(0),
            compute_time_micros: AtomicU64::new(0),
            attention_weight_updates: AtomicU64::new(0),
            topology_adjustments: AtomicU64::new(0),
            pruning_operations: AtomicU64::new(0),
            vigilance_adjustments: AtomicU64::new(0),
            stability_regulations: AtomicU64::new(0),
            convergence_optimizations: AtomicU64::new(0),
            epoch: Mutex::new(Instant::now()),
        }
    }

    pub fn record_vector_ops(&self, count: u64, simd: bool) {
        self.vector_operations.fetch_add(count, Ordering::Relaxed);
        if simd {
            self.simd_operations.fetch_add(count, Ordering::Relaxed);
        }
    }

    pub fn record_parallel_tasks(&self, count: u64) {
        self.parallel_tasks.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_cache_size(&self, size: u64) {
        self.cache_watermark.fetch_max(size, Ordering::Relaxed);
    }

    pub fn set_category_count(&self, count: u64) {
        self.category_count.store(count, Ordering::Relaxed);
    }

    pub fn record_operation(&self, elapsed_micros: u64) {
        self.operations.fetch_add(1, Ordering::Relaxed);
        self.compute_time_micros
            .fetch_add(elapsed_micros, Ordering::Relaxed);
    }

    pub fn record_attention_update(&self) {
        self.attention_weight_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_topology_adjustment(&self) {
        self.topology_adjustments.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pruning(&self, removed: u64) {
        self.pruning_operations.fetch_add(removed, Ordering::Relaxed);
    }

    pub fn record_vigilance_adjustment(&self) {
        self.vigilance_adjustments.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stability_regulation(&self) {
        self.stability_regulations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.convergence_optimizations
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn category_count(&self) -> u64 {
        self.category_count.load(Ordering::Relaxed)
    }

    /// Capture a snapshot of every counter.
    pub fn snapshot(&self) -> PerformanceStats {
        let vector_ops = self.vector_operations.load(Ordering::Relaxed);
        let simd_ops = self.simd_operations.load(Ordering::Relaxed);
        let operations = self.operations.load(Ordering::Relaxed);
        let micros = self.compute_time_micros.load(Ordering::Relaxed);
        let elapsed = self.epoch.lock().elapsed().as_secs_f64();

        PerformanceStats {
            total_vector_operations: vector_ops,
            simd_operations: simd_ops,
            simd_utilization: if vector_ops > 0 {
                simd_ops as f64 / vector_ops as f64
            } else {
                0.0
            },
            total_parallel_tasks: self.parallel_tasks.load(Ordering::Relaxed),
            cache_size: self.cache_watermark.load(Ordering::Relaxed),
            category_count: self.category_count.load(Ordering::Relaxed),
            avg_compute_time_ms: if operations > 0 {
                micros as f64 / operations as f64 / 1000.0
            } else {
                0.0
            },
            throughput_ops_per_sec: if elapsed > 0.0 {
                operations as f64 / elapsed
            } else {
                0.0
            },
            attention_weight_updates: self.attention_weight_updates.load(Ordering::Relaxed),
            topology_adjustments: self.topology_adjustments.load(Ordering::Relaxed),
            pruning_operations: self.pruning_operations.load(Ordering::Relaxed),
            vigilance_adjustments: self.vigilance_adjustments.load(Ordering::Relaxed),
            stability_regulations: self.stability_regulations.load(Ordering::Relaxed),
            convergence_optimizations: self.convergence_optimizations.load(Ordering::Relaxed),
            captured_at: Utc::now(),
        }
    }

    /// Zero every counter and restart the throughput clock. The category
    /// count is re-stamped by the owning engine, not here.
    pub fn reset(&self) {
        self.vector_operations.store(0, Ordering::Relaxed);
        self.simd_operations.store(0, Ordering::Relaxed);
        self.parallel_tasks.store(0, Ordering::Relaxed);
        self.cache_watermark.store(0, Ordering::Relaxed);
        self.operations.store(0, Ordering::Relaxed);
        self.compute_time_micros.store(0, Ordering::Relaxed);
        self.attention_weight_updates.store(0, Ordering::Relaxed);
        self.topology_adjustments.store(0, Ordering::Relaxed);
        self.pruning_operations.store(0, Ordering::Relaxed);
        self.vigilance_adjustments.store(0, Ordering::Relaxed);
        self.stability_regulations.store(0, Ordering::Relaxed);
        self.convergence_optimizations.store(0, Ordering::Relaxed);
        *self.epoch.lock() = Instant::now();
    }
}

impl Default for PerformanceTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate_and_snapshot() {
        let tracker = PerformanceTracker::new();
        tracker.record_vector_ops(10, false);
        tracker.record_vector_ops(30, true);
        tracker.record_parallel_tasks(4);
        tracker.record_cache_size(16);
        tracker.record_cache_size(8);
        tracker.set_category_count(5);
        tracker.record_operation(2000);

        let stats = tracker.snapshot();
        assert_eq!(stats.total_vector_operations, 40);
        assert_eq!(stats.simd_operations, 30);
        assert!((stats.simd_utilization - 0.75).abs() < 1e-12);
        assert_eq!(stats.total_parallel_tasks, 4);
        assert_eq!(stats.cache_size, 16);
        assert_eq!(stats.category_count, 5);
        assert!((stats.avg_compute_time_ms - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset_zeroes_counters_but_keeps_category_count() {
        let tracker = PerformanceTracker::new();
        tracker.record_vector_ops(10, true);
        tracker.set_category_count(3);
        tracker.reset();

        let stats = tracker.snapshot();
        assert_eq!(stats.total_vector_operations, 0);
        assert_eq!(stats.simd_operations, 0);
        assert_eq!(stats.category_count, 3);
    }
}
