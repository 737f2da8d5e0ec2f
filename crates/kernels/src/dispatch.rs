//! Runtime CPU feature detection and kernel dispatch policy.
//!
//! Detection runs once per process and is cached; the per-engine SIMD flag
//! can still force the scalar reference path. All vectorized code is gated
//! behind `is_x86_feature_detected!` so the crate runs on any x86-64 and on
//! non-x86 targets (scalar only).

use std::sync::OnceLock;
use tracing::debug;

/// Vector capability tiers, ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SimdLevel {
    None,
    Avx2,
    Avx2Fma,
}

static DETECTED: OnceLock<SimdLevel> = OnceLock::new();

/// Detect the strongest level this CPU supports. Cached after the first call.
pub fn detect_simd_level() -> SimdLevel {
    *DETECTED.get_or_init(|| {
        let level = probe();
        debug!(level = ?level, "SIMD capability detected");
        level
    })
}

#[cfg(target_arch = "x86_64")]
fn probe() -> SimdLevel {
    if is_x86_feature_detected!("avx2") {
        if is_x86_feature_detected!("fma") {
            SimdLevel::Avx2Fma
        } else {
            SimdLevel::Avx2
        }
    } else {
        SimdLevel::None
    }
}

#[cfg(not(target_arch = "x86_64"))]
fn probe() -> SimdLevel {
    SimdLevel::None
}

/// Per-call execution policy: the detected level intersected with the
/// engine's SIMD enablement flag.
#[derive(Debug, Clone, Copy)]
pub struct SimdPolicy {
    level: SimdLevel,
}

impl SimdPolicy {
    /// Policy honoring the engine flag and the host CPU.
    pub fn new(enable_simd: bool) -> Self {
        Self {
            level: if enable_simd {
                detect_simd_level()
            } else {
                SimdLevel::None
            },
        }
    }

    /// Scalar-only policy, used as the reference side of equivalence tests.
    pub fn scalar() -> Self {
        Self {
            level: SimdLevel::None,
        }
    }

    pub fn vectorized(&self) -> bool {
        self.level >= SimdLevel::Avx2
    }

    pub fn level(&self) -> SimdLevel {
        self.level
    }
}

/// Tolerance for scalar/SIMD disagreement on a kernel over `dim`-length
/// buffers whose entries are bounded by `max_abs` in magnitude.
pub fn equivalence_tolerance(dim: usize, max_abs: f64) -> f64 {
    let bound = 16.0 * dim as f64 * f64::EPSILON * max_abs.max(1.0);
    bound.max(1e-9)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_is_stable() {
        assert_eq!(detect_simd_level(), detect_simd_level());
    }

    #[test]
    fn test_disabled_policy_is_scalar() {
        let policy = SimdPolicy::new(false);
        assert!(!policy.vectorized());
        assert_eq!(policy.level(), SimdLevel::None);
    }

    #[test]
    fn test_tolerance_floor() {
        assert_eq!(equivalence_tolerance(1, 0.0), 1e-9);
        assert!(equivalence_tolerance(1_000_000, 1e6) > 1e-9);
    }
}
