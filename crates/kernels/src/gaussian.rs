//! Gaussian likelihood kernels over diagonal covariances.

use crate::dispatch::SimdPolicy;

const LOG_TWO_PI: f64 = 1.8378770664093453;

/// Σ (xᵢ − μᵢ)² / varᵢ — the squared Mahalanobis distance for a diagonal
/// covariance. `inv_var` holds 1/varᵢ so the hot path is multiply-add.
pub fn weighted_sqr_distance(x: &[f64], mean: &[f64], inv_var: &[f64], policy: SimdPolicy) -> f64 {
    debug_assert_eq!(x.len(), mean.len());
    debug_assert_eq!(x.len(), inv_var.len());
    #[cfg(target_arch = "x86_64")]
    {
        if policy.vectorized() && x.len() >= 8 {
            // SAFETY: gated on runtime AVX2 detection.
            return unsafe { weighted_sqr_distance_avx2(x, mean, inv_var) };
        }
    }
    let _ = policy;
    weighted_sqr_distance_scalar(x, mean, inv_var)
}

pub fn weighted_sqr_distance_scalar(x: &[f64], mean: &[f64], inv_var: &[f64]) -> f64 {
    x.iter()
        .zip(mean.iter())
        .zip(inv_var.iter())
        .map(|((xi, mi), wi)| {
            let d = xi - mi;
            d * d * wi
        })
        .sum()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn weighted_sqr_distance_avx2(x: &[f64], mean: &[f64], inv_var: &[f64]) -> f64 {
    use std::arch::x86_64::*;

    let chunks = x.len() / 4;
    let mut acc = _mm256_setzero_pd();
    for i in 0..chunks {
        let vx = _mm256_loadu_pd(x.as_ptr().add(i * 4));
        let vm = _mm256_loadu_pd(mean.as_ptr().add(i * 4));
        let vw = _mm256_loadu_pd(inv_var.as_ptr().add(i * 4));
        let d = _mm256_sub_pd(vx, vm);
        acc = _mm256_add_pd(acc, _mm256_mul_pd(_mm256_mul_pd(d, d), vw));
    }
    let mut lanes = [0.0f64; 4];
    _mm256_storeu_pd(lanes.as_mut_ptr(), acc);
    let mut sum = (lanes[0] + lanes[1]) + (lanes[2] + lanes[3]);
    for i in chunks * 4..x.len() {
        let d = x[i] - mean[i];
        sum += d * d * inv_var[i];
    }
    sum
}

/// Log density of a diagonal Gaussian at `x`:
/// Σ [−½ (xᵢ−μᵢ)²/varᵢ − ½ log(2π varᵢ)].
///
/// `log_det` is Σ log varᵢ, cached by the weight so the per-scan cost is the
/// quadratic form alone.
pub fn gaussian_logpdf(
    x: &[f64],
    mean: &[f64],
    inv_var: &[f64],
    log_det: f64,
    policy: SimdPolicy,
) -> f64 {
    let mahalanobis = weighted_sqr_distance(x, mean, inv_var, policy);
    -0.5 * (mahalanobis + log_det + x.len() as f64 * LOG_TWO_PI)
}
