//! Fuzzy set kernels: elementwise min/sum reductions and complement coding.
//!
//! Every kernel has a scalar reference implementation and an AVX2 path.
//! The vectorized paths only reorder the reduction (four lanes folded at
//! the end), so scalar and SIMD results agree within the documented
//! tolerance.

use crate::dispatch::SimdPolicy;

/// Σ min(aᵢ, bᵢ). Panics are reserved for internal misuse: callers validate
/// lengths before reaching kernels.
pub fn fuzzy_min_sum(a: &[f64], b: &[f64], policy: SimdPolicy) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    #[cfg(target_arch = "x86_64")]
    {
        if policy.vectorized() && a.len() >= 8 {
            // SAFETY: gated on runtime AVX2 detection.
            return unsafe { fuzzy_min_sum_avx2(a, b) };
        }
    }
    let _ = policy;
    fuzzy_min_sum_scalar(a, b)
}

pub fn fuzzy_min_sum_scalar(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x.min(*y)).sum()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn fuzzy_min_sum_avx2(a: &[f64], b: &[f64]) -> f64 {
    use std::arch::x86_64::*;

    let chunks = a.len() / 4;
    let mut acc = _mm256_setzero_pd();
    for i in 0..chunks {
        let va = _mm256_loadu_pd(a.as_ptr().add(i * 4));
        let vb = _mm256_loadu_pd(b.as_ptr().add(i * 4));
        acc = _mm256_add_pd(acc, _mm256_min_pd(va, vb));
    }
    let mut lanes = [0.0f64; 4];
    _mm256_storeu_pd(lanes.as_mut_ptr(), acc);
    let mut sum = (lanes[0] + lanes[1]) + (lanes[2] + lanes[3]);
    for i in chunks * 4..a.len() {
        sum += a[i].min(b[i]);
    }
    sum
}

/// Σ |aᵢ|. For complement-coded buffers (non-negative entries) this equals
/// the plain sum.
pub fn l1_norm(a: &[f64], policy: SimdPolicy) -> f64 {
    #[cfg(target_arch = "x86_64")]
    {
        if policy.vectorized() && a.len() >= 8 {
            // SAFETY: gated on runtime AVX2 detection.
            return unsafe { l1_norm_avx2(a) };
        }
    }
    let _ = policy;
    l1_norm_scalar(a)
}

pub fn l1_norm_scalar(a: &[f64]) -> f64 {
    a.iter().map(|x| x.abs()).sum()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn l1_norm_avx2(a: &[f64]) -> f64 {
    use std::arch::x86_64::*;

    // abs via sign-bit mask
    let sign_mask = _mm256_set1_pd(-0.0);
    let chunks = a.len() / 4;
    let mut acc = _mm256_setzero_pd();
    for i in 0..chunks {
        let va = _mm256_loadu_pd(a.as_ptr().add(i * 4));
        acc = _mm256_add_pd(acc, _mm256_andnot_pd(sign_mask, va));
    }
    let mut lanes = [0.0f64; 4];
    _mm256_storeu_pd(lanes.as_mut_ptr(), acc);
    let mut sum = (lanes[0] + lanes[1]) + (lanes[2] + lanes[3]);
    for i in chunks * 4..a.len() {
        sum += a[i].abs();
    }
    sum
}

/// Elementwise min written into a fresh buffer; the fuzzy AND used by
/// weight updates.
pub fn fuzzy_and(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x.min(*y)).collect()
}

/// Clamp every component into [0, 1].
pub fn clamp01(values: &mut [f64]) {
    for v in values.iter_mut() {
        *v = v.clamp(0.0, 1.0);
    }
}

/// Append the complement: [x₀ … x_{D−1}] → [x₀ … x_{D−1}, 1−x₀ … 1−x_{D−1}].
pub fn complement_code(input: &[f64]) -> Vec<f64> {
    let mut coded = Vec::with_capacity(input.len() * 2);
    coded.extend_from_slice(input);
    coded.extend(input.iter().map(|x| 1.0 - x));
    coded
}
