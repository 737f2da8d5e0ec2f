//! Distance and inner-product kernels.

use crate::dispatch::SimdPolicy;

/// Σ (aᵢ − bᵢ)².
pub fn sqr_euclidean(a: &[f64], b: &[f64], policy: SimdPolicy) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    #[cfg(target_arch = "x86_64")]
    {
        if policy.vectorized() && a.len() >= 8 {
            // SAFETY: gated on runtime AVX2 detection.
            return unsafe { sqr_euclidean_avx2(a, b) };
        }
    }
    let _ = policy;
    sqr_euclidean_scalar(a, b)
}

pub fn sqr_euclidean_scalar(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn sqr_euclidean_avx2(a: &[f64], b: &[f64]) -> f64 {
    use std::arch::x86_64::*;

    let chunks = a.len() / 4;
    let mut acc = _mm256_setzero_pd();
    for i in 0..chunks {
        let va = _mm256_loadu_pd(a.as_ptr().add(i * 4));
        let vb = _mm256_loadu_pd(b.as_ptr().add(i * 4));
        let d = _mm256_sub_pd(va, vb);
        acc = _mm256_add_pd(acc, _mm256_mul_pd(d, d));
    }
    let mut lanes = [0.0f64; 4];
    _mm256_storeu_pd(lanes.as_mut_ptr(), acc);
    let mut sum = (lanes[0] + lanes[1]) + (lanes[2] + lanes[3]);
    for i in chunks * 4..a.len() {
        let d = a[i] - b[i];
        sum += d * d;
    }
    sum
}

/// Euclidean distance.
pub fn euclidean(a: &[f64], b: &[f64], policy: SimdPolicy) -> f64 {
    sqr_euclidean(a, b, policy).sqrt()
}

/// Σ aᵢ·bᵢ.
pub fn dot(a: &[f64], b: &[f64], policy: SimdPolicy) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    #[cfg(target_arch = "x86_64")]
    {
        if policy.vectorized() && a.len() >= 8 {
            // SAFETY: gated on runtime AVX2 detection.
            return unsafe { dot_avx2(a, b) };
        }
    }
    let _ = policy;
    dot_scalar(a, b)
}

pub fn dot_scalar(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn dot_avx2(a: &[f64], b: &[f64]) -> f64 {
    use std::arch::x86_64::*;

    let chunks = a.len() / 4;
    let mut acc = _mm256_setzero_pd();
    for i in 0..chunks {
        let va = _mm256_loadu_pd(a.as_ptr().add(i * 4));
        let vb = _mm256_loadu_pd(b.as_ptr().add(i * 4));
        acc = _mm256_add_pd(acc, _mm256_mul_pd(va, vb));
    }
    let mut lanes = [0.0f64; 4];
    _mm256_storeu_pd(lanes.as_mut_ptr(), acc);
    let mut sum = (lanes[0] + lanes[1]) + (lanes[2] + lanes[3]);
    for i in chunks * 4..a.len() {
        sum += a[i] * b[i];
    }
    sum
}

/// L2 norm.
pub fn l2_norm(a: &[f64], policy: SimdPolicy) -> f64 {
    dot(a, a, policy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{equivalence_tolerance, SimdPolicy};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_sqr_euclidean_known_value() {
        let a = [1.0, 2.0, 3.0];
        let b = [0.0, 0.0, 0.0];
        assert!((sqr_euclidean(&a, &b, SimdPolicy::scalar()) - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_dot_known_value() {
        let a = [1.0, 2.0];
        let b = [3.0, 4.0];
        assert!((dot(&a, &b, SimdPolicy::scalar()) - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_simd_matches_scalar() {
        let mut rng = StdRng::seed_from_u64(21);
        let simd = SimdPolicy::new(true);
        for len in [8usize, 9, 50, 301] {
            let a: Vec<f64> = (0..len).map(|_| rng.gen::<f64>() * 4.0 - 2.0).collect();
            let b: Vec<f64> = (0..len).map(|_| rng.gen::<f64>() * 4.0 - 2.0).collect();
            let tolerance = equivalence_tolerance(len, 4.0);
            let delta = (sqr_euclidean(&a, &b, simd) - sqr_euclidean_scalar(&a, &b)).abs();
            assert!(delta <= tolerance, "sqr len={len} delta={delta}");
            let delta = (dot(&a, &b, simd) - dot_scalar(&a, &b)).abs();
            assert!(delta <= tolerance, "dot len={len} delta={delta}");
        }
    }
}
