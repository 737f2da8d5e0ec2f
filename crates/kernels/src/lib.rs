#![warn(clippy::unwrap_used)]

//! Vectorized numeric kernels shared by every ART variant.
//!
//! Each kernel is a pure function over read-only buffers with a scalar
//! reference path and an AVX2 path selected at runtime. The two paths agree
//! within [`dispatch::equivalence_tolerance`].

pub mod binary;
pub mod dispatch;
pub mod distance;
pub mod fuzzy;
pub mod gaussian;

pub use binary::{bin_and_count, bin_or_count, BitVector};
pub use dispatch::{detect_simd_level, equivalence_tolerance, SimdLevel, SimdPolicy};
pub use distance::{dot, euclidean, l2_norm, sqr_euclidean};
pub use fuzzy::{clamp01, complement_code, fuzzy_and, fuzzy_min_sum, l1_norm};
pub use gaussian::{gaussian_logpdf, weighted_sqr_distance};
