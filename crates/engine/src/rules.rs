//! Variant-agnostic rule abstraction invoked by the resonance loop.
//!
//! Every ART variant implements [`ArtRules`]: input preparation, activation,
//! match scoring, the vigilance decision, and the pure weight update. The
//! search loop, store, and scan executor are generic over this trait, so a
//! variant is exactly one rules type plus one weight type.

use resonance_core::stats::PerformanceTracker;
use resonance_core::ArtResult;
use resonance_kernels::SimdPolicy;

/// Outcome of testing one category against the effective vigilance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDecision {
    /// The category passes; it absorbs the input on learn.
    Resonate,
    /// Dual-vigilance middle band: acceptable for prediction, but learning
    /// commits a fresh category instead of updating this one.
    Boundary,
    /// The category is rejected and never retried within the operation.
    Reject,
}

/// Per-variant activation, match, and update rules.
///
/// All methods are pure with respect to the store: `update` and `create`
/// return fresh weight snapshots and never mutate in place. `Prepared` is
/// the variant's internal encoding of a validated input — complement-coded
/// floats for the fuzzy family, a packed bit vector for the binary family —
/// built once per operation and shared across the whole scan.
pub trait ArtRules: Send + Sync {
    type Weight: Clone + Send + Sync + 'static;
    type Prepared: Send + Sync;

    /// Expected raw input dimension.
    fn input_dimensions(&self) -> usize;

    /// Baseline vigilance from the variant parameters.
    fn baseline_vigilance(&self) -> f64;

    /// Validate a raw input and encode it for the internal weight layout.
    /// Violations surface as input-shape errors before any state is touched.
    fn prepare(&self, input: &[f64]) -> ArtResult<Self::Prepared>;

    /// Stable fingerprint of a prepared input, used to key the scan cache.
    fn fingerprint(&self, prepared: &Self::Prepared) -> u64;

    /// Non-negative score ranking how strongly `prepared` excites `weight`.
    fn activation(&self, prepared: &Self::Prepared, weight: &Self::Weight, policy: SimdPolicy)
        -> f64;

    /// Normalized similarity compared against vigilance.
    fn match_score(
        &self,
        prepared: &Self::Prepared,
        weight: &Self::Weight,
        policy: SimdPolicy,
    ) -> f64;

    /// Vigilance test. The default is the single-threshold comparison, with
    /// a tie at the threshold rejecting; the dual-vigilance variant
    /// overrides it.
    fn decide(&self, match_score: f64, rho_effective: f64) -> MatchDecision {
        if match_score > rho_effective {
            MatchDecision::Resonate
        } else {
            MatchDecision::Reject
        }
    }

    /// New weight snapshot after the category absorbs `prepared`.
    fn update(
        &self,
        prepared: &Self::Prepared,
        weight: &Self::Weight,
        policy: SimdPolicy,
    ) -> Self::Weight;

    /// Fresh weight committed from an uncategorized input.
    fn create(&self, prepared: &Self::Prepared) -> Self::Weight;

    /// Hard category cap, if the variant declares one.
    fn max_categories(&self) -> Option<usize> {
        None
    }

    /// Variant-specific counter bumps on committed updates.
    fn record_update_telemetry(&self, _tracker: &PerformanceTracker) {}
}
