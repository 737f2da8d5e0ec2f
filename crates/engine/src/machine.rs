//! The resonance search shared by every variant.
//!
//! `propose` runs the ranking and vigilance walk without mutating anything;
//! committing is a separate step on the engine. The split lets the ARTMAP
//! supervisor inspect a proposed winner, consult its map field, and restart
//! the search at a raised vigilance before any weight changes.

use crate::rules::{ArtRules, MatchDecision};
use crate::scan::{ScanCache, ScanExecutor};
use crate::store::Category;
use resonance_core::stats::PerformanceTracker;
use resonance_core::{ArtError, ArtResult};
use resonance_kernels::SimdPolicy;

/// Result of one resonance search, before any commit.
#[derive(Debug, Clone, Copy)]
pub enum Proposal {
    /// An existing category passed the vigilance test.
    Existing {
        index: usize,
        activation: f64,
        match_score: f64,
    },
    /// Dual-vigilance middle band: acceptable as a prediction, but learning
    /// must commit a fresh category.
    Boundary {
        index: usize,
        activation: f64,
        match_score: f64,
    },
    /// Every category rejected the input, or the store is empty.
    Exhausted,
}

/// Walk categories in activation order and return the first one whose
/// vigilance decision is not a rejection. Categories are never retried.
#[allow(clippy::too_many_arguments)]
pub fn propose<R: ArtRules>(
    rules: &R,
    view: &[Category<R::Weight>],
    prepared: &R::Prepared,
    rho_effective: f64,
    scan: &ScanExecutor,
    cache: &mut ScanCache,
    tracker: &PerformanceTracker,
    policy: SimdPolicy,
) -> ArtResult<Proposal> {
    if view.is_empty() {
        return Ok(Proposal::Exhausted);
    }

    cache.rekey(rules.fingerprint(prepared));
    let ranked = scan.rank(view, cache, tracker, policy.vectorized(), |_, category| {
        rules.activation(prepared, &category.weight, policy)
    })?;

    for candidate in ranked {
        let match_score = rules.match_score(prepared, &view[candidate.index].weight, policy);
        tracker.record_vector_ops(1, policy.vectorized());
        if !match_score.is_finite() {
            return Err(ArtError::Numeric(format!(
                "match score for category {} is not finite",
                candidate.index
            )));
        }

        match rules.decide(match_score, rho_effective) {
            MatchDecision::Resonate => {
                return Ok(Proposal::Existing {
                    index: candidate.index,
                    activation: candidate.activation,
                    match_score,
                });
            }
            MatchDecision::Boundary => {
                return Ok(Proposal::Boundary {
                    index: candidate.index,
                    activation: candidate.activation,
                    match_score,
                });
            }
            MatchDecision::Reject => continue,
        }
    }

    Ok(Proposal::Exhausted)
}
