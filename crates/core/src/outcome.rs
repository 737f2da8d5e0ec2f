//! Operation outcomes shared by every engine surface.
//!
//! A refusal to match is a value, not an error: `predict` on an empty store
//! or past every vigilance test returns [`PredictOutcome::NoMatch`], and the
//! raised error kinds stay reserved for contract violations.

use serde::Serialize;

/// Outcome of a `learn` operation.
#[derive(Debug, Clone)]
pub enum LearnOutcome<W> {
    /// A category resonated (or was freshly committed) and absorbed the input.
    Resonance {
        /// Stable index of the winning category.
        index: usize,
        /// Activation value of the winner at decision time.
        activation: f64,
        /// True when the input committed a brand-new category.
        created: bool,
        /// Snapshot of the category weight after the update.
        weight: W,
    },
    /// No category absorbed the input and none could be created.
    NoMatch,
}

impl<W> LearnOutcome<W> {
    pub fn index(&self) -> Option<usize> {
        match self {
            LearnOutcome::Resonance { index, .. } => Some(*index),
            LearnOutcome::NoMatch => None,
        }
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, LearnOutcome::NoMatch)
    }
}

/// Outcome of a `predict` operation. Never carries a weight snapshot and
/// never implies mutation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PredictOutcome {
    Resonance { index: usize, activation: f64 },
    NoMatch,
}

impl PredictOutcome {
    pub fn index(&self) -> Option<usize> {
        match self {
            PredictOutcome::Resonance { index, .. } => Some(*index),
            PredictOutcome::NoMatch => None,
        }
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, PredictOutcome::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let hit = PredictOutcome::Resonance {
            index: 3,
            activation: 0.9,
        };
        assert_eq!(hit.index(), Some(3));
        assert!(!hit.is_no_match());
        assert_eq!(PredictOutcome::NoMatch.index(), None);

        let learned: LearnOutcome<Vec<f64>> = LearnOutcome::Resonance {
            index: 0,
            activation: 1.0,
            created: true,
            weight: vec![0.5, 0.5],
        };
        assert_eq!(learned.index(), Some(0));
    }
}
