//! Error and warning types for the evaluation engine

use crate::ids::{EvidenceId, HypothesisId};
use crate::scale::ScaleType;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised by the Score Matrix and the calculators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Score value outside the active scale's bounds
    #[error("Score {value} is outside the {scale} scale bounds [{min}, {max}]")]
    OutOfRange {
        /// Scale the value was checked against
        scale: ScaleType,
        /// Offending value
        value: i32,
        /// Lowest permitted value
        min: i32,
        /// Highest permitted value
        max: i32,
    },

    /// Too few hypotheses for the requested computation
    #[error("At least {required} hypotheses are required, found {actual}")]
    InsufficientHypotheses {
        /// Minimum required
        required: usize,
        /// Hypotheses supplied
        actual: usize,
    },

    /// The same hypothesis id appears twice in a snapshot
    #[error("Duplicate hypothesis id: {0}")]
    DuplicateHypothesis(HypothesisId),

    /// The same evidence id appears twice in a snapshot
    #[error("Duplicate evidence id: {0}")]
    DuplicateEvidence(EvidenceId),

    /// A hypothesis id is the empty string
    #[error("Hypothesis id must not be empty")]
    EmptyHypothesisId,

    /// An evidence id is the empty string
    #[error("Evidence id must not be empty")]
    EmptyEvidenceId,

    /// A write addressed a hypothesis outside the matrix
    #[error("Unknown hypothesis: {0}")]
    UnknownHypothesis(HypothesisId),

    /// A write addressed evidence outside the matrix
    #[error("Unknown evidence: {0}")]
    UnknownEvidence(EvidenceId),
}

impl EngineError {
    /// Stable machine-readable name for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::OutOfRange { .. } => "out_of_range",
            EngineError::InsufficientHypotheses { .. } => "insufficient_hypotheses",
            EngineError::DuplicateHypothesis(_) => "duplicate_hypothesis",
            EngineError::DuplicateEvidence(_) => "duplicate_evidence",
            EngineError::EmptyHypothesisId => "empty_hypothesis_id",
            EngineError::EmptyEvidenceId => "empty_evidence_id",
            EngineError::UnknownHypothesis(_) => "unknown_hypothesis",
            EngineError::UnknownEvidence(_) => "unknown_evidence",
        }
    }
}

/// What a dangling score failed to reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanKind {
    /// Hypothesis id not present in the snapshot
    UnknownHypothesis,
    /// Evidence id not present in the snapshot
    UnknownEvidence,
    /// Neither id is present in the snapshot
    UnknownBoth,
}

/// Advisory warning for a score that references ids outside the snapshot
///
/// Orphans are excluded from computation and reported next to the result,
/// so one bad record never aborts a whole analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanScore {
    /// Hypothesis id carried by the score
    pub hypothesis_id: HypothesisId,
    /// Evidence id carried by the score
    pub evidence_id: EvidenceId,
    /// Which side of the key is dangling
    pub kind: OrphanKind,
}

impl fmt::Display for OrphanScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            OrphanKind::UnknownHypothesis => "unknown hypothesis",
            OrphanKind::UnknownEvidence => "unknown evidence",
            OrphanKind::UnknownBoth => "unknown hypothesis and evidence",
        };
        write!(
            f,
            "Score ({}, {}) ignored: {}",
            self.hypothesis_id, self.evidence_id, what
        )
    }
}
