//! Snapshot of an analysis as supplied by the persistence collaborator
//!
//! The engine never sees a live session. Callers hand it a snapshot, which is
//! turned into a validated [`ScoreMatrix`] before any computation runs.

use crate::engine::Assessment;
use crate::error::{EngineError, OrphanKind, OrphanScore};
use crate::hypothesis::{sort_by_order, Hypothesis};
use crate::ids::{EvidenceId, HypothesisId};
use crate::matrix::ScoreMatrix;
use crate::scale::ScaleType;
use serde::{Deserialize, Serialize};

/// One raw score record as it arrives from a collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Hypothesis side of the key
    pub hypothesis_id: HypothesisId,
    /// Evidence side of the key
    pub evidence_id: EvidenceId,
    /// Raw value, validated against the snapshot's scale
    pub value: i32,
    /// Last write time if the collaborator tracks it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
}

impl ScoreEntry {
    /// Build an entry without a timestamp
    pub fn new(
        hypothesis_id: impl Into<HypothesisId>,
        evidence_id: impl Into<EvidenceId>,
        value: i32,
    ) -> Self {
        Self {
            hypothesis_id: hypothesis_id.into(),
            evidence_id: evidence_id.into(),
            value,
            updated_at: None,
        }
    }
}

/// Read-only view of an analysis session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    /// Scale every score is validated against
    #[serde(default)]
    pub scale_type: ScaleType,

    /// Hypotheses; ranked by their `order` field
    pub hypotheses: Vec<Hypothesis>,

    /// Evidence ids in insertion order
    #[serde(default)]
    pub evidence_ids: Vec<EvidenceId>,

    /// Score records; later records for the same cell win
    #[serde(default)]
    pub scores: Vec<ScoreEntry>,
}

impl AnalysisSnapshot {
    /// Create a snapshot with no evidence or scores
    pub fn new(scale_type: ScaleType, hypotheses: Vec<Hypothesis>) -> Self {
        Self {
            scale_type,
            hypotheses,
            evidence_ids: Vec::new(),
            scores: Vec::new(),
        }
    }

    /// Add an evidence id
    pub fn with_evidence(mut self, id: impl Into<EvidenceId>) -> Self {
        self.evidence_ids.push(id.into());
        self
    }

    /// Add a score record
    pub fn with_score(
        mut self,
        hypothesis_id: impl Into<HypothesisId>,
        evidence_id: impl Into<EvidenceId>,
        value: i32,
    ) -> Self {
        self.scores.push(ScoreEntry::new(hypothesis_id, evidence_id, value));
        self
    }

    /// Hypotheses sorted into tie-break order
    pub fn ordered_hypotheses(&self) -> Vec<Hypothesis> {
        let mut hypotheses = self.hypotheses.clone();
        sort_by_order(&mut hypotheses);
        hypotheses
    }

    /// Build a validated score matrix from this snapshot
    ///
    /// Scores whose ids are missing from the snapshot are skipped and reported
    /// as warnings. Any in-scope score outside the scale fails the whole
    /// conversion.
    ///
    /// # Errors
    /// - [`EngineError::DuplicateHypothesis`] / [`EngineError::DuplicateEvidence`]
    /// - [`EngineError::OutOfRange`]
    pub fn to_matrix(&self) -> Result<Assessment<ScoreMatrix>, EngineError> {
        let hypotheses = self.ordered_hypotheses();
        let mut matrix = ScoreMatrix::new(
            self.scale_type,
            hypotheses.into_iter().map(|h| h.id),
            self.evidence_ids.iter().cloned(),
        )?;

        let mut warnings = Vec::new();
        for entry in &self.scores {
            let known_h = matrix.contains_hypothesis(&entry.hypothesis_id);
            let known_e = matrix.contains_evidence(&entry.evidence_id);

            let kind = match (known_h, known_e) {
                (true, true) => None,
                (false, true) => Some(OrphanKind::UnknownHypothesis),
                (true, false) => Some(OrphanKind::UnknownEvidence),
                (false, false) => Some(OrphanKind::UnknownBoth),
            };

            if let Some(kind) = kind {
                warnings.push(OrphanScore {
                    hypothesis_id: entry.hypothesis_id.clone(),
                    evidence_id: entry.evidence_id.clone(),
                    kind,
                });
                continue;
            }

            matrix.set_at(
                &entry.hypothesis_id,
                &entry.evidence_id,
                entry.value,
                entry.updated_at.unwrap_or(0),
            )?;
        }

        Ok(Assessment::with_warnings(matrix, warnings))
    }
}
