//! Analysis session - the aggregate a persistence collaborator stores
//!
//! A session fixes one scale, an ordered list of hypotheses (at least one),
//! the evidence references and the score matrix. The engine only ever sees
//! the session through [`AnalysisSession::snapshot`].

use crate::error::EngineError;
use crate::hypothesis::{sort_by_order, EvidenceRef, Hypothesis};
use crate::ids::{EvidenceId, HypothesisId, SessionId};
use crate::matrix::{Completeness, Score, ScoreMatrix};
use crate::scale::ScaleType;
use crate::snapshot::{AnalysisSnapshot, ScoreEntry};
use serde::{Deserialize, Serialize};

/// A live analysis session
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    id: SessionId,
    title: String,
    created_at: u64,
    hypotheses: Vec<Hypothesis>,
    evidence: Vec<EvidenceRef>,
    matrix: ScoreMatrix,
}

/// Listing entry for a stored session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session identifier
    pub id: SessionId,
    /// Analysis title
    pub title: String,
    /// Scale fixed for the session
    pub scale_type: ScaleType,
    /// Number of hypotheses
    pub hypothesis_count: usize,
    /// Number of evidence references
    pub evidence_count: usize,
    /// Creation time (milliseconds since Unix epoch)
    pub created_at: u64,
}

impl AnalysisSession {
    /// Start a new session with a fresh id
    ///
    /// `created_at` is the millisecond timestamp carried by the UUIDv7 id.
    ///
    /// # Errors
    /// `InsufficientHypotheses` when no hypothesis is given, or a duplicate id error.
    pub fn new(
        title: impl Into<String>,
        scale: ScaleType,
        hypotheses: Vec<Hypothesis>,
        evidence: Vec<EvidenceRef>,
    ) -> Result<Self, EngineError> {
        let id = SessionId::new();
        Self::from_parts(id, title, id.timestamp(), scale, hypotheses, evidence)
    }

    /// Rebuild a session from stored parts (scores are added afterwards)
    pub fn from_parts(
        id: SessionId,
        title: impl Into<String>,
        created_at: u64,
        scale: ScaleType,
        mut hypotheses: Vec<Hypothesis>,
        evidence: Vec<EvidenceRef>,
    ) -> Result<Self, EngineError> {
        if hypotheses.is_empty() {
            return Err(EngineError::InsufficientHypotheses {
                required: 1,
                actual: 0,
            });
        }

        sort_by_order(&mut hypotheses);
        let matrix = ScoreMatrix::new(
            scale,
            hypotheses.iter().map(|h| h.id.clone()),
            evidence.iter().map(|e| e.id.clone()),
        )?;

        Ok(Self {
            id,
            title: title.into(),
            created_at,
            hypotheses,
            evidence,
            matrix,
        })
    }

    /// Session identifier
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Analysis title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Creation time (milliseconds since Unix epoch)
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Active scale
    pub fn scale(&self) -> ScaleType {
        self.matrix.scale()
    }

    /// Hypotheses in tie-break order
    pub fn hypotheses(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    /// Evidence references in insertion order
    pub fn evidence(&self) -> &[EvidenceRef] {
        &self.evidence
    }

    /// Score matrix
    pub fn matrix(&self) -> &ScoreMatrix {
        &self.matrix
    }

    /// Write a score (last write wins)
    pub fn set_score(
        &mut self,
        hypothesis_id: &HypothesisId,
        evidence_id: &EvidenceId,
        value: i32,
    ) -> Result<(), EngineError> {
        self.matrix.set(hypothesis_id, evidence_id, value)
    }

    /// Restore a stored score with its original timestamp
    pub fn restore_score(
        &mut self,
        hypothesis_id: &HypothesisId,
        evidence_id: &EvidenceId,
        value: i32,
        updated_at: u64,
    ) -> Result<(), EngineError> {
        self.matrix.set_at(hypothesis_id, evidence_id, value, updated_at)
    }

    /// Return a cell to the never-scored state
    pub fn clear_score(&mut self, hypothesis_id: &HypothesisId, evidence_id: &EvidenceId) -> Option<Score> {
        self.matrix.clear(hypothesis_id, evidence_id)
    }

    /// Switch scale; cells outside the new bounds are removed and returned
    pub fn change_scale(&mut self, scale: ScaleType) -> Vec<Score> {
        self.matrix.change_scale(scale)
    }

    /// Share of cells explicitly scored
    pub fn completeness(&self) -> Completeness {
        self.matrix.completeness()
    }

    /// Read-only snapshot for the engine
    pub fn snapshot(&self) -> AnalysisSnapshot {
        AnalysisSnapshot {
            scale_type: self.scale(),
            hypotheses: self.hypotheses.clone(),
            evidence_ids: self.evidence.iter().map(|e| e.id.clone()).collect(),
            scores: self
                .matrix
                .explicit_scores()
                .into_iter()
                .map(|s| ScoreEntry {
                    hypothesis_id: s.hypothesis_id().clone(),
                    evidence_id: s.evidence_id().clone(),
                    value: s.value(),
                    updated_at: Some(s.updated_at()),
                })
                .collect(),
        }
    }

    /// Listing entry for this session
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            title: self.title.clone(),
            scale_type: self.scale(),
            hypothesis_count: self.hypotheses.len(),
            evidence_count: self.evidence.len(),
            created_at: self.created_at,
        }
    }
}
