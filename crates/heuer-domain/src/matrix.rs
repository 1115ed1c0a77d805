//! Score matrix - sparse (hypothesis, evidence) -> value store
//!
//! Only explicitly entered cells are stored. An absent cell reads as `0`
//! for every computation but stays distinguishable from an explicit `0`
//! through [`ScoreMatrix::has_explicit_score`], which completeness
//! reporting relies on.

use crate::error::EngineError;
use crate::ids::{EvidenceId, HypothesisId};
use crate::scale::ScaleType;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Composite key of a matrix cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScoreKey {
    /// Hypothesis side of the key
    pub hypothesis_id: HypothesisId,
    /// Evidence side of the key
    pub evidence_id: EvidenceId,
}

impl ScoreKey {
    /// Build a key from its two ids
    pub fn new(hypothesis_id: impl Into<HypothesisId>, evidence_id: impl Into<EvidenceId>) -> Self {
        Self {
            hypothesis_id: hypothesis_id.into(),
            evidence_id: evidence_id.into(),
        }
    }
}

/// A validated score
///
/// Only [`ScoreMatrix::set`] and [`ScoreMatrix::set_at`] construct scores,
/// so every `Score` in circulation lies within its matrix's scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Score {
    hypothesis_id: HypothesisId,
    evidence_id: EvidenceId,
    value: i32,
    updated_at: u64,
}

impl Score {
    /// Hypothesis this score applies to
    pub fn hypothesis_id(&self) -> &HypothesisId {
        &self.hypothesis_id
    }

    /// Evidence this score applies to
    pub fn evidence_id(&self) -> &EvidenceId {
        &self.evidence_id
    }

    /// Signed strength; positive supports, negative contradicts
    pub fn value(&self) -> i32 {
        self.value
    }

    /// When the cell was last written (milliseconds since Unix epoch)
    pub fn updated_at(&self) -> u64 {
        self.updated_at
    }

    /// Key of the cell holding this score
    pub fn key(&self) -> ScoreKey {
        ScoreKey::new(self.hypothesis_id.clone(), self.evidence_id.clone())
    }
}

/// How much of the matrix has been explicitly scored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Completeness {
    /// Cells carrying an explicit score (including explicit zeros)
    pub explicit_cells: usize,
    /// Hypotheses x evidence
    pub total_cells: usize,
    /// `100 * explicit / total`, or `0.0` for an empty matrix
    pub percent: f64,
}

/// Sparse score store over a fixed scale and ordered axes
///
/// Hypothesis axis order is the tie-break order used by the calculators.
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    scale: ScaleType,
    hypotheses: Vec<HypothesisId>,
    evidence: Vec<EvidenceId>,
    hypothesis_index: HashSet<HypothesisId>,
    evidence_index: HashSet<EvidenceId>,
    cells: HashMap<(HypothesisId, EvidenceId), Score>,
}

impl ScoreMatrix {
    /// Create an empty matrix over the given axes
    ///
    /// # Errors
    /// Returns [`EngineError::DuplicateHypothesis`] or
    /// [`EngineError::DuplicateEvidence`] when an axis repeats an id, and
    /// [`EngineError::EmptyHypothesisId`] or [`EngineError::EmptyEvidenceId`]
    /// for an empty id.
    pub fn new<H, E>(scale: ScaleType, hypotheses: H, evidence: E) -> Result<Self, EngineError>
    where
        H: IntoIterator<Item = HypothesisId>,
        E: IntoIterator<Item = EvidenceId>,
    {
        let mut matrix = Self {
            scale,
            hypotheses: Vec::new(),
            evidence: Vec::new(),
            hypothesis_index: HashSet::new(),
            evidence_index: HashSet::new(),
            cells: HashMap::new(),
        };

        for id in hypotheses {
            matrix.add_hypothesis(id)?;
        }
        for id in evidence {
            matrix.add_evidence(id)?;
        }

        Ok(matrix)
    }

    /// Append a hypothesis to the end of the axis
    pub fn add_hypothesis(&mut self, id: HypothesisId) -> Result<(), EngineError> {
        if id.as_str().is_empty() {
            return Err(EngineError::EmptyHypothesisId);
        }
        if !self.hypothesis_index.insert(id.clone()) {
            return Err(EngineError::DuplicateHypothesis(id));
        }
        self.hypotheses.push(id);
        Ok(())
    }

    /// Append an evidence item to the end of the axis
    pub fn add_evidence(&mut self, id: EvidenceId) -> Result<(), EngineError> {
        if id.as_str().is_empty() {
            return Err(EngineError::EmptyEvidenceId);
        }
        if !self.evidence_index.insert(id.clone()) {
            return Err(EngineError::DuplicateEvidence(id));
        }
        self.evidence.push(id);
        Ok(())
    }

    /// Active scale
    pub fn scale(&self) -> ScaleType {
        self.scale
    }

    /// Hypothesis axis in tie-break order
    pub fn hypotheses(&self) -> &[HypothesisId] {
        &self.hypotheses
    }

    /// Evidence axis in insertion order
    pub fn evidence(&self) -> &[EvidenceId] {
        &self.evidence
    }

    /// Check whether a hypothesis is on the axis
    pub fn contains_hypothesis(&self, id: &HypothesisId) -> bool {
        self.hypothesis_index.contains(id)
    }

    /// Check whether an evidence item is on the axis
    pub fn contains_evidence(&self, id: &EvidenceId) -> bool {
        self.evidence_index.contains(id)
    }

    /// Write a cell, stamping it with the current time
    ///
    /// Last write wins: an existing cell is overwritten, never merged.
    ///
    /// # Errors
    /// Returns [`EngineError::OutOfRange`] for a value outside the scale, or
    /// `UnknownHypothesis` / `UnknownEvidence` for a key off the axes.
    pub fn set(
        &mut self,
        hypothesis_id: &HypothesisId,
        evidence_id: &EvidenceId,
        value: i32,
    ) -> Result<(), EngineError> {
        self.set_at(hypothesis_id, evidence_id, value, now_millis())
    }

    /// Write a cell with an explicit `updated_at` timestamp
    ///
    /// The timestamp is recorded as given; ordering across writers is
    /// decided by call order, not by timestamp.
    pub fn set_at(
        &mut self,
        hypothesis_id: &HypothesisId,
        evidence_id: &EvidenceId,
        value: i32,
        updated_at: u64,
    ) -> Result<(), EngineError> {
        let value = self.scale.validate(value)?;
        self.check_key(hypothesis_id, evidence_id)?;

        self.cells.insert(
            (hypothesis_id.clone(), evidence_id.clone()),
            Score {
                hypothesis_id: hypothesis_id.clone(),
                evidence_id: evidence_id.clone(),
                value,
                updated_at,
            },
        );
        Ok(())
    }

    /// Read a cell; absent cells read as `0`
    pub fn get(&self, hypothesis_id: &HypothesisId, evidence_id: &EvidenceId) -> i32 {
        self.score(hypothesis_id, evidence_id)
            .map(Score::value)
            .unwrap_or(0)
    }

    /// The stored score for a cell, if one was ever entered
    pub fn score(&self, hypothesis_id: &HypothesisId, evidence_id: &EvidenceId) -> Option<&Score> {
        // Borrowed tuple lookups need owned keys with HashMap<(A, B), _>
        self.cells
            .get(&(hypothesis_id.clone(), evidence_id.clone()))
    }

    /// Whether the cell was explicitly scored (an explicit `0` counts)
    pub fn has_explicit_score(&self, hypothesis_id: &HypothesisId, evidence_id: &EvidenceId) -> bool {
        self.score(hypothesis_id, evidence_id).is_some()
    }

    /// Return a cell to the never-scored state
    pub fn clear(&mut self, hypothesis_id: &HypothesisId, evidence_id: &EvidenceId) -> Option<Score> {
        self.cells
            .remove(&(hypothesis_id.clone(), evidence_id.clone()))
    }

    /// All scores for one evidence item, in hypothesis axis order
    ///
    /// Every hypothesis appears; unscored cells carry `0`.
    pub fn column_for(&self, evidence_id: &EvidenceId) -> Vec<(HypothesisId, i32)> {
        self.hypotheses
            .iter()
            .map(|h| (h.clone(), self.get(h, evidence_id)))
            .collect()
    }

    /// All scores for one hypothesis, in evidence axis order
    ///
    /// Every evidence item appears; unscored cells carry `0`.
    pub fn row_for(&self, hypothesis_id: &HypothesisId) -> Vec<(EvidenceId, i32)> {
        self.evidence
            .iter()
            .map(|e| (e.clone(), self.get(hypothesis_id, e)))
            .collect()
    }

    /// Explicit scores in axis order (hypothesis-major)
    pub fn explicit_scores(&self) -> Vec<&Score> {
        self.hypotheses
            .iter()
            .flat_map(|h| self.evidence.iter().filter_map(move |e| self.score(h, e)))
            .collect()
    }

    /// Number of explicitly scored cells
    pub fn explicit_count(&self) -> usize {
        self.cells.len()
    }

    /// Share of cells carrying an explicit score
    pub fn completeness(&self) -> Completeness {
        let total_cells = self.hypotheses.len() * self.evidence.len();
        let explicit_cells = self.cells.len();
        let percent = if total_cells == 0 {
            0.0
        } else {
            100.0 * explicit_cells as f64 / total_cells as f64
        };

        Completeness {
            explicit_cells,
            total_cells,
            percent,
        }
    }

    /// Switch scale, removing every cell the new bounds reject
    ///
    /// Removed cells are returned in axis order so the caller can ask for
    /// them to be re-entered. Values are never clamped.
    pub fn change_scale(&mut self, scale: ScaleType) -> Vec<Score> {
        let invalid: Vec<ScoreKey> = self
            .explicit_scores()
            .into_iter()
            .filter(|s| scale.validate(s.value).is_err())
            .map(Score::key)
            .collect();

        self.scale = scale;

        invalid
            .into_iter()
            .filter_map(|key| self.cells.remove(&(key.hypothesis_id, key.evidence_id)))
            .collect()
    }

    fn check_key(&self, hypothesis_id: &HypothesisId, evidence_id: &EvidenceId) -> Result<(), EngineError> {
        if !self.contains_hypothesis(hypothesis_id) {
            return Err(EngineError::UnknownHypothesis(hypothesis_id.clone()));
        }
        if !self.contains_evidence(evidence_id) {
            return Err(EngineError::UnknownEvidence(evidence_id.clone()));
        }
        Ok(())
    }
}

/// Current time in milliseconds since the Unix epoch
pub(crate) fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(id: &str) -> HypothesisId {
        HypothesisId::from(id)
    }

    fn e(id: &str) -> EvidenceId {
        EvidenceId::from(id)
    }

    fn matrix() -> ScoreMatrix {
        ScoreMatrix::new(
            ScaleType::Logarithmic,
            vec![h("H1"), h("H2")],
            vec![e("E1"), e("E2")],
        )
        .unwrap()
    }

    #[test]
    fn test_set_then_get() {
        let mut m = matrix();
        m.set(&h("H1"), &e("E1"), 3).unwrap();
        assert_eq!(m.get(&h("H1"), &e("E1")), 3);
    }

    #[test]
    fn test_absent_reads_zero() {
        let m = matrix();
        assert_eq!(m.get(&h("H2"), &e("E2")), 0);
        assert!(!m.has_explicit_score(&h("H2"), &e("E2")));
    }

    #[test]
    fn test_explicit_zero_is_distinguishable() {
        let mut m = matrix();
        m.set(&h("H1"), &e("E2"), 0).unwrap();
        assert_eq!(m.get(&h("H1"), &e("E2")), 0);
        assert!(m.has_explicit_score(&h("H1"), &e("E2")));
    }

    #[test]
    fn test_last_write_wins() {
        let mut m = matrix();
        m.set_at(&h("H1"), &e("E1"), 3, 100).unwrap();
        m.set_at(&h("H1"), &e("E1"), -1, 50).unwrap();

        let score = m.score(&h("H1"), &e("E1")).unwrap();
        assert_eq!(score.value(), -1);
        assert_eq!(score.updated_at(), 50);
        assert_eq!(m.explicit_count(), 1);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut m = matrix();
        let result = m.set(&h("H1"), &e("E1"), 6);
        assert!(matches!(result, Err(EngineError::OutOfRange { value: 6, .. })));
        assert!(!m.has_explicit_score(&h("H1"), &e("E1")));
    }

    #[test]
    fn test_rejected_write_keeps_previous_value() {
        let mut m = matrix();
        m.set(&h("H1"), &e("E1"), 2).unwrap();
        assert!(m.set(&h("H1"), &e("E1"), -9).is_err());
        assert_eq!(m.get(&h("H1"), &e("E1")), 2);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut m = matrix();
        assert!(matches!(
            m.set(&h("H9"), &e("E1"), 1),
            Err(EngineError::UnknownHypothesis(_))
        ));
        assert!(matches!(
            m.set(&h("H1"), &e("E9"), 1),
            Err(EngineError::UnknownEvidence(_))
        ));
    }

    #[test]
    fn test_duplicate_axis_rejected() {
        let result = ScoreMatrix::new(ScaleType::Linear, vec![h("H1"), h("H1")], Vec::new());
        assert!(matches!(result, Err(EngineError::DuplicateHypothesis(_))));
    }

    #[test]
    fn test_empty_axis_ids_rejected() {
        let result = ScoreMatrix::new(ScaleType::Linear, vec![h("H1"), h("")], Vec::new());
        assert_eq!(result.unwrap_err(), EngineError::EmptyHypothesisId);

        let mut m = matrix();
        assert_eq!(m.add_evidence(e("")), Err(EngineError::EmptyEvidenceId));
        assert_eq!(m.evidence().len(), 2);
    }

    #[test]
    fn test_column_and_row_include_implied_zeros() {
        let mut m = matrix();
        m.set(&h("H2"), &e("E1"), -2).unwrap();

        assert_eq!(m.column_for(&e("E1")), vec![(h("H1"), 0), (h("H2"), -2)]);
        assert_eq!(m.row_for(&h("H2")), vec![(e("E1"), -2), (e("E2"), 0)]);
    }

    #[test]
    fn test_clear() {
        let mut m = matrix();
        m.set(&h("H1"), &e("E1"), 1).unwrap();
        assert!(m.clear(&h("H1"), &e("E1")).is_some());
        assert!(!m.has_explicit_score(&h("H1"), &e("E1")));
        assert!(m.clear(&h("H1"), &e("E1")).is_none());
    }

    #[test]
    fn test_completeness() {
        let mut m = matrix();
        assert_eq!(m.completeness().percent, 0.0);

        m.set(&h("H1"), &e("E1"), 0).unwrap();
        let c = m.completeness();
        assert_eq!(c.explicit_cells, 1);
        assert_eq!(c.total_cells, 4);
        assert_eq!(c.percent, 25.0);
    }

    #[test]
    fn test_change_scale_removes_invalid_cells() {
        let mut m = matrix();
        m.set(&h("H1"), &e("E1"), 5).unwrap();
        m.set(&h("H1"), &e("E2"), -2).unwrap();
        m.set(&h("H2"), &e("E1"), -4).unwrap();

        let removed = m.change_scale(ScaleType::Linear);

        let keys: Vec<ScoreKey> = removed.iter().map(Score::key).collect();
        assert_eq!(keys, vec![ScoreKey::new("H1", "E1"), ScoreKey::new("H2", "E1")]);
        assert_eq!(m.scale(), ScaleType::Linear);
        assert_eq!(m.get(&h("H1"), &e("E2")), -2);
        assert!(!m.has_explicit_score(&h("H1"), &e("E1")));
    }
}
