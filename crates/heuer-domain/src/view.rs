//! Matrix view for rendering collaborators
//!
//! Lays the score matrix out the way analysts read an ACH grid: one row per
//! evidence item, one column per hypothesis, cells as consistency glyphs.

use crate::ids::{EvidenceId, HypothesisId};
use crate::matrix::ScoreMatrix;
use serde::{Deserialize, Serialize};

/// Glyph legend shared by every scale
pub const LEGEND: &[(&str, &str)] = &[
    ("++", "Strongly Supports"),
    ("+", "Supports"),
    ("0", "Neutral"),
    ("-", "Contradicts"),
    ("--", "Strongly Contradicts"),
];

/// One rendered cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixCell {
    /// Numeric value (0 when unscored)
    pub value: i32,
    /// Consistency glyph
    pub symbol: String,
    /// Whether the analyst entered this cell
    pub explicit: bool,
}

/// One evidence row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRow {
    /// Evidence the row belongs to
    pub evidence_id: EvidenceId,
    /// Cells in hypothesis column order
    pub cells: Vec<MatrixCell>,
}

/// Full rendered grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixView {
    /// Column headers in tie-break order
    pub hypotheses: Vec<HypothesisId>,
    /// Rows in evidence insertion order
    pub rows: Vec<MatrixRow>,
}

/// Render a matrix into glyph rows
pub fn render_matrix(matrix: &ScoreMatrix) -> MatrixView {
    let scale = matrix.scale();
    let rows = matrix
        .evidence()
        .iter()
        .map(|e| MatrixRow {
            evidence_id: e.clone(),
            cells: matrix
                .hypotheses()
                .iter()
                .map(|h| {
                    let value = matrix.get(h, e);
                    MatrixCell {
                        value,
                        symbol: scale.symbol(value).to_string(),
                        explicit: matrix.has_explicit_score(h, e),
                    }
                })
                .collect(),
        })
        .collect();

    MatrixView {
        hypotheses: matrix.hypotheses().to_vec(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::ScaleType;

    #[test]
    fn test_render_matrix() {
        let mut m = ScoreMatrix::new(
            ScaleType::Logarithmic,
            vec![HypothesisId::from("H1"), HypothesisId::from("H2")],
            vec![EvidenceId::from("E1")],
        )
        .unwrap();
        m.set(&"H1".into(), &"E1".into(), 5).unwrap();

        let view = render_matrix(&m);
        assert_eq!(view.rows.len(), 1);

        let cells = &view.rows[0].cells;
        assert_eq!(cells[0].symbol, "++");
        assert!(cells[0].explicit);
        assert_eq!(cells[1].symbol, "0");
        assert!(!cells[1].explicit);
    }
}
