//! Diagnosticity calculator
//!
//! Measures how well one evidence item discriminates between hypotheses.
//! Evidence scored identically everywhere cannot eliminate anything; a wide
//! spread across hypotheses is highly diagnostic.
//!
//! For evidence `e` with scores `s_h` (missing cells read as 0):
//!
//! ```text
//! range         = max(s_h) - min(s_h)
//! diagnosticity = round(100 * range / (scale.max - scale.min))   clamped to [0, 100]
//! ```

use crate::error::EngineError;
use crate::ids::{EvidenceId, HypothesisId};
use crate::matrix::ScoreMatrix;
use crate::scale::ScaleType;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Fewest hypotheses that give evidence something to discriminate between
pub const MIN_HYPOTHESES: usize = 2;

/// Diagnosticity of one evidence item (derived, never persisted)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticityResult {
    /// Evidence the rating applies to
    pub evidence_id: EvidenceId,

    /// Rating in [0, 100]
    pub score: u8,

    /// Templated explanation naming the extreme hypotheses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Rate every evidence item in the matrix, in evidence insertion order
///
/// # Errors
/// Returns [`EngineError::InsufficientHypotheses`] when the matrix holds fewer
/// than two hypotheses. A matrix with no evidence yields an empty result.
pub fn evaluate(matrix: &ScoreMatrix) -> Result<Vec<DiagnosticityResult>, EngineError> {
    let hypothesis_count = matrix.hypotheses().len();
    if hypothesis_count < MIN_HYPOTHESES {
        return Err(EngineError::InsufficientHypotheses {
            required: MIN_HYPOTHESES,
            actual: hypothesis_count,
        });
    }

    Ok(matrix
        .evidence()
        .iter()
        .map(|evidence_id| rate(matrix, evidence_id))
        .collect())
}

/// Sort results most-diagnostic first
///
/// The sort is stable, so ties keep evidence insertion order as long as the
/// input came from [`evaluate`].
pub fn sort_by_diagnosticity(results: &mut [DiagnosticityResult]) {
    results.sort_by_key(|r| Reverse(r.score));
}

/// Convert a score range into a 0-100 rating for a scale
pub fn rating(scale: ScaleType, range: i32) -> u8 {
    let max_range = scale.max_range();
    if max_range <= 0 {
        return 0;
    }
    let raw = (100.0 * f64::from(range) / f64::from(max_range)).round();
    raw.clamp(0.0, 100.0) as u8
}

fn rate(matrix: &ScoreMatrix, evidence_id: &EvidenceId) -> DiagnosticityResult {
    let column = matrix.column_for(evidence_id);

    // Column is in tie-break order; strict comparisons keep the first extreme
    let mut high = &column[0];
    let mut low = &column[0];
    for cell in &column[1..] {
        if cell.1 > high.1 {
            high = cell;
        }
        if cell.1 < low.1 {
            low = cell;
        }
    }

    let range = high.1 - low.1;
    let score = rating(matrix.scale(), range);

    DiagnosticityResult {
        evidence_id: evidence_id.clone(),
        score,
        reasoning: Some(explain(matrix.scale(), range, high, low)),
    }
}

fn explain(scale: ScaleType, range: i32, high: &(HypothesisId, i32), low: &(HypothesisId, i32)) -> String {
    if range == 0 {
        return format!(
            "Every hypothesis scores {} ({}); this evidence does not discriminate between them.",
            signed(high.1),
            scale.label(high.1)
        );
    }

    format!(
        "Spread of {} out of {}: most consistent with {} ({}), least consistent with {} ({}).",
        range,
        scale.max_range(),
        high.0,
        signed(high.1),
        low.0,
        signed(low.1)
    )
}

fn signed(value: i32) -> String {
    if value > 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}
