//! Likelihood ranker
//!
//! Ranks hypotheses by how little the evidence contradicts them, following
//! ACH's inversion of confirmation-seeking:
//!
//! 1. `weighted_score` = sum of the hypothesis row (missing cells read as 0)
//! 2. supporting / contradicting / neutral counts by sign
//! 3. rank descending by `weighted_score`, ties to the lower `order`
//! 4. `likelihood_percent` = min-max normalisation to [0, 100], or a uniform
//!    `100 / n` split when every hypothesis ties
//! 5. confidence from the percentage gap between ranks 1 and 2

use crate::error::EngineError;
use crate::ids::HypothesisId;
use crate::matrix::ScoreMatrix;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;

/// Gap (in percentage points) above which the leader is a clear winner
pub const HIGH_CONFIDENCE_GAP: f64 = 20.0;

/// Gap (in percentage points) from which the leader is a probable winner
pub const MEDIUM_CONFIDENCE_GAP: f64 = 10.0;

/// Fewest hypotheses that can be ranked against each other
pub const MIN_HYPOTHESES: usize = 2;

/// Tunable thresholds for the confidence label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodPolicy {
    /// Gaps strictly above this are `high`
    #[serde(default = "default_high_gap")]
    pub high_gap: f64,

    /// Gaps from this up to `high_gap` are `medium`; below is `low`
    #[serde(default = "default_medium_gap")]
    pub medium_gap: f64,
}

fn default_high_gap() -> f64 {
    HIGH_CONFIDENCE_GAP
}

fn default_medium_gap() -> f64 {
    MEDIUM_CONFIDENCE_GAP
}

impl Default for LikelihoodPolicy {
    fn default() -> Self {
        Self {
            high_gap: HIGH_CONFIDENCE_GAP,
            medium_gap: MEDIUM_CONFIDENCE_GAP,
        }
    }
}

impl LikelihoodPolicy {
    /// Create a policy with explicit thresholds
    ///
    /// # Errors
    /// Returns an error if a threshold is negative or not finite, or if
    /// `medium_gap > high_gap`.
    pub fn new(high_gap: f64, medium_gap: f64) -> Result<Self, String> {
        let policy = Self { high_gap, medium_gap };
        policy.validate()?;
        Ok(policy)
    }

    /// Check that the thresholds are usable
    pub fn validate(&self) -> Result<(), String> {
        if !self.high_gap.is_finite() || !self.medium_gap.is_finite() {
            return Err("Confidence thresholds must be finite".to_string());
        }
        if self.high_gap < 0.0 || self.medium_gap < 0.0 {
            return Err("Confidence thresholds must be non-negative".to_string());
        }
        if self.medium_gap > self.high_gap {
            return Err(format!(
                "medium_gap ({}) must not exceed high_gap ({})",
                self.medium_gap, self.high_gap
            ));
        }
        Ok(())
    }

    /// Confidence label for a rank-1 / rank-2 gap
    ///
    /// `None` means there is no second hypothesis to compare against.
    pub fn confidence(&self, gap: Option<f64>) -> ConfidenceLevel {
        match gap {
            None => ConfidenceLevel::NotApplicable,
            Some(gap) if gap > self.high_gap => ConfidenceLevel::High,
            Some(gap) if gap >= self.medium_gap => ConfidenceLevel::Medium,
            Some(_) => ConfidenceLevel::Low,
        }
    }
}

/// How clearly the top hypothesis leads the runner-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    /// Gap above the high threshold
    High,
    /// Gap between the medium and high thresholds (inclusive)
    Medium,
    /// Gap below the medium threshold
    Low,
    /// Fewer than two hypotheses
    NotApplicable,
}

impl ConfidenceLevel {
    /// Get the label as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::NotApplicable => "not_applicable",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ranked assessment of one hypothesis (derived, never persisted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodResult {
    /// Hypothesis being ranked
    pub hypothesis_id: HypothesisId,
    /// 1 = most likely
    pub rank: usize,
    /// Sum of the hypothesis row
    pub weighted_score: i64,
    /// Evidence scored above zero
    pub supporting_count: usize,
    /// Evidence scored below zero
    pub contradicting_count: usize,
    /// Evidence at zero, explicit or implied
    pub neutral_count: usize,
    /// Normalised likelihood in [0, 100]
    pub likelihood_percent: f64,
}

/// Full ranking plus the confidence label for the leader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodAssessment {
    /// Results in rank order
    pub results: Vec<LikelihoodResult>,
    /// Confidence that rank 1 beats rank 2
    pub confidence: ConfidenceLevel,
    /// Percentage-point gap between ranks 1 and 2
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,
}

impl LikelihoodAssessment {
    /// The rank-1 hypothesis
    pub fn leader(&self) -> Option<&LikelihoodResult> {
        self.results.first()
    }
}

/// Rank every hypothesis in the matrix
///
/// # Errors
/// Returns [`EngineError::InsufficientHypotheses`] when fewer than two
/// hypotheses are present.
pub fn rank(matrix: &ScoreMatrix, policy: &LikelihoodPolicy) -> Result<LikelihoodAssessment, EngineError> {
    let hypothesis_count = matrix.hypotheses().len();
    if hypothesis_count < MIN_HYPOTHESES {
        return Err(EngineError::InsufficientHypotheses {
            required: MIN_HYPOTHESES,
            actual: hypothesis_count,
        });
    }

    let mut results: Vec<LikelihoodResult> = matrix
        .hypotheses()
        .iter()
        .map(|h| tally(matrix, h))
        .collect();

    // Axis order is tie-break order, so a stable sort settles ties
    results.sort_by_key(|r| Reverse(r.weighted_score));

    let min = results.iter().map(|r| r.weighted_score).min().unwrap_or(0);
    let max = results.iter().map(|r| r.weighted_score).max().unwrap_or(0);

    for (position, result) in results.iter_mut().enumerate() {
        result.rank = position + 1;
        result.likelihood_percent = normalise(result.weighted_score, min, max, hypothesis_count);
    }

    let gap = match results.as_slice() {
        [first, second, ..] => Some(first.likelihood_percent - second.likelihood_percent),
        _ => None,
    };

    Ok(LikelihoodAssessment {
        confidence: policy.confidence(gap),
        gap,
        results,
    })
}

fn tally(matrix: &ScoreMatrix, hypothesis_id: &HypothesisId) -> LikelihoodResult {
    let mut result = LikelihoodResult {
        hypothesis_id: hypothesis_id.clone(),
        rank: 0,
        weighted_score: 0,
        supporting_count: 0,
        contradicting_count: 0,
        neutral_count: 0,
        likelihood_percent: 0.0,
    };

    for (_, value) in matrix.row_for(hypothesis_id) {
        result.weighted_score += i64::from(value);
        match value {
            v if v > 0 => result.supporting_count += 1,
            v if v < 0 => result.contradicting_count += 1,
            _ => result.neutral_count += 1,
        }
    }

    result
}

fn normalise(score: i64, min: i64, max: i64, count: usize) -> f64 {
    if max == min {
        return 100.0 / count as f64;
    }
    100.0 * (score - min) as f64 / (max - min) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::EvidenceId;
    use crate::scale::ScaleType;

    fn matrix(hypotheses: &[&str], evidence: &[&str]) -> ScoreMatrix {
        ScoreMatrix::new(
            ScaleType::Logarithmic,
            hypotheses.iter().map(|h| HypothesisId::from(*h)),
            evidence.iter().map(|e| EvidenceId::from(*e)),
        )
        .unwrap()
    }

    fn set(m: &mut ScoreMatrix, h: &str, e: &str, v: i32) {
        m.set(&h.into(), &e.into(), v).unwrap();
    }

    #[test]
    fn test_worked_example_tie() {
        let mut m = matrix(&["H1", "H2"], &["E1", "E2"]);
        set(&mut m, "H1", "E1", 3);
        set(&mut m, "H1", "E2", -1);
        set(&mut m, "H2", "E1", -2);
        set(&mut m, "H2", "E2", 4);

        let assessment = rank(&m, &LikelihoodPolicy::default()).unwrap();
        let r = &assessment.results;

        assert_eq!(r[0].hypothesis_id.as_str(), "H1");
        assert_eq!(r[1].hypothesis_id.as_str(), "H2");
        assert_eq!(r[0].weighted_score, 2);
        assert_eq!(r[1].weighted_score, 2);
        assert_eq!(r[0].likelihood_percent, 50.0);
        assert_eq!(r[1].likelihood_percent, 50.0);
        assert_eq!(assessment.confidence, ConfidenceLevel::Low);
    }

    #[test]
    fn test_counts() {
        let mut m = matrix(&["H1", "H2"], &["E1", "E2", "E3", "E4"]);
        set(&mut m, "H1", "E1", 3);
        set(&mut m, "H1", "E2", -1);
        set(&mut m, "H1", "E3", 0);

        let assessment = rank(&m, &LikelihoodPolicy::default()).unwrap();
        let h1 = assessment
            .results
            .iter()
            .find(|r| r.hypothesis_id.as_str() == "H1")
            .unwrap();

        assert_eq!(h1.supporting_count, 1);
        assert_eq!(h1.contradicting_count, 1);
        // explicit zero plus one implied zero
        assert_eq!(h1.neutral_count, 2);
    }

    #[test]
    fn test_normalisation_and_high_confidence() {
        let mut m = matrix(&["H1", "H2", "H3"], &["E1"]);
        set(&mut m, "H1", "E1", -5);
        set(&mut m, "H2", "E1", 5);
        set(&mut m, "H3", "E1", 0);

        let assessment = rank(&m, &LikelihoodPolicy::default()).unwrap();
        let ids: Vec<&str> = assessment.results.iter().map(|r| r.hypothesis_id.as_str()).collect();
        let percents: Vec<f64> = assessment.results.iter().map(|r| r.likelihood_percent).collect();
        let ranks: Vec<usize> = assessment.results.iter().map(|r| r.rank).collect();

        assert_eq!(ids, vec!["H2", "H3", "H1"]);
        assert_eq!(percents, vec![100.0, 50.0, 0.0]);
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(assessment.gap, Some(50.0));
        assert_eq!(assessment.confidence, ConfidenceLevel::High);
    }

    #[test]
    fn test_uniform_split_on_total_tie() {
        let m = matrix(&["H1", "H2", "H3"], &["E1"]);
        let assessment = rank(&m, &LikelihoodPolicy::default()).unwrap();

        for result in &assessment.results {
            assert!((result.likelihood_percent - 100.0 / 3.0).abs() < f64::EPSILON);
        }
        assert_eq!(assessment.confidence, ConfidenceLevel::Low);
    }

    #[test]
    fn test_confidence_thresholds() {
        let policy = LikelihoodPolicy::default();
        assert_eq!(policy.confidence(Some(20.5)), ConfidenceLevel::High);
        assert_eq!(policy.confidence(Some(20.0)), ConfidenceLevel::Medium);
        assert_eq!(policy.confidence(Some(10.0)), ConfidenceLevel::Medium);
        assert_eq!(policy.confidence(Some(9.99)), ConfidenceLevel::Low);
        assert_eq!(policy.confidence(None), ConfidenceLevel::NotApplicable);
    }

    #[test]
    fn test_custom_policy() {
        let policy = LikelihoodPolicy::new(40.0, 25.0).unwrap();
        assert_eq!(policy.confidence(Some(30.0)), ConfidenceLevel::Medium);
        assert!(LikelihoodPolicy::new(10.0, 20.0).is_err());
        assert!(LikelihoodPolicy::new(-1.0, -2.0).is_err());
    }

    #[test]
    fn test_single_hypothesis_rejected() {
        let m = matrix(&["H1"], &["E1"]);
        assert!(matches!(
            rank(&m, &LikelihoodPolicy::default()),
            Err(EngineError::InsufficientHypotheses { required: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_ties_keep_axis_order() {
        let mut m = matrix(&["H1", "H2", "H3"], &["E1"]);
        set(&mut m, "H3", "E1", 2);

        let assessment = rank(&m, &LikelihoodPolicy::default()).unwrap();
        let ids: Vec<&str> = assessment.results.iter().map(|r| r.hypothesis_id.as_str()).collect();
        assert_eq!(ids, vec!["H3", "H1", "H2"]);
    }
}
