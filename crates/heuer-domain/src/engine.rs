//! Engine entry points
//!
//! Both computations are pure functions of a snapshot: no state survives
//! between calls, and identical snapshots always produce identical output.

use crate::diagnosticity::{self, DiagnosticityResult};
use crate::error::{EngineError, OrphanScore};
use crate::likelihood::{self, LikelihoodAssessment, LikelihoodPolicy};
use crate::snapshot::AnalysisSnapshot;
use serde::{Deserialize, Serialize};

/// A successful result plus the advisory warnings collected on the way
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment<T> {
    /// The computed value
    pub value: T,
    /// Orphan scores skipped during the computation
    #[serde(default)]
    pub warnings: Vec<OrphanScore>,
}

impl<T> Assessment<T> {
    /// Wrap a value with no warnings
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Wrap a value with warnings
    pub fn with_warnings(value: T, warnings: Vec<OrphanScore>) -> Self {
        Self { value, warnings }
    }

    /// Transform the value with a fallible function, keeping the warnings
    pub fn and_then<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Assessment<U>, E> {
        Ok(Assessment {
            value: f(self.value)?,
            warnings: self.warnings,
        })
    }

    /// Whether any orphan scores were skipped
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Stateless evaluator configured with a likelihood policy
#[derive(Debug, Clone, Copy, Default)]
pub struct HypothesisEngine {
    policy: LikelihoodPolicy,
}

impl HypothesisEngine {
    /// Create an engine with the given confidence policy
    pub fn new(policy: LikelihoodPolicy) -> Self {
        Self { policy }
    }

    /// Policy in effect
    pub fn policy(&self) -> &LikelihoodPolicy {
        &self.policy
    }

    /// Rate every evidence item in the snapshot
    ///
    /// Results come back in evidence insertion order; use
    /// [`diagnosticity::sort_by_diagnosticity`] for most-diagnostic-first.
    ///
    /// # Errors
    /// `InsufficientHypotheses` for fewer than two hypotheses, plus any
    /// snapshot validation error.
    pub fn compute_diagnosticity(
        &self,
        snapshot: &AnalysisSnapshot,
    ) -> Result<Assessment<Vec<DiagnosticityResult>>, EngineError> {
        snapshot
            .to_matrix()?
            .and_then(|matrix| diagnosticity::evaluate(&matrix))
    }

    /// Rank every hypothesis in the snapshot
    ///
    /// # Errors
    /// `InsufficientHypotheses` for fewer than two hypotheses, plus any
    /// snapshot validation error.
    pub fn compute_likelihood(
        &self,
        snapshot: &AnalysisSnapshot,
    ) -> Result<Assessment<LikelihoodAssessment>, EngineError> {
        snapshot
            .to_matrix()?
            .and_then(|matrix| likelihood::rank(&matrix, &self.policy))
    }
}

/// Rate evidence using the default engine
pub fn compute_diagnosticity(
    snapshot: &AnalysisSnapshot,
) -> Result<Assessment<Vec<DiagnosticityResult>>, EngineError> {
    HypothesisEngine::default().compute_diagnosticity(snapshot)
}

/// Rank hypotheses using the default confidence policy
pub fn compute_likelihood(
    snapshot: &AnalysisSnapshot,
) -> Result<Assessment<LikelihoodAssessment>, EngineError> {
    HypothesisEngine::default().compute_likelihood(snapshot)
}
