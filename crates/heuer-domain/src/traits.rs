//! Trait definitions for external interactions
//!
//! These traits define the boundary between the engine and its persistence
//! collaborator. Implementations live in other crates.

use crate::hypothesis::{EvidenceRef, Hypothesis};
use crate::ids::{EvidenceId, HypothesisId, SessionId};
use crate::matrix::ScoreKey;
use crate::scale::ScaleType;
use crate::session::{AnalysisSession, SessionSummary};

/// Trait for storing analysis sessions and their scores
///
/// Implemented by the infrastructure layer (heuer-store)
pub trait SessionStore {
    /// Error type for store operations
    type Error;

    /// Create a session and return its id
    fn create_session(
        &mut self,
        title: &str,
        scale: ScaleType,
        hypotheses: Vec<Hypothesis>,
        evidence: Vec<EvidenceRef>,
    ) -> Result<SessionId, Self::Error>;

    /// Load a session with all of its scores
    fn get_session(&self, id: SessionId) -> Result<Option<AnalysisSession>, Self::Error>;

    /// List stored sessions, oldest first
    fn list_sessions(&self) -> Result<Vec<SessionSummary>, Self::Error>;

    /// Validate and write one score (last write wins per cell)
    fn put_score(
        &mut self,
        id: SessionId,
        hypothesis_id: &HypothesisId,
        evidence_id: &EvidenceId,
        value: i32,
    ) -> Result<(), Self::Error>;

    /// Remove one score; returns whether a cell was present
    fn clear_score(
        &mut self,
        id: SessionId,
        hypothesis_id: &HypothesisId,
        evidence_id: &EvidenceId,
    ) -> Result<bool, Self::Error>;

    /// Switch the session scale, deleting invalidated scores and returning their keys
    fn change_scale(&mut self, id: SessionId, scale: ScaleType) -> Result<Vec<ScoreKey>, Self::Error>;

    /// Delete a session; returns whether it existed
    fn delete_session(&mut self, id: SessionId) -> Result<bool, Self::Error>;
}
