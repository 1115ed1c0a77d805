//! Heuer Domain Layer
//!
//! Hypothesis evaluation engine for Analysis of Competing Hypotheses (ACH).
//! Scores how well each hypothesis survives a pool of evidence, how
//! diagnostic each evidence item is, and how confidently the leader wins.
//!
//! ## Key Concepts
//!
//! - **Scale**: logarithmic `[-5, +5]` or linear `[-3, +3]`, fixed per analysis
//! - **Score Matrix**: sparse (hypothesis, evidence) -> value store; absent reads as 0
//! - **Diagnosticity**: 0-100 spread of one evidence item across hypotheses
//! - **Likelihood**: ranking by weighted score, min-max normalised, with a
//!   confidence label for the leader
//!
//! ## Architecture
//!
//! - Pure, synchronous computation over a snapshot; no I/O, no logging
//! - Identical snapshots always produce identical results
//! - Storage is reached only through the [`traits::SessionStore`] trait
//!
//! # Examples
//!
//! ```
//! use heuer_domain::{compute_likelihood, AnalysisSnapshot, Hypothesis, ScaleType};
//!
//! let snapshot = AnalysisSnapshot::new(
//!     ScaleType::Logarithmic,
//!     vec![Hypothesis::new("H1", "State actor", 0), Hypothesis::new("H2", "Insider", 1)],
//! )
//! .with_evidence("E1")
//! .with_score("H1", "E1", 3)
//! .with_score("H2", "E1", -3);
//!
//! let ranking = compute_likelihood(&snapshot).unwrap().value;
//! assert_eq!(ranking.leader().unwrap().hypothesis_id.as_str(), "H1");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod diagnosticity;
pub mod engine;
pub mod error;
pub mod hypothesis;
pub mod ids;
pub mod likelihood;
pub mod matrix;
pub mod scale;
pub mod session;
pub mod snapshot;
pub mod traits;
pub mod view;

// Re-exports for convenience
pub use diagnosticity::{sort_by_diagnosticity, DiagnosticityResult};
pub use engine::{compute_diagnosticity, compute_likelihood, Assessment, HypothesisEngine};
pub use error::{EngineError, OrphanKind, OrphanScore};
pub use hypothesis::{EvidenceRef, Hypothesis};
pub use ids::{EvidenceId, HypothesisId, SessionId};
pub use likelihood::{ConfidenceLevel, LikelihoodAssessment, LikelihoodPolicy, LikelihoodResult};
pub use matrix::{Completeness, Score, ScoreKey, ScoreMatrix};
pub use scale::ScaleType;
pub use session::{AnalysisSession, SessionSummary};
pub use snapshot::{AnalysisSnapshot, ScoreEntry};
pub use view::{render_matrix, MatrixView};
