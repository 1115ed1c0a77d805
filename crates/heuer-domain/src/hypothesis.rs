//! Hypotheses and evidence references

use crate::ids::{EvidenceId, HypothesisId};
use serde::{Deserialize, Serialize};

/// A candidate explanation evaluated against the evidence pool
///
/// `order` is the display rank and the tie-break for every ranking in the
/// engine: lower order wins. Editing `text` after scoring does not
/// invalidate existing scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hypothesis {
    /// Identifier, unique within an analysis
    pub id: HypothesisId,

    /// The statement being evaluated
    pub text: String,

    /// Display and tie-break rank
    #[serde(default)]
    pub order: u32,
}

impl Hypothesis {
    /// Create a new hypothesis
    pub fn new(id: impl Into<HypothesisId>, text: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            order,
        }
    }
}

/// Reference to an item held by the evidence library
///
/// The engine only needs the id; the title is carried for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRef {
    /// Evidence identifier
    pub id: EvidenceId,

    /// Display title, if resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl EvidenceRef {
    /// Reference evidence by id only
    pub fn new(id: impl Into<EvidenceId>) -> Self {
        Self {
            id: id.into(),
            title: None,
        }
    }

    /// Attach a display title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title if known, otherwise the id
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Sort hypotheses by `order`, keeping definition order for equal ranks
pub fn sort_by_order(hypotheses: &mut [Hypothesis]) {
    hypotheses.sort_by_key(|h| h.order);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_order_is_stable() {
        let mut hypotheses = vec![
            Hypothesis::new("H3", "third", 2),
            Hypothesis::new("H1", "first", 0),
            Hypothesis::new("H2a", "tied a", 1),
            Hypothesis::new("H2b", "tied b", 1),
        ];
        sort_by_order(&mut hypotheses);

        let ids: Vec<&str> = hypotheses.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["H1", "H2a", "H2b", "H3"]);
    }

    #[test]
    fn test_evidence_display_name() {
        assert_eq!(EvidenceRef::new("E1").display_name(), "E1");
        assert_eq!(
            EvidenceRef::new("E1").with_title("Ransom note").display_name(),
            "Ransom note"
        );
    }

    #[test]
    fn test_order_defaults_to_zero() {
        let h: Hypothesis = serde_json::from_str(r#"{"id": "H1", "text": "x"}"#).unwrap();
        assert_eq!(h.order, 0);
    }
}
