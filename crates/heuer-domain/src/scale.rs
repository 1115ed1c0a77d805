//! Scale policy - bounds, validation and labels for score values
//!
//! Two scales are supported. Each analysis fixes one for its lifetime:
//!
//! | Scale         | Bounds   | Anchors                          |
//! |---------------|----------|----------------------------------|
//! | `logarithmic` | -5 .. +5 | +5, +3, +1, 0, -1, -3, -5        |
//! | `linear`      | -3 .. +3 | every integer                    |

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anchors for the logarithmic scale, ordered by magnitude (positive side)
const LOGARITHMIC_ANCHORS: &[(i32, &str, &str)] = &[
    (5, "Very Strongly Supports", "Very Strongly Contradicts"),
    (3, "Strongly Supports", "Strongly Contradicts"),
    (1, "Supports", "Contradicts"),
];

/// Anchors for the linear scale, ordered by magnitude (positive side)
const LINEAR_ANCHORS: &[(i32, &str, &str)] = &[
    (3, "Strongly Supports", "Strongly Contradicts"),
    (2, "Supports", "Contradicts"),
    (1, "Weakly Supports", "Weakly Contradicts"),
];

const NEUTRAL_LABEL: &str = "Neutral";

/// Scoring scale in use for an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    /// Sparse emphasis steps in [-5, +5]
    #[default]
    Logarithmic,

    /// Evenly spaced integers in [-3, +3]
    Linear,
}

impl ScaleType {
    /// Inclusive `(min, max)` bounds for this scale
    pub fn bounds(&self) -> (i32, i32) {
        match self {
            ScaleType::Logarithmic => (-5, 5),
            ScaleType::Linear => (-3, 3),
        }
    }

    /// Lowest permitted value
    pub fn min(&self) -> i32 {
        self.bounds().0
    }

    /// Highest permitted value
    pub fn max(&self) -> i32 {
        self.bounds().1
    }

    /// Widest spread two scores can have (10 logarithmic, 6 linear)
    pub fn max_range(&self) -> i32 {
        self.max() - self.min()
    }

    /// Check that `value` lies within the bounds of this scale
    ///
    /// # Errors
    /// Returns [`EngineError::OutOfRange`] when the value falls outside the bounds.
    /// Values are never clamped.
    ///
    /// # Examples
    ///
    /// ```
    /// use heuer_domain::ScaleType;
    ///
    /// assert!(ScaleType::Logarithmic.validate(5).is_ok());
    /// assert!(ScaleType::Logarithmic.validate(6).is_err());
    /// ```
    pub fn validate(&self, value: i32) -> Result<i32, EngineError> {
        let (min, max) = self.bounds();
        if value < min || value > max {
            return Err(EngineError::OutOfRange {
                scale: *self,
                value,
                min,
                max,
            });
        }
        Ok(value)
    }

    /// Human-readable strength label for a value
    ///
    /// Values between anchors take the label of the nearest anchor with a
    /// lower magnitude, so `+4` on the logarithmic scale reads "Strongly Supports".
    pub fn label(&self, value: i32) -> &'static str {
        if value == 0 {
            return NEUTRAL_LABEL;
        }

        let magnitude = value.abs();
        self.anchors()
            .iter()
            .find(|(anchor, _, _)| *anchor <= magnitude)
            .map(|(_, supports, contradicts)| if value > 0 { *supports } else { *contradicts })
            .unwrap_or(NEUTRAL_LABEL)
    }

    /// Classic ACH matrix glyph for a value: `++`, `+`, `0`, `-` or `--`
    pub fn symbol(&self, value: i32) -> &'static str {
        let strong = self.strong_threshold();
        match value {
            v if v >= strong => "++",
            v if v > 0 => "+",
            0 => "0",
            v if v <= -strong => "--",
            _ => "-",
        }
    }

    /// Magnitude from which a score counts as "strong"
    pub fn strong_threshold(&self) -> i32 {
        match self {
            ScaleType::Logarithmic => 3,
            ScaleType::Linear => 2,
        }
    }

    /// Every value a caller may enter on this scale, highest first
    pub fn values(&self) -> Vec<i32> {
        (self.min()..=self.max()).rev().collect()
    }

    /// Get the scale name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleType::Logarithmic => "logarithmic",
            ScaleType::Linear => "linear",
        }
    }

    /// Parse a scale from its name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "logarithmic" | "log" => Some(ScaleType::Logarithmic),
            "linear" | "lin" => Some(ScaleType::Linear),
            _ => None,
        }
    }

    fn anchors(&self) -> &'static [(i32, &'static str, &'static str)] {
        match self {
            ScaleType::Logarithmic => LOGARITHMIC_ANCHORS,
            ScaleType::Linear => LINEAR_ANCHORS,
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScaleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid scale: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert_eq!(ScaleType::Logarithmic.bounds(), (-5, 5));
        assert_eq!(ScaleType::Linear.bounds(), (-3, 3));
        assert_eq!(ScaleType::Logarithmic.max_range(), 10);
        assert_eq!(ScaleType::Linear.max_range(), 6);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let err = ScaleType::Logarithmic.validate(6).unwrap_err();
        assert!(matches!(
            err,
            EngineError::OutOfRange { value: 6, min: -5, max: 5, .. }
        ));
        assert!(ScaleType::Linear.validate(-4).is_err());
        assert!(ScaleType::Linear.validate(4).is_err());
    }

    #[test]
    fn test_validate_accepts_bounds() {
        assert_eq!(ScaleType::Logarithmic.validate(-5).unwrap(), -5);
        assert_eq!(ScaleType::Linear.validate(3).unwrap(), 3);
    }

    #[test]
    fn test_logarithmic_labels() {
        let scale = ScaleType::Logarithmic;
        assert_eq!(scale.label(5), "Very Strongly Supports");
        assert_eq!(scale.label(3), "Strongly Supports");
        assert_eq!(scale.label(1), "Supports");
        assert_eq!(scale.label(0), "Neutral");
        assert_eq!(scale.label(-1), "Contradicts");
        assert_eq!(scale.label(-3), "Strongly Contradicts");
        assert_eq!(scale.label(-5), "Very Strongly Contradicts");
    }

    #[test]
    fn test_between_anchor_labels_use_lower_magnitude() {
        let scale = ScaleType::Logarithmic;
        assert_eq!(scale.label(4), "Strongly Supports");
        assert_eq!(scale.label(2), "Supports");
        assert_eq!(scale.label(-2), "Contradicts");
        assert_eq!(scale.label(-4), "Strongly Contradicts");
    }

    #[test]
    fn test_linear_labels() {
        let scale = ScaleType::Linear;
        assert_eq!(scale.label(3), "Strongly Supports");
        assert_eq!(scale.label(1), "Weakly Supports");
        assert_eq!(scale.label(-2), "Contradicts");
    }

    #[test]
    fn test_symbols() {
        let log = ScaleType::Logarithmic;
        assert_eq!(log.symbol(5), "++");
        assert_eq!(log.symbol(2), "+");
        assert_eq!(log.symbol(0), "0");
        assert_eq!(log.symbol(-1), "-");
        assert_eq!(log.symbol(-3), "--");

        let lin = ScaleType::Linear;
        assert_eq!(lin.symbol(2), "++");
        assert_eq!(lin.symbol(1), "+");
        assert_eq!(lin.symbol(-2), "--");
    }

    #[test]
    fn test_parse() {
        assert_eq!(ScaleType::parse("Logarithmic"), Some(ScaleType::Logarithmic));
        assert_eq!(ScaleType::parse("LINEAR"), Some(ScaleType::Linear));
        assert_eq!(ScaleType::parse("log"), Some(ScaleType::Logarithmic));
        assert!("ordinal".parse::<ScaleType>().is_err());
    }

    #[test]
    fn test_values_descending() {
        assert_eq!(ScaleType::Linear.values(), vec![3, 2, 1, 0, -1, -2, -3]);
        assert_eq!(ScaleType::Logarithmic.values().len(), 11);
    }
}
