//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use heuer_domain::view::LEGEND;
use heuer_domain::{
    Completeness, ConfidenceLevel, DiagnosticityResult, LikelihoodAssessment, MatrixView,
    OrphanScore, ScaleType,
};
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
    Table,
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format diagnosticity results.
    pub fn format_diagnosticity(&self, results: &[DiagnosticityResult]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
            OutputFormat::Quiet => Ok(results
                .iter()
                .map(|r| r.evidence_id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if results.is_empty() {
                    return Ok(self.colorize("No evidence to rate.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Evidence", "Diagnosticity", "Reasoning"]);
                for result in results {
                    builder.push_record([
                        result.evidence_id.to_string(),
                        result.score.to_string(),
                        result.reasoning.clone().unwrap_or_default(),
                    ]);
                }

                Ok(Self::finish(builder.build()))
            }
        }
    }

    /// Format a likelihood ranking.
    pub fn format_likelihood(&self, assessment: &LikelihoodAssessment) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(assessment)?),
            OutputFormat::Quiet => Ok(assessment
                .results
                .iter()
                .map(|r| r.hypothesis_id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record([
                    "Rank",
                    "Hypothesis",
                    "Weighted",
                    "Supporting",
                    "Contradicting",
                    "Neutral",
                    "Likelihood",
                ]);
                for result in &assessment.results {
                    builder.push_record([
                        result.rank.to_string(),
                        result.hypothesis_id.to_string(),
                        format!("{:+}", result.weighted_score),
                        result.supporting_count.to_string(),
                        result.contradicting_count.to_string(),
                        result.neutral_count.to_string(),
                        format!("{:.1}%", result.likelihood_percent),
                    ]);
                }

                let mut out = Self::finish(builder.build());
                out.push('\n');
                out.push_str(&self.confidence_line(assessment));
                Ok(out)
            }
        }
    }

    /// Format the consistency matrix.
    pub fn format_matrix(&self, view: &MatrixView) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
            OutputFormat::Quiet => Ok(view
                .rows
                .iter()
                .map(|row| {
                    row.cells
                        .iter()
                        .map(|c| c.symbol.as_str())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                let mut header = vec!["Evidence".to_string()];
                header.extend(view.hypotheses.iter().map(|h| h.to_string()));
                builder.push_record(header);

                for row in &view.rows {
                    let mut record = vec![row.evidence_id.to_string()];
                    record.extend(row.cells.iter().map(|c| {
                        if c.explicit {
                            c.symbol.clone()
                        } else {
                            format!("({})", c.symbol)
                        }
                    }));
                    builder.push_record(record);
                }

                let legend = LEGEND
                    .iter()
                    .map(|(symbol, label)| format!("{} {}", symbol, label))
                    .collect::<Vec<_>>()
                    .join("  ");

                let mut out = Self::finish(builder.build());
                out.push('\n');
                out.push_str(&self.colorize(&format!("{}  (0) unscored", legend), "cyan"));
                Ok(out)
            }
        }
    }

    /// Format a completeness report.
    pub fn format_completeness(&self, completeness: &Completeness) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(completeness)?),
            OutputFormat::Quiet => Ok(format!("{:.1}", completeness.percent)),
            OutputFormat::Table => {
                let color = if completeness.explicit_cells == completeness.total_cells {
                    "green"
                } else {
                    "yellow"
                };
                Ok(self.colorize(
                    &format!(
                        "{} of {} cells scored ({:.1}%)",
                        completeness.explicit_cells, completeness.total_cells, completeness.percent
                    ),
                    color,
                ))
            }
        }
    }

    /// Format the label and glyph for one value.
    pub fn format_label(&self, scale: ScaleType, value: i32) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "scale_type": scale,
                "value": value,
                "label": scale.label(value),
                "symbol": scale.symbol(value),
            }))?),
            OutputFormat::Quiet => Ok(scale.label(value).to_string()),
            OutputFormat::Table => Ok(self.scale_table(scale, &[value])),
        }
    }

    /// Format every value on a scale.
    pub fn format_scale(&self, scale: ScaleType) -> Result<String> {
        let values = scale.values();
        match self.format {
            OutputFormat::Json => {
                let entries: Vec<serde_json::Value> = values
                    .iter()
                    .map(|&v| json!({ "value": v, "label": scale.label(v), "symbol": scale.symbol(v) }))
                    .collect();
                Ok(serde_json::to_string_pretty(&entries)?)
            }
            OutputFormat::Quiet => Ok(values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => Ok(self.scale_table(scale, &values)),
        }
    }

    /// Format orphan-score warnings, one per line.
    pub fn orphan_warnings(&self, warnings: &[OrphanScore]) -> Vec<String> {
        warnings.iter().map(|w| self.warning(&w.to_string())).collect()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn confidence_line(&self, assessment: &LikelihoodAssessment) -> String {
        let (text, color) = match (assessment.confidence, assessment.gap) {
            (ConfidenceLevel::NotApplicable, _) | (_, None) => {
                ("Confidence: not applicable".to_string(), "blue")
            }
            (level, Some(gap)) => {
                let color = match level {
                    ConfidenceLevel::High => "green",
                    ConfidenceLevel::Medium => "yellow",
                    _ => "red",
                };
                (format!("Confidence: {} (gap {:.1} points)", level, gap), color)
            }
        };
        self.colorize(&text, color)
    }

    fn scale_table(&self, scale: ScaleType, values: &[i32]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Value", "Label", "Symbol"]);
        for &value in values {
            builder.push_record([format!("{:+}", value), scale.label(value).to_string(), scale.symbol(value).to_string()]);
        }
        Self::finish(builder.build())
    }

    fn finish(mut table: Table) -> String {
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
