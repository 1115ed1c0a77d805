//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use heuer_domain::ScaleType;

/// Heuer CLI - Analysis of Competing Hypotheses from the command line.
#[derive(Debug, Parser)]
#[command(name = "heuer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "HEUER_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rate how well each evidence item discriminates between hypotheses
    Diagnosticity(DiagnosticityArgs),

    /// Rank hypotheses by weighted score
    Likelihood(LikelihoodArgs),

    /// Show the consistency matrix as ACH glyphs
    Matrix(SnapshotArgs),

    /// Report how much of the matrix has been scored
    Completeness(SnapshotArgs),

    /// Look up the label and glyph for one score value
    Label(LabelArgs),

    /// List every value on a scale with its label
    Scale(ScaleArgs),
}

/// Arguments for commands that only read a snapshot.
#[derive(Debug, Parser)]
pub struct SnapshotArgs {
    /// Snapshot JSON file (`-` for stdin)
    pub file: String,
}

/// Arguments for the diagnosticity command.
#[derive(Debug, Parser)]
pub struct DiagnosticityArgs {
    /// Snapshot JSON file (`-` for stdin)
    pub file: String,

    /// Most diagnostic evidence first
    #[arg(short, long)]
    pub sorted: bool,
}

/// Arguments for the likelihood command.
#[derive(Debug, Parser)]
pub struct LikelihoodArgs {
    /// Snapshot JSON file (`-` for stdin)
    pub file: String,

    /// Gap above which confidence is high (overrides config)
    #[arg(long)]
    pub high_gap: Option<f64>,

    /// Gap from which confidence is medium (overrides config)
    #[arg(long)]
    pub medium_gap: Option<f64>,
}

/// Arguments for the label command.
#[derive(Debug, Parser)]
pub struct LabelArgs {
    /// Score value
    #[arg(allow_negative_numbers = true)]
    pub value: i32,

    /// Scale the value belongs to
    #[arg(short, long, value_enum, default_value = "logarithmic")]
    pub scale: ScaleArg,
}

/// Arguments for the scale command.
#[derive(Debug, Parser)]
pub struct ScaleArgs {
    /// Scale to list
    #[arg(value_enum, default_value = "logarithmic")]
    pub scale: ScaleArg,
}

/// Scale argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ScaleArg {
    /// -5..=+5
    #[value(alias = "log")]
    Logarithmic,
    /// -3..=+3
    #[value(alias = "lin")]
    Linear,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<ScaleArg> for ScaleType {
    fn from(scale: ScaleArg) -> Self {
        match scale {
            ScaleArg::Logarithmic => ScaleType::Logarithmic,
            ScaleArg::Linear => ScaleType::Linear,
        }
    }
}
