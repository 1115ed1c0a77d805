//! Diagnosticity command implementation.

use super::{read_snapshot, report_orphans};
use crate::cli::DiagnosticityArgs;
use crate::error::Result;
use crate::output::Formatter;
use heuer_domain::{sort_by_diagnosticity, HypothesisEngine};

/// Execute the diagnosticity command.
pub fn execute_diagnosticity(
    args: DiagnosticityArgs,
    engine: &HypothesisEngine,
    formatter: &Formatter,
) -> Result<()> {
    let snapshot = read_snapshot(&args.file)?;
    let assessment = engine.compute_diagnosticity(&snapshot)?;
    report_orphans(&assessment.warnings, formatter);

    let mut results = assessment.value;
    if args.sorted {
        sort_by_diagnosticity(&mut results);
    }

    println!("{}", formatter.format_diagnosticity(&results)?);
    Ok(())
}
