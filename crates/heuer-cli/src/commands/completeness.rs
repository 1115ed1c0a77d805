//! Completeness command implementation.

use super::{read_snapshot, report_orphans};
use crate::cli::SnapshotArgs;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the completeness command.
pub fn execute_completeness(args: SnapshotArgs, formatter: &Formatter) -> Result<()> {
    let snapshot = read_snapshot(&args.file)?;
    let assessment = snapshot.to_matrix()?;
    report_orphans(&assessment.warnings, formatter);

    println!("{}", formatter.format_completeness(&assessment.value.completeness())?);
    Ok(())
}
