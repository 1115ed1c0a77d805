//! Matrix command implementation.

use super::{read_snapshot, report_orphans};
use crate::cli::SnapshotArgs;
use crate::error::Result;
use crate::output::Formatter;
use heuer_domain::render_matrix;

/// Execute the matrix command.
pub fn execute_matrix(args: SnapshotArgs, formatter: &Formatter) -> Result<()> {
    let snapshot = read_snapshot(&args.file)?;
    let assessment = snapshot.to_matrix()?;
    report_orphans(&assessment.warnings, formatter);

    let view = render_matrix(&assessment.value);
    println!("{}", formatter.format_matrix(&view)?);
    Ok(())
}
