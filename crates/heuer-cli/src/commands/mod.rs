//! Command implementations.

pub mod completeness;
pub mod diagnosticity;
pub mod label;
pub mod likelihood;
pub mod matrix;

pub use self::completeness::execute_completeness;
pub use self::diagnosticity::execute_diagnosticity;
pub use self::label::{execute_label, execute_scale};
pub use self::likelihood::execute_likelihood;
pub use self::matrix::execute_matrix;

use crate::error::{CliError, Result};
use crate::output::Formatter;
use heuer_domain::{AnalysisSnapshot, OrphanScore};
use std::fs;
use std::io::{self, Read};

/// Read a snapshot from a file, or from stdin when the path is `-`.
pub fn read_snapshot(path: &str) -> Result<AnalysisSnapshot> {
    let content = if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)
            .map_err(|e| CliError::InvalidInput(format!("Cannot read snapshot '{}': {}", path, e)))?
    };

    parse_snapshot(&content)
}

/// Parse snapshot JSON.
pub fn parse_snapshot(content: &str) -> Result<AnalysisSnapshot> {
    Ok(serde_json::from_str(content)?)
}

/// Print orphan-score warnings to stderr.
fn report_orphans(warnings: &[OrphanScore], formatter: &Formatter) {
    for line in formatter.orphan_warnings(warnings) {
        eprintln!("{}", line);
    }
}
