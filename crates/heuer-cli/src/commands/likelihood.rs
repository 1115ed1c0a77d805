//! Likelihood command implementation.

use super::{read_snapshot, report_orphans};
use crate::cli::LikelihoodArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use heuer_domain::{HypothesisEngine, LikelihoodPolicy};

/// Execute the likelihood command.
pub fn execute_likelihood(
    args: LikelihoodArgs,
    policy: LikelihoodPolicy,
    formatter: &Formatter,
) -> Result<()> {
    let policy = apply_overrides(policy, args.high_gap, args.medium_gap)?;
    let engine = HypothesisEngine::new(policy);

    let snapshot = read_snapshot(&args.file)?;
    let assessment = engine.compute_likelihood(&snapshot)?;
    report_orphans(&assessment.warnings, formatter);

    println!("{}", formatter.format_likelihood(&assessment.value)?);
    Ok(())
}

/// Replace configured thresholds with command-line values.
fn apply_overrides(
    policy: LikelihoodPolicy,
    high_gap: Option<f64>,
    medium_gap: Option<f64>,
) -> Result<LikelihoodPolicy> {
    LikelihoodPolicy::new(
        high_gap.unwrap_or(policy.high_gap),
        medium_gap.unwrap_or(policy.medium_gap),
    )
    .map_err(CliError::InvalidInput)
}
