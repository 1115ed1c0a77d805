//! Label and scale command implementations.

use crate::cli::{LabelArgs, ScaleArgs};
use crate::error::Result;
use crate::output::Formatter;
use heuer_domain::ScaleType;

/// Execute the label command.
///
/// Out-of-range values are rejected rather than labelled.
pub fn execute_label(args: LabelArgs, formatter: &Formatter) -> Result<()> {
    let scale: ScaleType = args.scale.into();
    let value = scale.validate(args.value)?;

    println!("{}", formatter.format_label(scale, value)?);
    Ok(())
}

/// Execute the scale command.
pub fn execute_scale(args: ScaleArgs, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_scale(args.scale.into())?);
    Ok(())
}
