//! Heuer CLI library.
//!
//! Command-line front end for the hypothesis evaluation engine: reads an
//! analysis snapshot from JSON, runs the engine and renders tables or JSON.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
