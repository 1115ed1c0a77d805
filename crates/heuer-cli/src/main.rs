//! Heuer CLI - Analysis of Competing Hypotheses from the command line.

use clap::Parser;
use heuer_cli::commands;
use heuer_cli::{Cli, Command, Config, Formatter};
use heuer_domain::HypothesisEngine;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> heuer_cli::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_init()?,
    };

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Diagnosticity(args) => {
            let engine = HypothesisEngine::new(config.policy);
            commands::execute_diagnosticity(args, &engine, &formatter)?;
        }
        Command::Likelihood(args) => {
            commands::execute_likelihood(args, config.policy, &formatter)?;
        }
        Command::Matrix(args) => commands::execute_matrix(args, &formatter)?,
        Command::Completeness(args) => commands::execute_completeness(args, &formatter)?,
        Command::Label(args) => commands::execute_label(args, &formatter)?,
        Command::Scale(args) => commands::execute_scale(args, &formatter)?,
    }

    Ok(())
}
