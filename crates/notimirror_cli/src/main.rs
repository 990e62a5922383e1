//! notimirror command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration and locations, start logging, dispatch commands.

mod cli;
mod settings;

use anyhow::Result;
use clap::Parser;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = settings::Settings::resolve(&cli)?;

    if let Err(err) = notimirror_core::init_logging(&settings.log_level, &settings.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    cli::run(cli.command, &settings)
}
