use std::path::Path;

use clap::Parser;
use cmakeforge::{cli::input::CliArgs, utils::logger::config_logger, worker::run_cmakeforge};
use color_eyre::Result;
use env_logger::Target;

/// The entry point for the binary generated
/// for the program
fn main() -> Result<()> {
    color_eyre::install()?;
    let cli_args = CliArgs::parse();
    config_logger(cli_args.verbose, Target::Stderr)?;

    log::debug!("Launching a new cmakeforge program");
    run_cmakeforge(&cli_args, Path::new("."))?;
    log::debug!("Tasks successfully finished");

    Ok(())
}
