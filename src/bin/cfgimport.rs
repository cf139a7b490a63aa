#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;

use cfgimport::cli::args::CliArgs;
use cfgimport::cli::driver;

fn main() -> Result<()> {
    // Initialize tracing if CFGIMPORT_LOG or RUST_LOG is set.
    // Supports CFGIMPORT_LOG_FORMAT=tree|json|text (see src/tracing_config.rs).
    cfgimport::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let outcome = driver::run(&args.command, std::io::stdout().is_terminal())?;
    print!("{}", outcome.output);

    if outcome.exit_code != driver::EXIT_SUCCESS {
        eprintln!("incompatible candidates found");
        std::process::exit(outcome.exit_code);
    }
    Ok(())
}
