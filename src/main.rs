//! s2mosaic CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, show the
//! deletion warning, confirm, run the pipeline and exit with appropriate status.
//! For programmatic use, prefer the library API (`s2mosaic::api`).

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    cli::run(args)
}
