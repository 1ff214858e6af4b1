//! CLI entry point for the stochastic tile-mosaic engine

use clap::Parser;
use mosaicdrift::io::cli::{Cli, Runner};
use tracing::Level;

fn main() -> mosaicdrift::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    let runner = Runner::new(cli);
    runner.run().map(|_| ())
}
