//! CLI entry point for the quilt layout tool

use clap::Parser;
use quiltgrid::io::cli::{Cli, QuiltProcessor};

fn main() -> quiltgrid::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();
    let mut processor = QuiltProcessor::new(cli);
    processor.process().map(|_| ())
}
