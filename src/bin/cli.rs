// src/bin/cli.rs
use clap::Parser;
use stats_pull::cli::{self, Cli};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    cli::run(Cli::parse())
}
