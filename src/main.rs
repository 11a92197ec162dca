//! `ged`: inspect, validate, and convert GEDCOM family trees.

use clap::Parser;

mod cli;
use cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().run()
}
