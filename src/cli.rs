use std::path::{Path, PathBuf};

mod export;
mod lineage;
mod show;
mod terminal;
mod validate;

use anyhow::Context;
use clap::ArgAction;
use export::Export;
use gedtree::{Config, Document, Xref};
use lineage::{Direction, Lineage};
use show::Show;
use tracing::instrument;
use validate::Validate;

/// Parse a record identifier, adding the `@` delimiters when omitted.
///
/// This is a CLI boundary function so that `I1` and `@I1@` are both accepted
/// on the command line, where `@` can be awkward to type.
fn parse_xref(s: &str) -> Result<Xref, String> {
    let s = s.trim();
    let delimited = if s.starts_with('@') {
        s.to_string()
    } else {
        format!("@{s}@")
    };
    delimited.parse().map_err(|e| format!("{e}"))
}

/// Load and parse a GEDCOM file, attaching the path to any error.
#[instrument(level = "debug", skip(config))]
fn load(path: &Path, config: &Config) -> anyhow::Result<Document> {
    gedtree::load(path, config).with_context(|| format!("failed to load {}", path.display()))
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML file overriding the parser limits
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = match &self.config {
            Some(path) => Config::load(path).map_err(anyhow::Error::msg)?,
            None => Config::default(),
        };
        tracing::debug!(?config, "loaded configuration");

        self.command.run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show the header, submitter, individuals, and families of a file
    Show(Show),

    /// Check that a file parses, reporting the first error
    Validate(Validate),

    /// List the ancestors of an individual, one generation per group
    ///
    /// Parents come first, then grandparents, and so on.
    Ancestors(Lineage),

    /// List the descendants of an individual, one generation per group
    ///
    /// Children come first, then grandchildren, and so on.
    Descendants(Lineage),

    /// Write a parsed file back out as GEDCOM or JSON
    Export(Export),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Show(command) => command.run(config)?,
            Self::Validate(command) => command.run(config)?,
            Self::Ancestors(command) => command.run(config, Direction::Ancestors)?,
            Self::Descendants(command) => command.run(config, Direction::Descendants)?,
            Self::Export(command) => command.run(config)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn xref_delimiters_are_optional() {
        assert_eq!(parse_xref("I1").unwrap().as_str(), "@I1@");
        assert_eq!(parse_xref("@I1@").unwrap().as_str(), "@I1@");
        assert!(parse_xref("@@").is_err());
    }

    #[test]
    fn parses_lineage_arguments() {
        let cli = Cli::try_parse_from([
            "ged",
            "-vv",
            "descendants",
            "tree.ged",
            "I1",
            "--generations",
            "2",
            "--output",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Descendants(_)));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["ged"]).is_err());
    }
}
