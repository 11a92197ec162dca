use std::path::PathBuf;

use clap::Parser;
use gedtree::Config;
use tracing::instrument;

use super::terminal::{Paint, Tone};

#[derive(Debug, Parser)]
#[command(about = "Check that a GEDCOM file parses")]
pub struct Validate {
    /// The GEDCOM files to check
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

impl Validate {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut failures = 0;

        for file in &self.files {
            match gedtree::load(file, config) {
                Ok(document) => {
                    if !self.quiet {
                        println!(
                            "{} {} ({} individuals, {} families)",
                            "OK".paint(Tone::Success),
                            file.display(),
                            document.individuals().len(),
                            document.families().len()
                        );
                    }
                }
                Err(error) => {
                    failures += 1;
                    tracing::debug!(?error, "validation failed");
                    eprintln!(
                        "{} {}: {error}",
                        "FAIL".paint(Tone::Failure),
                        file.display()
                    );
                }
            }
        }

        if failures > 0 {
            std::process::exit(1);
        }
        Ok(())
    }
}
