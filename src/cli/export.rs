use std::path::PathBuf;

use clap::Parser;
use gedtree::{
    storage::{json, writer},
    Config,
};
use tracing::instrument;

use super::terminal::{Paint, Tone};

#[derive(Debug, Parser)]
#[command(about = "Write a parsed GEDCOM file back out")]
pub struct Export {
    /// The GEDCOM file to read
    file: PathBuf,

    /// Where to write the result
    output: PathBuf,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "gedcom")]
    format: Format,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Format {
    /// GEDCOM text with the original record identifiers
    #[default]
    Gedcom,
    /// A JSON array of every individual's names
    Json,
    /// A JSON summary of the header and submitter
    Summary,
}

impl Export {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let document = super::load(&self.file, config)?;

        match self.format {
            Format::Gedcom => writer::save(&document, &self.output)?,
            Format::Json => {
                let ids = document.individuals_with_ids().map(|(id, _)| id);
                std::fs::write(&self.output, json::individuals_to_json(&document, ids))?;
            }
            Format::Summary => std::fs::write(&self.output, json::summary_to_json(&document))?,
        }

        println!(
            "{} {}",
            "Wrote".paint(Tone::Success),
            self.output.display()
        );
        Ok(())
    }
}
