use std::path::PathBuf;

use clap::Parser;
use gedtree::{storage::json, Config, Document, Generations, Individual, IndividualId, Xref};
use tracing::instrument;

use super::terminal::{Paint, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ancestors,
    Descendants,
}

impl Direction {
    const fn noun(self) -> &'static str {
        match self {
            Self::Ancestors => "ancestors",
            Self::Descendants => "descendants",
        }
    }
}

#[derive(Debug, Parser)]
pub struct Lineage {
    /// The GEDCOM file to read
    file: PathBuf,

    /// Identifier of the starting individual, with or without `@` delimiters
    #[clap(value_parser = super::parse_xref)]
    xref: Xref,

    /// Maximum number of generations to list
    #[arg(short, long, default_value_t = 3)]
    generations: usize,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Lineage {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config, direction: Direction) -> anyhow::Result<()> {
        let document = super::load(&self.file, config)?;

        let Some(person) = document.individual_by_xref(&self.xref) else {
            eprintln!("Individual {} not found", self.xref.paint(Tone::Identifier));
            std::process::exit(1);
        };

        let generations = match direction {
            Direction::Ancestors => document.ancestors(person, self.generations),
            Direction::Descendants => document.descendants(person, self.generations),
        };

        match self.output {
            OutputFormat::Pretty => Self::output_pretty(&document, person, &generations, direction),
            OutputFormat::Json => println!("{}", json::generations_to_json(&document, &generations)),
        }
        Ok(())
    }

    fn output_pretty(
        document: &Document,
        person: IndividualId,
        generations: &Generations,
        direction: Direction,
    ) {
        if let Some(individual) = document.individual(person) {
            println!(
                "{} of {}",
                capitalize(direction.noun()),
                describe(individual)
            );
        }

        if generations.is_empty() {
            println!("{}", format!("No {} found", direction.noun()).paint(Tone::Failure));
            return;
        }

        for (number, generation) in generations.iter().enumerate() {
            println!("\n{}", format!("Generation {}", number + 1).paint(Tone::Label));
            for individual in generation.iter().filter_map(|&id| document.individual(id)) {
                println!("  {}", describe(individual));
            }
        }
    }
}

fn describe(individual: &Individual) -> String {
    let name = individual.full_name();
    let name = if name.is_empty() { "(unnamed)".to_string() } else { name };
    format!("{} {name}", individual.xref().paint(Tone::Identifier))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}
