use std::path::PathBuf;

use clap::Parser;
use gedtree::{Config, Document, Family, Individual};
use tracing::instrument;

use super::terminal::{Paint, Tone};

#[derive(Debug, Parser)]
#[command(about = "Display the contents of a GEDCOM file")]
pub struct Show {
    /// The GEDCOM file to read
    file: PathBuf,

    /// Include events and uninterpreted fields of every record
    #[arg(long)]
    details: bool,
}

impl Show {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let document = super::load(&self.file, config)?;

        Self::output_header(&document);

        println!(
            "\n{}",
            format!("Individuals ({})", document.individuals().len()).paint(Tone::Label)
        );
        for individual in document.individuals() {
            self.output_individual(individual);
        }

        println!(
            "\n{}",
            format!("Families ({})", document.families().len()).paint(Tone::Label)
        );
        for family in document.families() {
            self.output_family(&document, family);
        }

        Ok(())
    }

    fn output_header(document: &Document) {
        let header = &document.header;
        println!("{}", "Header".paint(Tone::Label));
        println!("  Source:    {}", header.source);
        println!("  Version:   {}", header.version);
        if let Some(encoding) = header.encoding {
            println!("  Encoding:  {encoding}");
        }
        for field in &header.fields {
            println!("  {}: {}", field.tag, field.value);
        }

        if let Some(submitter) = document.submitter() {
            println!("\n{}", "Submitter".paint(Tone::Label));
            println!("  {} {}", submitter.xref().paint(Tone::Identifier), submitter.name);
            for line in submitter.address_lines() {
                println!("  {line}");
            }
        }
    }

    fn output_individual(&self, individual: &Individual) {
        let name = individual.full_name();
        println!("  {} {name}", individual.xref().paint(Tone::Identifier));

        if self.details {
            for event in &individual.events {
                println!("    {}", event_summary(event));
            }
            for field in &individual.fields {
                println!("    {} {}", field.tag.paint(Tone::Label), field.value);
            }
        }
    }

    fn output_family(&self, document: &Document, family: &Family) {
        let spouse = |id| {
            document
                .individual(id)
                .map_or_else(|| "?".to_string(), Individual::full_name)
        };
        let parents: Vec<String> = family.parents().map(spouse).collect();
        println!(
            "  {} {} ({} children)",
            family.xref().paint(Tone::Identifier),
            parents.join(" & "),
            family.children().len()
        );

        if self.details {
            for event in &family.events {
                println!("    {}", event_summary(event));
            }
            for field in &family.fields {
                println!("    {} {}", field.tag.paint(Tone::Label), field.value);
            }
        }
    }
}

fn event_summary(event: &gedtree::domain::Event) -> String {
    let mut summary = event.kind.paint(Tone::Label);
    if let Some(date) = event.date.as_deref().filter(|date| !date.is_empty()) {
        summary.push(' ');
        summary.push_str(date);
    }
    if let Some(place) = event.place.as_deref().filter(|place| !place.is_empty()) {
        summary.push_str(", ");
        summary.push_str(place);
    }
    summary
}
