//! Writing a document back out as GEDCOM text.
//!
//! Record identifiers are written as they were read. Opaque fields are written
//! back at the level they were found, but the subtrees beneath them were
//! never kept and are not reproduced.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::domain::{Document, Event, Field, List};

/// Writes `document` as GEDCOM text.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write<W: Write>(document: &Document, writer: &mut W) -> io::Result<()> {
    let header = &document.header;
    writeln!(writer, "0 HEAD")?;
    writeln!(writer, "1 SOUR {}", header.source)?;
    writeln!(writer, "1 GEDC")?;
    writeln!(writer, "2 VERS {}", header.version)?;
    if let Some(encoding) = header.encoding {
        writeln!(writer, "1 CHAR {encoding}")?;
    }
    if let Some(submitter) = document.header_submitter() {
        writeln!(writer, "1 SUBM {}", submitter.xref())?;
    }
    write_fields(writer, 1, &header.fields)?;

    if let Some(submitter) = document.submitter() {
        writeln!(writer, "0 {} SUBM", submitter.xref())?;
        write_line(writer, 1, "NAME", &submitter.name)?;
        let mut address = submitter.address_lines();
        if let Some(first) = address.next() {
            write_line(writer, 1, "ADDR", first)?;
            for line in address {
                write_line(writer, 2, "CONT", line)?;
            }
        }
        write_fields(writer, 1, &submitter.fields)?;
    }

    for individual in document.individuals() {
        writeln!(writer, "0 {} INDI", individual.xref())?;
        match (individual.given_name.as_str(), individual.surname.as_str()) {
            // A later NAME kept as a field must not become the name on reread.
            ("", "") if individual.fields.iter().any(|field| field.tag == "NAME") => {
                writeln!(writer, "1 NAME")?;
            }
            ("", "") => {}
            (given, "") => write_line(writer, 1, "NAME", given)?,
            ("", surname) => writeln!(writer, "1 NAME /{surname}/")?,
            (given, surname) => writeln!(writer, "1 NAME {given} /{surname}/")?,
        }
        for membership in individual.families() {
            if let Some(family) = document.family(membership.family) {
                writeln!(writer, "1 {} {}", membership.role.tag(), family.xref())?;
            }
        }
        write_events(writer, &individual.events)?;
        write_fields(writer, 1, &individual.fields)?;
    }

    for family in document.families() {
        writeln!(writer, "0 {} FAM", family.xref())?;
        let members = family
            .husband()
            .map(|id| ("HUSB", id))
            .into_iter()
            .chain(family.wife().map(|id| ("WIFE", id)))
            .chain(family.children().iter().map(|&id| ("CHIL", id)));
        for (tag, id) in members {
            if let Some(member) = document.individual(id) {
                writeln!(writer, "1 {tag} {}", member.xref())?;
            }
        }
        write_events(writer, &family.events)?;
        write_fields(writer, 1, &family.fields)?;
    }

    writeln!(writer, "0 TRLR")
}

/// Renders `document` as GEDCOM text.
#[must_use]
pub fn to_string(document: &Document) -> String {
    let mut buffer = Vec::new();
    // Writing to a Vec cannot fail.
    let _ = write(document, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Writes `document` to the file at `path`.
///
/// Parent directories are created automatically if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn save(document: &Document, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    write(document, &mut writer)?;
    writer.flush()
}

fn write_events<W: Write>(writer: &mut W, events: &List<Event>) -> io::Result<()> {
    for event in events {
        writeln!(writer, "1 {}", event.kind)?;
        if let Some(date) = &event.date {
            write_line(writer, 2, "DATE", date)?;
        }
        if let Some(place) = &event.place {
            write_line(writer, 2, "PLAC", place)?;
        }
        write_fields(writer, 2, &event.fields)?;
    }
    Ok(())
}

fn write_fields<W: Write>(writer: &mut W, level: usize, fields: &List<Field>) -> io::Result<()> {
    for field in fields {
        write_line(writer, level, &field.tag, &field.value)?;
    }
    Ok(())
}

fn write_line<W: Write>(writer: &mut W, level: usize, tag: &str, value: &str) -> io::Result<()> {
    if value.is_empty() {
        writeln!(writer, "{level} {tag}")
    } else {
        writeln!(writer, "{level} {tag} {value}")
    }
}
