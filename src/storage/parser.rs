//! Line-by-line construction of a document.
//!
//! The parser keeps one [`Scope`] per level. The scope at level `L` decides
//! what a level-`L` line means and returns the scope for the lines nested
//! beneath it, which is installed at level `L + 1`. Tags a scope does not
//! understand are kept as opaque fields and their subtrees are skipped.
//!
//! Cross-references are collected as [`Reference`]s while reading and linked
//! by the resolver once the trailer has been seen.

use std::collections::BTreeMap;

use tracing::{debug, instrument, trace};

use crate::{
    domain::{
        record::is_event_tag, Capabilities, CharSet, Config, Document, Event, Family, FamilyId,
        Field, Header, Individual, IndividualId, List, Role, Submitter, Xref,
    },
    storage::{
        error::{Cause, ParseError},
        resolver,
        tokenizer::{self, Line},
    },
};

const HEAD: &str = "HEAD";
const TRAILER: &str = "TRLR";
const INDIVIDUAL: &str = "INDI";
const FAMILY: &str = "FAM";
const SUBMITTER: &str = "SUBM";
const HUSBAND: &str = "HUSB";
const WIFE: &str = "WIFE";
const CHILD: &str = "CHIL";

/// Parses a complete GEDCOM document and links its cross-references.
///
/// Either the whole document is returned, with every reference resolved, or
/// the first error encountered. Nothing partially built escapes on failure.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first structural, header, record,
/// or cross-reference problem found.
#[instrument(skip_all, fields(bytes = buffer.len()))]
pub fn parse(buffer: &str, config: &Config) -> Result<Document, ParseError> {
    let unresolved = read(buffer, config)?;
    let document = resolver::resolve(unresolved)?;
    debug!(
        individuals = document.individuals().len(),
        families = document.families().len(),
        "parsed document"
    );
    Ok(document)
}

/// Reads every line up to the trailer without linking references.
pub(crate) fn read(buffer: &str, config: &Config) -> Result<Unresolved, ParseError> {
    let buffer = buffer.strip_prefix('\u{feff}').unwrap_or(buffer);
    let mut parser = Parser::default();
    let mut scopes = vec![Scope::Skip; config.max_depth()];
    scopes[0] = Scope::Root;
    let mut previous: Option<usize> = None;

    for line in tokenizer::lines(buffer) {
        if line.is_blank() {
            continue;
        }
        let number = line.number();

        if line.length() > config.max_line_length() {
            return Err(ParseError::at(
                number,
                Cause::LineTooLong {
                    length: line.length(),
                    max: config.max_line_length(),
                },
            ));
        }

        let level = line.level().map_err(|cause| ParseError::at(number, cause))?;
        let max_allowed = previous.map_or(0, |previous| previous + 1);
        if level > max_allowed {
            return Err(ParseError::at(number, Cause::LevelJump { level, max_allowed }));
        }
        if level >= config.max_depth() {
            return Err(ParseError::at(
                number,
                Cause::TooDeep {
                    level,
                    max_depth: config.max_depth(),
                },
            ));
        }

        let scope = scopes[level];
        trace!(line = number, level, ?scope, "dispatching line");
        match parser
            .dispatch(scope, &line)
            .map_err(|cause| ParseError::at(number, cause))?
        {
            Step::Descend(next) => {
                if let Some(slot) = scopes.get_mut(level + 1) {
                    *slot = next;
                }
            }
            Step::Finish => return parser.finish(),
        }
        previous = Some(level);
    }

    Err(ParseError::new(Cause::MissingTrailer))
}

/// A cross-reference waiting to be linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reference {
    /// Tag of the referencing line.
    pub(crate) tag: &'static str,
    pub(crate) xref: Xref,
    /// Line the reference was read from.
    pub(crate) line: usize,
}

impl Reference {
    fn read(line: &Line<'_>, tag: &'static str) -> Result<Self, Cause> {
        let value = line.word(2).ok_or(Cause::MissingReference { tag })?;
        Ok(Self {
            tag,
            xref: Xref::new(value)?,
            line: line.number(),
        })
    }

    fn list() -> List<Self> {
        List::new(Capabilities {
            stringify: |reference: &Self| format!("{} {}\n", reference.tag, reference.xref),
            destroy: drop,
            compare: |a: &Self, b: &Self| a.xref.cmp(&b.xref),
        })
    }
}

/// A `FAMS` or `FAMC` reference together with the role it records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FamilyReference {
    pub(crate) role: Role,
    pub(crate) reference: Reference,
}

impl FamilyReference {
    fn list() -> List<Self> {
        List::new(Capabilities {
            stringify: |link: &Self| format!("{} {}\n", link.role.tag(), link.reference.xref),
            destroy: drop,
            compare: |a: &Self, b: &Self| {
                a.role
                    .cmp(&b.role)
                    .then_with(|| a.reference.xref.cmp(&b.reference.xref))
            },
        })
    }
}

/// References read from an individual record.
#[derive(Debug)]
pub(crate) struct PendingIndividual {
    /// `FAMS` and `FAMC` references in record order.
    pub(crate) families: List<FamilyReference>,
    named: bool,
}

/// References read from a family record.
#[derive(Debug)]
pub(crate) struct PendingFamily {
    pub(crate) husband: Option<Reference>,
    pub(crate) wife: Option<Reference>,
    pub(crate) children: List<Reference>,
}

/// A document read to the trailer whose cross-references are not yet linked.
///
/// The pending vectors run parallel to the document's individual and family
/// collections.
#[derive(Debug)]
pub(crate) struct Unresolved {
    pub(crate) document: Document,
    pub(crate) individuals: Vec<PendingIndividual>,
    pub(crate) families: Vec<PendingFamily>,
    pub(crate) individual_index: BTreeMap<Xref, IndividualId>,
    pub(crate) family_index: BTreeMap<Xref, FamilyId>,
    pub(crate) header_submitter: Option<Reference>,
}

/// Which record an open event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Individual(usize),
    Family(usize),
}

/// The handler for one level, together with the record it writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Root,
    Header,
    HeaderGedc,
    Individual(usize),
    Family(usize),
    Event(Owner, usize),
    Submitter,
    Address,
    Skip,
}

enum Step {
    Descend(Scope),
    Finish,
}

#[derive(Debug)]
struct Parser {
    state: Unresolved,
    header_seen: bool,
    submitter_line: Option<usize>,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            state: Unresolved {
                document: Document::new(Header::new()),
                individuals: Vec::new(),
                families: Vec::new(),
                individual_index: BTreeMap::new(),
                family_index: BTreeMap::new(),
                header_submitter: None,
            },
            header_seen: false,
            submitter_line: None,
        }
    }
}

impl Parser {
    fn dispatch(&mut self, scope: Scope, line: &Line<'_>) -> Result<Step, Cause> {
        let next = match scope {
            Scope::Root => return self.root(line),
            Scope::Header => self.header(line)?,
            Scope::HeaderGedc => self.gedc(line)?,
            Scope::Individual(index) => self.individual(index, line)?,
            Scope::Family(index) => self.family(index, line)?,
            Scope::Event(owner, index) => self.event(owner, index, line)?,
            Scope::Submitter => self.submitter(line)?,
            Scope::Address => self.address(line)?,
            Scope::Skip => Scope::Skip,
        };
        Ok(Step::Descend(next))
    }

    fn root(&mut self, line: &Line<'_>) -> Result<Step, Cause> {
        let tag = line.tag().ok_or(Cause::MissingTag)?;

        if tag == HEAD {
            if self.header_seen {
                return Err(Cause::DuplicateHeader);
            }
            self.header_seen = true;
            return Ok(Step::Descend(Scope::Header));
        }

        self.require_header()?;

        if tag == TRAILER {
            return Ok(Step::Finish);
        }

        let Some(record) = line.word(2) else {
            if [INDIVIDUAL, FAMILY, SUBMITTER].contains(&tag) {
                return Err(Cause::MissingXref {
                    tag: tag.to_string(),
                });
            }
            if tag.starts_with('@') {
                return Err(Cause::MissingTag);
            }
            debug!(line = line.number(), tag, "skipping record without identifier");
            return Ok(Step::Descend(Scope::Skip));
        };

        let scope = match record {
            INDIVIDUAL => self.open_individual(Xref::new(tag)?)?,
            FAMILY => self.open_family(Xref::new(tag)?)?,
            SUBMITTER => self.open_submitter(Xref::new(tag)?, line.number())?,
            other => {
                debug!(line = line.number(), tag = other, "skipping record");
                Scope::Skip
            }
        };
        Ok(Step::Descend(scope))
    }

    /// Records may only follow a header that has every mandatory value.
    fn require_header(&self) -> Result<(), Cause> {
        if !self.header_seen {
            return Err(Cause::MissingHeader);
        }
        match self.state.document.header.missing() {
            Some(missing) => Err(Cause::IncompleteHeader { missing }),
            None => Ok(()),
        }
    }

    fn open_individual(&mut self, xref: Xref) -> Result<Scope, Cause> {
        let index = self.state.individuals.len();
        if self.state.individual_index.contains_key(&xref) {
            return Err(Cause::DuplicateXref(xref));
        }
        debug!(%xref, "reading individual");

        self.state
            .individual_index
            .insert(xref.clone(), IndividualId(index));
        self.state
            .document
            .individuals
            .insert_back(Individual::new(xref, "", ""));
        self.state.individuals.push(PendingIndividual {
            families: FamilyReference::list(),
            named: false,
        });
        Ok(Scope::Individual(index))
    }

    fn open_family(&mut self, xref: Xref) -> Result<Scope, Cause> {
        let index = self.state.families.len();
        if self.state.family_index.contains_key(&xref) {
            return Err(Cause::DuplicateXref(xref));
        }
        debug!(%xref, "reading family");

        self.state.family_index.insert(xref.clone(), FamilyId(index));
        self.state.document.families.insert_back(Family::new(xref));
        self.state.families.push(PendingFamily {
            husband: None,
            wife: None,
            children: Reference::list(),
        });
        Ok(Scope::Family(index))
    }

    fn open_submitter(&mut self, xref: Xref, line: usize) -> Result<Scope, Cause> {
        if self.state.document.submitter.is_some() {
            return Err(Cause::DuplicateSubmitter);
        }
        debug!(%xref, "reading submitter");

        self.state.document.submitter = Some(Submitter::new(xref, ""));
        self.submitter_line = Some(line);
        Ok(Scope::Submitter)
    }

    fn header(&mut self, line: &Line<'_>) -> Result<Scope, Cause> {
        let tag = line.tag().ok_or(Cause::EmptyHeaderLine)?;
        let header = &mut self.state.document.header;

        match tag {
            "GEDC" => return Ok(Scope::HeaderGedc),
            "SOUR" => {
                let source = line.value();
                if source.is_empty() {
                    return Err(Cause::MissingHeaderValue { tag: "SOUR" });
                }
                header.source = source.to_string();
            }
            "CHAR" => {
                let name = line
                    .word(2)
                    .ok_or(Cause::MissingHeaderValue { tag: "CHAR" })?;
                let encoding = name
                    .parse::<CharSet>()
                    .map_err(|error| Cause::UnknownEncoding(error.0))?;
                header.encoding = Some(encoding);
            }
            SUBMITTER => {
                let value = line
                    .word(2)
                    .ok_or(Cause::MissingHeaderValue { tag: SUBMITTER })?;
                let xref = Xref::new(value).map_err(Cause::InvalidSubmitterReference)?;
                self.state.header_submitter = Some(Reference {
                    tag: SUBMITTER,
                    xref,
                    line: line.number(),
                });
            }
            other => header.fields.insert_back(Field::new(other, line.value())),
        }
        Ok(Scope::Skip)
    }

    fn gedc(&mut self, line: &Line<'_>) -> Result<Scope, Cause> {
        let tag = line.tag().ok_or(Cause::EmptyHeaderLine)?;
        if tag == "VERS" {
            let text = line
                .word(2)
                .ok_or(Cause::MissingHeaderValue { tag: "VERS" })?;
            let version = Header::parse_version(text)
                .ok_or_else(|| Cause::InvalidVersion(text.to_string()))?;
            self.state.document.header.version = version;
        }
        Ok(Scope::Skip)
    }

    fn individual(&mut self, index: usize, line: &Line<'_>) -> Result<Scope, Cause> {
        let tag = line.tag().ok_or(Cause::MissingTag)?;
        let pending = &mut self.state.individuals[index];
        let individual = &mut self.state.document.individuals[index];

        if tag == "NAME" && !pending.named {
            let (given_name, surname) = split_name(line.value());
            individual.given_name = given_name;
            individual.surname = surname;
            pending.named = true;
        } else if let Some(role) = Role::from_tag(tag) {
            pending.families.insert_back(FamilyReference {
                role,
                reference: Reference::read(line, role.tag())?,
            });
        } else if is_event_tag(tag) {
            individual.events.insert_back(Event::new(tag));
            let event = individual.events.len() - 1;
            return Ok(Scope::Event(Owner::Individual(index), event));
        } else {
            individual.fields.insert_back(Field::new(tag, line.value()));
        }
        Ok(Scope::Skip)
    }

    fn family(&mut self, index: usize, line: &Line<'_>) -> Result<Scope, Cause> {
        let tag = line.tag().ok_or(Cause::MissingTag)?;
        let pending = &mut self.state.families[index];
        let family = &mut self.state.document.families[index];

        match tag {
            HUSBAND | WIFE => {
                let (tag, slot) = if tag == HUSBAND {
                    (HUSBAND, &mut pending.husband)
                } else {
                    (WIFE, &mut pending.wife)
                };
                if slot.is_some() {
                    return Err(Cause::DuplicateSpouse { tag });
                }
                *slot = Some(Reference::read(line, tag)?);
            }
            CHILD => pending.children.insert_back(Reference::read(line, CHILD)?),
            _ if is_event_tag(tag) => {
                family.events.insert_back(Event::new(tag));
                let event = family.events.len() - 1;
                return Ok(Scope::Event(Owner::Family(index), event));
            }
            _ => family.fields.insert_back(Field::new(tag, line.value())),
        }
        Ok(Scope::Skip)
    }

    fn event(&mut self, owner: Owner, index: usize, line: &Line<'_>) -> Result<Scope, Cause> {
        let tag = line.tag().ok_or(Cause::MissingTag)?;
        let document = &mut self.state.document;
        let event = match owner {
            Owner::Individual(record) => &mut document.individuals[record].events[index],
            Owner::Family(record) => &mut document.families[record].events[index],
        };

        match tag {
            "DATE" => event.date = Some(line.value().to_string()),
            "PLAC" => event.place = Some(line.value().to_string()),
            _ => event.fields.insert_back(Field::new(tag, line.value())),
        }
        Ok(Scope::Skip)
    }

    fn submitter(&mut self, line: &Line<'_>) -> Result<Scope, Cause> {
        let tag = line.tag().ok_or(Cause::MissingTag)?;
        let Some(submitter) = self.state.document.submitter.as_mut() else {
            return Ok(Scope::Skip);
        };

        match tag {
            "NAME" => {
                let name = line.value();
                if name.is_empty() {
                    return Err(Cause::MissingValue { tag: "NAME" });
                }
                submitter.name = name.to_string();
            }
            "ADDR" if submitter.address.is_empty() => {
                submitter.address = line.value().to_string();
                return Ok(Scope::Address);
            }
            _ => submitter.fields.insert_back(Field::new(tag, line.value())),
        }
        Ok(Scope::Skip)
    }

    fn address(&mut self, line: &Line<'_>) -> Result<Scope, Cause> {
        let tag = line.tag().ok_or(Cause::MissingTag)?;
        let Some(submitter) = self.state.document.submitter.as_mut() else {
            return Ok(Scope::Skip);
        };

        match tag {
            "CONT" => {
                submitter.address.push('\n');
                submitter.address.push_str(line.value());
            }
            "CONC" => submitter.address.push_str(line.value()),
            _ => submitter.fields.insert_back(Field::new(tag, line.value())),
        }
        Ok(Scope::Skip)
    }

    /// Checks what can only be known once every record has been read.
    fn finish(self) -> Result<Unresolved, ParseError> {
        if self.state.header_submitter.is_none() {
            return Err(ParseError::new(Cause::MissingSubmitterReference));
        }
        if let (Some(submitter), Some(line)) =
            (&self.state.document.submitter, self.submitter_line)
        {
            if submitter.name.is_empty() {
                return Err(ParseError::at(line, Cause::MissingSubmitterName));
            }
        }
        Ok(self.state)
    }
}

/// Splits a `NAME` value into given name and surname.
///
/// The given name is every word before the first `/`; the surname is the text
/// between the first `/` and the next one, or the end of the value.
fn split_name(value: &str) -> (String, String) {
    let (given, surname) = match value.split_once('/') {
        Some((given, rest)) => (given, rest.split('/').next().unwrap_or_default()),
        None => (value, ""),
    };

    let given = given
        .split([' ', '\t'])
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (given, surname.trim().to_string())
}
