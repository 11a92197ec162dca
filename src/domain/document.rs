//! The root of a parsed family tree.

use std::{fmt, str::FromStr};

use crate::domain::{
    generations::{self, Generations},
    list::{Capabilities, List},
    record::{compare_xrefs, Family, FamilyId, Field, Individual, IndividualId},
    Xref,
};

/// Character encodings a GEDCOM header may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharSet {
    /// `UTF-8`
    Utf8,
    /// `ASCII`
    Ascii,
    /// `UNICODE`
    Unicode,
    /// `ANSEL`
    Ansel,
}

impl CharSet {
    /// The name used for this encoding in a `CHAR` line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Ascii => "ASCII",
            Self::Unicode => "UNICODE",
            Self::Ansel => "ANSEL",
        }
    }
}

impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharSet {
    type Err = UnknownCharSet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UTF-8" => Ok(Self::Utf8),
            "ASCII" => Ok(Self::Ascii),
            "UNICODE" => Ok(Self::Unicode),
            "ANSEL" => Ok(Self::Ansel),
            other => Err(UnknownCharSet(other.to_string())),
        }
    }
}

/// Error returned for an encoding name outside the recognised set.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown character set '{0}'")]
pub struct UnknownCharSet(pub String);

/// The `HEAD` record.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// The producing system (`SOUR`).
    pub source: String,
    /// The GEDCOM version (`GEDC`/`VERS`); zero until set.
    pub version: f32,
    /// The declared encoding (`CHAR`).
    pub encoding: Option<CharSet>,
    /// Whether the header points at the document's submitter (`SUBM`).
    pub(crate) has_submitter: bool,
    /// Subtags not otherwise interpreted.
    pub fields: List<Field>,
}

impl Header {
    /// An empty header.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: String::new(),
            version: 0.0,
            encoding: None,
            has_submitter: false,
            fields: Field::list(),
        }
    }

    /// Whether the mandatory source, version, and encoding are all present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing().is_none()
    }

    /// The first mandatory value that is still absent, by tag.
    #[must_use]
    pub fn missing(&self) -> Option<&'static str> {
        if self.source.is_empty() {
            Some("SOUR")
        } else if self.version <= 0.0 {
            Some("VERS")
        } else if self.encoding.is_none() {
            Some("CHAR")
        } else {
            None
        }
    }

    /// Whether the header references the document's submitter.
    #[must_use]
    pub const fn has_submitter(&self) -> bool {
        self.has_submitter
    }

    /// Reads a version number from the numeric prefix of `text`.
    ///
    /// `5.5.1` reads as `5.5`. Returns `None` unless the prefix is a positive
    /// number.
    #[must_use]
    pub fn parse_version(text: &str) -> Option<f32> {
        let mut seen_dot = false;
        let end = text
            .char_indices()
            .find(|&(_, c)| {
                if c == '.' && !seen_dot {
                    seen_dot = true;
                    false
                } else {
                    !c.is_ascii_digit()
                }
            })
            .map_or(text.len(), |(index, _)| index);

        text[..end]
            .trim_end_matches('.')
            .parse::<f32>()
            .ok()
            .filter(|version| *version > 0.0)
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

/// The `SUBM` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitter {
    pub(crate) xref: Xref,
    /// Submitter name.
    pub name: String,
    /// Free-text address, one address line per text line.
    pub address: String,
    /// Subtags not otherwise interpreted.
    pub fields: List<Field>,
}

impl Submitter {
    /// Creates a submitter with no address or fields.
    #[must_use]
    pub fn new(xref: Xref, name: impl Into<String>) -> Self {
        Self {
            xref,
            name: name.into(),
            address: String::new(),
            fields: Field::list(),
        }
    }

    /// The record identifier.
    #[must_use]
    pub const fn xref(&self) -> &Xref {
        &self.xref
    }

    /// The address split into its lines.
    ///
    /// Empty lines are kept, including a trailing one. An empty address has
    /// no lines.
    pub fn address_lines(&self) -> impl Iterator<Item = &str> {
        (!self.address.is_empty())
            .then(|| self.address.split('\n'))
            .into_iter()
            .flatten()
    }
}

/// A complete, closed family tree.
///
/// Every individual/family handle reachable from the document refers to an
/// entity in its own collections.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The header.
    pub header: Header,
    pub(crate) submitter: Option<Submitter>,
    pub(crate) individuals: List<Individual>,
    pub(crate) families: List<Family>,
}

impl Document {
    /// Creates a document with the given header and nothing else.
    #[must_use]
    pub fn new(header: Header) -> Self {
        Self {
            header,
            submitter: None,
            individuals: List::new(Capabilities {
                stringify: ToString::to_string,
                destroy: drop,
                compare: |a: &Individual, b: &Individual| compare_xrefs(&a.xref, &b.xref),
            }),
            families: List::new(Capabilities {
                stringify: |family: &Family| format!("family {}\n", family.xref),
                destroy: drop,
                compare: |a: &Family, b: &Family| compare_xrefs(&a.xref, &b.xref),
            }),
        }
    }

    /// The submitter record.
    #[must_use]
    pub const fn submitter(&self) -> Option<&Submitter> {
        self.submitter.as_ref()
    }

    /// The submitter the header points at.
    #[must_use]
    pub fn header_submitter(&self) -> Option<&Submitter> {
        self.submitter.as_ref().filter(|_| self.header.has_submitter)
    }

    /// Sets the submitter record and points the header at it.
    pub fn set_submitter(&mut self, submitter: Submitter) {
        self.submitter = Some(submitter);
        self.header.has_submitter = true;
    }

    /// All individuals, in record order.
    #[must_use]
    pub const fn individuals(&self) -> &List<Individual> {
        &self.individuals
    }

    /// All families, in record order.
    #[must_use]
    pub const fn families(&self) -> &List<Family> {
        &self.families
    }

    /// Handles and records of every individual.
    pub fn individuals_with_ids(&self) -> impl Iterator<Item = (IndividualId, &Individual)> {
        self.individuals
            .iter()
            .enumerate()
            .map(|(index, individual)| (IndividualId(index), individual))
    }

    /// The individual behind a handle.
    #[must_use]
    pub fn individual(&self, id: IndividualId) -> Option<&Individual> {
        self.individuals.get(id.0)
    }

    /// The family behind a handle.
    #[must_use]
    pub fn family(&self, id: FamilyId) -> Option<&Family> {
        self.families.get(id.0)
    }

    /// Finds an individual by record identifier.
    #[must_use]
    pub fn individual_by_xref(&self, xref: &Xref) -> Option<IndividualId> {
        self.find_individual(|individual| &individual.xref == xref)
    }

    /// Finds a family by record identifier.
    #[must_use]
    pub fn family_by_xref(&self, xref: &Xref) -> Option<FamilyId> {
        self.families
            .position_matching(|family| &family.xref == xref)
            .map(FamilyId)
    }

    /// Finds the first individual accepted by `predicate`.
    pub fn find_individual<P>(&self, predicate: P) -> Option<IndividualId>
    where
        P: FnMut(&Individual) -> bool,
    {
        self.individuals.position_matching(predicate).map(IndividualId)
    }

    /// Appends an individual with no family links.
    ///
    /// The individual is given the next free `@I<n>@` identifier.
    pub fn add_individual(
        &mut self,
        given_name: impl Into<String>,
        surname: impl Into<String>,
    ) -> IndividualId {
        let mut n = self.individuals.len() + 1;
        let xref = loop {
            let candidate = Xref::numbered("I", n);
            if self.individual_by_xref(&candidate).is_none() {
                break candidate;
            }
            n += 1;
        };

        self.individuals
            .insert_back(Individual::new(xref, given_name, surname));
        IndividualId(self.individuals.len() - 1)
    }

    /// Up to `max_generations` generations of descendants of `person`.
    #[must_use]
    pub fn descendants(&self, person: IndividualId, max_generations: usize) -> Generations {
        generations::descendants(self, person, max_generations)
    }

    /// Up to `max_generations` generations of ancestors of `person`.
    #[must_use]
    pub fn ancestors(&self, person: IndividualId, max_generations: usize) -> Generations {
        generations::ancestors(self, person, max_generations)
    }

    /// Checks that a constructed document has the mandatory parts.
    ///
    /// Parsed documents always pass; this is for documents assembled in code
    /// or imported from JSON.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.header.has_submitter {
            return Err(ValidationError::HeaderSubmitter);
        }
        if self.header.version <= 0.0 {
            return Err(ValidationError::Version);
        }
        let Some(submitter) = &self.submitter else {
            return Err(ValidationError::MissingSubmitter);
        };
        if submitter.name.is_empty() {
            return Err(ValidationError::SubmitterName);
        }
        Ok(())
    }
}

/// Problems found by [`Document::validate`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The header does not reference a submitter.
    #[error("header has no submitter")]
    HeaderSubmitter,
    /// The header version is zero.
    #[error("header has no GEDCOM version")]
    Version,
    /// The document has no submitter record.
    #[error("document has no submitter record")]
    MissingSubmitter,
    /// The submitter record has an empty name.
    #[error("submitter has no name")]
    SubmitterName,
}

impl ValidationError {
    /// The error kind this problem corresponds to.
    #[must_use]
    pub const fn kind(&self) -> crate::ErrorKind {
        match self {
            Self::HeaderSubmitter | Self::Version => crate::ErrorKind::HeaderValidation,
            Self::MissingSubmitter => crate::ErrorKind::GraphConsistency,
            Self::SubmitterName => crate::ErrorKind::RecordLevel,
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Header:")?;
        writeln!(f, " - source: {}", self.header.source)?;
        writeln!(f, " - version: {}", self.header.version)?;
        if let Some(encoding) = self.header.encoding {
            writeln!(f, " - encoding: {encoding}")?;
        }
        if let Some(submitter) = &self.submitter {
            writeln!(f, "Submitter: {}", submitter.name)?;
            for line in submitter.address_lines() {
                writeln!(f, " - {line}")?;
            }
        }
        if !self.header.fields.is_empty() {
            write!(f, "Fields:\n{}", self.header.fields.stringify())?;
        }
        writeln!(f, "Individuals:\n{}", self.individuals.stringify())?;
        writeln!(f, "Families:\n{}", self.families.stringify())
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("", &[]; "empty")]
    #[test_case("1 Main", &["1 Main"]; "one line")]
    #[test_case("1 Main\n", &["1 Main", ""]; "trailing empty line")]
    #[test_case("\nDublin", &["", "Dublin"]; "leading empty line")]
    fn address_lines_keep_empty_lines(address: &str, expected: &[&str]) {
        let mut submitter = Submitter::new(Xref::new("@U1@").unwrap(), "Jo");
        submitter.address = address.to_string();
        assert_eq!(submitter.address_lines().collect::<Vec<_>>(), expected);
    }

    fn complete_header() -> Header {
        let mut header = Header::new();
        header.source = "PAF".to_string();
        header.version = 5.5;
        header.encoding = Some(CharSet::Ascii);
        header
    }

    #[test_case("UTF-8", CharSet::Utf8)]
    #[test_case("ASCII", CharSet::Ascii)]
    #[test_case("UNICODE", CharSet::Unicode)]
    #[test_case("ANSEL", CharSet::Ansel)]
    fn parses_known_charsets(name: &str, expected: CharSet) {
        assert_eq!(name.parse::<CharSet>(), Ok(expected));
        assert_eq!(expected.as_str(), name);
    }

    #[test]
    fn rejects_unknown_charset() {
        assert_eq!(
            "UTF8".parse::<CharSet>(),
            Err(UnknownCharSet("UTF8".to_string()))
        );
    }

    #[test]
    fn header_reports_first_missing_value() {
        let mut header = Header::new();
        assert_eq!(header.missing(), Some("SOUR"));
        header.source = "PAF".to_string();
        assert_eq!(header.missing(), Some("VERS"));
        header.version = 5.5;
        assert_eq!(header.missing(), Some("CHAR"));
        header.encoding = Some(CharSet::Utf8);
        assert!(header.is_complete());
    }

    #[test_case("5.5", Some(5.5))]
    #[test_case("5.5.1", Some(5.5))]
    #[test_case("7", Some(7.0))]
    #[test_case("5.", Some(5.0))]
    #[test_case("0", None)]
    #[test_case("", None)]
    #[test_case("five", None)]
    fn reads_version_prefix(text: &str, expected: Option<f32>) {
        assert_eq!(Header::parse_version(text), expected);
    }

    #[test]
    fn add_individual_assigns_free_xref() {
        let mut document = Document::new(complete_header());
        let first = document.add_individual("Ann", "Lee");
        let second = document.add_individual("Bo", "Lee");

        assert_eq!(document.individual(first).unwrap().xref().as_str(), "@I1@");
        assert_eq!(document.individual(second).unwrap().xref().as_str(), "@I2@");
        assert_eq!(
            document.individual_by_xref(&Xref::new("@I2@").unwrap()),
            Some(second)
        );
    }

    #[test]
    fn find_individual_by_predicate() {
        let mut document = Document::new(complete_header());
        document.add_individual("Ann", "Lee");
        let bo = document.add_individual("Bo", "Chan");

        assert_eq!(document.find_individual(|i| i.surname == "Chan"), Some(bo));
        assert_eq!(document.find_individual(|i| i.surname == "Nobody"), None);
    }

    #[test]
    fn validate_requires_submitter() {
        let mut document = Document::new(complete_header());
        assert_eq!(document.validate(), Err(ValidationError::HeaderSubmitter));

        document.set_submitter(Submitter::new(Xref::new("@U1@").unwrap(), ""));
        assert_eq!(document.validate(), Err(ValidationError::SubmitterName));
        assert_eq!(
            ValidationError::SubmitterName.kind(),
            crate::ErrorKind::RecordLevel
        );

        document.set_submitter(Submitter::new(Xref::new("@U1@").unwrap(), "Jo"));
        assert_eq!(document.validate(), Ok(()));
    }

    #[test]
    fn validate_requires_version() {
        let mut header = complete_header();
        header.version = 0.0;
        let mut document = Document::new(header);
        document.set_submitter(Submitter::new(Xref::new("@U1@").unwrap(), "Jo"));
        assert_eq!(document.validate(), Err(ValidationError::Version));
    }
}
