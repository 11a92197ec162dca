//! JSON views of individuals, generations, and document summaries.
//!
//! Individuals render as `{"givenName": .., "surname": ..}`, lists of
//! individuals as arrays of those, and generations as arrays of arrays.
//! A document summary carries the header and submitter only, so it can seed a
//! new document but never carries records.

use serde::{Deserialize, Serialize};

use crate::domain::{
    document::UnknownCharSet, CharSet, Document, Generations, Header, Individual, IndividualId,
    Submitter, Xref,
};

/// Identifier given to the submitter of a document built from a summary.
pub const SUMMARY_SUBMITTER: &str = "@U1@";

/// The JSON form of an individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualJson {
    /// Given name.
    pub given_name: String,
    /// Surname.
    pub surname: String,
}

impl From<&Individual> for IndividualJson {
    fn from(individual: &Individual) -> Self {
        Self {
            given_name: individual.given_name.clone(),
            surname: individual.surname.clone(),
        }
    }
}

/// The JSON form of a document's header and submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryJson {
    /// Producing system.
    pub source: String,
    /// GEDCOM version as written, e.g. `"5.5"`.
    pub gedc_version: String,
    /// Character set name, e.g. `"UTF-8"`.
    pub encoding: String,
    /// Submitter name.
    pub sub_name: String,
    /// Submitter address, lines separated by `\n`.
    #[serde(default)]
    pub sub_address: String,
}

impl SummaryJson {
    /// Summarises the header and submitter of `document`.
    #[must_use]
    pub fn of(document: &Document) -> Self {
        let submitter = document.submitter();
        Self {
            source: document.header.source.clone(),
            gedc_version: document.header.version.to_string(),
            encoding: document
                .header
                .encoding
                .map(|encoding| encoding.to_string())
                .unwrap_or_default(),
            sub_name: submitter.map(|s| s.name.clone()).unwrap_or_default(),
            sub_address: submitter.map(|s| s.address.clone()).unwrap_or_default(),
        }
    }
}

impl TryFrom<SummaryJson> for Document {
    type Error = Error;

    fn try_from(summary: SummaryJson) -> Result<Self, Self::Error> {
        let mut header = Header::new();
        header.source = summary.source;
        header.version = Header::parse_version(&summary.gedc_version)
            .ok_or(Error::Version(summary.gedc_version))?;
        header.encoding = Some(summary.encoding.parse::<CharSet>()?);

        let mut submitter = Submitter::new(Xref::new(SUMMARY_SUBMITTER)?, summary.sub_name);
        submitter.address = summary.sub_address;

        let mut document = Self::new(header);
        document.set_submitter(submitter);
        Ok(document)
    }
}

/// Errors that can occur when reading JSON.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The text is not valid JSON of the expected shape.
    #[error(transparent)]
    Syntax(#[from] serde_json::Error),
    /// The version is not a positive number.
    #[error("invalid GEDCOM version '{0}'")]
    Version(String),
    /// The encoding is not a recognised character set.
    #[error(transparent)]
    Encoding(#[from] UnknownCharSet),
    /// The fixed submitter identifier was rejected.
    #[error(transparent)]
    Xref(#[from] crate::domain::XrefError),
}

/// Renders one individual.
#[must_use]
pub fn individual_to_json(individual: &Individual) -> String {
    serialize(&IndividualJson::from(individual))
}

/// Renders the individuals behind `ids`, skipping handles from another
/// document.
#[must_use]
pub fn individuals_to_json<I>(document: &Document, ids: I) -> String
where
    I: IntoIterator<Item = IndividualId>,
{
    serialize(&individual_views(document, ids))
}

/// Renders generations as an array of arrays of individuals.
#[must_use]
pub fn generations_to_json(document: &Document, generations: &Generations) -> String {
    let views: Vec<Vec<IndividualJson>> = generations
        .iter()
        .map(|generation| individual_views(document, generation.iter().copied()))
        .collect();
    serialize(&views)
}

/// Reads an individual and appends it to `document`.
///
/// # Errors
///
/// Returns an error if the JSON does not describe an individual.
pub fn add_individual_from_json(document: &mut Document, json: &str) -> Result<IndividualId, Error> {
    let view: IndividualJson = serde_json::from_str(json)?;
    Ok(document.add_individual(view.given_name, view.surname))
}

/// Renders the header and submitter of `document`.
#[must_use]
pub fn summary_to_json(document: &Document) -> String {
    serialize(&SummaryJson::of(document))
}

/// Builds a document with a header and submitter from a JSON summary.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or holds an invalid version or
/// encoding.
pub fn document_from_json(json: &str) -> Result<Document, Error> {
    let summary: SummaryJson = serde_json::from_str(json)?;
    Document::try_from(summary)
}

fn individual_views<I>(document: &Document, ids: I) -> Vec<IndividualJson>
where
    I: IntoIterator<Item = IndividualId>,
{
    ids.into_iter()
        .filter_map(|id| document.individual(id))
        .map(IndividualJson::from)
        .collect()
}

fn serialize<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).expect("plain data always serializes")
}
