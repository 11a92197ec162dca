//! Errors reported while reading a GEDCOM document.

use std::fmt;

use crate::domain::{Xref, XrefError};

/// The broad category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The source could not be read.
    FileAccess,
    /// The line structure is illegal: bad levels, overlong lines, or records
    /// in the wrong place.
    Structural,
    /// The header is missing, incomplete, or holds an invalid value.
    HeaderValidation,
    /// A record line lacks its tag or identifier, or a required subfield.
    RecordLevel,
    /// A cross-reference does not resolve to a record.
    GraphConsistency,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::FileAccess => "invalid file",
            Self::Structural => "invalid structure",
            Self::HeaderValidation => "invalid header",
            Self::RecordLevel => "invalid record",
            Self::GraphConsistency => "inconsistent graph",
        };
        f.write_str(text)
    }
}

/// The concrete reason a parse failed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Cause {
    /// The line does not start with a non-negative level number.
    #[error("invalid level number '{0}'")]
    InvalidLevel(String),

    /// The level is more than one deeper than the previous line's.
    #[error("level {level} is deeper than the allowed {max_allowed}")]
    LevelJump {
        /// Level found on the line.
        level: usize,
        /// Deepest level allowed after the previous line.
        max_allowed: usize,
    },

    /// The level exceeds the configured nesting limit.
    #[error("level {level} exceeds the maximum depth of {max_depth}")]
    TooDeep {
        /// Level found on the line.
        level: usize,
        /// Configured number of levels.
        max_depth: usize,
    },

    /// The line is longer than the configured ceiling.
    #[error("line is {length} bytes long, the limit is {max}")]
    LineTooLong {
        /// Length of the line in bytes.
        length: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// A second `HEAD` record.
    #[error("duplicate HEAD record")]
    DuplicateHeader,

    /// The input ended before `TRLR`.
    #[error("missing TRLR record")]
    MissingTrailer,

    /// A record appears before any `HEAD`.
    #[error("record appears before the header")]
    MissingHeader,

    /// A record appears before the header has all mandatory values.
    #[error("header is incomplete: missing {missing}")]
    IncompleteHeader {
        /// Tag of the first missing value.
        missing: &'static str,
    },

    /// A header line has a level but no tag.
    #[error("header line has no tag")]
    EmptyHeaderLine,

    /// A header line lacks its value.
    #[error("header {tag} line has no value")]
    MissingHeaderValue {
        /// Tag of the line.
        tag: &'static str,
    },

    /// The `VERS` value is not a positive number.
    #[error("invalid GEDCOM version '{0}'")]
    InvalidVersion(String),

    /// The `CHAR` value is not a recognised encoding.
    #[error("unknown character set '{0}'")]
    UnknownEncoding(String),

    /// The header never references a submitter.
    #[error("header has no SUBM reference")]
    MissingSubmitterReference,

    /// The header's `SUBM` value is not a cross-reference.
    #[error("header SUBM reference is malformed: {0}")]
    InvalidSubmitterReference(#[source] XrefError),

    /// A line has a level but no tag.
    #[error("line has no tag")]
    MissingTag,

    /// A record-defining line has no identifier.
    #[error("{tag} record has no identifier")]
    MissingXref {
        /// Tag of the record.
        tag: String,
    },

    /// An identifier is malformed.
    #[error(transparent)]
    InvalidXref(#[from] XrefError),

    /// A linking line has no identifier to link to.
    #[error("{tag} line has no cross-reference")]
    MissingReference {
        /// Tag of the line.
        tag: &'static str,
    },

    /// A required value is absent.
    #[error("{tag} line has no value")]
    MissingValue {
        /// Tag of the line.
        tag: &'static str,
    },

    /// Two records of the same kind share an identifier.
    #[error("duplicate record identifier {0}")]
    DuplicateXref(Xref),

    /// A second `SUBM` record.
    #[error("duplicate SUBM record")]
    DuplicateSubmitter,

    /// A family names two husbands or two wives.
    #[error("family has more than one {tag}")]
    DuplicateSpouse {
        /// `HUSB` or `WIFE`.
        tag: &'static str,
    },

    /// The submitter record has no name.
    #[error("submitter has no NAME")]
    MissingSubmitterName,

    /// A cross-reference names no record.
    #[error("{tag} references missing record {xref}")]
    DanglingReference {
        /// Tag of the referencing line.
        tag: &'static str,
        /// The unresolved identifier.
        xref: Xref,
    },

    /// The header's submitter reference does not name the submitter record.
    #[error("header SUBM references missing submitter {0}")]
    UnmatchedSubmitter(Xref),
}

impl Cause {
    /// The category this cause belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLevel(_)
            | Self::LevelJump { .. }
            | Self::TooDeep { .. }
            | Self::LineTooLong { .. }
            | Self::DuplicateHeader
            | Self::MissingTrailer => ErrorKind::Structural,
            Self::MissingHeader
            | Self::IncompleteHeader { .. }
            | Self::EmptyHeaderLine
            | Self::MissingHeaderValue { .. }
            | Self::InvalidVersion(_)
            | Self::UnknownEncoding(_)
            | Self::MissingSubmitterReference
            | Self::InvalidSubmitterReference(_) => ErrorKind::HeaderValidation,
            Self::MissingTag
            | Self::MissingXref { .. }
            | Self::InvalidXref(_)
            | Self::MissingReference { .. }
            | Self::MissingValue { .. }
            | Self::DuplicateXref(_)
            | Self::DuplicateSubmitter
            | Self::DuplicateSpouse { .. }
            | Self::MissingSubmitterName => ErrorKind::RecordLevel,
            Self::DanglingReference { .. } | Self::UnmatchedSubmitter(_) => {
                ErrorKind::GraphConsistency
            }
        }
    }
}

/// A failed parse: what went wrong and, when known, where.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub struct ParseError {
    line: Option<usize>,
    #[source]
    cause: Cause,
}

impl ParseError {
    /// An error not tied to a particular line.
    #[must_use]
    pub const fn new(cause: Cause) -> Self {
        Self { line: None, cause }
    }

    /// An error raised by the given 1-based line.
    #[must_use]
    pub const fn at(line: usize, cause: Cause) -> Self {
        Self {
            line: Some(line),
            cause,
        }
    }

    /// The category of the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.cause.kind()
    }

    /// The 1-based line that raised the failure, when known.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        self.line
    }

    /// The concrete reason for the failure.
    #[must_use]
    pub const fn cause(&self) -> &Cause {
        &self.cause
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} at line {line}: {}", self.kind(), self.cause),
            None => write!(f, "{}: {}", self.kind(), self.cause),
        }
    }
}
