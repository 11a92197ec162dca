//! Domain models for family trees.
//!
//! This module contains the object graph a GEDCOM document parses into, the
//! generic container every collection is stored in, cross-reference
//! identifiers, configuration, and generation queries over the graph.

/// Generic owning container.
pub mod list;
pub use list::{Capabilities, List};

mod config;
pub use config::Config;

/// The document root, header, and submitter.
pub mod document;
pub use document::{CharSet, Document, Header, Submitter, ValidationError};

/// Individual, family, and event records.
pub mod record;
pub use record::{Event, Family, FamilyId, Field, Individual, IndividualId, Membership, Role};

/// Cross-reference identifier types and parsing.
pub mod xref;
pub use xref::{Error as XrefError, Xref};

pub mod generations;
pub use generations::{Generation, Generations};
