//! Parsing GEDCOM genealogy files into a linked family tree.
//!
//! A GEDCOM document is a sequence of leveled lines. [`parse`] reads one into
//! a [`Document`]: a header, a submitter, and the individuals and families of
//! the tree, with every cross-reference resolved into a handle. The document
//! can then be queried for ancestors and descendants by generation, written
//! back out as GEDCOM, or rendered as JSON.
//!
//! ```
//! use gedtree::{parse, Config};
//!
//! let text = "\
//! 0 HEAD
//! 1 SOUR example
//! 1 GEDC
//! 2 VERS 5.5
//! 1 CHAR UTF-8
//! 1 SUBM @U1@
//! 0 @U1@ SUBM
//! 1 NAME Jo
//! 0 @I1@ INDI
//! 1 NAME John /Smith/
//! 0 TRLR
//! ";
//!
//! let document = parse(text, &Config::default())?;
//! assert_eq!(document.individuals()[0].surname, "Smith");
//! # Ok::<(), gedtree::ParseError>(())
//! ```

pub mod domain;
pub use domain::{
    Config, Document, Family, FamilyId, Generations, Header, Individual, IndividualId, Submitter,
    Xref,
};

/// Reading and writing GEDCOM text.
pub mod storage;
pub use storage::{load, parse, ErrorKind, LoadError, ParseError};
