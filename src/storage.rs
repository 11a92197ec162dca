//! Reading GEDCOM text into a document and writing it back out.
//!
//! [`parse`] turns text into a fully linked [`Document`](crate::Document);
//! [`load`] does the same for a file. [`writer`] renders a document as GEDCOM
//! and [`json`] provides JSON views of it.

mod error;
mod file;
/// JSON views of documents and their records.
pub mod json;
mod parser;
mod resolver;
mod tokenizer;
/// GEDCOM serialization.
pub mod writer;

pub use error::{Cause, ErrorKind, ParseError};
pub use file::{load, LoadError, EXTENSION};
pub use parser::parse;
