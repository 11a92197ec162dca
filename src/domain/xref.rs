use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;

/// A cross-reference identifier linking GEDCOM records, e.g. `@I1@`.
///
/// The identifier is stored exactly as written, delimiters included, so that
/// it can be compared against other references and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Xref(NonEmptyString);

impl Xref {
    /// Creates an identifier from its `@`-delimited form.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the string is not of the form `@label@`, or if
    /// the label is empty or contains whitespace or `@`.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        let Some(label) = s.strip_prefix('@').and_then(|rest| rest.strip_suffix('@')) else {
            return Err(Error::Delimiters(s));
        };

        if label.is_empty() {
            return Err(Error::EmptyLabel(s));
        }

        if label.chars().any(|c| c == '@' || c.is_whitespace()) {
            return Err(Error::Label(s));
        }

        NonEmptyString::new(s).map(Self).map_err(Error::Delimiters)
    }

    /// Builds the identifier `@{prefix}{index}@`.
    ///
    /// # Panics
    ///
    /// Panics if `prefix` contains `@` or whitespace.
    #[must_use]
    pub fn numbered(prefix: &str, index: usize) -> Self {
        Self::new(format!("@{prefix}{index}@")).expect("generated xref labels are well-formed")
    }

    /// The identifier including its `@` delimiters.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The identifier without its `@` delimiters.
    #[must_use]
    pub fn label(&self) -> &str {
        let s = self.0.as_str();
        &s[1..s.len() - 1]
    }
}

impl Deref for Xref {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl AsRef<str> for Xref {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Xref {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Xref {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Xref {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Errors that can occur when parsing a cross-reference identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The identifier is not wrapped in `@` delimiters.
    #[error("invalid xref '{0}': expected the form @label@")]
    Delimiters(String),

    /// The identifier has nothing between its delimiters.
    #[error("invalid xref '{0}': label is empty")]
    EmptyLabel(String),

    /// The label contains whitespace or a nested `@`.
    #[error("invalid xref '{0}': label must not contain whitespace or '@'")]
    Label(String),
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("@I1@", "I1"; "individual")]
    #[test_case("@F23@", "F23"; "family")]
    #[test_case("@SUBMITTER@", "SUBMITTER"; "long label")]
    fn parses_valid(input: &str, label: &str) {
        let xref: Xref = input.parse().unwrap();
        assert_eq!(xref.as_str(), input);
        assert_eq!(xref.label(), label);
        assert_eq!(xref.to_string(), input);
    }

    #[test_case(""; "empty")]
    #[test_case("I1"; "no delimiters")]
    #[test_case("@I1"; "missing closing")]
    #[test_case("I1@"; "missing opening")]
    #[test_case("@"; "single at")]
    fn rejects_bad_delimiters(input: &str) {
        assert!(matches!(Xref::new(input), Err(Error::Delimiters(_))));
    }

    #[test]
    fn rejects_empty_label() {
        assert_eq!(
            Xref::new("@@"),
            Err(Error::EmptyLabel("@@".to_string()))
        );
    }

    #[test]
    fn rejects_nested_delimiter() {
        assert!(matches!(Xref::new("@I@1@"), Err(Error::Label(_))));
    }

    #[test]
    fn numbered_builds_identifier() {
        assert_eq!(Xref::numbered("I", 7).as_str(), "@I7@");
    }
}
