use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};

use tracing::instrument;

use crate::{
    domain::{Config, Document},
    storage::{
        error::{ErrorKind, ParseError},
        parser,
    },
};

/// The extension GEDCOM files carry.
pub const EXTENSION: &str = "ged";

/// Reads and parses the GEDCOM file at `path`.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so files
/// declaring `ASCII` or `ANSEL` still load.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file has the wrong extension, cannot be
/// read, or does not parse.
#[instrument(skip(config))]
pub fn load(path: &Path, config: &Config) -> Result<Document, LoadError> {
    if config.require_ged_extension
        && !path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case(EXTENSION))
    {
        return Err(LoadError::Extension(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|io_error| match io_error.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io(io_error),
    })?;

    let mut bytes = Vec::new();
    BufReader::new(file).read_to_end(&mut bytes)?;
    let text = String::from_utf8_lossy(&bytes);

    Ok(parser::parse(&text, config)?)
}

/// Errors that can occur when loading a GEDCOM file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The file does not carry the `.ged` extension.
    #[error("not a .ged file: {}", .0.display())]
    Extension(PathBuf),
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The content is not a valid GEDCOM document.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl LoadError {
    /// The category of the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::Extension(_) | Self::Io(_) => ErrorKind::FileAccess,
            Self::Parse(error) => error.kind(),
        }
    }

    /// The 1-based line that caused a parse failure, when known.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Parse(error) => error.line(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const MINIMAL: &str = "0 HEAD\n1 SOUR PAF\n1 GEDC\n2 VERS 5.5\n1 CHAR UTF-8\n1 SUBM @U1@\n0 @U1@ SUBM\n1 NAME Jo\n0 TRLR\n";

    fn ged_file(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".ged").tempfile().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn loads_valid_file() {
        let file = ged_file(MINIMAL.as_bytes());
        let document = load(file.path(), &Config::default()).unwrap();
        assert_eq!(document.submitter().unwrap().name, "Jo");
    }

    #[test]
    fn missing_file_is_file_access() {
        let tmp = tempfile::tempdir().unwrap();
        let error = load(&tmp.path().join("absent.ged"), &Config::default()).unwrap_err();

        assert!(matches!(error, LoadError::NotFound(_)));
        assert_eq!(error.kind(), ErrorKind::FileAccess);
    }

    #[test]
    fn wrong_extension_is_rejected_unless_disabled() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let error = load(file.path(), &Config::default()).unwrap_err();
        assert!(matches!(error, LoadError::Extension(_)));

        let mut config = Config::default();
        config.require_ged_extension = false;
        load(file.path(), &config).unwrap();
    }

    #[test]
    fn parse_failure_keeps_kind_and_line() {
        let file = ged_file(b"0 HEAD\n2 SOUR X\n");
        let error = load(file.path(), &Config::default()).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Structural);
        assert_eq!(error.line(), Some(2));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut content = MINIMAL.replace("NAME Jo", "NAME J\u{fffd}").into_bytes();
        let position = content.iter().position(|&b| b == 0xEF).unwrap();
        content.splice(position..position + 3, [0xE9]);

        let document = load(ged_file(&content).path(), &Config::default()).unwrap();
        assert_eq!(document.submitter().unwrap().name, "J\u{fffd}");
    }
}
