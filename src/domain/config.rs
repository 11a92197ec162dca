use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for reading GEDCOM documents.
///
/// Controls the limits the parser enforces and how input files are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The number of nesting levels the parser accepts.
    ///
    /// Lines are accepted at levels `0` through `max_depth - 1`; anything
    /// deeper is rejected.
    max_depth: usize,

    /// The longest line, in bytes, the parser accepts.
    max_line_length: usize,

    /// Whether input files must carry the `.ged` extension.
    pub require_ged_extension: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_line_length: default_max_line_length(),
            require_ged_extension: true,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the number of nesting levels the parser accepts.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Sets the number of nesting levels the parser accepts.
    ///
    /// Values below 2 are raised to 2, the least that can hold a header.
    pub fn set_max_depth(&mut self, depth: usize) {
        self.max_depth = depth.max(2);
    }

    /// Returns the longest line, in bytes, the parser accepts.
    #[must_use]
    pub const fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    /// Sets the longest line, in bytes, the parser accepts.
    pub const fn set_max_line_length(&mut self, length: usize) {
        self.max_line_length = length;
    }
}

const fn default_max_depth() -> usize {
    8
}

const fn default_max_line_length() -> usize {
    255
}

const fn default_require_ged_extension() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_max_depth")]
        max_depth: usize,

        #[serde(default = "default_max_line_length")]
        max_line_length: usize,

        #[serde(default = "default_require_ged_extension")]
        require_ged_extension: bool,
    },
}

impl From<Versions> for super::Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                max_depth,
                max_line_length,
                require_ged_extension,
            } => Self {
                max_depth: max_depth.max(2),
                max_line_length,
                require_ged_extension,
            },
        }
    }
}

impl From<super::Config> for Versions {
    fn from(config: super::Config) -> Self {
        Self::V1 {
            max_depth: config.max_depth,
            max_line_length: config.max_line_length,
            require_ged_extension: config.require_ged_extension,
        }
    }
}
