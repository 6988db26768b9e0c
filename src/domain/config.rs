use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::accession::{DEFAULT_MAX_SPAN, Expander};

/// Configuration for accession number handling and scan processing.
///
/// Values loaded from disk can be overridden by command line flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The MDA code that prepends some accession numbers.
    ///
    /// For example, 'LDHRM' in 'LDHRM.2023.1'.
    mda_code: String,

    /// File extensions treated as scanned images, including the leading dot.
    ///
    /// Compared case-insensitively.
    image_extensions: Vec<String>,

    /// The largest number of accession numbers a single range may denote.
    max_range_span: usize,

    /// The character that introduces a part marker in split filenames.
    ///
    /// For example, with '#' the files `JB001&2#1.jpg` and `JB001&2#2.jpg`
    /// carry parts 1 and 2.
    pub flag_char: Option<char>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mda_code: default_mda_code(),
            image_extensions: default_image_extensions(),
            max_range_span: DEFAULT_MAX_SPAN,
            flag_char: None,
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

    /// Returns the MDA code.
    #[must_use]
    pub fn mda_code(&self) -> &str {
        &self.mda_code
    }

    /// Replaces the MDA code.
    pub fn set_mda_code(&mut self, code: String) {
        self.mda_code = code;
    }

    /// Returns the image extensions, each with a leading dot.
    #[must_use]
    pub fn image_extensions(&self) -> &[String] {
        &self.image_extensions
    }

    /// Checks whether an extension (with or without the leading dot) names
    /// an image file.
    #[must_use]
    pub fn is_image_extension(&self, extension: &str) -> bool {
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        self.image_extensions.iter().any(|known| {
            known
                .strip_prefix('.')
                .unwrap_or(known)
                .eq_ignore_ascii_case(extension)
        })
    }

    /// Returns the ceiling on IDs per range.
    #[must_use]
    pub const fn max_range_span(&self) -> usize {
        self.max_range_span
    }

    /// Builds an [`Expander`] honouring the configured range ceiling.
    #[must_use]
    pub const fn expander(&self) -> Expander {
        Expander::with_max_span(self.max_range_span)
    }
}

fn default_mda_code() -> String {
    "LDHRM".to_string()
}

fn default_image_extensions() -> Vec<String> {
    [".png", ".jpg", ".jpeg"]
        .into_iter()
        .map(String::from)
        .collect()
}

const fn default_max_range_span() -> usize {
    DEFAULT_MAX_SPAN
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_mda_code")]
        mda_code: String,

        #[serde(default = "default_image_extensions")]
        image_extensions: Vec<String>,

        /// Ceiling on the number of IDs one range token may produce.
        #[serde(default = "default_max_range_span")]
        max_range_span: usize,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        flag_char: Option<char>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                mda_code,
                image_extensions,
                max_range_span,
                flag_char,
            } => Self {
                mda_code,
                image_extensions,
                max_range_span,
                flag_char,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            mda_code: config.mda_code,
            image_extensions: config.image_extensions,
            max_range_span: config.max_range_span,
            flag_char: config.flag_char,
        }
    }
}
