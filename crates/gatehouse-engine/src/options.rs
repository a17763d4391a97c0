//! Engine construction options.
//!
//! Options can be built in code or loaded from a TOML file:
//!
//! ```toml
//! variant = "crazyhouse"
//! chess960 = true
//! start_position = 465
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::rules::VariantKind;

/// Errors that can occur when loading options.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the options file from disk.
    #[error("failed to read options file: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse the options as valid TOML.
    #[error("failed to parse options: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How a [`Game`](crate::Game) is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// Rule set to play.
    pub variant: VariantKind,
    /// Accept and write shuffled castling rights.
    pub chess960: bool,
    /// Start from this numbered arrangement instead of the orthodox one.
    /// Only read when `chess960` is set.
    pub start_position: Option<u16>,
}

impl GameOptions {
    /// Options for a variant with orthodox castling.
    pub fn new(variant: VariantKind) -> Self {
        GameOptions {
            variant,
            ..Self::default()
        }
    }

    /// Parses options from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads options from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let options = GameOptions::from_toml_str("").unwrap();
        assert_eq!(options, GameOptions::default());
        assert_eq!(options.variant, VariantKind::Standard);
        assert!(!options.chess960);
    }

    #[test]
    fn full_toml() {
        let options = GameOptions::from_toml_str(
            "variant = \"seirawan\"\nchess960 = true\nstart_position = 12\n",
        )
        .unwrap();
        assert_eq!(options.variant, VariantKind::Seirawan);
        assert!(options.chess960);
        assert_eq!(options.start_position, Some(12));
    }

    #[test]
    fn unknown_variant_is_a_parse_error() {
        let err = GameOptions::from_toml_str("variant = \"atomic\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GameOptions::load("/nonexistent/gatehouse.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn new_sets_variant_only() {
        let options = GameOptions::new(VariantKind::Crazyhouse);
        assert_eq!(options.variant, VariantKind::Crazyhouse);
        assert_eq!(options.start_position, None);
    }
}
