use std::path::Path;

use thiserror::Error;

/// Top-level error type for the crate.
#[derive(Error, Debug)]
pub enum TandemError {
    /// Configuration could not be loaded or validated.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Underlying IO failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML input could not be parsed.
    #[error("{0}")]
    TomlParse(String),

    /// Failure from the player adapter layer.
    #[error(transparent)]
    Player(#[from] crate::player::PlayerError),
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TandemError>;

impl TandemError {
    /// Build a TOML parse error, including the offending path when known.
    pub fn toml_parse(error: impl std::fmt::Display, path: Option<&Path>) -> Self {
        match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                TandemError::TomlParse(format!(
                    "Failed to parse TOML at {:?}: {}",
                    clean_path, error
                ))
            }
            None => TandemError::TomlParse(format!("Failed to parse TOML: {}", error)),
        }
    }
}
