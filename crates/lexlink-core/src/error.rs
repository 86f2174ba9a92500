//! Error types for Lexlink Core

use thiserror::Error;

/// Result type alias using Lexlink's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Lexlink core error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    #[error("Invalid prefix: {0}")]
    InvalidPrefix(String),

    #[error("Duplicate prefix: {0}")]
    DuplicatePrefix(String),

    #[error("Route {0} is claimed by more than one prefix")]
    DuplicateRoute(String),

    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    #[error("Invalid predicate key: {0}")]
    InvalidPredicate(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Registry file error: {0}")]
    RegistryFile(#[from] toml::de::Error),
}
