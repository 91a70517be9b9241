//! Error types for source obfuscation

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ObfuscationError>;

#[derive(Debug, Error)]
pub enum ObfuscationError {
    /// A marker names a qualified identifier the table does not know.
    #[error("unknown identifier: {name}")]
    UnknownIdentifier { name: String },

    #[error("duplicate identifier {name}: mapped to both {first} and {second}")]
    DuplicateIdentifier {
        name: String,
        first: String,
        second: String,
    },

    #[error("mapping table parse error: {0}")]
    Table(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not replace output file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("obfuscation error: {0}")]
    Obfuscation(#[from] ObfuscationError),
    #[error("other error: {0}")]
    Other(String),
}
