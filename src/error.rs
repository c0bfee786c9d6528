//! Error types for vault operations

use thiserror::Error;

/// Errors that can occur while building, searching or persisting a vault
#[derive(Error, Debug)]
pub enum KeychainError {
    /// An item was inserted under a key that differs from its own name.
    #[error("name mismatch: key '{key}' does not match item name '{name}'")]
    NameMismatch { key: String, name: String },

    /// An entry declares a category other than the one it is inserted into.
    #[error("entry '{entry}' belongs to category '{declared}', not '{expected}'")]
    CategoryMismatch {
        entry: String,
        declared: String,
        expected: String,
    },

    #[error("unknown format: first line is not a keychain tag")]
    Format,

    #[error("incorrect username or password")]
    Passphrase,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("payload encoding error: {0}")]
    Encoding(String),

    #[error("invalid generator mode: {0}")]
    Generator(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl KeychainError {
    /// True for the structural invariant violations raised on insertion.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::NameMismatch { .. } | Self::CategoryMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, KeychainError>;
