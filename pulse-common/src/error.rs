//! Common error types for Residency Pulse

use thiserror::Error;

/// Common result type for pulse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error across the pulse crates
#[derive(Error, Debug)]
pub enum Error {
    /// Incoming submission rejected before any store mutation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Failure talking to the configured submission store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration loading error (file unreadable, bad TOML)
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Client-side problems with a raw submission
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field absent, null, or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Field present but outside its permitted range
    #[error("Field {field} out of range: {value}")]
    OutOfRange { field: &'static str, value: String },

    /// Name not part of the configured roster
    #[error("Unknown contributor: {0}")]
    UnknownContributor(String),

    /// Field present with the wrong JSON shape
    #[error("Malformed submission: {0}")]
    Malformed(String),
}

/// Problems with the remote backend's connection parameters
///
/// Never surfaced to callers: the selection policy logs these and falls back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendConfigError {
    #[error("Missing connection parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Remote store URL must use https (got {0})")]
    InsecureScheme(String),

    #[error("Remote store URL is not a valid URL: {0}")]
    InvalidUrl(String),
}

/// Backend I/O failures
///
/// Messages never include the remote credential token.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Remote store request failed: {0}")]
    Transport(String),

    #[error("Remote store returned {status}: {message}")]
    Remote { status: u16, message: String },
}

/// A single stored entry that could not be decoded
///
/// Skipped on read; the rest of the collection is still returned.
#[derive(Error, Debug)]
#[error("Undecodable entry at position {index}: {reason}")]
pub struct DecodeError {
    pub index: usize,
    pub reason: String,
}
