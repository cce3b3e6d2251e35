//! Error types for the circulation_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for circulation_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A book, member, or issue record id did not resolve
    #[error("Not found: {0}")]
    NotFound(String),

    /// An id collided with an existing record on create
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// A caller-supplied value was rejected up front
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is valid in general but not in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Member is blocked due to outstanding fines at or over the limit
    #[error("Member '{0}' is blocked due to outstanding fines")]
    MemberBlocked(String),

    /// No copies of the book are available to issue
    #[error("No available copies of book '{0}'")]
    NoAvailability(String),

    /// The issue record was already returned; second return is rejected
    #[error("Issue record {0} was already returned")]
    AlreadyReturned(u64),

    /// An issue record references a book or member that no longer resolves.
    /// Signals external corruption; the operation aborts rather than guessing.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// A report output format has no backend linked in. Non-fatal to the
    /// circulation state; callers surface it and carry on.
    #[error("Report format unavailable: {0}")]
    ReportUnavailable(String),
}
