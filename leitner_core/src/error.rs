//! Error types for the leitner_core library.

use std::io;
use uuid::Uuid;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for leitner_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required card field was missing, blank, or too long
    #[error("Validation error: {0}")]
    Validation(String),

    /// Another card already uses this word
    #[error("A card for {0:?} already exists")]
    Duplicate(String),

    /// No card with this identifier
    #[error("Card not found: {0}")]
    NotFound(Uuid),

    /// Answer submitted for a card that is not currently due
    #[error("Card {0} is not due for review")]
    Ineligible(Uuid),

    /// The stored card changed between read and write
    #[error("Card {0} was modified concurrently")]
    Conflict(Uuid),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Card store failure not covered by a more specific variant
    #[error("Store error: {0}")]
    Store(String),
}

impl Error {
    /// Whether the request layer should treat this as a rejection of the
    /// request rather than a failure of the system.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::Duplicate(_) | Error::NotFound(_) | Error::Ineligible(_)
        )
    }
}
