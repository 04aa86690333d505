//! Error types for email parsing and retrieval

use thiserror::Error;

/// Errors that can occur while turning a MIME message into an [`Email`](crate::Email)
#[derive(Error, Debug)]
pub enum ParseError {
    /// Failed to parse the email structure
    #[error("Failed to parse email structure: {0}")]
    Structure(String),

    /// Missing required header
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// Invalid date format
    #[error("Invalid date format for {value:?}: {details}")]
    InvalidDate { value: String, details: String },
}

/// Errors raised while pulling messages from a [`MailSource`](crate::MailSource)
#[derive(Error, Debug)]
pub enum Error {
    /// A fetched message could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The mail source itself failed
    #[error("Mail source error: {0}")]
    Source(String),

    /// The raw message payload was not valid base64url
    #[error("Failed to decode raw message {id}: {details}")]
    Decode { id: String, details: String },

    /// A provider response could not be deserialized
    #[error("Invalid response: {0}")]
    Json(#[from] serde_json::Error),

    /// The thread had no messages to take the top one from
    #[error("Thread {0} has no messages")]
    EmptyThread(String),

    /// The sender filter could not be built
    #[error("Invalid search filter: {0}")]
    InvalidFilter(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for email parsing operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type for retrieval operations
pub type Result<T> = std::result::Result<T, Error>;
