//! Error types for the Bot API gateway.
//!
//! Remote failures (`{"ok":false,...}` envelopes) are not errors: they are
//! returned to the caller as data. `BotError` covers what goes wrong on this
//! side of the wire.

use std::fmt;

/// Unified error type for gateway operations.
#[derive(Debug, Clone, PartialEq)]
pub enum BotError {
    /// Connection, TLS, or protocol failure
    Transport(String),
    /// The request did not complete within the configured timeout
    Timeout(String),
    /// The response body is not valid JSON
    Decode { body: String, message: String },
    /// An attachment path could not be resolved to a file
    InvalidPath(String),
    /// Malformed call arguments
    InvalidParams(String),
    /// Invalid configuration (empty token, bad proxy, client build)
    Config(String),
    /// Reading an attachment from disk failed
    Io(String),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "Transport error: {}", msg),
            Self::Timeout(msg) => write!(f, "Timeout: {}", msg),
            Self::Decode { message, .. } => write!(f, "Invalid JSON response: {}", message),
            Self::InvalidPath(path) => write!(f, "Invalid attachment path: {}", path),
            Self::InvalidParams(msg) => write!(f, "Invalid parameters: {}", msg),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for BotError {}

impl BotError {
    /// Whether the failure happened before any response was read.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BotError::Timeout(e.to_string())
        } else if e.is_builder() {
            BotError::Config(e.to_string())
        } else {
            BotError::Transport(e.to_string())
        }
    }
}

impl From<std::io::Error> for BotError {
    fn from(e: std::io::Error) -> Self {
        BotError::Io(e.to_string())
    }
}

/// Convenience Result alias.
pub type BotResult<T> = Result<T, BotError>;

/// Convert BotError to a String for embedders that surface plain messages.
impl From<BotError> for String {
    fn from(e: BotError) -> Self {
        e.to_string()
    }
}
