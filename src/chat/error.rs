//! Chat server error types

use thiserror::Error;

/// Chat server call failure with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct MessengerError {
    pub kind: MessengerErrorKind,
    pub message: String,
}

impl MessengerError {
    pub fn new(kind: MessengerErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(MessengerErrorKind::Network, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(MessengerErrorKind::Auth, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(MessengerErrorKind::NotFound, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(MessengerErrorKind::Rejected, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(MessengerErrorKind::ServerError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(MessengerErrorKind::InvalidResponse, message)
    }

    /// Classify a non-success HTTP status
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 | 403 => Self::auth(format!("Authentication failed: {body}")),
            404 => Self::not_found(format!("Not found: {body}")),
            400..=499 => Self::rejected(format!("Request rejected ({status}): {body}")),
            500..=599 => Self::server_error(format!("Server error ({status}): {body}")),
            _ => Self::invalid_response(format!("Unexpected status {status}: {body}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessengerErrorKind {
    /// Connection failure or timeout
    Network,
    /// Bad or expired bot token (401, 403)
    Auth,
    NotFound,
    /// Other 4xx
    Rejected,
    ServerError,
    /// Body could not be decoded, or an unexpected status
    InvalidResponse,
}
