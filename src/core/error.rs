//! Typed error handling for resource stores and their collaborators
//!
//! Every failure of `load`/`create`/`update`/`delete` is converted into a
//! [`StoreError`] at the store boundary, so callers can display it and keep
//! their previous data on screen.
//!
//! # Error Categories
//!
//! - [`StoreError::Transport`]: the remote call could not complete
//! - [`StoreError::RemoteRejection`]: the backend answered with a non-success status
//! - [`StoreError::MalformedResponse`]: a successful body had an unrecognized shape
//! - [`StoreError::InvalidInput`]: a payload was refused before it was sent
//!
//! # Example
//!
//! ```rust,ignore
//! match store.load().await {
//!     Ok(outcome) => println!("loaded: {:?}", outcome),
//!     Err(StoreError::RemoteRejection { status: Some(401), .. }) => relogin(),
//!     Err(e) => eprintln!("{}", e.user_message()),
//! }
//! ```

use thiserror::Error;

/// Message used when the backend rejects a call without saying why
pub const DEFAULT_FALLBACK_MESSAGE: &str = "An error occurred";

/// Result alias used throughout the crate
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Failure reported by a store or a collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Network failure, refused connection or transport timeout
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend returned a non-success status
    ///
    /// `message` is the backend's own message when it sent one, otherwise the
    /// configured fallback.
    #[error("{message}")]
    RemoteRejection {
        status: Option<u16>,
        message: String,
    },

    /// A successful response whose body is not a recognized shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A payload that was refused before reaching the backend
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl StoreError {
    /// Build a rejection, falling back to `fallback` when the backend sent no message
    pub fn rejection(status: Option<u16>, message: Option<String>, fallback: &str) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        StoreError::RemoteRejection { status, message }
    }

    /// Get the error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::Transport(_) => "TRANSPORT_FAILURE",
            StoreError::RemoteRejection { .. } => "REMOTE_REJECTION",
            StoreError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            StoreError::InvalidInput(_) => "INVALID_INPUT",
        }
    }

    /// HTTP status of a rejection, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::RemoteRejection { status, .. } => *status,
            _ => None,
        }
    }

    /// Text to show the admin
    ///
    /// Rejections surface the backend's message verbatim.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::RemoteRejection { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the backend refused the credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::MalformedResponse(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}
