// web_app/error.rs - Fetch error taxonomy
//
// Shared by the backend clients (native), the discovery controller and the
// hydrated client. Serializable so it can cross the server-function boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    Validation(String),
}

impl FetchError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Server { status, .. } => *status == 429 || (500..=599).contains(status),
            Self::Decode(_) | Self::Validation(_) => false,
        }
    }

    /// Short, user-facing description for the error state
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) | Self::Timeout => {
                "We couldn't reach the store. Check your connection and try again.".to_string()
            }
            Self::Server { message, .. } if !message.is_empty() => message.clone(),
            Self::Server { status, .. } => format!("The store answered with an error ({status})."),
            Self::Decode(_) => "The store sent a response we couldn't read.".to_string(),
            Self::Validation(message) => message.clone(),
        }
    }

    /// Encode for transport inside a server-function error message
    pub fn to_wire(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_string())
    }

    /// Decode a message produced by [`FetchError::to_wire`]
    ///
    /// Anything that isn't a wire-encoded error is treated as a transport
    /// failure between browser and server.
    pub fn from_wire(message: &str) -> Self {
        serde_json::from_str(message).unwrap_or_else(|_| Self::Network(message.to_string()))
    }
}
