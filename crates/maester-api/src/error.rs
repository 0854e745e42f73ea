// Request failure type shared by the query and feedback calls.

use thiserror::Error;

/// Shown when the backend cannot be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to reach the server. Please check your connection and try again.";

/// A failed backend request. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Rejected before sending (empty query, k out of range).
    #[error("{message}")]
    InvalidInput { message: String },

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Connection refused, DNS failure, dropped connection.
    #[error("{message}")]
    Network { message: String },

    /// A success response whose body could not be read as the expected shape.
    #[error("{message}")]
    Decode { message: String },

    /// The HTTP client itself could not be constructed.
    #[error("{message}")]
    Client { message: String },
}

impl RequestError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        RequestError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn network() -> Self {
        RequestError::Network {
            message: NETWORK_ERROR_MESSAGE.to_string(),
        }
    }

    /// HTTP status for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
