//! Error types for the Rundeck client

use thiserror::Error;

use crate::envelope::ResponseEnvelope;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Rundeck client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Response body is not well-formed XML
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Response parsed but lacks the element that defines its kind
    #[error("Unexpected response shape for `{kind}`: missing <{element}>")]
    UnexpectedShape {
        /// Response kind being extracted
        kind: &'static str,
        /// Element that was expected
        element: String,
    },

    /// A record lacks a field its kind requires
    #[error("`{kind}` record is missing required field `{field}`")]
    MissingField {
        /// Record kind being extracted
        kind: &'static str,
        /// Missing field name
        field: String,
    },

    /// A required field is present but cannot be interpreted
    #[error("`{kind}` record has invalid `{field}`: {value:?}")]
    InvalidField {
        /// Record kind being extracted
        kind: &'static str,
        /// Field name
        field: String,
        /// Raw value as sent by the server
        value: String,
    },

    /// A singular lookup found nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server answered with an error envelope
    #[error("Server reported failure: {message}")]
    RemoteOperation {
        /// Message from the error envelope
        message: String,
        /// The envelope, for further inspection
        envelope: Box<ResponseEnvelope>,
    },

    /// The HTTP exchange failed or returned an error status without an error envelope
    #[error("Transport failure{}: {message}", status.map(|s| format!(" (status {})", s)).unwrap_or_default())]
    Transport {
        /// Description of the failure
        message: String,
        /// HTTP status, when a response was received
        status: Option<u16>,
    },

    /// The operation needs a newer API version than the client is configured for
    #[error("Operation requires API version {required} or higher (configured: {configured})")]
    UnsupportedOperation {
        /// Minimum API version for the operation
        required: u32,
        /// API version the client is configured with
        configured: u32,
    },

    /// Client configuration is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Login was rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Invalid request arguments
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Local I/O failed (e.g. reading a job definition file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl ClientError {
    /// Create a transport error for an HTTP error status
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: Some(status),
        }
    }

    pub(crate) fn missing(kind: &'static str, field: impl Into<String>) -> Self {
        Self::MissingField {
            kind,
            field: field.into(),
        }
    }

    pub(crate) fn invalid(
        kind: &'static str,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            kind,
            field: field.into(),
            value: value.into(),
        }
    }

    pub(crate) fn shape(kind: &'static str, element: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            kind,
            element: element.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || self.status() == Some(404)
    }

    /// Check if the HTTP exchange itself failed
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if the server explicitly reported failure
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteOperation { .. })
    }

    /// HTTP status code, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            Self::RemoteOperation { envelope, .. } => envelope.http_status(),
            _ => None,
        }
    }

    /// The server's error envelope, if the server reported the failure
    pub fn envelope(&self) -> Option<&ResponseEnvelope> {
        match self {
            Self::RemoteOperation { envelope, .. } => Some(envelope),
            _ => None,
        }
    }
}
