//! Client error types

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while building a client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The underlying HTTP client could not be created
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// The failure as reported by the transport, before normalization
#[derive(Debug, Error)]
pub enum TransportError {
    /// Server answered with a non-success status
    #[error("HTTP {status}")]
    Status { status: StatusCode, body: String },

    /// Request never produced a response (connection refused, timeout, bad URL)
    #[error("{0}")]
    Network(#[source] reqwest::Error),

    /// Success response whose body could not be decoded
    #[error("{source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
}

impl TransportError {
    /// Status code reported by the server, or 0 when no response arrived
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Status { status, .. } | Self::Decode { status, .. } => status.as_u16(),
            Self::Network(_) => 0,
        }
    }

    /// Raw response body, if any
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Error taxonomy used by callers to decide how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 400, field-level problems the user can correct
    Validation,
    /// 401, the session is gone
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 500
    Server,
    /// No response reached the client
    Transport,
    /// Any other status, or an undecodable body
    Other,
}

impl ErrorKind {
    /// Classify a transport failure
    pub fn classify(cause: &TransportError) -> Self {
        match cause {
            TransportError::Network(_) => Self::Transport,
            TransportError::Decode { .. } => Self::Other,
            TransportError::Status { status, .. } => match status.as_u16() {
                400 => Self::Validation,
                401 => Self::Unauthorized,
                403 => Self::Forbidden,
                404 => Self::NotFound,
                500 => Self::Server,
                _ => Self::Other,
            },
        }
    }
}

/// Normalized error handed to callers.
///
/// `message` is the localized, user-facing text; `cause` keeps the original
/// failure for diagnostics.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    status: u16,
    kind: ErrorKind,
    message: String,
    #[source]
    cause: TransportError,
}

impl ApiError {
    pub(crate) fn new(kind: ErrorKind, message: String, cause: TransportError) -> Self {
        Self {
            status: cause.status_code(),
            kind,
            message,
            cause,
        }
    }

    /// HTTP status, 0 for network failures
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> &TransportError {
        &self.cause
    }

    /// Whether the failure ended the session
    pub fn is_auth_expired(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }
}
