//! Error types for allotment operations.
//!
//! Transport failures are reported by [`ServiceClient`](crate::client::ServiceClient)
//! as a tagged [`TransportError`], so callers can match on the failure shape
//! instead of probing an untyped error. [`Error`] wraps those failures together
//! with the domain-level messages produced when a fetch is classified.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure reported by the HTTP transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("HTTP {status} {status_text}")]
    Response {
        /// Numeric HTTP status code
        status: u16,
        /// Reason phrase for the status
        status_text: String,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// The request was sent but no response arrived.
    #[error("no response received: {reason}")]
    NoResponse {
        /// Underlying connection or timeout failure
        reason: String,
    },

    /// The request could not be constructed.
    #[error("{message}")]
    RequestConstruction {
        /// Description of what went wrong
        message: String,
    },
}

impl TransportError {
    /// Build a [`TransportError::Response`] from a status and response body.
    #[must_use]
    pub fn from_status(status: StatusCode, body: String) -> Self {
        Self::Response {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or("Unknown Status")
                .to_string(),
            body,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::RequestConstruction {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::from_status(status, String::new())
        } else {
            Self::NoResponse {
                reason: err.to_string(),
            }
        }
    }
}

impl From<url::ParseError> for TransportError {
    fn from(err: url::ParseError) -> Self {
        Self::RequestConstruction {
            message: err.to_string(),
        }
    }
}

/// Main error type for allotment operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Transport failure, propagated unchanged by passthrough operations
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The requested allotment does not exist
    #[error("allotment {0} not found")]
    AllotmentNotFound(String),

    /// The server answered with a non-404 failure status
    #[error("server error: {status} {status_text}")]
    ServerError {
        /// Numeric HTTP status code
        status: u16,
        /// Reason phrase for the status
        status_text: String,
    },

    /// The request was sent but the server never answered
    #[error("network error: unreachable")]
    Unreachable,

    /// The request could not be constructed
    #[error("{0}")]
    RequestFailed(String),

    /// The server answered successfully without a usable body
    #[error("invalid response: {0}")]
    MalformedResponse(String),

    /// Any other failure surfaced while classifying a fetch
    #[error("error: {0}")]
    Other(String),

    /// Failed to decode a response body
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// An id string that is not an unsigned integer
    #[error("invalid id: {0}")]
    InvalidId(String),
}

/// Specialized result type for allotment operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(TransportError::Response { .. }) => "HTTP_STATUS",
            Self::Transport(TransportError::NoResponse { .. }) => "NO_RESPONSE",
            Self::Transport(TransportError::RequestConstruction { .. }) => "REQUEST_CONSTRUCTION",
            Self::AllotmentNotFound(_) => "ALLOTMENT_NOT_FOUND",
            Self::ServerError { .. } => "SERVER_ERROR",
            Self::Unreachable => "UNREACHABLE",
            Self::RequestFailed(_) => "REQUEST_FAILED",
            Self::MalformedResponse(_) => "MALFORMED_RESPONSE",
            Self::Other(_) => "OTHER",
            Self::Decode(_) => "DECODE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InvalidId(_) => "INVALID_ID",
        }
    }

    /// Classify a failed allotment fetch into a user-facing error.
    ///
    /// Response-bearing transport failures are checked first (404 before any
    /// other status), then missing responses, then construction failures. Any
    /// remaining error is wrapped with its message.
    #[must_use]
    pub fn classify_fetch(self, allotment_id: &str) -> Self {
        match self {
            Self::Transport(TransportError::Response { status: 404, .. }) => {
                Self::AllotmentNotFound(allotment_id.to_string())
            }
            Self::Transport(TransportError::Response {
                status, status_text, ..
            }) => Self::ServerError {
                status,
                status_text,
            },
            Self::Transport(TransportError::NoResponse { .. }) => Self::Unreachable,
            Self::Transport(TransportError::RequestConstruction { message }) => {
                Self::RequestFailed(message)
            }
            // Already classified
            err @ Self::MalformedResponse(_) => err,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, status_text: &str) -> Error {
        Error::Transport(TransportError::Response {
            status,
            status_text: status_text.to_string(),
            body: String::new(),
        })
    }

    #[test]
    fn classify_not_found_names_the_allotment() {
        let err = response(404, "Not Found").classify_fetch("ALT-7");
        assert_eq!(err, Error::AllotmentNotFound("ALT-7".to_string()));
        assert_eq!(err.to_string(), "allotment ALT-7 not found");
    }

    #[test]
    fn classify_server_error_keeps_status_and_text() {
        let err = response(500, "Internal Server Error").classify_fetch("ALT-7");
        assert_eq!(
            err.to_string(),
            "server error: 500 Internal Server Error"
        );
    }

    #[test]
    fn classify_client_errors_other_than_404_as_server_error() {
        let err = response(409, "Conflict").classify_fetch("ALT-7");
        assert!(matches!(err, Error::ServerError { status: 409, .. }));
    }

    #[test]
    fn classify_missing_response_as_unreachable() {
        let err = Error::Transport(TransportError::NoResponse {
            reason: "connection refused".into(),
        })
        .classify_fetch("ALT-7");
        assert_eq!(err, Error::Unreachable);
        assert_eq!(err.to_string(), "network error: unreachable");
    }

    #[test]
    fn classify_construction_failure_keeps_message() {
        let err = Error::Transport(TransportError::RequestConstruction {
            message: "relative URL without a base".into(),
        })
        .classify_fetch("ALT-7");
        assert_eq!(err.to_string(), "relative URL without a base");
    }

    #[test]
    fn classify_wraps_non_transport_errors() {
        let err = Error::Decode("expected value at line 1".into()).classify_fetch("ALT-7");
        assert_eq!(
            err.to_string(),
            "error: failed to decode response: expected value at line 1"
        );
    }

    #[test]
    fn classify_leaves_malformed_response_alone() {
        let err = Error::MalformedResponse("empty body".into()).classify_fetch("ALT-7");
        assert_eq!(err.to_string(), "invalid response: empty body");
    }

    #[test]
    fn transport_error_from_status_uses_canonical_reason() {
        let err = TransportError::from_status(StatusCode::BAD_GATEWAY, "upstream".into());
        assert!(matches!(
            &err,
            TransportError::Response { status: 502, body, .. } if body == "upstream"
        ));
        assert_eq!(err.to_string(), "HTTP 502 Bad Gateway");
    }

    #[test]
    fn nonstandard_status_gets_placeholder_reason() {
        let status = StatusCode::from_u16(599).unwrap();
        let err = TransportError::from_status(status, String::new());
        assert_eq!(err.to_string(), "HTTP 599 Unknown Status");

        let classified = Error::Transport(err).classify_fetch("ALT-7");
        assert_eq!(classified.to_string(), "server error: 599 Unknown Status");
    }

    #[test]
    fn transport_error_passes_through_display() {
        let err: Error = TransportError::NoResponse {
            reason: "timed out".into(),
        }
        .into();
        assert_eq!(err.to_string(), "no response received: timed out");
        assert_eq!(err.error_code(), "NO_RESPONSE");
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let allotment_err: Error = err.into();
        assert!(matches!(allotment_err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let allotment_err: Error = err.into();
        assert!(matches!(allotment_err, Error::Decode(_)));
        assert_eq!(allotment_err.error_code(), "DECODE_ERROR");
    }

    #[test]
    fn test_error_clone() {
        let err = Error::AllotmentNotFound("ALT-1".to_string());
        assert_eq!(err.clone(), err);
    }
}
