//! Failure taxonomy for backend calls.

use serde_json::Value;
use thiserror::Error;

/// Convenience alias for gateway results.
pub type ApiResult<T> = Result<T, ApiError>;

/// Every way a backend call can fail.
///
/// `Network`, `MalformedResponse`, and `Request` describe the outcome of a
/// dispatched call. `InvalidRequest` is raised before dispatch when the
/// request itself cannot be built.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport could not complete (DNS, refused connection, reset).
    #[error("Network error: {detail}. Could not connect to the server.")]
    Network {
        /// Transport error description.
        detail: String,
    },
    /// A 2xx response whose body was not the expected JSON.
    #[error("Received an invalid JSON response from the server.")]
    MalformedResponse {
        /// Parser error description.
        detail: String,
    },
    /// A non-2xx response.
    #[error("{message}")]
    Request {
        /// Human-readable message extracted from the response.
        message: String,
        /// HTTP status code.
        status: u16,
        /// Parsed JSON error body, when there was one.
        data: Option<Value>,
    },
    /// The request could not be constructed (bad path, unencodable body).
    #[error("invalid request: {detail}")]
    InvalidRequest {
        /// Construction error description.
        detail: String,
    },
}

/// Discriminant of [`ApiError`] for callers that only need to branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// See [`ApiError::Network`].
    NetworkFailure,
    /// See [`ApiError::MalformedResponse`].
    MalformedResponse,
    /// See [`ApiError::Request`].
    RequestFailure,
    /// See [`ApiError::InvalidRequest`].
    InvalidRequest,
}

impl ApiError {
    pub(crate) fn network(detail: impl Into<String>) -> Self {
        Self::Network {
            detail: detail.into(),
        }
    }

    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            detail: detail.into(),
        }
    }

    pub(crate) fn invalid_request(detail: impl Into<String>) -> Self {
        Self::InvalidRequest {
            detail: detail.into(),
        }
    }

    /// Which branch of the taxonomy this failure belongs to.
    #[must_use]
    pub const fn kind(&self) -> ApiErrorKind {
        match self {
            Self::Network { .. } => ApiErrorKind::NetworkFailure,
            Self::MalformedResponse { .. } => ApiErrorKind::MalformedResponse,
            Self::Request { .. } => ApiErrorKind::RequestFailure,
            Self::InvalidRequest { .. } => ApiErrorKind::InvalidRequest,
        }
    }

    /// HTTP status, present only for [`ApiError::Request`].
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed error body, present only for [`ApiError::Request`] with a JSON body.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        match self {
            Self::Request { data, .. } => data.as_ref(),
            _ => None,
        }
    }

    /// Message suitable for showing next to the form that triggered the call.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}
