//! Error types for UFile operations.

use std::time::Duration;

use bytes::Bytes;
use http::StatusCode;

/// Failure to complete an HTTP exchange with the remote endpoint.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection setup or request dispatch failed.
    #[error("HTTP client error: {0}")]
    Client(#[from] hyper_util::client::legacy::Error),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(#[from] hyper::Error),

    /// The exchange did not finish within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Socket-level failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by [`UfileClient`](crate::UfileClient) and
/// [`ApiClient`](crate::ApiClient).
#[derive(Debug, thiserror::Error)]
pub enum UfileError {
    /// Network or connection failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// `GET` on a key that does not exist.
    #[error("object not found: /{bucket}/{key}")]
    NotFound {
        /// Bucket that was queried.
        bucket: String,
        /// Key that was not found.
        key: String,
    },

    /// Non-success response carrying a JSON error envelope.
    #[error("remote error (HTTP {status}): RetCode={code}, ErrMsg={message}")]
    Remote {
        /// HTTP status of the response.
        status: StatusCode,
        /// `RetCode` from the envelope.
        code: i64,
        /// `ErrMsg` from the envelope.
        message: String,
        /// `X-SessionId` response header, if present.
        session_id: Option<String>,
    },

    /// Non-success response whose body is not a JSON envelope.
    #[error("remote error (HTTP {status}) with {} byte body", .body.len())]
    RemoteRaw {
        /// HTTP status of the response.
        status: StatusCode,
        /// Opaque response body.
        body: Bytes,
        /// `X-SessionId` response header, if present.
        session_id: Option<String>,
    },

    /// A body that claimed to be JSON could not be decoded.
    #[error("failed to parse JSON response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// The operation was invoked with unusable arguments; nothing was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Client construction failed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl UfileError {
    /// Whether a failed `PUT` attempt ending in this error may be retried.
    ///
    /// Argument and configuration errors would fail the same way again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidArgument(_) | Self::Config(_))
    }

    /// The HTTP status for remote errors.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Remote { status, .. } | Self::RemoteRaw { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            _ => None,
        }
    }
}

/// Convenience result type for UFile operations.
pub type UfileResult<T> = Result<T, UfileError>;
