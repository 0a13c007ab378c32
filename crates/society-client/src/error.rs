//! Client error types.

use thiserror::Error;

use society_core::error::{AppError, ErrorKind};

/// Failures seen by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the credential. The stored token has been discarded.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The credential is valid but the role may not do this.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Any other non-success response.
    #[error("{code} ({status}): {message}")]
    Api {
        /// HTTP status.
        status: u16,
        /// Error code from the body.
        code: String,
        /// Message from the body.
        message: String,
    },

    /// No token is held; log in first.
    #[error("not logged in")]
    NotLoggedIn,

    /// The live connection closed or stalled before its rooms were joined.
    #[error("not mounted")]
    NotMounted,

    /// The server refused a room join.
    #[error("join rejected: {code}: {message}")]
    JoinRejected {
        /// Error code from the `error` event.
        code: String,
        /// Message from the `error` event.
        message: String,
    },

    /// Transport failure on the REST side.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport failure on the live channel.
    #[error("live channel error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A frame or body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether the credential must be discarded and the user re-authenticated.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthenticated(_) | Self::NotLoggedIn)
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let kind = match &err {
            ClientError::Unauthenticated(_) | ClientError::NotLoggedIn => ErrorKind::Unauthenticated,
            ClientError::Forbidden(_) | ClientError::JoinRejected { .. } => ErrorKind::Forbidden,
            ClientError::Api { status: 404, .. } => ErrorKind::NotFound,
            ClientError::Api { status: 400, .. } => ErrorKind::Validation,
            ClientError::Api { .. } | ClientError::NotMounted => ErrorKind::Internal,
            ClientError::Http(_) | ClientError::WebSocket(_) => ErrorKind::UpstreamUnavailable,
            ClientError::Decode(_) => ErrorKind::Serialization,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}
