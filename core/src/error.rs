//! Error types for the HTTP client.
//!
//! # Design
//! Callers branch on failure kind to decide between retry, fallback and
//! fail-fast, so each kind is its own variant: transport failures, body
//! encoding, body decoding, and non-200 responses. The last one keeps the
//! status code and raw body as fields rather than folding them into a message.

use thiserror::Error;

/// Boxed error returned by `BodySerializer` implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by `HttpClient` request methods.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The request body could not be encoded.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] BoxError),

    /// The 200 response body could not be decoded into the expected type.
    #[error("failed to deserialize response body: {0}")]
    Deserialization(#[source] BoxError),

    /// The server answered with a status other than 200.
    #[error("HTTP {status}: {body}")]
    NotOk { status: u16, body: String },
}

impl ClientError {
    /// Status code of a `NotOk` response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::NotOk { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

/// Failures below the HTTP layer: connecting, sending, receiving.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("stopped after {0} redirects")]
    TooManyRedirects(u32),

    /// The request could not be put on the wire (bad URL, header, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Timeout(t) => TransportError::Timeout(format!("{t:?}")),
            ureq::Error::HostNotFound => TransportError::Connect("host not found".to_string()),
            ureq::Error::ConnectionFailed => TransportError::Connect("connection failed".to_string()),
            ureq::Error::Io(e) => TransportError::Io(e),
            ureq::Error::BadUri(uri) => TransportError::InvalidRequest(format!("bad uri: {uri}")),
            ureq::Error::Http(e) => TransportError::InvalidRequest(e.to_string()),
            other => TransportError::Other(other.to_string()),
        }
    }
}
