//! Errors reported by the metrics API client.

use thiserror::Error;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connect, TLS, reset, body read).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("refresh interval must be at least 1 second (got {0})")]
    InvalidInterval(u64),

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("unable to read CA bundle {path}: {reason}")]
    TlsConfig { path: String, reason: String },
}

/// Coarse classification callers use for display and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure or a non-2xx status.
    Transport,
    /// Body was not a valid payload.
    Decode,
    /// The caller broke an argument or configuration contract.
    Contract,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } | Self::Status { .. } => ErrorKind::Transport,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::InvalidInterval(_) | Self::InvalidBaseUrl(_) | Self::TlsConfig { .. } => {
                ErrorKind::Contract
            }
        }
    }
}
