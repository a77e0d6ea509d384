#![allow(dead_code)]

use thiserror::Error;

use crate::normalize::NormalizedError;

/// Every failure the API layer can surface.
/// Each variant carries, or can synthesize, a [`NormalizedError`] via [`ApiError::details`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    SessionExpired(NormalizedError),

    /// Server-reported application error, or a non-2xx status without one.
    #[error("{0}")]
    Rejected(NormalizedError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request body could not be serialized; nothing was sent.
    #[error("Could not encode request: {0}")]
    Encode(serde_json::Error),

    #[error("Invalid header {0}")]
    InvalidHeader(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn details(&self) -> NormalizedError {
        match self {
            ApiError::SessionExpired(details) | ApiError::Rejected(details) => details.clone(),
            other => NormalizedError::local(other.to_string()),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ApiError::SessionExpired(details) | ApiError::Rejected(details) => details.status,
            _ => 0,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired(_))
    }
}
