//! Typed accessors over the job tracker REST API.
//!
//! Every method goes through the [`Gateway`]; none of them hold state between
//! calls apart from the session cookie kept by the transport.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::ApiError;
use crate::gateway::{Gateway, ReqwestTransport, SessionExpiredHook};

pub mod auth;
pub mod jobs;
pub mod listing;
pub mod summary;

pub use jobs::ResumeFile;
pub use listing::FilterCriteria;

#[derive(Clone)]
pub struct JobTrackerClient {
    gateway: Gateway,
}

impl JobTrackerClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Client over HTTP with a cookie-backed session.
    pub fn from_config(config: &Config, on_session_expired: SessionExpiredHook) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::new(Gateway::new(
            config.api_url.clone(),
            Arc::new(transport),
            on_session_expired,
        )))
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }
}
