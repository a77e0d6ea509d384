//! Request Gateway: the single place that talks to the job tracker backend.
//!
//! Every accessor builds an [`ApiRequest`] and hands it to [`Gateway::send`].
//! The gateway performs the call through its [`Transport`], handles session
//! expiry, unwraps the `{ timestamp, data, error }` envelope and decodes the
//! payload. Nothing is retried here; each call stands alone.

use std::sync::Arc;

use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::ApiError;
use crate::normalize::NormalizedError;

pub mod envelope;
#[cfg(test)]
pub mod testing;
pub mod transport;

pub use transport::{ApiRequest, FormPart, RawResponse, RequestBody, ReqwestTransport, Transport};

/// Where the session-expired callback is told to send the user.
pub const LOGIN_ROUTE: &str = "/login";

/// Invoked with [`LOGIN_ROUTE`] whenever the backend answers 401.
pub type SessionExpiredHook = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone)]
pub struct Gateway {
    base_url: Url,
    transport: Arc<dyn Transport>,
    on_session_expired: SessionExpiredHook,
}

impl Gateway {
    pub fn new(
        base_url: Url,
        transport: Arc<dyn Transport>,
        on_session_expired: SessionExpiredHook,
    ) -> Self {
        Self {
            base_url,
            transport,
            on_session_expired,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins path segments onto the base URL (escaping each one) and appends
    /// the query pairs in order.
    pub fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.send(ApiRequest::new(Method::GET, url)).await
    }

    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let payload = self.send_raw(request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Performs the call and returns the unwrapped payload as JSON.
    pub async fn send_raw(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let method = request.method.clone();
        let path = request.url.path().to_string();

        let response = self.transport.send(request).await?;

        // An expired session may answer with an HTML login page; never parse it.
        if response.status == 401 {
            warn!(%method, %path, "Session expired, redirecting to {LOGIN_ROUTE}");
            (self.on_session_expired)(LOGIN_ROUTE);
            return Err(ApiError::SessionExpired(NormalizedError::session_expired()));
        }

        let envelope = envelope::parse_envelope(&response.body);
        match envelope::unwrap_envelope(response.status, envelope) {
            Ok(payload) => {
                debug!(%method, %path, status = response.status, "API call succeeded");
                Ok(payload)
            }
            Err(err) => {
                warn!(%method, %path, status = response.status, "API call failed: {err}");
                Err(err)
            }
        }
    }
}
