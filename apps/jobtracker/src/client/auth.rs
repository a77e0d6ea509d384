use reqwest::Method;
use serde_json::Value;
use tracing::info;

use super::JobTrackerClient;
use crate::errors::ApiError;
use crate::gateway::ApiRequest;
use crate::models::{LoginRequest, SignUpRequest, User};

impl JobTrackerClient {
    /// POST /auth/signup
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<User, ApiError> {
        let url = self.gateway.endpoint(&["auth", "signup"], &[])?;
        let body = serde_json::to_value(request).map_err(ApiError::Encode)?;
        let user: User = self
            .gateway
            .send(ApiRequest::new(Method::POST, url).json(body))
            .await?;
        info!(email = %request.email, "Signed up");
        Ok(user)
    }

    /// POST /auth/login. The session cookie lands in the transport's jar;
    /// the payload is whatever the server chooses to echo back.
    pub async fn login(&self, request: &LoginRequest) -> Result<Value, ApiError> {
        let url = self.gateway.endpoint(&["auth", "login"], &[])?;
        let body = serde_json::to_value(request).map_err(ApiError::Encode)?;
        let payload = self
            .gateway
            .send_raw(ApiRequest::new(Method::POST, url).json(body))
            .await?;
        info!(email = %request.email, "Logged in");
        Ok(payload)
    }

    /// POST /auth/logout
    pub async fn logout(&self) -> Result<Value, ApiError> {
        let url = self.gateway.endpoint(&["auth", "logout"], &[])?;
        self.gateway.send_raw(ApiRequest::new(Method::POST, url)).await
    }

    /// GET /user
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let url = self.gateway.endpoint(&["user"], &[])?;
        self.gateway.get(url).await
    }
}
