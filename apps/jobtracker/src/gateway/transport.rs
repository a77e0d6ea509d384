#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{multipart, Client, Method, Url};
use serde_json::Value;
use tracing::warn;

use crate::errors::ApiError;

/// A request as the gateway describes it, before any HTTP library sees it.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    /// Caller headers. These replace the transport's defaults of the same name.
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Vec<FormPart>),
}

/// One part of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Status and raw body; the body is only interpreted by the gateway.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

/// The only seam between the gateway and the network.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError>;
}

/// Production transport. The cookie store keeps the server session alive
/// across calls made through the same client.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let headers = header_map(&request)?;
        let mut builder = self.client.request(request.method, request.url);

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            // reqwest sets the multipart content type with its boundary
            RequestBody::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        // Replaces per name, so a caller header never travels next to a default.
        let response = builder.headers(headers).send().await?;
        let status = response.status();

        // A failed call is judged by its status alone; its body is optional.
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) if !status.is_success() => {
                warn!(status = status.as_u16(), "Could not read error response body: {err}");
                Bytes::new()
            }
            Err(err) => return Err(err.into()),
        };

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Default headers with the caller's own laid over them.
fn header_map(request: &ApiRequest) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if matches!(request.body, RequestBody::Empty) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    for (name, value) in &request.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::InvalidHeader(format!("name '{name}'")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| ApiError::InvalidHeader(format!("value for '{name}'")))?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

fn build_form(parts: Vec<FormPart>) -> Result<multipart::Form, ApiError> {
    let mut form = multipart::Form::new();
    for part in parts {
        let mut field = multipart::Part::bytes(part.bytes.to_vec()).mime_str(&part.content_type)?;
        if let Some(file_name) = part.file_name {
            field = field.file_name(file_name);
        }
        form = form.part(part.name, field);
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::JobTrackerClient;
    use crate::gateway::testing::{http_response, serve_http};
    use crate::gateway::{Gateway, LOGIN_ROUTE};
    use crate::models::{JobInput, JobStatus, LoginRequest};
    use crate::normalize::SESSION_EXPIRED_MESSAGE;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};

    fn gateway_at(base_url: Url) -> (Gateway, Arc<Mutex<Vec<String>>>) {
        let redirects = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&redirects);
        let gateway = Gateway::new(
            base_url,
            Arc::new(ReqwestTransport::new().unwrap()),
            Arc::new(move |route: &str| sink.lock().unwrap().push(route.to_string())),
        );
        (gateway, redirects)
    }

    fn json_ok(body: &str) -> String {
        http_response("200 OK", &["Content-Type: application/json"], body)
    }

    #[test]
    fn test_header_builder_keeps_order() {
        let url = Url::parse("http://localhost:8080/jobs").unwrap();
        let request = ApiRequest::new(Method::GET, url)
            .header("Accept", "text/csv")
            .header("X-Request-Id", "abc");
        assert_eq!(
            request.headers,
            vec![
                ("Accept".to_string(), "text/csv".to_string()),
                ("X-Request-Id".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn test_caller_header_replaces_default() {
        let url = Url::parse("http://localhost:8080/jobs").unwrap();
        let request = ApiRequest::new(Method::GET, url).header("accept", "text/csv");
        let headers = header_map(&request).unwrap();

        let accept: Vec<&HeaderValue> = headers.get_all(ACCEPT).iter().collect();
        assert_eq!(accept, vec![&HeaderValue::from_static("text/csv")]);
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_bad_header_name_is_rejected() {
        let url = Url::parse("http://localhost:8080/jobs").unwrap();
        let request = ApiRequest::new(Method::GET, url).header("bad header", "x");
        assert!(matches!(header_map(&request), Err(ApiError::InvalidHeader(_))));
    }

    #[test]
    fn test_invalid_part_content_type_fails_before_sending() {
        let err = build_form(vec![FormPart {
            name: "resume".into(),
            file_name: Some("cv.bin".into()),
            content_type: "not a mime type".into(),
            bytes: Bytes::from_static(b"x"),
        }])
        .unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }

    #[tokio::test]
    async fn test_unreadable_401_body_still_expires_session() {
        // Promises 100 bytes, sends 8, then hangs up.
        let truncated = "HTTP/1.1 401 Unauthorized\r\nContent-Type: text/html\r\nContent-Length: 100\r\nConnection: close\r\n\r\n<html>lo".to_string();
        let (base_url, server) = serve_http(vec![truncated]).await;
        let (gateway, redirects) = gateway_at(base_url);

        let url = gateway.endpoint(&["user"], &[]).unwrap();
        let err = gateway.get::<Value>(url).await.unwrap_err();

        assert!(err.is_session_expired());
        assert_eq!(err.status(), 401);
        assert_eq!(err.details().primary_message, SESSION_EXPIRED_MESSAGE);
        assert_eq!(*redirects.lock().unwrap(), vec![LOGIN_ROUTE.to_string()]);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreadable_error_body_falls_back_to_status() {
        let truncated = "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 50\r\nConnection: close\r\n\r\n{\"err".to_string();
        let (base_url, server) = serve_http(vec![truncated]).await;
        let (gateway, redirects) = gateway_at(base_url);

        let url = gateway.endpoint(&["jobs"], &[]).unwrap();
        let err = gateway.get::<Value>(url).await.unwrap_err();

        assert!(matches!(err, ApiError::Rejected(_)));
        assert_eq!(err.status(), 503);
        assert_eq!(err.details().primary_message, "Request failed (503)");
        assert!(redirects.lock().unwrap().is_empty());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_json_accept_header_is_sent() {
        let (base_url, server) = serve_http(vec![json_ok(r#"{"data":{"id":1}}"#)]).await;
        let (gateway, _) = gateway_at(base_url);

        let url = gateway.endpoint(&["user"], &[]).unwrap();
        let _: Value = gateway.get(url).await.unwrap();

        let requests = server.await.unwrap();
        let head = requests[0].to_ascii_lowercase();
        assert!(head.starts_with("get /user http/1.1"));
        assert!(head.contains("accept: application/json\r\n"));
    }

    #[tokio::test]
    async fn test_overridden_accept_is_sent_once() {
        let (base_url, server) = serve_http(vec![json_ok("[]")]).await;
        let (gateway, _) = gateway_at(base_url);

        let url = gateway.endpoint(&["jobs"], &[]).unwrap();
        gateway
            .send_raw(ApiRequest::new(Method::GET, url).header("Accept", "text/csv"))
            .await
            .unwrap();

        let requests = server.await.unwrap();
        let head = requests[0].to_ascii_lowercase();
        assert!(head.contains("accept: text/csv\r\n"));
        assert_eq!(head.matches("accept:").count(), 1);
    }

    #[tokio::test]
    async fn test_login_cookie_rides_on_later_calls() {
        let login = http_response(
            "200 OK",
            &[
                "Content-Type: application/json",
                "Set-Cookie: JSESSIONID=c0ffee42; Path=/; HttpOnly",
            ],
            r#"{"data":{"message":"Login successful"}}"#,
        );
        let user = json_ok(r#"{"data":{"id":3,"name":"Ada","email":"ada@example.com"}}"#);
        let (base_url, server) = serve_http(vec![login, user]).await;
        let (gateway, _) = gateway_at(base_url);
        let client = JobTrackerClient::new(gateway);

        client
            .login(&LoginRequest {
                email: "ada@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        let user = client.current_user().await.unwrap();

        assert_eq!(user.name.as_deref(), Some("Ada"));
        let requests = server.await.unwrap();
        assert!(!requests[0].to_ascii_lowercase().contains("cookie:"));
        assert!(requests[1].contains("JSESSIONID=c0ffee42"));
    }

    #[tokio::test]
    async fn test_add_job_wire_format() {
        let (base_url, server) = serve_http(vec![json_ok(r#"{"data":{"message":"Job added"}}"#)]).await;
        let (gateway, _) = gateway_at(base_url);
        let client = JobTrackerClient::new(gateway);

        let job = JobInput {
            job_id: None,
            job_role: "SRE".into(),
            company_name: "Initech".into(),
            comment: None,
            applied_date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            status: JobStatus::Applied,
            resume_used: None,
        };
        client.add_job(&job, None).await.unwrap();

        let requests = server.await.unwrap();
        let raw = &requests[0];
        let lower = raw.to_ascii_lowercase();
        assert!(lower.starts_with("post /jobs http/1.1"));
        assert!(lower.contains("content-type: multipart/form-data; boundary="));
        assert!(lower.contains("content-disposition: form-data; name=\"job\"\r\ncontent-type: application/json"));
        assert!(raw.contains(r#""companyName":"Initech""#));
        assert!(lower.contains("content-disposition: form-data; name=\"resume\"; filename=\"no-resume.txt\""));
    }
}
