//! Test doubles: an in-memory transport for gateway and accessor tests, and
//! a tiny HTTP server for checking what actually goes over the wire.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use super::{ApiRequest, Gateway, RawResponse, Transport};
use crate::errors::ApiError;

/// Replays canned responses in order and records every request it sees.
/// Clones share the same queue and log.
#[derive(Clone, Default)]
pub struct FakeTransport {
    responses: Arc<Mutex<VecDeque<RawResponse>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: Value) -> Self {
        self.respond_raw(status, body.to_string())
    }

    pub fn respond_raw(self, status: u16, body: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(RawResponse {
            status,
            body: Bytes::from(body.into()),
        });
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no canned response for {} {}", request.method, request.url));
        self.requests.lock().unwrap().push(request);
        Ok(response)
    }
}

/// A gateway on `http://localhost:8080` whose session hook records every redirect.
pub fn gateway_with(transport: &FakeTransport) -> (Gateway, Arc<Mutex<Vec<String>>>) {
    let redirects = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&redirects);
    let gateway = Gateway::new(
        Url::parse("http://localhost:8080").unwrap(),
        Arc::new(transport.clone()),
        Arc::new(move |route: &str| sink.lock().unwrap().push(route.to_string())),
    );
    (gateway, redirects)
}

/// A full HTTP/1.1 response that closes the connection after the body.
pub fn http_response(status_line: &str, headers: &[&str], body: &str) -> String {
    let mut response = format!("HTTP/1.1 {status_line}\r\n");
    for header in headers {
        response.push_str(header);
        response.push_str("\r\n");
    }
    response.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    ));
    response
}

/// Serves one connection per canned response, in order, on a local port.
/// The handle yields each request exactly as received.
pub async fn serve_http(responses: Vec<String>) -> (Url, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();

    let handle = tokio::spawn(async move {
        let mut received = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            received.push(read_request(&mut stream).await);
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
        }
        received
    });
    (base_url, handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let body = &buf[end + 4..];
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|len| len.trim().parse::<usize>().ok());
            let complete = match content_length {
                Some(len) => body.len() >= len,
                None if head.contains("transfer-encoding: chunked") => body.ends_with(b"0\r\n\r\n"),
                None => true,
            };
            if complete {
                break;
            }
        }
        let read = stream.read(&mut chunk).await.unwrap();
        if read == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..read]);
    }
    String::from_utf8_lossy(&buf).into_owned()
}
