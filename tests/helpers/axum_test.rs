// ABOUTME: Axum HTTP testing utilities for integration tests
// ABOUTME: Builds JSON and multipart requests and runs them against a router without a server

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde::Serialize;
use tower::ServiceExt;

const BOUNDARY: &str = "cleaners-assistant-test-boundary";

struct FilePart {
    name: String,
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Helper to build and execute HTTP requests against Axum routers
pub struct AxumTestRequest {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl AxumTestRequest {
    fn new(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_owned(),
            headers: Vec::new(),
            body: None,
            fields: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Create a new GET request
    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    /// Create a new POST request
    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    /// Create a new DELETE request
    #[allow(dead_code)]
    pub fn delete(uri: &str) -> Self {
        Self::new(Method::DELETE, uri)
    }

    /// Create a new PUT request
    #[allow(dead_code)]
    pub fn put(uri: &str) -> Self {
        Self::new(Method::PUT, uri)
    }

    /// Create a new OPTIONS request, as sent for CORS preflight
    #[allow(dead_code)]
    pub fn options(uri: &str) -> Self {
        Self::new(Method::OPTIONS, uri)
    }

    /// Add a header to the request
    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_owned(), value.to_owned()));
        self
    }

    /// Authenticate as `uid` through the fake verifier
    #[allow(dead_code)]
    pub fn auth(self, uid: &str) -> Self {
        self.header("authorization", &format!("Bearer token-{uid}"))
    }

    /// Add JSON body to the request
    #[allow(dead_code)]
    pub fn json<T: Serialize>(mut self, data: &T) -> Self {
        self.body = Some(serde_json::to_vec(data).expect("Failed to serialize JSON"));
        self.headers.push((
            header::CONTENT_TYPE.as_str().to_owned(),
            "application/json".to_owned(),
        ));
        self
    }

    /// Add a multipart text field
    #[allow(dead_code)]
    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.fields.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Add a multipart file part
    #[allow(dead_code)]
    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.files.push(FilePart {
            name: name.to_owned(),
            file_name: file_name.to_owned(),
            content_type: content_type.to_owned(),
            bytes: bytes.to_vec(),
        });
        self
    }

    /// Send an empty multipart form even when no parts were added
    #[allow(dead_code)]
    pub fn multipart(mut self) -> Self {
        self.body = Some(Vec::new());
        self
    }

    fn multipart_body(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in &self.fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for file in &self.files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    file.name, file.file_name, file.content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(&file.bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    /// Execute the request against an Axum router
    pub async fn send(self, app: Router) -> AxumTestResponse {
        let is_multipart = !self.fields.is_empty()
            || !self.files.is_empty()
            || self.body.as_ref().is_some_and(Vec::is_empty);

        let mut builder = Request::builder()
            .method(self.method.clone())
            .uri(self.uri.clone());
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        let body = if is_multipart {
            builder = builder.header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
            self.multipart_body()
        } else {
            self.body.unwrap_or_default()
        };

        let request = builder
            .body(Body::from(body))
            .expect("Failed to build request");

        let response = app
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        AxumTestResponse::from_response(response).await
    }
}

/// Wrapper around Axum HTTP response for testing
pub struct AxumTestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl AxumTestResponse {
    /// Create from response by eagerly reading the body
    async fn from_response(response: axum::http::Response<Body>) -> Self {
        use axum::body::to_bytes;
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body")
            .to_vec();
        Self {
            status,
            headers,
            body,
        }
    }

    /// Get the response status code as u16 for easy assertion
    pub const fn status(&self) -> u16 {
        self.status.as_u16()
    }

    /// Get a response header as text
    #[allow(dead_code)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the response body as bytes
    #[allow(dead_code)]
    pub fn bytes(self) -> Vec<u8> {
        self.body
    }

    /// Get the response body as a JSON value
    pub fn json<T: serde::de::DeserializeOwned>(self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to deserialize JSON response")
    }

    /// Get the response body as a string
    #[allow(dead_code)]
    pub fn text(self) -> String {
        String::from_utf8(self.body).expect("Failed to decode response as UTF-8")
    }

    /// Error code from the standard error envelope
    #[allow(dead_code)]
    pub fn error_code(self) -> String {
        let body: serde_json::Value = self.json();
        body["error"]["code"]
            .as_str()
            .expect("Response has no error code")
            .to_owned()
    }

    /// Assert that the status code matches
    #[allow(dead_code)]
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}: {}",
            expected,
            self.status,
            String::from_utf8_lossy(&self.body)
        );
        self
    }
}
