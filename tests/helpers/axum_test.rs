// ABOUTME: In-process request driver for the analytics router
// ABOUTME: Sends one request through tower's oneshot and buffers the whole response

use axum::{
    body::{to_bytes, Body},
    http::{header, request::Builder, HeaderMap, HeaderValue, Method, Request, StatusCode},
    Router,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tower::ServiceExt;

const REQUEST_ID: &str = "x-request-id";

/// Request under construction
pub struct AxumTestRequest {
    builder: Builder,
    body: Body,
}

impl AxumTestRequest {
    pub fn get(uri: &str) -> Self {
        Self::with_method(Method::GET, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::with_method(Method::POST, uri)
    }

    pub fn put(uri: &str) -> Self {
        Self::with_method(Method::PUT, uri)
    }

    pub fn delete(uri: &str) -> Self {
        Self::with_method(Method::DELETE, uri)
    }

    fn with_method(method: Method, uri: &str) -> Self {
        Self {
            builder: Request::builder().method(method).uri(uri),
            body: Body::empty(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Attach `token` as a bearer credential
    pub fn bearer(self, token: &str) -> Self {
        self.header(header::AUTHORIZATION.as_str(), &format!("Bearer {token}"))
    }

    /// Serialize `payload` as the JSON body
    pub fn json<T: Serialize>(mut self, payload: &T) -> Self {
        let encoded = serde_json::to_vec(payload).expect("serializable test payload");
        self.builder = self
            .builder
            .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Body::from(encoded);
        self
    }

    /// Body sent as-is; set any content type separately
    pub fn raw_body(mut self, body: &str) -> Self {
        self.body = Body::from(body.to_owned());
        self
    }

    pub async fn send(self, router: Router) -> AxumTestResponse {
        let request = self.builder.body(self.body).expect("valid test request");
        let response = router.oneshot(request).await.expect("router is infallible");

        let (parts, body) = response.into_parts();
        let body = to_bytes(body, usize::MAX)
            .await
            .expect("buffered response body")
            .to_vec();

        AxumTestResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }
}

/// Fully buffered response
pub struct AxumTestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl AxumTestResponse {
    pub const fn status(&self) -> u16 {
        self.status.as_u16()
    }

    /// Request id the server attached to the response
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get(REQUEST_ID)
            .and_then(|value| value.to_str().ok())
    }

    pub fn json<T: DeserializeOwned>(self) -> T {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "response is not the expected JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    /// Panics with the body when the status differs
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "unexpected status, body: {}",
            String::from_utf8_lossy(&self.body)
        );
        self
    }
}
