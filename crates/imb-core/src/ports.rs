use async_trait::async_trait;

/// HTTP method subset used by the provider clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A provider-agnostic outbound HTTP request.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub json: Option<serde_json::Value>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            json: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            json: Some(body),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// `Authorization: Bearer ...` plus the JSON content type the provider expects.
    pub fn bearer_json(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
    }
}

#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// DNS/TCP-level failure to reach the host.
    #[error("connect error: {0}")]
    Connect(String),

    #[error("request error: {0}")]
    Other(String),
}

/// Hexagonal port for outbound HTTP.
///
/// Implementations perform exactly one attempt per call and must not keep
/// per-request state between calls.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, req: HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}
