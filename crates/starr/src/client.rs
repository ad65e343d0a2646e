//! Shared HTTP/JSON client used by every *arr application.
//!
//! Each application module (Sonarr, Radarr, ...) wraps a [`StarrClient`] and
//! only decides paths and payload types. Request construction, query
//! encoding, authentication headers, status translation, retries and
//! cancellation all happen here, once.

use std::fmt;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use url::Url;
use url::form_urlencoded;

use crate::error::{Result, StarrError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::retry::{RetryConfig, with_retry};

/// Path segment every *arr API lives under.
pub const API: &str = "api";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for one *arr server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL, e.g. `http://localhost:8989` or `https://media.lan/sonarr`.
    pub url: String,
    /// API key from the application's General settings.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Retries for transient failures. Zero disables retrying.
    pub max_retries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: 0,
        }
    }
}

impl Config {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Json(Vec<u8>),
    Form(String),
}

impl Body {
    fn content_type(&self) -> &'static str {
        match self {
            Body::Json(_) => "application/json",
            Body::Form(_) => "application/x-www-form-urlencoded",
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        match self {
            Body::Json(bytes) => bytes,
            Body::Form(text) => text.into_bytes(),
        }
    }
}

/// An API request relative to `/api`.
///
/// ```ignore
/// let req = Request::new("v3/calendar").with_query("unmonitored", false);
/// assert_eq!(req.to_string(), "/api/v3/calendar?unmonitored=false");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Path below `/api`, e.g. `v3/customFormat/4`.
    pub uri: String,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl Request {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.push_query(key, value);
        self
    }

    pub fn push_query(&mut self, key: &str, value: impl ToString) {
        self.query.push((key.to_string(), value.to_string()));
    }

    /// Attach a JSON-encoded body.
    pub fn with_json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self> {
        self.body = Some(Body::Json(serde_json::to_vec(payload)?));
        Ok(self)
    }

    /// Attach a form-encoded body.
    #[must_use]
    pub fn with_form(mut self, payload: impl Into<String>) -> Self {
        self.body = Some(Body::Form(payload.into()));
        self
    }

    /// Absolute path of the request, without query.
    pub fn path(&self) -> String {
        format!("/{}/{}", API, self.uri.trim_start_matches('/'))
    }

    fn encoded_query(&self) -> Option<String> {
        if self.query.is_empty() {
            return None;
        }
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.query {
            serializer.append_pair(k, v);
        }
        Some(serializer.finish())
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.encoded_query() {
            Some(query) => write!(f, "{}?{}", self.path(), query),
            None => f.write_str(&self.path()),
        }
    }
}

/// Shared client for one *arr server.
///
/// Cloning is cheap; clones share the transport and the cancellation token.
#[derive(Clone)]
pub struct StarrClient {
    transport: Arc<dyn HttpTransport>,
    url: String,
    api_key: String,
    max_retries: usize,
    cancel: CancellationToken,
}

impl fmt::Debug for StarrClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StarrClient")
            .field("url", &self.url)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl StarrClient {
    /// Create a client backed by reqwest.
    pub fn new(config: &Config) -> Result<Self> {
        let parsed = Url::parse(&config.url)
            .map_err(|e| StarrError::config(format!("invalid url {:?}: {}", config.url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(StarrError::config(format!(
                "unsupported url scheme: {}",
                parsed.scheme()
            )));
        }

        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(config.timeout_secs))
            .map_err(|e| StarrError::config(e.to_string()))?;

        Ok(
            Self::new_with_transport(&config.url, &config.api_key, Arc::new(transport))
                .with_max_retries(config.max_retries),
        )
    }

    pub fn new_with_transport(url: &str, api_key: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            max_retries: 0,
            cancel: CancellationToken::new(),
        }
    }

    /// Thread `token` into every request made through this client.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Base URL without trailing slash.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The token threaded into requests made by endpoint methods.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// GET and decode the response.
    pub async fn get_into<T: DeserializeOwned>(&self, req: &Request) -> Result<T> {
        self.get_into_with(&self.cancel, req).await
    }

    /// GET and decode the response, using an explicit cancellation token.
    pub async fn get_into_with<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        req: &Request,
    ) -> Result<T> {
        let response = self.send(cancel, HttpMethod::Get, req).await?;
        decode(HttpMethod::Get, req, &response)
    }

    /// POST and decode the response.
    pub async fn post_into<T: DeserializeOwned>(&self, req: &Request) -> Result<T> {
        let response = self.send(&self.cancel, HttpMethod::Post, req).await?;
        decode(HttpMethod::Post, req, &response)
    }

    /// POST and discard the response body.
    pub async fn post_any(&self, req: &Request) -> Result<()> {
        self.send(&self.cancel, HttpMethod::Post, req).await?;
        Ok(())
    }

    /// PUT and decode the response.
    pub async fn put_into<T: DeserializeOwned>(&self, req: &Request) -> Result<T> {
        let response = self.send(&self.cancel, HttpMethod::Put, req).await?;
        decode(HttpMethod::Put, req, &response)
    }

    /// PUT and discard the response body.
    pub async fn put_any(&self, req: &Request) -> Result<()> {
        self.send(&self.cancel, HttpMethod::Put, req).await?;
        Ok(())
    }

    /// DELETE and discard the response body.
    pub async fn delete_any(&self, req: &Request) -> Result<()> {
        self.send(&self.cancel, HttpMethod::Delete, req).await?;
        Ok(())
    }

    async fn send(
        &self,
        cancel: &CancellationToken,
        method: HttpMethod,
        req: &Request,
    ) -> Result<HttpResponse> {
        if self.max_retries == 0 {
            return self.send_once(cancel, method, req).await;
        }

        let label = format!("{} {}", method.as_str(), req);
        with_retry(
            || self.send_once(cancel, method, req),
            RetryConfig::with_max_retries(self.max_retries),
            &label,
            cancel,
        )
        .await
    }

    async fn send_once(
        &self,
        cancel: &CancellationToken,
        method: HttpMethod,
        req: &Request,
    ) -> Result<HttpResponse> {
        if cancel.is_cancelled() {
            return Err(StarrError::Cancelled);
        }

        let request = self.build(method, req);
        tracing::debug!(method = method.as_str(), request = %req, "Sending request");

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StarrError::Cancelled),
            response = self.transport.send(request) => response.map_err(|e| {
                StarrError::Transport(format!("{} {}: {}", method.as_str(), req, e))
            })?,
        };

        if !response.is_success() {
            tracing::debug!(
                method = method.as_str(),
                request = %req,
                status = response.status,
                "Request failed"
            );
            return Err(StarrError::InvalidStatusCode {
                status: response.status,
                message: response.body_text(),
            });
        }

        Ok(response)
    }

    fn build(&self, method: HttpMethod, req: &Request) -> HttpRequest {
        let mut url = format!("{}{}", self.url, req.path());
        if let Some(query) = req.encoded_query() {
            url.push('?');
            url.push_str(&query);
        }

        let mut headers = vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), "starr".to_string()),
            ("X-Api-Key".to_string(), self.api_key.clone()),
        ];

        let body = match req.body.clone() {
            Some(body) => {
                headers.push(("Content-Type".to_string(), body.content_type().to_string()));
                body.into_bytes()
            }
            None => Vec::new(),
        };

        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }
}

/// Decode a JSON body. An empty body decodes as `null`.
fn decode<T: DeserializeOwned>(
    method: HttpMethod,
    req: &Request,
    response: &HttpResponse,
) -> Result<T> {
    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &response.body
    };
    serde_json::from_slice(body).map_err(|source| StarrError::Decode {
        request: format!("{} {}", method.as_str(), req),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpError, MockTransport};
    use async_trait::async_trait;
    use std::time::Duration;

    const HOST: &str = "http://arr.test";

    fn client(transport: &MockTransport) -> StarrClient {
        StarrClient::new_with_transport(HOST, "mockAPIkey", Arc::new(transport.clone()))
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
        name: String,
    }

    #[test]
    fn test_request_display_includes_encoded_query() {
        let req = Request::new("v3/calendar")
            .with_query("unmonitored", false)
            .with_query("start", "2024-01-01T00:00:00.000Z");
        assert_eq!(
            req.to_string(),
            "/api/v3/calendar?unmonitored=false&start=2024-01-01T00%3A00%3A00.000Z"
        );
        assert_eq!(Request::new("/v1/history").to_string(), "/api/v1/history");
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.max_retries, 0);
        assert!(config.url.is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let err = StarrClient::new(&Config::new("not a url", "key")).expect_err("invalid url");
        assert!(matches!(err, StarrError::Config(_)));

        let err = StarrClient::new(&Config::new("ftp://arr.test", "key")).expect_err("bad scheme");
        assert!(matches!(err, StarrError::Config(_)));
    }

    #[test]
    fn test_new_normalizes_trailing_slashes() {
        let client = StarrClient::new(&Config::new("http://localhost:8989/sonarr//", "key"))
            .expect("client should build");
        assert_eq!(client.url(), "http://localhost:8989/sonarr");
    }

    #[tokio::test]
    async fn test_get_into_sends_auth_headers_and_decodes() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            format!("{HOST}/api/v3/tag?label=a+b"),
            200,
            r#"[{"id": 1, "name": "one"}]"#,
        );

        let items: Vec<Item> = client(&transport)
            .get_into(&Request::new("v3/tag").with_query("label", "a b"))
            .await
            .expect("request should succeed");

        assert_eq!(
            items,
            vec![Item {
                id: 1,
                name: "one".to_string()
            }]
        );

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].header("x-api-key"), Some("mockAPIkey"));
        assert_eq!(requests[0].header("accept"), Some("application/json"));
        assert!(requests[0].header("content-type").is_none());
    }

    #[tokio::test]
    async fn test_non_success_status_is_invalid_status_code() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            format!("{HOST}/api/v3/config/naming"),
            404,
            r#"{"message": "NotFound"}"#,
        );

        let err = client(&transport)
            .get_into::<serde_json::Value>(&Request::new("v3/config/naming"))
            .await
            .expect_err("404 should fail");

        match err {
            StarrError::InvalidStatusCode { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, r#"{"message": "NotFound"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_post_into_sends_json_body() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Post,
            format!("{HOST}/api/v1/tag"),
            201,
            r#"{"id": 9, "name": "new"}"#,
        );

        let req = Request::new("v1/tag")
            .with_json(&serde_json::json!({"name": "new"}))
            .expect("body should encode");
        let item: Item = client(&transport)
            .post_into(&req)
            .await
            .expect("post should succeed");
        assert_eq!(item.id, 9);

        let requests = transport.requests();
        assert_eq!(requests[0].header("content-type"), Some("application/json"));
        assert_eq!(requests[0].body, br#"{"name":"new"}"#.to_vec());
    }

    #[tokio::test]
    async fn test_delete_any_accepts_empty_body() {
        let transport = MockTransport::new();
        transport.push_json(HttpMethod::Delete, format!("{HOST}/api/v1/tag/3"), 200, "");

        client(&transport)
            .delete_any(&Request::new("v1/tag/3"))
            .await
            .expect("delete should succeed");
    }

    #[tokio::test]
    async fn test_empty_body_decodes_as_null() {
        let transport = MockTransport::new();
        transport.push_json(HttpMethod::Put, format!("{HOST}/api/v1/tag/3"), 202, "  ");

        let value: Option<Item> = client(&transport)
            .put_into(&Request::new("v1/tag/3"))
            .await
            .expect("empty body should decode");
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_decode_failure_names_request() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            format!("{HOST}/api/v3/customFormat"),
            200,
            r#"{"unexpected": true}"#,
        );

        let err = client(&transport)
            .get_into::<Vec<Item>>(&Request::new("v3/customFormat"))
            .await
            .expect_err("object is not a list");

        assert!(matches!(err, StarrError::Decode { .. }));
        assert!(err.to_string().starts_with("GET /api/v3/customFormat: "));
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_transport_error() {
        let transport = MockTransport::new();
        transport.push_failure(HttpMethod::Get, format!("{HOST}/api/v3/tag"), "refused");

        let err = client(&transport)
            .get_into::<serde_json::Value>(&Request::new("v3/tag"))
            .await
            .expect_err("transport failure");
        assert!(matches!(err, StarrError::Transport(_)));
        assert!(err.to_string().contains("GET /api/v3/tag: "));
        assert!(err.to_string().contains("refused"));
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_network() {
        let transport = MockTransport::new();
        let token = CancellationToken::new();
        token.cancel();

        let err = client(&transport)
            .with_cancellation(token)
            .get_into::<serde_json::Value>(&Request::new("v3/tag"))
            .await
            .expect_err("cancelled");

        assert!(err.is_cancelled());
        assert!(transport.requests().is_empty());
    }

    /// Transport whose requests never complete.
    struct HangingTransport;

    #[async_trait]
    impl HttpTransport for HangingTransport {
        async fn send(&self, _request: HttpRequest) -> std::result::Result<HttpResponse, HttpError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_in_flight_request() {
        let token = CancellationToken::new();
        let client = StarrClient::new_with_transport(HOST, "key", Arc::new(HangingTransport))
            .with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let err = client
            .get_into::<serde_json::Value>(&Request::new("v3/tag"))
            .await
            .expect_err("in-flight request should be cancelled");
        assert!(err.is_cancelled());
        canceller.await.expect("canceller task");
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_status_when_enabled() {
        let transport = MockTransport::new();
        let url = format!("{HOST}/api/v3/system/status");
        transport.push_json(HttpMethod::Get, url.clone(), 503, "busy");
        transport.push_json(HttpMethod::Get, url, 200, r#"{"id": 1, "name": "ok"}"#);

        let item: Item = client(&transport)
            .with_max_retries(2)
            .get_into(&Request::new("v3/system/status"))
            .await
            .expect("retry should recover");

        assert_eq!(item.name, "ok");
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_retry_backoff() {
        let transport = MockTransport::new();
        let url = format!("{HOST}/api/v3/system/status");
        for _ in 0..4 {
            transport.push_json(HttpMethod::Get, url.clone(), 503, "busy");
        }

        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let started = tokio::time::Instant::now();
        let err = client(&transport)
            .with_max_retries(3)
            .with_cancellation(token)
            .get_into::<Item>(&Request::new("v3/system/status"))
            .await
            .expect_err("cancelled during backoff");

        assert!(err.is_cancelled());
        assert!(started.elapsed() < Duration::from_millis(100));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let transport = MockTransport::new();
        let url = format!("{HOST}/api/v3/system/status");
        transport.push_json(HttpMethod::Get, url.clone(), 503, "busy");
        transport.push_json(HttpMethod::Get, url, 200, r#"{"id": 1, "name": "ok"}"#);

        let err = client(&transport)
            .get_into::<Item>(&Request::new("v3/system/status"))
            .await
            .expect_err("no retry configured");

        assert_eq!(err.status(), Some(503));
        assert_eq!(transport.requests().len(), 1);
    }
}
