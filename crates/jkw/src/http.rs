//! reqwest-backed [`Transport`] with a fixed Basic-Auth header.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use jkw_core::params::FormBody;
use jkw_core::transport::check_response_size;
use jkw_core::{Error, Method, Result, Transport};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::fmt;
use std::time::{Duration, Instant};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub token: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            token: token.into(),
        }
    }

    pub fn basic_auth(&self) -> String {
        let pair = format!("{}:{}", self.user, self.token);
        format!("Basic {}", STANDARD.encode(pair))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("token", &"***")
            .finish()
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// The auth header is computed here, once, and attached to every request.
    pub fn new(credentials: &Credentials, timeout: Duration) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&credentials.basic_auth())
            .map_err(|e| Error::usage(format!("invalid credentials: {e}")))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .user_agent(concat!("jkw/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::usage(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        method: Method,
        url: &str,
    ) -> Result<reqwest::Response> {
        let started = Instant::now();
        let response = request.send().await.map_err(|e| {
            tracing::debug!(method = method.as_str(), url, error = %e, "request failed");
            Error::network(url, e)
        })?;
        let status = response.status();
        tracing::debug!(
            method = method.as_str(),
            url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request finished"
        );
        if !status.is_success() {
            return Err(Error::http(url, status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    /// Reads the body chunk by chunk so an oversized response is dropped
    /// before it is fully buffered.
    async fn get(&self, url: &str) -> Result<String> {
        let mut response = self.execute(self.client.get(url), Method::Get, url).await?;
        if let Some(len) = response.content_length() {
            check_response_size(url, usize::try_from(len).unwrap_or(usize::MAX))?;
        }
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| Error::network(url, e))? {
            check_response_size(url, body.len() + chunk.len())?;
            body.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn send(&self, method: Method, url: &str, body: Option<&FormBody>) -> Result<()> {
        let mut request = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(body.as_str().to_string());
        }
        self.execute(request, method, url).await?;
        Ok(())
    }
}
