use crate::error::{Error, Result};
use crate::params::FormBody;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Refuse to decode bodies larger than this.
pub const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10 MB

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Authenticated access to the CI server.
///
/// Implementations attach the same credentials to every request and never
/// retry: one call, one request, one outcome.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Body of a 2xx response.
    async fn get(&self, url: &str) -> Result<String>;

    /// Fire a request whose response body is irrelevant. A present `body` is
    /// sent as `application/x-www-form-urlencoded`.
    async fn send(&self, method: Method, url: &str, body: Option<&FormBody>) -> Result<()>;
}

/// Rejects a body of `len` bytes when it exceeds [`MAX_RESPONSE_SIZE`].
/// Transports call this while reading; callers call it again on what they get.
pub fn check_response_size(url: &str, len: usize) -> Result<()> {
    if len > MAX_RESPONSE_SIZE {
        return Err(Error::malformed(
            url,
            format!(
                "response too large ({:.1} MB, max {} MB)",
                len as f64 / (1024.0 * 1024.0),
                MAX_RESPONSE_SIZE / (1024 * 1024)
            ),
        ));
    }
    Ok(())
}

/// GET `url` and decode it as `T`; undecodable bodies are `MalformedResponse`.
pub async fn fetch_json<T: DeserializeOwned>(transport: &dyn Transport, url: &str) -> Result<T> {
    let body = transport.get(url).await?;
    check_response_size(url, body.len())?;
    serde_json::from_str(&body).map_err(|e| Error::malformed(url, e))
}
