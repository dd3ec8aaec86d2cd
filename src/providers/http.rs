use async_trait::async_trait;
use log::trace;
use reqwest::header::{ACCEPT, CONTENT_TYPE, LOCATION, USER_AGENT};
use reqwest::{Client, redirect};
use serde_json::Value;
use std::time::Duration;

use crate::errors::ProviderError;

/// Outbound JSON POST
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Absolute URL
    pub url: String,
    /// JSON body
    pub body: Value,
    /// User-Agent header value
    pub user_agent: String,
}

/// What came back, before any interpretation
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw `Location` header, if any
    pub location: Option<String>,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self.status, 301 | 302 | 307 | 308)
    }
}

/// Transport seam for the HTTP backends
///
/// Implementations must not follow redirects on their own; the backend
/// decides whether a redirect is followed.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `request` and return the raw response, giving up after `timeout`
    async fn post_json(&self, request: &HttpRequest, timeout: Duration) -> Result<HttpResponse, ProviderError>;
}

/// reqwest-backed transport with automatic redirects disabled
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport whose client never follows redirects
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ProviderError::Connection(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, request: &HttpRequest, timeout: Duration) -> Result<HttpResponse, ProviderError> {
        let budget_ms = timeout.as_millis() as u64;
        if timeout.is_zero() {
            return Err(ProviderError::Timeout(budget_ms));
        }

        trace!("POST {} ({} ms budget)", request.url, budget_ms);

        let exchange = async {
            let response = self.client.post(&request.url)
                .header(CONTENT_TYPE, "application/json")
                .header(ACCEPT, "application/json")
                .header(USER_AGENT, request.user_agent.as_str())
                .timeout(timeout)
                .json(&request.body)
                .send()
                .await?;

            let status = response.status().as_u16();
            let location = response.headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            let body = response.text().await?;

            Ok::<_, reqwest::Error>(HttpResponse { status, location, body })
        };

        match tokio::time::timeout(timeout, exchange).await {
            Err(_) => Err(ProviderError::Timeout(budget_ms)),
            Ok(Err(e)) if e.is_timeout() => Err(ProviderError::Timeout(budget_ms)),
            Ok(Err(e)) => Err(ProviderError::Connection(e.to_string())),
            Ok(Ok(response)) => Ok(response),
        }
    }
}
