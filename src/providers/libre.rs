use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

use super::TranslationBackend;
use super::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::errors::ProviderError;
use crate::translation::core::TranslationRequest;

/// LibreTranslate request body
#[derive(Debug, Serialize)]
pub struct LibreTranslateRequest<'a> {
    /// Text to translate
    pub q: &'a str,
    /// Source language code
    pub source: &'a str,
    /// Target language code
    pub target: &'a str,
    /// Always "text"
    pub format: &'a str,
}

impl<'a> From<&'a TranslationRequest> for LibreTranslateRequest<'a> {
    fn from(request: &'a TranslationRequest) -> Self {
        Self {
            q: &request.text,
            source: &request.source_language,
            target: &request.target_language,
            format: "text",
        }
    }
}

/// LibreTranslate response body
#[derive(Debug, Deserialize)]
pub struct LibreTranslateResponse {
    /// Translated text
    #[serde(rename = "translatedText")]
    pub translated_text: Option<String>,
}

/// Client for one LibreTranslate-compatible endpoint
pub struct LibreTranslate {
    /// Name used in logs
    name: String,
    /// Endpoint URL that receives the POST
    endpoint: String,
    /// User-Agent header value
    user_agent: String,
    /// Shared transport
    transport: Arc<dyn HttpTransport>,
}

impl LibreTranslate {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        user_agent: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            user_agent: user_agent.into(),
            transport,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, request: &TranslationRequest) -> Result<HttpRequest, ProviderError> {
        let body = serde_json::to_value(LibreTranslateRequest::from(request))
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(HttpRequest {
            url: self.endpoint.clone(),
            body,
            user_agent: self.user_agent.clone(),
        })
    }

    /// Send once and follow at most one redirect
    async fn exchange(&self, request: HttpRequest, deadline: Instant) -> Result<HttpResponse, ProviderError> {
        let response = self.transport.post_json(&request, remaining(deadline)).await?;
        if !response.is_redirect() {
            return Ok(response);
        }

        let location = response.location
            .as_deref()
            .ok_or(ProviderError::RedirectWithoutLocation { status_code: response.status })?;
        let target = resolve_location(&request.url, location)?;
        debug!("{}: following {} redirect to {}", self.name, response.status, target);

        let followed = self.transport
            .post_json(&HttpRequest { url: target, ..request }, remaining(deadline))
            .await?;
        if followed.is_redirect() {
            return Err(ProviderError::TooManyRedirects { status_code: followed.status });
        }

        Ok(followed)
    }
}

#[async_trait]
impl TranslationBackend for LibreTranslate {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, request: &TranslationRequest, deadline: Instant) -> Result<String, ProviderError> {
        let http_request = self.build_request(request)?;
        let response = self.exchange(http_request, deadline).await?;

        if !response.is_success() {
            warn!("{} API error ({}): {}", self.name, response.status, preview(&response.body));
            return Err(ProviderError::Api {
                status_code: response.status,
                message: preview(&response.body),
            });
        }

        let parsed: LibreTranslateResponse = serde_json::from_str(&response.body)
            .map_err(|e| ProviderError::Parse(format!("{}: {}", e, preview(&response.body))))?;

        parsed.translated_text
            .ok_or_else(|| ProviderError::Parse("Missing translatedText field".to_string()))
    }
}

fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}

/// Resolve a `Location` header against the URL that produced it
pub fn resolve_location(base: &str, location: &str) -> Result<String, ProviderError> {
    let base = Url::parse(base).map_err(|e| ProviderError::Parse(format!("Invalid endpoint URL {}: {}", base, e)))?;
    base.join(location)
        .map(String::from)
        .map_err(|e| ProviderError::Parse(format!("Invalid redirect location {}: {}", location, e)))
}

fn preview(body: &str) -> String {
    if body.chars().count() > 200 {
        body.chars().take(200).collect::<String>() + "..."
    } else {
        body.to_string()
    }
}
