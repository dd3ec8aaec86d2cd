/*!
 * Single-unit translation through the provider fallback chain.
 *
 * A `Translator` owns an ordered list of backends. Each remote backend gets a
 * bounded number of attempts with linear backoff before the next one is
 * tried; local backends (the offline phrasebook) get exactly one.
 */

use anyhow::Result;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::app_config::{MAX_TIMEOUT_MS, TranslationConfig};
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils::{needs_translation, normalize_code};
use crate::providers::TranslationBackend;
use crate::providers::http::{HttpTransport, ReqwestTransport};
use crate::providers::libre::LibreTranslate;
use crate::providers::phrasebook::Phrasebook;

/// One unit of text headed for a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Text to translate
    pub text: String,
    /// Normalized target language code
    pub target_language: String,
    /// Normalized source language code
    pub source_language: String,
}

impl TranslationRequest {
    /// Create a request from English into `target_language`
    pub fn new(text: impl Into<String>, target_language: &str) -> Self {
        Self {
            text: text.into(),
            target_language: normalize_code(target_language),
            source_language: "en".to_string(),
        }
    }

    /// Set the source language
    pub fn from_language(mut self, source_language: &str) -> Self {
        self.source_language = normalize_code(source_language);
        self
    }

    /// Nothing to do: same language on both sides, or nothing but whitespace
    pub fn is_noop(&self) -> bool {
        !needs_translation(&self.target_language, &self.source_language) || self.text.trim().is_empty()
    }
}

/// Where the text in an outcome came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeSource {
    /// A remote provider, by name
    Remote(String),
    /// The offline phrasebook
    Offline,
    /// No translation was needed
    Skipped,
    /// Every strategy failed; the text is the untouched input
    Original,
}

/// Result of translating one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    pub text: String,
    pub source: OutcomeSource,
}

impl TranslationOutcome {
    /// Degraded outcome carrying the input unchanged
    pub fn original(text: impl Into<String>) -> Self {
        Self { text: text.into(), source: OutcomeSource::Original }
    }

    /// False only when every strategy failed
    pub fn succeeded(&self) -> bool {
        self.source != OutcomeSource::Original
    }
}

/// Attempt limits and timing for the fallback chain
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Extra attempts per remote backend
    pub retry_count: u32,
    /// Backoff unit; the wait after attempt N is `backoff * N`
    pub backoff: Duration,
    /// Deadline for a single attempt
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&TranslationConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self {
            retry_count: config.retry_count,
            backoff: config.retry_backoff(),
            timeout: config.timeout(),
        }
    }

    /// Wait before the attempt following attempt number `attempt` (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

/// Translator for single units with provider fallback
pub struct Translator {
    /// Backends in priority order
    chain: Vec<Arc<dyn TranslationBackend>>,
    /// Attempt limits and timing
    policy: RetryPolicy,
}

impl Translator {
    /// Create a translator from an explicit chain
    pub fn new(chain: Vec<Arc<dyn TranslationBackend>>, policy: RetryPolicy) -> Self {
        Self { chain, policy }
    }

    /// Build the production chain: configured endpoints over reqwest, then the phrasebook
    pub fn from_config(config: &TranslationConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build the configured chain on top of a caller-supplied transport
    pub fn with_transport(config: &TranslationConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let mut chain: Vec<Arc<dyn TranslationBackend>> = config.endpoints.iter()
            .map(|endpoint| {
                Arc::new(LibreTranslate::new(
                    endpoint.name.clone(),
                    endpoint.url.clone(),
                    config.user_agent.clone(),
                    transport.clone(),
                )) as Arc<dyn TranslationBackend>
            })
            .collect();

        if config.offline_fallback {
            chain.push(Arc::new(Phrasebook::new()));
        }

        Self::new(chain, RetryPolicy::from_config(config))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Names of the backends, in the order they are tried
    pub fn backend_names(&self) -> Vec<String> {
        self.chain.iter().map(|b| b.name().to_string()).collect()
    }

    /// Translate `text`, never failing; the worst case is the input itself
    pub async fn translate(&self, text: &str, target_language: &str, source_language: &str) -> TranslationOutcome {
        let request = TranslationRequest::new(text, target_language).from_language(source_language);
        self.translate_request(&request).await
    }

    /// Infallible form of [`Translator::try_translate`]
    pub async fn translate_request(&self, request: &TranslationRequest) -> TranslationOutcome {
        match self.try_translate(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Translation to {} failed, keeping original text: {}", request.target_language, e);
                TranslationOutcome::original(request.text.clone())
            }
        }
    }

    /// Walk the chain until a backend yields an acceptable translation
    pub async fn try_translate(&self, request: &TranslationRequest) -> Result<TranslationOutcome, TranslationError> {
        if request.is_noop() {
            return Ok(TranslationOutcome { text: request.text.clone(), source: OutcomeSource::Skipped });
        }

        let mut attempts = 0;

        for backend in &self.chain {
            let max_attempts = if backend.is_remote() { self.policy.retry_count.saturating_add(1) } else { 1 };

            for attempt in 1..=max_attempts {
                attempts += 1;

                match self.attempt(backend.as_ref(), request).await {
                    Ok(text) => {
                        debug!("{} translated unit on attempt {}", backend.name(), attempt);
                        let source = if backend.is_remote() {
                            OutcomeSource::Remote(backend.name().to_string())
                        } else {
                            OutcomeSource::Offline
                        };
                        return Ok(TranslationOutcome { text, source });
                    }
                    Err(e) => {
                        debug!("{} attempt {}/{} failed: {}", backend.name(), attempt, max_attempts, e);
                        if !is_retryable(&e) {
                            break;
                        }
                        if attempt < max_attempts {
                            tokio::time::sleep(self.policy.backoff_for(attempt)).await;
                        }
                    }
                }
            }
        }

        Err(TranslationError::Exhausted { attempts })
    }

    /// One attempt against one backend, bounded by the policy deadline
    async fn attempt(&self, backend: &dyn TranslationBackend, request: &TranslationRequest) -> Result<String, ProviderError> {
        let now = Instant::now();
        let deadline = now.checked_add(self.policy.timeout)
            .unwrap_or_else(|| now + Duration::from_millis(MAX_TIMEOUT_MS));

        let text = if backend.is_remote() {
            tokio::time::timeout_at(deadline, backend.translate(request, deadline))
                .await
                .map_err(|_| ProviderError::Timeout(self.policy.timeout.as_millis() as u64))??
        } else {
            backend.translate(request, deadline).await?
        };

        if text.trim().is_empty() || text == request.text {
            return Err(ProviderError::Unchanged);
        }

        Ok(text)
    }
}

// Failures that would repeat identically on the same backend
fn is_retryable(error: &ProviderError) -> bool {
    !matches!(
        error,
        ProviderError::RedirectWithoutLocation { .. }
            | ProviderError::TooManyRedirects { .. }
            | ProviderError::NoMatch(_)
    )
}
