/*!
 * Provider implementations for the translation fallback chain.
 *
 * This module contains the backends a `Translator` walks through in order:
 * - `libre`: LibreTranslate-compatible HTTP endpoints (primary and alternate)
 * - `phrasebook`: offline phrase substitution used once every remote endpoint failed
 * - `http`: the transport seam the HTTP backends talk through
 */

use async_trait::async_trait;
use tokio::time::Instant;

use crate::errors::ProviderError;
use crate::translation::core::TranslationRequest;

/// Common trait for every strategy in the fallback chain
///
/// Each call is one attempt: it either yields translated text or a typed
/// failure. Retrying and falling through to the next backend is the
/// translator's job, not the backend's.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Name used in logs and in `OutcomeSource::Remote`
    fn name(&self) -> &str;

    /// Remote backends are retried with backoff, local ones are tried once
    fn is_remote(&self) -> bool {
        true
    }

    /// Make one attempt at translating `request` before `deadline`
    async fn translate(
        &self,
        request: &TranslationRequest,
        deadline: Instant,
    ) -> Result<String, ProviderError>;
}

pub mod http;
pub mod libre;
pub mod phrasebook;
