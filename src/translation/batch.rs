/*!
 * Batch translation processing.
 *
 * Items are translated strictly one after another with a pacing delay
 * between them. A failed item keeps its original content at its position,
 * and progress is reported once per finished item.
 */

use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::app_config::TranslationConfig;
use crate::language_utils::needs_translation;
use crate::search_result::{SearchResponse, SearchResult};

use super::core::{TranslationRequest, Translator};
use super::segmenter::split_sentences;

/// Progress sink, called with a percentage in `0.0..=100.0`
pub type ProgressCallback<'a> = &'a mut (dyn FnMut(f64) + Send);

/// Kinds of batch; a new batch only supersedes older batches of its own kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Units,
    Summary,
    Results,
}

/// Handle for one running batch
///
/// A ticket is superseded as soon as the same `BatchTranslator` starts a
/// newer batch of the same kind.
#[derive(Debug, Clone)]
pub struct BatchTicket {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl BatchTicket {
    pub fn is_superseded(&self) -> bool {
        self.current.load(Ordering::SeqCst) != self.generation
    }
}

/// Tracks completion and reports percentages
struct ProgressTracker<'a> {
    callback: Option<ProgressCallback<'a>>,
    total: usize,
    completed: usize,
}

impl<'a> ProgressTracker<'a> {
    fn new(callback: Option<ProgressCallback<'a>>, total: usize) -> Self {
        Self { callback, total, completed: 0 }
    }

    fn item_done(&mut self) {
        self.completed += 1;
        if let Some(callback) = self.callback.as_deref_mut() {
            let percent = if self.completed >= self.total {
                100.0
            } else {
                self.completed as f64 / self.total as f64 * 100.0
            };
            callback(percent);
        }
    }
}

/// Batch translator for summaries and search results
pub struct BatchTranslator {
    /// The single-unit translator
    translator: Arc<Translator>,

    /// Pause between search results
    result_delay: Duration,

    /// Pause between summary sentences
    sentence_delay: Duration,

    /// Generation of the most recent batch, per kind
    generations: [Arc<AtomicU64>; 3],
}

impl BatchTranslator {
    /// Create a batch translator with the configured pacing
    pub fn new(translator: Arc<Translator>, config: &TranslationConfig) -> Self {
        Self::with_delays(translator, config.result_delay(), config.sentence_delay())
    }

    pub fn with_delays(translator: Arc<Translator>, result_delay: Duration, sentence_delay: Duration) -> Self {
        Self {
            translator,
            result_delay,
            sentence_delay,
            generations: std::array::from_fn(|_| Arc::new(AtomicU64::new(0))),
        }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Start a new batch, superseding every earlier batch of the same kind
    pub fn begin(&self, kind: BatchKind) -> BatchTicket {
        let current = &self.generations[kind as usize];
        let generation = current.fetch_add(1, Ordering::SeqCst) + 1;
        BatchTicket {
            generation,
            current: current.clone(),
        }
    }

    /// Translate independent units in order
    ///
    /// A later `translate_units` call on the same translator supersedes this
    /// one; untranslated positions then keep their original text.
    pub async fn translate_units(
        &self,
        units: &[String],
        target_language: &str,
        source_language: &str,
        progress: Option<ProgressCallback<'_>>,
    ) -> Vec<String> {
        let ticket = self.begin(BatchKind::Units);
        self.units_with_ticket(&ticket, units, target_language, source_language, self.sentence_delay, progress).await
    }

    /// Translate a summary sentence by sentence and rejoin with single spaces
    ///
    /// Superseded only by a later summary (or response) translation, so it can
    /// run alongside `translate_results`.
    pub async fn translate_summary(&self, summary: &str, target_language: &str, source_language: &str) -> String {
        let ticket = self.begin(BatchKind::Summary);
        self.summary_with_ticket(&ticket, summary, target_language, source_language).await
    }

    /// Translate title and snippet of every result
    ///
    /// Superseded only by a later results (or response) translation.
    pub async fn translate_results(
        &self,
        results: &[SearchResult],
        target_language: &str,
        source_language: &str,
        progress: Option<ProgressCallback<'_>>,
    ) -> Vec<SearchResult> {
        let ticket = self.begin(BatchKind::Results);
        self.results_with_ticket(&ticket, results, target_language, source_language, progress).await
    }

    /// Translate a summary and its sources together; progress tracks the sources
    pub async fn translate_response(
        &self,
        response: &SearchResponse,
        target_language: &str,
        source_language: &str,
        progress: Option<ProgressCallback<'_>>,
    ) -> SearchResponse {
        let summary_ticket = self.begin(BatchKind::Summary);
        let results_ticket = self.begin(BatchKind::Results);
        let (summary, sources) = futures::join!(
            self.summary_with_ticket(&summary_ticket, &response.summary, target_language, source_language),
            self.results_with_ticket(&results_ticket, &response.sources, target_language, source_language, progress),
        );

        SearchResponse {
            summary,
            sources,
            extra: response.extra.clone(),
        }
    }

    async fn summary_with_ticket(
        &self,
        ticket: &BatchTicket,
        summary: &str,
        target_language: &str,
        source_language: &str,
    ) -> String {
        if !needs_translation(target_language, source_language) {
            return summary.to_string();
        }

        let sentences: Vec<String> = split_sentences(summary).map(str::to_string).collect();
        if sentences.is_empty() {
            return summary.to_string();
        }

        debug!("Translating summary as {} sentences", sentences.len());
        let translated = self.units_with_ticket(
            ticket,
            &sentences,
            target_language,
            source_language,
            self.sentence_delay,
            None,
        ).await;

        translated.join(" ")
    }

    async fn units_with_ticket(
        &self,
        ticket: &BatchTicket,
        units: &[String],
        target_language: &str,
        source_language: &str,
        delay: Duration,
        progress: Option<ProgressCallback<'_>>,
    ) -> Vec<String> {
        let mut tracker = ProgressTracker::new(progress, units.len());
        let mut translated = Vec::with_capacity(units.len());

        for (index, unit) in units.iter().enumerate() {
            if ticket.is_superseded() {
                debug!("Unit batch superseded at {} of {}", index + 1, units.len());
                translated.extend(units[index..].iter().cloned());
                break;
            }

            translated.push(self.translate_or_keep(unit, target_language, source_language).await);
            tracker.item_done();

            if index + 1 < units.len() {
                tokio::time::sleep(delay).await;
            }
        }

        translated
    }

    async fn results_with_ticket(
        &self,
        ticket: &BatchTicket,
        results: &[SearchResult],
        target_language: &str,
        source_language: &str,
        progress: Option<ProgressCallback<'_>>,
    ) -> Vec<SearchResult> {
        if !needs_translation(target_language, source_language) {
            return results.to_vec();
        }

        let start_time = Instant::now();
        let mut tracker = ProgressTracker::new(progress, results.len());
        let mut translated = Vec::with_capacity(results.len());

        for (index, result) in results.iter().enumerate() {
            if ticket.is_superseded() {
                info!("Result batch superseded after {} of {} results", index, results.len());
                translated.extend(results[index..].iter().cloned());
                break;
            }

            let (title, snippet) = futures::join!(
                self.translate_or_keep(&result.title, target_language, source_language),
                self.translate_or_keep(&result.snippet, target_language, source_language),
            );
            translated.push(result.with_text(title, snippet));
            tracker.item_done();

            if index + 1 < results.len() {
                tokio::time::sleep(self.result_delay).await;
            }
        }

        debug!("Translated {} results in {:?}", translated.len(), start_time.elapsed());
        translated
    }

    /// Translate one unit, falling back to the unit itself on failure
    async fn translate_or_keep(&self, text: &str, target_language: &str, source_language: &str) -> String {
        let request = TranslationRequest::new(text, target_language).from_language(source_language);

        match self.translator.try_translate(&request).await {
            Ok(outcome) => outcome.text,
            Err(e) => {
                warn!("Keeping original text for unit \"{}\": {}", preview(text), e);
                text.to_string()
            }
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > 40 {
        text.chars().take(40).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
