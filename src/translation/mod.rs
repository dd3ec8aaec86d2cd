/*!
 * Translation of text units, summaries and search results.
 *
 * - `segmenter`: Sentence splitting for summaries
 * - `core`: Single-unit translation with the provider fallback chain
 * - `batch`: Ordered batch translation with pacing and progress
 */

// Re-export main types for easier usage
pub use self::batch::{BatchKind, BatchTicket, BatchTranslator, ProgressCallback};
pub use self::core::{OutcomeSource, RetryPolicy, TranslationOutcome, TranslationRequest, Translator};
pub use self::segmenter::{Sentences, split_sentences};

// Submodules
pub mod batch;
pub mod core;
pub mod segmenter;
