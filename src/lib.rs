/*!
 * # Lumina Translate
 *
 * Translation pipeline for search results and AI summaries.
 *
 * ## Features
 *
 * - Translate single text units through a chain of LibreTranslate endpoints
 * - Bounded retries with linear backoff and a per-attempt deadline
 * - Offline phrase approximation when every endpoint fails
 * - Sentence-by-sentence summary translation
 * - Ordered batch translation of search results with progress reporting
 * - Language metadata: display names, native names and text direction
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `search_result`: Search result and summary documents
 * - `translation`: Translation services:
 *   - `translation::segmenter`: Sentence splitting
 *   - `translation::core`: Single-unit translation and fallback chain
 *   - `translation::batch`: Batch processing of translations
 * - `providers`: Translation backends:
 *   - `providers::http`: HTTP transport
 *   - `providers::libre`: LibreTranslate client
 *   - `providers::phrasebook`: Offline approximation
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Language metadata and ISO code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod search_result;
pub mod translation;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use search_result::{SearchDocument, SearchResponse, SearchResult};
pub use translation::{BatchTranslator, TranslationOutcome, Translator};
pub use language_utils::{display_name, is_rtl, language_codes_match, native_name, normalize_to_part2t};
pub use errors::{AppError, ProviderError, TranslationError};
