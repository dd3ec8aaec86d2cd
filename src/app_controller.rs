use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::search_result::{SearchDocument, SearchResult};
use crate::translation::{BatchTranslator, Translator};

// @module: Application controller for text and search result translation

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Batch translator over the configured provider chain
    batch: BatchTranslator,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let translator = Translator::from_config(&config.translation)
            .context("Failed to build translation provider chain")?;
        Ok(Self::with_translator(config, translator))
    }

    /// Create a controller around an already-built translator
    pub fn with_translator(config: Config, translator: Translator) -> Self {
        let batch = BatchTranslator::new(Arc::new(translator), &config.translation);
        Self { config, batch }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate free text as a summary, sentence by sentence
    pub async fn translate_text(&self, text: &str) -> String {
        self.batch.translate_summary(
            text,
            &self.config.target_language,
            &self.config.source_language,
        ).await
    }

    /// Translate a text file (or stdin) and write the result (or print it)
    pub async fn run_text(&self, input: &Path, output: &Path) -> Result<()> {
        let content = FileManager::read_input(input)?;
        let start_time = std::time::Instant::now();

        let translated = self.translate_text(content.trim_end()).await;
        FileManager::write_output(output, &translated)?;

        info!("Text translated in {}", Self::format_duration(start_time.elapsed()));
        Ok(())
    }

    /// Translate a search document given as JSON and return it as pretty JSON
    pub async fn translate_document(&self, content: &str, progress_bar: &ProgressBar) -> Result<String> {
        let document: SearchDocument = serde_json::from_str(content)
            .context("Input is neither a result list nor a search response")?;

        let target = &self.config.target_language;
        let source = &self.config.source_language;

        let pb = progress_bar.clone();
        let mut on_progress = move |percent: f64| pb.set_position(percent.round() as u64);

        let translated = match &document {
            SearchDocument::Results(results) => {
                let translated = self.batch.translate_results(results, target, source, Some(&mut on_progress)).await;
                Self::log_changes(results, &translated);
                SearchDocument::Results(translated)
            }
            SearchDocument::Response(response) => {
                let translated = self.batch.translate_response(response, target, source, Some(&mut on_progress)).await;
                Self::log_changes(&response.sources, &translated.sources);
                SearchDocument::Response(translated)
            }
        };

        serde_json::to_string_pretty(&translated).context("Failed to serialize translated document")
    }

    /// Run the `results` workflow and return the path written, if any
    pub async fn run_results(&self, input: &Path, output: Option<PathBuf>, force_overwrite: bool) -> Result<Option<PathBuf>> {
        let output = match output {
            Some(path) => path,
            None if FileManager::is_stdio(input) => PathBuf::from(crate::file_utils::STDIO_PATH),
            None => FileManager::generate_output_path(input, &self.config.target_language),
        };

        if !FileManager::is_stdio(&output) && output.exists() && !force_overwrite {
            warn!("Skipping {:?}, translation already exists (use -f to force overwrite)", output);
            return Ok(None);
        }

        let content = FileManager::read_input(input)?;
        let start_time = std::time::Instant::now();

        let progress_bar = Self::progress_bar(FileManager::is_stdio(&output));
        progress_bar.set_message("Translating");
        let translated = self.translate_document(&content, &progress_bar).await;
        progress_bar.finish_and_clear();

        FileManager::write_output(&output, &translated?)?;

        info!("Translation completed in {}.", Self::format_duration(start_time.elapsed()));
        if FileManager::is_stdio(&output) {
            Ok(None)
        } else {
            info!("Success: {}", output.display());
            Ok(Some(output))
        }
    }

    fn progress_bar(hidden: bool) -> ProgressBar {
        let progress_bar = ProgressBar::new(100);
        if hidden {
            progress_bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}% {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar
    }

    fn log_changes(original: &[SearchResult], translated: &[SearchResult]) {
        let changed = original.iter()
            .zip(translated)
            .filter(|(before, after)| before.title != after.title || before.snippet != after.snippet)
            .count();
        if changed < original.len() {
            warn!("{} of {} results kept their original text", original.len() - changed, original.len());
        } else {
            info!("Translated all {} results", original.len());
        }
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
