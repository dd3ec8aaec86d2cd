/*!
 * Offline approximation used when no remote endpoint answered.
 *
 * A handful of domain phrases are substituted whole-word and
 * case-insensitively. Languages without a table get the original text
 * behind a `[XX]` tag instead of an invented translation.
 */

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex, RegexBuilder};
use std::collections::HashMap;
use tokio::time::Instant;

use super::TranslationBackend;
use crate::errors::ProviderError;
use crate::translation::core::TranslationRequest;

// Order matters: multi-word phrases are replaced before the single words they contain.
const FRENCH: &[(&str, &str)] = &[
    ("What is", "Qu'est-ce que"),
    ("How does", "Comment"),
    ("artificial intelligence", "intelligence artificielle"),
    ("machine learning", "apprentissage automatique"),
    ("quantum computing", "informatique quantique"),
    ("climate change", "changement climatique"),
    ("renewable energy", "énergie renouvelable"),
    ("research", "recherche"),
    ("technology", "technologie"),
    ("computer", "ordinateur"),
    ("science", "science"),
    ("study", "étude"),
    ("analysis", "analyse"),
    ("development", "développement"),
    ("system", "système"),
    ("process", "processus"),
    ("method", "méthode"),
];

const SPANISH: &[(&str, &str)] = &[
    ("What is", "Qué es"),
    ("How does", "Cómo"),
    ("artificial intelligence", "inteligencia artificial"),
    ("machine learning", "aprendizaje automático"),
    ("quantum computing", "computación cuántica"),
    ("climate change", "cambio climático"),
    ("renewable energy", "energía renovable"),
    ("research", "investigación"),
    ("technology", "tecnología"),
    ("computer", "computadora"),
    ("science", "ciencia"),
    ("study", "estudio"),
    ("analysis", "análisis"),
    ("development", "desarrollo"),
    ("system", "sistema"),
    ("process", "proceso"),
    ("method", "método"),
];

const GERMAN: &[(&str, &str)] = &[
    ("What is", "Was ist"),
    ("How does", "Wie"),
    ("artificial intelligence", "künstliche Intelligenz"),
    ("machine learning", "maschinelles Lernen"),
    ("quantum computing", "Quantencomputing"),
    ("climate change", "Klimawandel"),
    ("renewable energy", "erneuerbare Energie"),
    ("research", "Forschung"),
    ("technology", "Technologie"),
    ("computer", "Computer"),
    ("science", "Wissenschaft"),
    ("study", "Studie"),
    ("analysis", "Analyse"),
    ("development", "Entwicklung"),
    ("system", "System"),
    ("process", "Prozess"),
    ("method", "Methode"),
];

type CompiledTable = Vec<(Regex, &'static str)>;

static TABLES: Lazy<HashMap<&'static str, CompiledTable>> = Lazy::new(|| {
    [("fr", FRENCH), ("es", SPANISH), ("de", GERMAN)]
        .into_iter()
        .map(|(code, table)| (code, compile(table)))
        .collect()
});

fn compile(table: &[(&str, &'static str)]) -> CompiledTable {
    table.iter()
        .filter_map(|(english, translated)| {
            RegexBuilder::new(&format!(r"\b{}\b", regex::escape(english)))
                .case_insensitive(true)
                .build()
                .ok()
                .map(|re| (re, *translated))
        })
        .collect()
}

/// Offline phrase-substitution backend
#[derive(Debug, Clone, Copy, Default)]
pub struct Phrasebook;

impl Phrasebook {
    pub fn new() -> Self {
        Self
    }

    /// Whether a substitution table exists for `language`
    pub fn has_table(language: &str) -> bool {
        TABLES.contains_key(language)
    }

    /// Approximate `text` in `language`.
    ///
    /// Fails with `NoMatch` when a table exists but none of its phrases occur,
    /// so callers never mistake the untouched input for a translation.
    pub fn approximate(&self, text: &str, language: &str) -> Result<String, ProviderError> {
        let Some(table) = TABLES.get(language) else {
            return Ok(format!("[{}] {}", language.to_uppercase(), text));
        };

        let mut translated = text.to_string();
        for (pattern, replacement) in table {
            if pattern.is_match(&translated) {
                translated = pattern.replace_all(&translated, NoExpand(*replacement)).into_owned();
            }
        }

        if translated == text {
            Err(ProviderError::NoMatch(language.to_string()))
        } else {
            Ok(translated)
        }
    }
}

#[async_trait]
impl TranslationBackend for Phrasebook {
    fn name(&self) -> &str {
        "offline"
    }

    fn is_remote(&self) -> bool {
        false
    }

    async fn translate(&self, request: &TranslationRequest, _deadline: Instant) -> Result<String, ProviderError> {
        self.approximate(&request.text, &request.target_language)
    }
}
