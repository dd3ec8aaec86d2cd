/*!
 * Tests for batch translation of units, summaries and search results
 */

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use lumina_translate::app_config::TranslationConfig;
use lumina_translate::search_result::{SearchResponse, SearchResult};
use lumina_translate::translation::{BatchKind, BatchTranslator, Translator};
use crate::common::mock_transport::{MockTransport, ok_json, status};
use crate::common::test_translation_config;

/// Echoes every unit back with a language prefix
fn prefixing_transport() -> Arc<MockTransport> {
    Arc::new(MockTransport::new(|request| {
        let text = request.body["q"].as_str().unwrap_or_default();
        let target = request.body["target"].as_str().unwrap_or_default();
        Ok(ok_json(&format!("{}:{}", target, text)))
    }))
}

fn batch_with(config: &TranslationConfig, transport: &Arc<MockTransport>) -> BatchTranslator {
    let translator = Translator::with_transport(config, transport.clone());
    BatchTranslator::new(Arc::new(translator), config)
}

fn three_results() -> Vec<SearchResult> {
    let mut second = SearchResult::new("Second title", "https://two.example", "Second result");
    second.extra.insert("rank".to_string(), json!(2));
    vec![
        SearchResult::new("Hello world", "https://one.example", "First result").with_display_url("one.example"),
        second,
        SearchResult::new("Third title", "https://three.example", "Third result"),
    ]
}

#[tokio::test]
async fn test_translate_results_withFailingItem_shouldKeepItsOriginalContent() {
    let transport = Arc::new(MockTransport::new(|request| {
        let text = request.body["q"].as_str().unwrap_or_default();
        if text.starts_with("Second") {
            Ok(status(503, "Service Unavailable"))
        } else {
            Ok(ok_json(&format!("es:{}", text)))
        }
    }));
    let batch = batch_with(&test_translation_config(), &transport);
    let input = three_results();

    let mut progress = Vec::new();
    let mut on_progress = |percent: f64| progress.push(percent);
    let output = batch.translate_results(&input, "es", "en", Some(&mut on_progress)).await;

    assert_eq!(output.len(), 3);
    assert_eq!(output[0].title, "es:Hello world");
    assert_eq!(output[0].snippet, "es:First result");
    assert_eq!(output[1], input[1]);
    assert_eq!(output[2].title, "es:Third title");
    assert_eq!(output[2].snippet, "es:Third result");

    assert_eq!(progress.len(), 3);
    assert!(progress.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!((progress[0] - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(progress[2], 100.0);
}

#[tokio::test]
async fn test_translate_results_shouldPreserveEverythingButTitleAndSnippet() {
    let transport = prefixing_transport();
    let batch = batch_with(&test_translation_config(), &transport);
    let input = three_results();

    let output = batch.translate_results(&input, "fr", "en", None).await;

    for (before, after) in input.iter().zip(&output) {
        assert_eq!(before.url, after.url);
        assert_eq!(before.display_url, after.display_url);
        assert_eq!(before.extra, after.extra);
        assert_ne!(before.title, after.title);
    }
    assert_eq!(output[0].display_url(), Some("one.example"));
    assert_eq!(output[1].extra.get("rank"), Some(&json!(2)));
}

#[tokio::test]
async fn test_translate_results_shouldFinishEachRecordBeforeTheNext() {
    let transport = prefixing_transport();
    let batch = batch_with(&test_translation_config(), &transport);

    batch.translate_results(&three_results(), "de", "en", None).await;

    let texts: Vec<String> = transport.calls().iter().map(|c| c.text().to_string()).collect();
    assert_eq!(texts.len(), 6);
    let position = |needle: &str| texts.iter().position(|t| t == needle).unwrap();
    assert!(position("First result") < position("Second title"));
    assert!(position("Second result") < position("Third title"));
}

#[tokio::test]
async fn test_translate_results_withSameLanguage_shouldReturnInputWithoutCalls() {
    let transport = prefixing_transport();
    let batch = batch_with(&test_translation_config(), &transport);
    let input = three_results();

    let output = batch.translate_results(&input, "en", "en", None).await;

    assert_eq!(output, input);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_translate_units_withEmptyInput_shouldNotReportProgress() {
    let transport = prefixing_transport();
    let batch = batch_with(&test_translation_config(), &transport);

    let mut calls = 0;
    let mut on_progress = |_: f64| calls += 1;
    let output = batch.translate_units(&[], "fr", "en", Some(&mut on_progress)).await;

    assert!(output.is_empty());
    assert_eq!(calls, 0);
}

#[tokio::test]
async fn test_translate_units_shouldReportOncePerUnitEndingAtHundred() {
    let transport = prefixing_transport();
    let batch = batch_with(&test_translation_config(), &transport);
    let units: Vec<String> = (1..=7).map(|i| format!("Unit {}", i)).collect();

    let mut progress = Vec::new();
    let mut on_progress = |percent: f64| progress.push(percent);
    let output = batch.translate_units(&units, "fr", "en", Some(&mut on_progress)).await;

    assert_eq!(output.len(), units.len());
    assert_eq!(output[6], "fr:Unit 7");
    assert_eq!(progress.len(), 7);
    assert_eq!(progress.last().copied(), Some(100.0));
    assert!(progress.iter().all(|p| (0.0..=100.0).contains(p)));
}

#[tokio::test]
async fn test_translate_summary_shouldTranslateSentencesInOrderAndJoinWithSpaces() {
    let transport = prefixing_transport();
    let batch = batch_with(&test_translation_config(), &transport);

    let output = batch.translate_summary("Rust is fast [1].\n\nIt is also safe! Why?", "es", "en").await;

    assert_eq!(output, "es:Rust is fast [1]. es:It is also safe! es:Why?");
    let texts: Vec<String> = transport.calls().iter().map(|c| c.text().to_string()).collect();
    assert_eq!(texts, vec!["Rust is fast [1].", "It is also safe!", "Why?"]);
}

#[tokio::test]
async fn test_translate_summary_withSameLanguage_shouldReturnInputUnchanged() {
    let transport = prefixing_transport();
    let batch = batch_with(&test_translation_config(), &transport);
    let summary = "Hello.   Spacing  is kept.";

    let output = batch.translate_summary(summary, "EN", "en").await;

    assert_eq!(output, summary);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_translate_summary_withFailingSentence_shouldKeepThatSentence() {
    let transport = Arc::new(MockTransport::new(|request| {
        let text = request.body["q"].as_str().unwrap_or_default();
        if text == "Keep me." {
            Ok(status(500, "boom"))
        } else {
            Ok(ok_json(&format!("fr:{}", text)))
        }
    }));
    let batch = batch_with(&test_translation_config(), &transport);

    let output = batch.translate_summary("First one. Keep me. Last one.", "fr", "en").await;

    assert_eq!(output, "fr:First one. Keep me. fr:Last one.");
}

#[tokio::test]
async fn test_translate_response_shouldTranslateSummaryAndSources() {
    let transport = prefixing_transport();
    let batch = batch_with(&test_translation_config(), &transport);
    let mut response = SearchResponse {
        summary: "One. Two.".to_string(),
        sources: three_results(),
        extra: Default::default(),
    };
    response.extra.insert("query".to_string(), json!("rust"));

    let mut progress = Vec::new();
    let mut on_progress = |percent: f64| progress.push(percent);
    let output = batch.translate_response(&response, "it", "en", Some(&mut on_progress)).await;

    assert_eq!(output.summary, "it:One. it:Two.");
    assert_eq!(output.sources.len(), 3);
    assert_eq!(output.sources[2].snippet, "it:Third result");
    assert_eq!(output.extra.get("query"), Some(&json!("rust")));
    assert_eq!(progress.last().copied(), Some(100.0));
}

#[tokio::test]
async fn test_begin_withNewerBatch_shouldSupersedeRunningOne() {
    let transport = Arc::new(
        MockTransport::new(|request| {
            let text = request.body["q"].as_str().unwrap_or_default();
            Ok(ok_json(&format!("fr:{}", text)))
        })
        .with_delay(Duration::from_millis(100)),
    );
    let batch = batch_with(&test_translation_config(), &transport);
    let units: Vec<String> = vec!["One".into(), "Two".into(), "Three".into()];

    let mut progress = Vec::new();
    let mut on_progress = |percent: f64| progress.push(percent);
    let (output, newer) = futures::join!(
        batch.translate_units(&units, "fr", "en", Some(&mut on_progress)),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            batch.begin(BatchKind::Units)
        },
    );

    assert!(!newer.is_superseded());
    assert_eq!(output, vec!["fr:One", "Two", "Three"]);
    assert_eq!(transport.call_count(), 1);
    assert_eq!(progress.len(), 1);
}

#[tokio::test]
async fn test_begin_withOtherKind_shouldNotSupersedeRunningBatch() {
    let transport = Arc::new(
        MockTransport::new(|request| {
            let text = request.body["q"].as_str().unwrap_or_default();
            Ok(ok_json(&format!("fr:{}", text)))
        })
        .with_delay(Duration::from_millis(50)),
    );
    let batch = batch_with(&test_translation_config(), &transport);
    let units: Vec<String> = vec!["One".into(), "Two".into()];

    let (output, other) = futures::join!(
        batch.translate_units(&units, "fr", "en", None),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            (batch.begin(BatchKind::Summary), batch.begin(BatchKind::Results))
        },
    );

    assert_eq!(output, vec!["fr:One", "fr:Two"]);
    assert!(!other.0.is_superseded());
    assert!(!other.1.is_superseded());
}

#[tokio::test(start_paused = true)]
async fn test_translate_summary_andResults_whenJoined_shouldBothTranslateFully() {
    let transport = Arc::new(
        MockTransport::new(|request| {
            let text = request.body["q"].as_str().unwrap_or_default();
            Ok(ok_json(&format!("es:{}", text)))
        })
        .with_delay(Duration::from_millis(10)),
    );
    let batch = batch_with(&test_translation_config(), &transport);
    let input = three_results();

    let (summary, results) = futures::join!(
        batch.translate_summary("One. Two. Three.", "es", "en"),
        batch.translate_results(&input, "es", "en", None),
    );

    assert_eq!(summary, "es:One. es:Two. es:Three.");
    assert!(results.iter().all(|result| result.title.starts_with("es:") && result.snippet.starts_with("es:")));
    assert_eq!(transport.call_count(), 9);
}

#[tokio::test(start_paused = true)]
async fn test_translate_results_shouldPauseOnlyBetweenResults() {
    let config = TranslationConfig {
        result_delay_ms: 200,
        ..test_translation_config()
    };
    let transport = prefixing_transport();
    let batch = batch_with(&config, &transport);

    let start = tokio::time::Instant::now();
    let output = batch.translate_results(&three_results(), "fr", "en", None).await;
    let elapsed = start.elapsed();

    assert_eq!(output.len(), 3);
    assert!(elapsed >= Duration::from_millis(400), "paced too little: {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(600), "slept after the last result: {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_translate_summary_shouldPauseOnlyBetweenSentences() {
    let config = TranslationConfig {
        sentence_delay_ms: 100,
        ..test_translation_config()
    };
    let transport = prefixing_transport();
    let batch = batch_with(&config, &transport);

    let start = tokio::time::Instant::now();
    let output = batch.translate_summary("One. Two. Three.", "fr", "en").await;

    let elapsed = start.elapsed();

    assert_eq!(output, "fr:One. fr:Two. fr:Three.");
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_millis(300), "slept after the last sentence: {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_translate_results_shouldTranslateTitleAndSnippetConcurrently() {
    let delay = Duration::from_millis(100);
    let transport = Arc::new(
        MockTransport::new(|request| {
            let text = request.body["q"].as_str().unwrap_or_default();
            Ok(ok_json(&format!("de:{}", text)))
        })
        .with_delay(delay),
    );
    let batch = batch_with(&test_translation_config(), &transport);
    let input = vec![SearchResult::new("Title", "https://one.example", "Snippet")];

    let start = tokio::time::Instant::now();
    let output = batch.translate_results(&input, "de", "en", None).await;
    let elapsed = start.elapsed();

    assert_eq!(output[0].title, "de:Title");
    assert_eq!(output[0].snippet, "de:Snippet");
    assert!(elapsed >= delay);
    assert!(elapsed < delay * 2, "title and snippet ran one after another: {:?}", elapsed);
}
