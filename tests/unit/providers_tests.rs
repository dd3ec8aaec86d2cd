/*!
 * Tests for the individual translation backends
 */

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use lumina_translate::errors::ProviderError;
use lumina_translate::providers::TranslationBackend;
use lumina_translate::providers::libre::{LibreTranslate, resolve_location};
use lumina_translate::providers::phrasebook::Phrasebook;
use lumina_translate::translation::TranslationRequest;
use crate::common::mock_transport::{MockTransport, ok_json, redirect, status};
use crate::common::PRIMARY_URL;

fn libre(transport: &Arc<MockTransport>) -> LibreTranslate {
    LibreTranslate::new("primary", PRIMARY_URL, "LuminaSearch/1.0", transport.clone())
}

fn deadline() -> Instant {
    Instant::now() + Duration::from_secs(1)
}

#[tokio::test]
async fn test_libreTranslate_withSuccess_shouldReturnTranslatedText() {
    let transport = Arc::new(MockTransport::new(|_| Ok(ok_json("Hola mundo"))));
    let request = TranslationRequest::new("Hello world", "es");

    let result = libre(&transport).translate(&request, deadline()).await;

    assert_eq!(result, Ok("Hola mundo".to_string()));
    assert!(libre(&transport).is_remote());
}

#[tokio::test]
async fn test_libreTranslate_withServerError_shouldReturnApiError() {
    let transport = Arc::new(MockTransport::new(|_| Ok(status(429, "Slow down"))));
    let request = TranslationRequest::new("Hello", "fr");

    let result = libre(&transport).translate(&request, deadline()).await;

    assert_eq!(result, Err(ProviderError::Api { status_code: 429, message: "Slow down".to_string() }));
}

#[tokio::test]
async fn test_libreTranslate_withLongErrorBody_shouldTruncateMessage() {
    let body = "x".repeat(500);
    let transport = Arc::new(MockTransport::new(move |_| Ok(status(500, &body))));
    let request = TranslationRequest::new("Hello", "fr");

    let Err(ProviderError::Api { message, .. }) = libre(&transport).translate(&request, deadline()).await else {
        panic!("expected an API error");
    };
    assert_eq!(message.chars().count(), 203);
    assert!(message.ends_with("..."));
}

#[tokio::test]
async fn test_libreTranslate_withMissingField_shouldReturnParseError() {
    let transport = Arc::new(MockTransport::new(|_| Ok(status(200, r#"{"detectedLanguage":"en"}"#))));
    let request = TranslationRequest::new("Hello", "fr");

    let result = libre(&transport).translate(&request, deadline()).await;

    assert!(matches!(result, Err(ProviderError::Parse(ref msg)) if msg.contains("translatedText")));
}

#[tokio::test]
async fn test_libreTranslate_withRedirectWithoutLocation_shouldFailWithoutFollowUp() {
    let transport = Arc::new(MockTransport::new(|_| Ok(redirect(307, None))));
    let request = TranslationRequest::new("Hello", "fr");

    let result = libre(&transport).translate(&request, deadline()).await;

    assert_eq!(result, Err(ProviderError::RedirectWithoutLocation { status_code: 307 }));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_libreTranslate_withRedirect_shouldResendSameBody() {
    let transport = Arc::new(MockTransport::new(|request| {
        if request.url == PRIMARY_URL {
            Ok(redirect(301, Some("https://mirror.test/translate")))
        } else {
            Ok(ok_json("Bonjour"))
        }
    }));
    let request = TranslationRequest::new("Hello", "fr");

    let result = libre(&transport).translate(&request, deadline()).await;

    assert_eq!(result, Ok("Bonjour".to_string()));
    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].url, "https://mirror.test/translate");
    assert_eq!(calls[0].body, calls[1].body);
}

#[test]
fn test_resolve_location_withQueryOnlyTarget_shouldKeepPath() {
    let resolved = resolve_location("https://libretranslate.de/translate", "?lang=fr").unwrap();
    assert_eq!(resolved, "https://libretranslate.de/translate?lang=fr");
}

#[tokio::test]
async fn test_phrasebook_asBackend_shouldBeLocalAndNamedOffline() {
    let phrasebook = Phrasebook::new();
    let request = TranslationRequest::new("How does renewable energy work?", "fr");

    let result = phrasebook.translate(&request, Instant::now()).await;

    assert_eq!(result, Ok("Comment énergie renouvelable work?".to_string()));
    assert_eq!(phrasebook.name(), "offline");
    assert!(!phrasebook.is_remote());
    assert!(Phrasebook::has_table("de"));
    assert!(!Phrasebook::has_table("it"));
}
