/*!
 * End-to-end chapter translation tests
 */

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chapterglot::errors::{ExtractionError, ProviderError};
use chapterglot::glossary::Glossary;
use chapterglot::providers::{Gemini, MockTranslator};
use chapterglot::translation::pipeline::translation_pass::{CHAPTER_ERROR_REASON, UNTRANSLATABLE_DETAILS};
use chapterglot::translation::prompts::{extraction_input, NAME_EXTRACTION_INSTRUCTION};
use chapterglot::translation::{Chapter, ChapterPipeline, ChapterState, ChapterView};

use crate::common::{init_test_logging, local, memory_store, seeded_glossary, RecordingSleeper, NOVEL_ID};

fn rendered(view: &ChapterView) -> &str {
    match view {
        ChapterView::Rendered(html) => html,
        ChapterView::Errored(panel) => panic!("Expected a rendered chapter, got {}", panel),
    }
}

#[tokio::test]
async fn test_run_shouldSendSubstitutedAndNormalizedText() {
    init_test_logging();
    let store = memory_store();
    let mut glossary = seeded_glossary(&store, &[local("张伟", "Zhang Wei")], &[]).await;
    let translator = Arc::new(MockTranslator::scripted(vec![
        Ok("Chapter 1\nHe is Zhang Wei. He has 50 million spirit stones.".to_string()),
        Ok("[]".to_string()),
    ]));
    let pipeline = ChapterPipeline::new(translator.clone());
    let mut chapter = Chapter::load("第一章", "第一章\n他是张伟。他有5000万灵石。");

    let outcome = pipeline.run(&mut chapter, &mut glossary).await.unwrap();

    let calls = translator.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].input, "第一章\n他是Zhang Wei。他有50 million灵石。");
    assert_eq!(outcome.names_added, 0);
    assert!(outcome.extraction_error.is_none());
    assert!(rendered(&outcome.view).contains(r#"data-original="张伟">Zhang Wei</span>"#));
    assert!(rendered(&outcome.view).starts_with("Chapter 1<br>He is "));
    assert_eq!(chapter.state(), ChapterState::Rendered);
}

#[tokio::test]
async fn test_run_withUntranslatableReply_shouldShowErrorPanel() {
    init_test_logging();
    let store = memory_store();
    let mut glossary = seeded_glossary(&store, &[], &[]).await;
    let translator = Arc::new(MockTranslator::scripted(vec![Ok(" [UNTRANSLATABLE]\n".to_string())]));
    let pipeline = ChapterPipeline::new(translator.clone());
    let mut chapter = Chapter::load("第一章", "他来了。");

    let outcome = pipeline.run(&mut chapter, &mut glossary).await.unwrap();

    match &outcome.view {
        ChapterView::Errored(panel) => {
            assert_eq!(panel.reason, CHAPTER_ERROR_REASON);
            assert_eq!(panel.details, UNTRANSLATABLE_DETAILS);
        }
        ChapterView::Rendered(html) => panic!("Expected an error panel, got {}", html),
    }
    assert!(outcome.view.html().contains("An error occurred"));
    assert_eq!(translator.call_count(), 1);
    assert_eq!(chapter.state(), ChapterState::Errored);
    assert_eq!(chapter.translated_content(), None);
}

#[tokio::test]
async fn test_run_withFailingTranslator_shouldCarryErrorDetails() {
    init_test_logging();
    let store = memory_store();
    let mut glossary = seeded_glossary(&store, &[], &[]).await;
    let pipeline = ChapterPipeline::new(Arc::new(MockTranslator::failing()));
    let mut chapter = Chapter::load("第一章", "他来了。");

    let outcome = pipeline.run(&mut chapter, &mut glossary).await.unwrap();

    let ChapterView::Errored(panel) = outcome.view else {
        panic!("Expected an error panel");
    };
    assert!(panel.details.contains("Simulated provider failure"));
}

#[tokio::test]
async fn test_run_shouldMergeExtractedNamesPresentInSource() {
    init_test_logging();
    let store = memory_store();
    let mut glossary = seeded_glossary(&store, &[local("张伟", "Zhang Wei")], &[]).await;
    let translator = Arc::new(MockTranslator::scripted(vec![
        Ok("Li Na met Zhang Wei.".to_string()),
        Ok(concat!(
            "```json\n",
            r#"[{"original":"李娜","translated":"Li Na"},{"original":"王五","translated":"Wang Wu"}]"#,
            "\n```"
        )
        .to_string()),
    ]));
    let pipeline = ChapterPipeline::new(translator.clone());
    let mut chapter = Chapter::load("第一章", "第一章\n李娜遇见了张伟。");

    let outcome = pipeline.run(&mut chapter, &mut glossary).await.unwrap();

    assert_eq!(outcome.names_added, 1);
    let html = rendered(&outcome.view);
    assert!(html.contains(r#"data-original="李娜">Li Na</span>"#));
    assert!(html.contains(r#"data-original="张伟">Zhang Wei</span>"#));

    let calls = translator.calls();
    assert_eq!(calls[1].instruction, NAME_EXTRACTION_INSTRUCTION);
    assert_eq!(
        calls[1].input,
        extraction_input("第一章\n李娜遇见了张伟。", "Li Na met Zhang Wei.")
    );

    let reloaded = Glossary::load(store, NOVEL_ID).await.unwrap();
    assert_eq!(reloaded.get_name("李娜").unwrap().translated, "Li Na");
    assert!(reloaded.get_name("王五").is_none());
}

#[tokio::test]
async fn test_run_withInvalidExtractionReply_shouldStillRender() {
    init_test_logging();
    let store = memory_store();
    let mut glossary = seeded_glossary(&store, &[], &[]).await;
    let translator = Arc::new(MockTranslator::scripted(vec![
        Ok("He came.".to_string()),
        Ok("No names here.".to_string()),
    ]));
    let pipeline = ChapterPipeline::new(translator);
    let mut chapter = Chapter::load("第一章", "第一章\n他来了。");

    let outcome = pipeline.run(&mut chapter, &mut glossary).await.unwrap();

    assert_eq!(rendered(&outcome.view), "He came.");
    assert!(matches!(outcome.extraction_error, Some(ExtractionError::InvalidJson(_))));
    assert!(glossary.is_empty());
}

#[tokio::test]
async fn test_run_withBlockedExtraction_shouldAddNothingQuietly() {
    init_test_logging();
    let store = memory_store();
    let mut glossary = seeded_glossary(&store, &[], &[]).await;
    let translator = Arc::new(MockTranslator::scripted(vec![
        Ok("He came.".to_string()),
        Err(ProviderError::MalformedResponse {
            reason: "missing text".to_string(),
            raw: r#"{"promptFeedback":{"blockReason":"PROHIBITED_CONTENT"}}"#.to_string(),
        }),
    ]));
    let pipeline = ChapterPipeline::new(translator);
    let mut chapter = Chapter::load("第一章", "第一章\n他来了。");

    let outcome = pipeline.run(&mut chapter, &mut glossary).await.unwrap();

    assert_eq!(outcome.names_added, 0);
    assert!(outcome.extraction_error.is_none());
}

#[tokio::test]
async fn test_run_withGemini_shouldTranslateAndExtract() {
    init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/model:generateContent"))
        .and(body_partial_json(json!({
            "systemInstruction": {"parts": [{"text": NAME_EXTRACTION_INSTRUCTION}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": r#"[{"original":"李娜","translated":"Li Na"}]"#}]}}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "Li Na smiled."}]}}]
        })))
        .mount(&server)
        .await;
    let gemini = Gemini::new("test-key", server.uri(), "model").with_sleeper(Arc::new(RecordingSleeper::default()));
    let store = memory_store();
    let mut glossary = seeded_glossary(&store, &[], &[]).await;
    let pipeline = ChapterPipeline::new(Arc::new(gemini));
    let mut chapter = Chapter::load("第一章", "第一章\n李娜笑了。");

    let outcome = pipeline.run(&mut chapter, &mut glossary).await.unwrap();

    assert_eq!(outcome.names_added, 1);
    assert!(rendered(&outcome.view).contains(r#"data-original="李娜">Li Na</span>"#));
}
