/*!
 * Tests for the scripted translator
 */

use chapterglot::errors::ProviderError;
use chapterglot::providers::{MockTranslator, Translator};

#[tokio::test]
async fn test_scripted_shouldReplyInOrderThenEcho() {
    let translator = MockTranslator::scripted(vec![Ok("first".to_string()), Ok("second".to_string())]);

    assert_eq!(translator.translate("i", "a").await.unwrap(), "first");
    assert_eq!(translator.translate("i", "b").await.unwrap(), "second");
    assert_eq!(translator.translate("i", "c").await.unwrap(), "c");
    assert_eq!(translator.call_count(), 3);
}

#[tokio::test]
async fn test_calls_shouldRecordInstructionAndInput() {
    let translator = MockTranslator::echo();

    translator.translate("Translate", "你好").await.unwrap();

    let calls = translator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].instruction, "Translate");
    assert_eq!(calls[0].input, "你好");
}

#[tokio::test]
async fn test_failing_shouldReturnApiError() {
    let translator = MockTranslator::failing();

    let result = translator.translate("i", "a").await;

    assert!(matches!(result, Err(ProviderError::ApiError { status_code: 500, .. })));
}
