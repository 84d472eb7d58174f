/*!
 * Title and synopsis translation tests
 */

use async_trait::async_trait;

use chapterglot::errors::ProviderError;
use chapterglot::providers::{MockTranslator, Translator};
use chapterglot::translation::prompts::InstructionKind;
use chapterglot::translation::translate_header;

use crate::common::{global, local, memory_store, seeded_glossary};

/// Fails title requests and echoes everything else
struct TitleRefuser;

#[async_trait]
impl Translator for TitleRefuser {
    async fn translate(&self, instruction: &str, input: &str) -> Result<String, ProviderError> {
        if instruction == InstructionKind::Title.instruction() {
            return Err(ProviderError::RequestFailed("connection reset".to_string()));
        }
        Ok(input.to_string())
    }
}

#[tokio::test]
async fn test_translateHeader_shouldSubstituteNamesInBothParts() {
    let store = memory_store();
    let glossary = seeded_glossary(&store, &[local("张伟", "Zhang Wei")], &[global("青云宗", "Azure Cloud Sect")]).await;
    let translator = MockTranslator::echo();

    let header = translate_header(&translator, &glossary, " 张伟传 ", "张伟加入了青云宗。").await;

    assert_eq!(header.title.unwrap(), "Zhang Wei传");
    assert_eq!(header.synopsis.unwrap(), "Zhang Wei加入了Azure Cloud Sect。");

    let mut instructions: Vec<String> = translator.calls().into_iter().map(|c| c.instruction).collect();
    instructions.sort();
    let mut expected = vec![
        InstructionKind::Title.instruction(),
        InstructionKind::Synopsis.instruction(),
    ];
    expected.sort();
    assert_eq!(instructions, expected);
}

#[tokio::test]
async fn test_translateHeader_withTitleFailure_shouldKeepSynopsis() {
    let store = memory_store();
    let glossary = seeded_glossary(&store, &[], &[]).await;

    let header = translate_header(&TitleRefuser, &glossary, "标题", "简介").await;

    assert!(matches!(header.title, Err(ProviderError::RequestFailed(_))));
    assert_eq!(header.synopsis.unwrap(), "简介");
}
