/*!
 * Translation pass for whole chapters.
 *
 * The request text has already been through name substitution and
 * numeral normalization. A failed request or an `[UNTRANSLATABLE]` reply
 * becomes an error panel in place of the chapter.
 */

use log::{error, info};

use crate::providers::Translator;
use crate::translation::prompts::{is_untranslatable, InstructionKind};
use crate::translation::render::ErrorPanel;

/// Panel reason for a failed chapter translation
pub const CHAPTER_ERROR_REASON: &str = "Error while translating novel chapter";

/// Panel details for an untranslatable chapter
pub const UNTRANSLATABLE_DETAILS: &str = "Model could not translate the chapter";

/// Translate a prepared chapter text
pub async fn translate_chapter(translator: &dyn Translator, input: &str) -> Result<String, ErrorPanel> {
    let instruction = InstructionKind::Chapter.instruction();

    match translator.translate(&instruction, input).await {
        Ok(reply) if is_untranslatable(&reply) => {
            error!("{}: {}", CHAPTER_ERROR_REASON, UNTRANSLATABLE_DETAILS);
            Err(ErrorPanel::new(CHAPTER_ERROR_REASON, UNTRANSLATABLE_DETAILS))
        }
        Ok(reply) => {
            info!("Chapter translated ({} characters)", reply.chars().count());
            Ok(reply)
        }
        Err(e) => {
            error!("{}: {}", CHAPTER_ERROR_REASON, e);
            Err(ErrorPanel::new(CHAPTER_ERROR_REASON, e))
        }
    }
}
