/*!
 * Novel title and synopsis translation.
 */

use log::error;

use crate::errors::ProviderError;
use crate::glossary::Glossary;
use crate::providers::Translator;
use crate::translation::prompts::InstructionKind;

/// Translated novel header; each part succeeds or fails on its own
#[derive(Debug)]
pub struct HeaderTranslation {
    /// Translated title
    pub title: Result<String, ProviderError>,
    /// Translated synopsis
    pub synopsis: Result<String, ProviderError>,
}

/// Translate a novel's title and synopsis concurrently.
///
/// Known names are substituted in both texts before the requests go out.
pub async fn translate_header(
    translator: &dyn Translator,
    glossary: &Glossary,
    title: &str,
    synopsis: &str,
) -> HeaderTranslation {
    let title_input = glossary.substitute(title.trim());
    let synopsis_input = glossary.substitute(synopsis.trim());

    let title_instruction = InstructionKind::Title.instruction();
    let synopsis_instruction = InstructionKind::Synopsis.instruction();

    let (title, synopsis) = futures::join!(
        translator.translate(&title_instruction, &title_input),
        translator.translate(&synopsis_instruction, &synopsis_input)
    );

    if let Err(e) = &title {
        error!("Error while translating novel title: {}", e);
    }
    if let Err(e) = &synopsis {
        error!("Error while translating novel synopsis: {}", e);
    }

    HeaderTranslation { title, synopsis }
}
