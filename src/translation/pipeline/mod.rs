/*!
 * Chapter translation pipeline.
 *
 * A chapter goes through these steps:
 * 1. **Preparation**: known names substituted, numerals normalized
 * 2. **Translation Pass**: the whole chapter in one request
 * 3. **Extraction Pass**: new name pairs pulled from both texts and merged
 *    into the glossary
 * 4. **Rendering**: translated text with colored name spans
 *
 * A failed translation ends the chapter with an error panel. A failed
 * extraction is logged and reported, and the chapter still renders.
 */

use log::warn;
use std::sync::Arc;

use crate::errors::{ExtractionError, GlossaryError};
use crate::glossary::Glossary;
use crate::providers::Translator;
use crate::translation::chapter::{Chapter, ChapterState};
use crate::translation::render::ErrorPanel;

pub mod extraction_pass;
pub mod translation_pass;

pub use extraction_pass::{extract_names, parse_name_candidates, strip_code_fences};
pub use translation_pass::translate_chapter;

/// What the reader is shown for a chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterView {
    /// Translated chapter as HTML
    Rendered(String),
    /// Error block in place of the chapter
    Errored(ErrorPanel),
}

impl ChapterView {
    /// HTML for this view
    pub fn html(&self) -> String {
        match self {
            Self::Rendered(html) => html.clone(),
            Self::Errored(panel) => panel.to_html(),
        }
    }
}

/// Result of running one chapter through the pipeline
#[derive(Debug)]
pub struct ChapterOutcome {
    /// Rendered chapter or error panel
    pub view: ChapterView,
    /// Names merged into the glossary
    pub names_added: usize,
    /// Soft failure of the extraction pass, if any
    pub extraction_error: Option<ExtractionError>,
}

/// Runs chapters through translation, extraction and rendering
pub struct ChapterPipeline {
    translator: Arc<dyn Translator>,
}

impl ChapterPipeline {
    /// Create a pipeline over a translator
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    /// Translate `chapter`, merge the names found, and render it.
    ///
    /// Only glossary persistence failures are returned as errors.
    pub async fn run(
        &self,
        chapter: &mut Chapter,
        glossary: &mut Glossary,
    ) -> Result<ChapterOutcome, GlossaryError> {
        let input = chapter.prepare(glossary);

        chapter.set_state(ChapterState::Translating);
        let translated = match translate_chapter(self.translator.as_ref(), &input).await {
            Ok(text) => text,
            Err(panel) => {
                chapter.set_state(ChapterState::Errored);
                return Ok(ChapterOutcome {
                    view: ChapterView::Errored(panel),
                    names_added: 0,
                    extraction_error: None,
                });
            }
        };

        chapter.set_translation(translated.as_str());

        let (names_added, extraction_error) =
            match extract_names(self.translator.as_ref(), chapter.raw_content(), &translated).await {
                Ok(candidates) => (glossary.add_names(&candidates, chapter.raw_content()).await?, None),
                Err(e) => {
                    warn!("Error while extracting names: {}", e);
                    (0, Some(e))
                }
            };

        let html = chapter.render(glossary).unwrap_or_default();

        Ok(ChapterOutcome {
            view: ChapterView::Rendered(html),
            names_added,
            extraction_error,
        })
    }
}
