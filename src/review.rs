/*!
 * Human review of a translated chapter.
 *
 * A review session owns the glossary and the chapter currently shown, and
 * asks the operator for corrections through a `Prompter`. Every change is
 * persisted by the glossary right away and the chapter is re-rendered.
 * A declined or empty prompt aborts the operation without any change.
 */

use log::{debug, info};
use std::sync::Arc;

use crate::errors::GlossaryError;
use crate::glossary::{CheckOutcome, Glossary, NameEntry, Promotion, DEFAULT_CONTEXT_SAMPLES};
use crate::ingestion::IngestionQueue;
use crate::prompter::Prompter;
use crate::translation::Chapter;

/// Prompt for a corrected translation
pub const NEW_NAME_PROMPT: &str = "Enter new name";
/// Prompt for the source text of an operator-entered name
pub const ORIGINAL_NAME_PROMPT: &str = "Enter original name";
/// Prompt for the translation of an operator-entered name
pub const TRANSLATED_NAME_PROMPT: &str = "Enter translated name";
/// Prompt for the review packet template
pub const COPY_MESSAGE_PROMPT: &str = "Enter copy message ({DATA} and {CONTEXT} are replaced)";
/// Confirmation before deleting ingested content
pub const CLEAR_CONFIRMATION: &str = "Are you sure?";

/// Review operations over one chapter and its glossary
pub struct ReviewSession {
    glossary: Glossary,
    chapter: Option<Chapter>,
    prompter: Arc<dyn Prompter>,
    context_samples: usize,
    view: Option<String>,
}

impl ReviewSession {
    /// Start a session; `chapter` is the translated chapter being shown, if any
    pub fn new(glossary: Glossary, chapter: Option<Chapter>, prompter: Arc<dyn Prompter>) -> Self {
        let mut session = Self {
            glossary,
            chapter,
            prompter,
            context_samples: DEFAULT_CONTEXT_SAMPLES,
            view: None,
        };
        session.refresh();
        session
    }

    /// Change the number of context lines in review packets
    pub fn with_context_samples(mut self, samples: usize) -> Self {
        self.context_samples = samples;
        self
    }

    /// The glossary under review
    pub fn glossary(&self) -> &Glossary {
        &self.glossary
    }

    /// The chapter being shown
    pub fn chapter(&self) -> Option<&Chapter> {
        self.chapter.as_ref()
    }

    /// Latest rendering of the chapter
    pub fn view(&self) -> Option<&str> {
        self.view.as_deref()
    }

    /// Give back the glossary and chapter
    pub fn into_parts(self) -> (Glossary, Option<Chapter>) {
        (self.glossary, self.chapter)
    }

    fn refresh(&mut self) {
        if let Some(chapter) = self.chapter.as_mut() {
            self.view = chapter.render(&self.glossary);
        }
    }

    fn rename_in_chapter(&mut self, old_translated: &str, new_translated: &str) {
        if let Some(chapter) = self.chapter.as_mut() {
            chapter.edit_name(old_translated, new_translated);
        }
    }

    fn lookup(&self, original: &str) -> Result<NameEntry, GlossaryError> {
        self.glossary
            .get_name(original)
            .cloned()
            .ok_or_else(|| GlossaryError::UnknownName(original.to_string()))
    }

    /// Change the translation of a name
    pub async fn edit(&mut self, original: &str) -> Result<bool, GlossaryError> {
        let name = self.lookup(original)?;

        let Some(new_translated) = self.prompter.prompt(NEW_NAME_PROMPT, Some(&name.translated)) else {
            return Ok(false);
        };

        let previous = self.glossary.edit_name(original, &new_translated).await?;
        self.rename_in_chapter(&previous, &new_translated);
        self.refresh();

        Ok(true)
    }

    /// Forget a name
    pub async fn remove(&mut self, original: &str) -> Result<bool, GlossaryError> {
        let removed = self.glossary.remove_name(original).await?;
        self.refresh();
        Ok(removed)
    }

    /// Move a name between the novel's list and the global list.
    ///
    /// A local name may be corrected on the way.
    pub async fn promote(&mut self, original: &str) -> Result<Promotion, GlossaryError> {
        self.lookup(original)?;

        let correction = if self.glossary.is_global(original) {
            None
        } else {
            self.prompter.prompt(NEW_NAME_PROMPT, None)
        };

        let promotion = self
            .glossary
            .promote_to_global(original, correction.as_deref())
            .await?;

        if let (Promotion::Promoted { previous_translation: Some(previous) }, Some(corrected)) =
            (&promotion, &correction)
        {
            self.rename_in_chapter(previous, corrected);
        }
        self.refresh();

        Ok(promotion)
    }

    /// Toggle the verified flag of a local name, optionally correcting it
    pub async fn check(&mut self, original: &str) -> Result<CheckOutcome, GlossaryError> {
        let name = self.lookup(original)?;

        if self.glossary.is_global(original) {
            return Ok(CheckOutcome::Unchanged);
        }

        let correction = if name.checked {
            None
        } else {
            self.prompter.prompt(NEW_NAME_PROMPT, None)
        };

        let outcome = self
            .glossary
            .toggle_checked(original, correction.as_deref())
            .await?;

        if let (CheckOutcome::Checked { previous_translation: Some(previous) }, Some(corrected)) =
            (&outcome, &correction)
        {
            self.rename_in_chapter(previous, corrected);
        }
        self.refresh();

        Ok(outcome)
    }

    /// Add an operator-entered global name.
    ///
    /// An existing entry with the same original is replaced only after
    /// confirmation, and its translation is rewritten in the chapter.
    pub async fn new_name(&mut self) -> Result<bool, GlossaryError> {
        let Some(original) = self.prompter.prompt(ORIGINAL_NAME_PROMPT, None) else {
            return Ok(false);
        };
        let Some(translated) = self.prompter.prompt(TRANSLATED_NAME_PROMPT, None) else {
            return Ok(false);
        };

        if let Some(existing) = self.glossary.get_name(&original).cloned() {
            let question = format!("Erase previous name? ({})", existing.translated);
            if !self.prompter.confirm(&question) {
                debug!("Kept existing name '{}'", original);
                return Ok(false);
            }

            self.rename_in_chapter(&existing.translated, &translated);
            self.glossary.remove_name(&original).await?;
        }

        self.glossary.add_global_name(&original, &translated).await?;
        self.refresh();

        info!("Added global name '{}' -> '{}'", original, translated);
        Ok(true)
    }

    /// Disambiguation packet for a name, ready to paste elsewhere
    pub async fn copy(&self, original: &str) -> Result<String, GlossaryError> {
        let name = self.lookup(original)?;
        self.glossary.review_packet(&name, self.context_samples).await
    }

    /// Replace the review packet template
    pub async fn set_copy_message(&mut self) -> Result<bool, GlossaryError> {
        let current = self.glossary.copy_message().to_string();

        let Some(message) = self.prompter.prompt(COPY_MESSAGE_PROMPT, Some(&current)) else {
            return Ok(false);
        };

        self.glossary.set_copy_message(&message).await?;
        Ok(true)
    }

    /// Delete the novel's content log and pending links after confirmation
    pub async fn clear_ingested(&mut self) -> Result<bool, GlossaryError> {
        if !self.prompter.confirm(CLEAR_CONFIRMATION) {
            return Ok(false);
        }

        IngestionQueue::new(Arc::clone(self.glossary.store()), self.glossary.novel_id())
            .clear()
            .await?;

        Ok(true)
    }
}
