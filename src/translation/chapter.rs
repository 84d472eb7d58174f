/*!
 * Chapter value threaded through translation, review and rendering.
 */

use log::debug;

use crate::glossary::Glossary;
use crate::translation::numerals::normalize_numerals;
use crate::translation::render::render_chapter;
use crate::translation::text::replace_literal;

/// Where a chapter is in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterState {
    /// Raw text loaded
    Loaded,
    /// Known names replaced in the request text
    Substituted,
    /// Numerals rewritten in the request text
    Normalized,
    /// Waiting for the translation
    Translating,
    /// Waiting for extracted names
    NameExtraction,
    /// Translation rendered as HTML
    Rendered,
    /// Translation failed; the view is an error panel
    Errored,
}

/// One chapter being translated
#[derive(Debug, Clone)]
pub struct Chapter {
    title: String,
    raw_content: String,
    translated_content: Option<String>,
    state: ChapterState,
}

impl Chapter {
    /// Build a chapter from its title and body text.
    ///
    /// The body is trimmed. When its first line neither contains the title
    /// nor is contained in it, the title is prepended as its own line.
    pub fn load(title: &str, body: &str) -> Self {
        let title = title.trim();
        let body = body.trim();
        let first_line = body.lines().next().unwrap_or("");

        let raw_content = if !first_line.contains(title) && !title.contains(first_line.trim()) {
            debug!("Prepending chapter title '{}'", title);
            format!("{}\n{}", title, body)
        } else {
            body.to_string()
        };

        Self {
            title: title.to_string(),
            raw_content,
            translated_content: None,
            state: ChapterState::Loaded,
        }
    }

    /// Build a chapter from an already translated text, for review runs
    pub fn with_translation(title: &str, body: &str, translated: impl Into<String>) -> Self {
        let mut chapter = Self::load(title, body);
        chapter.set_translation(translated);
        chapter
    }

    /// Chapter title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Source text, title line included
    pub fn raw_content(&self) -> &str {
        &self.raw_content
    }

    /// Model translation, once received
    pub fn translated_content(&self) -> Option<&str> {
        self.translated_content.as_deref()
    }

    /// Current pipeline state
    pub fn state(&self) -> ChapterState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: ChapterState) {
        self.state = state;
    }

    /// Request text: known names substituted, longest first, then numerals
    /// normalized
    pub fn prepare(&mut self, glossary: &Glossary) -> String {
        let substituted = glossary.substitute(&self.raw_content);
        self.state = ChapterState::Substituted;

        let normalized = normalize_numerals(&substituted);
        self.state = ChapterState::Normalized;

        normalized
    }

    /// Store the model's translation
    pub fn set_translation(&mut self, translated: impl Into<String>) {
        self.translated_content = Some(translated.into());
        self.state = ChapterState::NameExtraction;
    }

    /// Replace a renamed translation everywhere in the translated text.
    ///
    /// Does nothing before a translation exists.
    pub fn edit_name(&mut self, old_translated: &str, new_translated: &str) {
        if let Some(content) = self.translated_content.as_mut() {
            *content = replace_literal(content, old_translated, new_translated);
        }
    }

    /// Render the translation with the glossary's current names
    pub fn render(&mut self, glossary: &Glossary) -> Option<String> {
        let html = render_chapter(self.translated_content.as_deref()?, glossary);
        self.state = ChapterState::Rendered;
        Some(html)
    }
}
