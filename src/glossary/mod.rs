/*!
 * Glossary store for name consistency across chapters.
 *
 * The glossary owns two ordered lists of names: local names, scoped to one
 * novel, and global names, shared by every novel. Lookups walk local names
 * first, so a local entry shadows a global one with the same original.
 *
 * Every mutation is flushed to the injected store right away. Multi-step
 * operations (edit then promote, for example) are separate writes; a crash
 * between them leaves the first one persisted.
 *
 * - `entry`: name entry types
 * - `relations`: parent/child/similar queries over the verified set
 * - `context`: content-log search and review packets
 */

use log::{debug, info};
use std::sync::Arc;

use crate::errors::GlossaryError;
use crate::storage::{self, keys, KeyValueStore};
use crate::translation::text::replace_literal;

pub mod context;
pub mod entry;
pub mod relations;

pub use context::{ContextLine, ContextPacket, DEFAULT_CONTEXT_SAMPLES};
pub use entry::{NameCandidate, NameEntry, Scope};
pub use relations::{is_similar, letter_overlap_ratio};

/// Result of toggling a name between local and global
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Promotion {
    /// A global name went back to the novel's local list
    Demoted,
    /// A local name became global
    Promoted {
        /// Translation replaced by a correction, if one was given
        previous_translation: Option<String>,
    },
}

/// Result of toggling the verified flag of a local name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The name is now verified
    Checked {
        /// Translation replaced by a correction, if one was given
        previous_translation: Option<String>,
    },
    /// The name is no longer verified
    Unchecked,
    /// Global names are always verified and cannot be toggled
    Unchanged,
}

/// Name glossary for one novel plus the shared global names
pub struct Glossary {
    store: Arc<dyn KeyValueStore>,
    novel_id: String,
    local_names: Vec<NameEntry>,
    global_names: Vec<NameEntry>,
    copy_message: String,
}

impl Glossary {
    /// Load the glossary of `novel_id` from the store
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        novel_id: impl Into<String>,
    ) -> Result<Self, GlossaryError> {
        let novel_id = novel_id.into();

        let mut local_names: Vec<NameEntry> =
            storage::load_or_default(store.as_ref(), &keys::local_names(&novel_id)).await?;
        let mut global_names: Vec<NameEntry> =
            storage::load_or_default(store.as_ref(), keys::GLOBAL_NAMES).await?;
        let copy_message: String =
            storage::load_or_default(store.as_ref(), keys::COPY_MESSAGE).await?;

        for name in &mut local_names {
            name.scope = Scope::Local;
        }
        for name in &mut global_names {
            name.scope = Scope::Global;
            name.checked = false;
        }

        info!(
            "Loaded glossary for novel {}: {} local, {} global names",
            novel_id,
            local_names.len(),
            global_names.len()
        );

        Ok(Self {
            store,
            novel_id,
            local_names,
            global_names,
            copy_message,
        })
    }

    /// Novel this glossary is scoped to
    pub fn novel_id(&self) -> &str {
        &self.novel_id
    }

    /// The injected store
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// All names: local entries followed by global entries
    pub fn names(&self) -> Vec<&NameEntry> {
        self.local_names.iter().chain(self.global_names.iter()).collect()
    }

    /// Names scoped to this novel
    pub fn local_names(&self) -> &[NameEntry] {
        &self.local_names
    }

    /// Names shared by every novel
    pub fn global_names(&self) -> &[NameEntry] {
        &self.global_names
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.local_names.len() + self.global_names.len()
    }

    /// Whether the glossary has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First entry with the given original name
    pub fn get_name(&self, original: &str) -> Option<&NameEntry> {
        self.local_names
            .iter()
            .chain(self.global_names.iter())
            .find(|n| n.original == original)
    }

    /// Whether a global entry with this original exists
    pub fn is_global(&self, original: &str) -> bool {
        self.global_names.iter().any(|n| n.original == original)
    }

    /// Template applied by `review_packet`
    pub fn copy_message(&self) -> &str {
        &self.copy_message
    }

    fn find_mut(&mut self, original: &str) -> Option<&mut NameEntry> {
        self.local_names
            .iter_mut()
            .chain(self.global_names.iter_mut())
            .find(|n| n.original == original)
    }

    /// Flush local names, global names and the copy template
    pub async fn save(&self) -> Result<(), GlossaryError> {
        let store = self.store.as_ref();
        storage::save(store, &keys::local_names(&self.novel_id), &self.local_names).await?;
        storage::save(store, keys::GLOBAL_NAMES, &self.global_names).await?;
        storage::save(store, keys::COPY_MESSAGE, &self.copy_message).await?;
        Ok(())
    }

    /// Merge extracted names into the local list.
    ///
    /// A candidate is kept only if both fields are non-empty, no entry with
    /// the same original exists yet, and the original occurs literally in
    /// `source_text`. Rejected candidates are dropped without error.
    /// Returns the number of names inserted.
    pub async fn add_names(
        &mut self,
        candidates: &[NameCandidate],
        source_text: &str,
    ) -> Result<usize, GlossaryError> {
        let mut added = 0;

        for candidate in candidates {
            let original = candidate.original.as_str();
            let translated = candidate.translated.as_str();

            if original.is_empty() || translated.is_empty() {
                continue;
            }
            if self.get_name(original).is_some() {
                debug!("Skipping known name '{}'", original);
                continue;
            }
            if !source_text.contains(original) {
                debug!("Skipping name '{}' absent from source text", original);
                continue;
            }

            self.local_names.push(NameEntry::local(original, translated));
            added += 1;
        }

        self.save().await?;

        if added > 0 {
            info!("Added {} new names to novel {}", added, self.novel_id);
        }

        Ok(added)
    }

    /// Remove a name from whichever lists hold it
    pub async fn remove_name(&mut self, original: &str) -> Result<bool, GlossaryError> {
        let before = self.len();

        self.local_names.retain(|n| n.original != original);
        self.global_names.retain(|n| n.original != original);

        let removed = self.len() != before;
        self.save().await?;

        Ok(removed)
    }

    /// Change the translation of a name, returning the previous one
    pub async fn edit_name(
        &mut self,
        original: &str,
        new_translated: &str,
    ) -> Result<String, GlossaryError> {
        let entry = self
            .find_mut(original)
            .ok_or_else(|| GlossaryError::UnknownName(original.to_string()))?;

        let previous = std::mem::replace(&mut entry.translated, new_translated.to_string());
        self.save().await?;

        debug!("Renamed '{}': '{}' -> '{}'", original, previous, new_translated);
        Ok(previous)
    }

    /// Toggle a name between local and global.
    ///
    /// A global name is moved back to this novel's local list. A local name
    /// optionally takes `corrected` as its translation, loses its verified
    /// flag and moves to the global list. The edit and the move are two
    /// separate writes.
    pub async fn promote_to_global(
        &mut self,
        original: &str,
        corrected: Option<&str>,
    ) -> Result<Promotion, GlossaryError> {
        if let Some(position) = self.global_names.iter().position(|n| n.original == original) {
            let mut entry = self.global_names.remove(position);
            entry.scope = Scope::Local;
            entry.checked = false;
            self.local_names.push(entry);
            self.save().await?;
            return Ok(Promotion::Demoted);
        }

        if !self.local_names.iter().any(|n| n.original == original) {
            return Err(GlossaryError::UnknownName(original.to_string()));
        }

        let previous_translation = match corrected.filter(|c| !c.is_empty()) {
            Some(correction) => Some(self.edit_name(original, correction).await?),
            None => None,
        };

        let position = self
            .local_names
            .iter()
            .position(|n| n.original == original)
            .ok_or_else(|| GlossaryError::UnknownName(original.to_string()))?;
        let mut entry = self.local_names.remove(position);
        entry.checked = false;
        entry.scope = Scope::Global;
        self.global_names.push(entry);
        self.save().await?;

        info!("Promoted '{}' to global names", original);
        Ok(Promotion::Promoted { previous_translation })
    }

    /// Toggle the verified flag of a local name.
    ///
    /// Checking a name optionally applies `corrected` first. Global names
    /// are left untouched.
    pub async fn toggle_checked(
        &mut self,
        original: &str,
        corrected: Option<&str>,
    ) -> Result<CheckOutcome, GlossaryError> {
        if self.is_global(original) {
            return Ok(CheckOutcome::Unchanged);
        }

        let entry = self
            .local_names
            .iter_mut()
            .find(|n| n.original == original)
            .ok_or_else(|| GlossaryError::UnknownName(original.to_string()))?;

        if entry.checked {
            entry.checked = false;
            self.save().await?;
            return Ok(CheckOutcome::Unchecked);
        }

        let previous_translation = corrected
            .filter(|c| !c.is_empty())
            .map(|c| std::mem::replace(&mut entry.translated, c.to_string()));
        entry.checked = true;
        self.save().await?;

        Ok(CheckOutcome::Checked { previous_translation })
    }

    /// Insert an operator-entered name into the global list.
    ///
    /// The caller is responsible for removing a previous entry with the
    /// same original first.
    pub async fn add_global_name(
        &mut self,
        original: &str,
        translated: &str,
    ) -> Result<(), GlossaryError> {
        self.global_names.push(NameEntry::global(original, translated));
        self.save().await
    }

    /// Replace the review packet template
    pub async fn set_copy_message(&mut self, message: &str) -> Result<(), GlossaryError> {
        self.copy_message = message.to_string();
        self.save().await
    }

    /// Replace every known original name in `text` by its translation.
    ///
    /// Longer originals go first so a short name never splits a longer
    /// one that contains it.
    pub fn substitute(&self, text: &str) -> String {
        let mut names = self.names();
        names.sort_by(|a, b| b.original_len().cmp(&a.original_len()));

        names.iter().fold(text.to_string(), |content, name| {
            replace_literal(&content, &name.original, &name.translated)
        })
    }
}
