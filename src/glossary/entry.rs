/*!
 * Name entries.
 *
 * Persisted form is `{"original": "...", "translated": "..."}` with
 * `"checked": true` added only for verified local names. Scope is not part
 * of the stored JSON: it follows from the key a list is stored under.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which documents a name applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Only the novel it was extracted from
    #[default]
    Local,
    /// Every novel
    Global,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Local => write!(f, "local"),
            Scope::Global => write!(f, "global"),
        }
    }
}

/// A proper noun and its chosen translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    /// Source-language text exactly as it appears in raw chapters
    pub original: String,

    /// Chosen rendering in the target language
    pub translated: String,

    /// Human-verified (local names only)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub checked: bool,

    /// Local or global
    #[serde(skip)]
    pub scope: Scope,
}

impl NameEntry {
    /// Create an unchecked local entry
    pub fn local(original: impl Into<String>, translated: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            translated: translated.into(),
            checked: false,
            scope: Scope::Local,
        }
    }

    /// Create a global entry
    pub fn global(original: impl Into<String>, translated: impl Into<String>) -> Self {
        Self {
            scope: Scope::Global,
            ..Self::local(original, translated)
        }
    }

    /// Whether the entry is shared by every novel
    pub fn is_global(&self) -> bool {
        self.scope == Scope::Global
    }

    /// Whether the entry belongs to the verified set
    pub fn is_verified(&self) -> bool {
        self.checked || self.is_global()
    }

    /// Number of characters in the original name
    pub fn original_len(&self) -> usize {
        self.original.chars().count()
    }

    /// Number of characters in the translated name
    pub fn translated_len(&self) -> usize {
        self.translated.chars().count()
    }
}

/// A name pair proposed by the extraction model
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NameCandidate {
    /// Source-language name
    #[serde(default)]
    pub original: String,

    /// Proposed translation
    #[serde(default)]
    pub translated: String,
}

impl NameCandidate {
    /// Create a candidate
    pub fn new(original: impl Into<String>, translated: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            translated: translated.into(),
        }
    }
}
