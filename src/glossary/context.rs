/*!
 * Context search over the ingested content log.
 *
 * A reviewer deciding how to render a name wants to see it used. The
 * search collects raw lines mentioning the name, longest first. When the
 * name itself is rare, the longest known name it contains takes over with
 * the remaining quota (lines already mentioning the containing name are
 * skipped), and so on down the chain until the quota is met or no shorter
 * name is left. Each step uses a strictly shorter name, so the walk ends.
 */

use std::fmt;

use crate::errors::GlossaryError;
use crate::storage::{self, keys};

use super::{Glossary, NameEntry};

/// Default number of context lines collected for a name
pub const DEFAULT_CONTEXT_SAMPLES: usize = 80;

/// One numbered line of context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLine {
    /// 1-based position, continuous across the whole packet
    pub index: usize,
    /// Raw line from the content log
    pub text: String,
    /// Name whose search produced the line
    pub matched: String,
}

/// Ranked context lines for one name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextPacket {
    /// Collected lines in output order
    pub lines: Vec<ContextLine>,
}

impl ContextPacket {
    /// Number of collected lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing was found
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for ContextPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .lines
            .iter()
            .map(|line| format!("Context {}: {}", line.index, line.text))
            .collect();
        write!(f, "{}", rendered.join("\n").trim())
    }
}

impl Glossary {
    /// Search this novel's content log for lines mentioning `name`
    pub async fn context(
        &self,
        name: &NameEntry,
        max_samples: usize,
    ) -> Result<ContextPacket, GlossaryError> {
        let contents: Vec<String> =
            storage::load_or_default(self.store().as_ref(), &keys::contents(self.novel_id())).await?;

        Ok(self.context_from_log(&contents, name, max_samples))
    }

    /// Context search over an already loaded content log
    pub fn context_from_log(
        &self,
        contents: &[String],
        name: &NameEntry,
        max_samples: usize,
    ) -> ContextPacket {
        let text = contents.join("\n");
        let lines: Vec<&str> = text.split('\n').filter(|l| !l.is_empty()).collect();

        let mut packet = ContextPacket::default();
        let mut current = name.clone();
        let mut excluded: Option<String> = None;
        let mut remaining = max_samples;

        while remaining > 0 {
            let mut found: Vec<&str> = lines
                .iter()
                .copied()
                .filter(|l| l.contains(current.original.as_str()))
                .filter(|l| excluded.as_deref().map_or(true, |parent| !l.contains(parent)))
                .collect();
            found.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

            for line in found.iter().take(remaining) {
                packet.lines.push(ContextLine {
                    index: packet.lines.len() + 1,
                    text: line.to_string(),
                    matched: current.original.clone(),
                });
            }

            if found.len() >= remaining {
                break;
            }
            remaining -= found.len();

            let mut children = self.child_names_unsafe(&current);
            children.sort_by(|a, b| b.original_len().cmp(&a.original_len()));

            let Some(child) = children.first().map(|c| (*c).clone()) else {
                break;
            };

            excluded = Some(std::mem::replace(&mut current, child).original);
        }

        packet
    }

    /// Build the disambiguation text a reviewer copies for `name`.
    ///
    /// Lists verified parent, child and similar names (each name at most
    /// once). When a copy template is set, the packet replaces `{DATA}` and
    /// the context lines replace `{CONTEXT}`.
    pub async fn review_packet(
        &self,
        name: &NameEntry,
        max_samples: usize,
    ) -> Result<String, GlossaryError> {
        let mut formatted = format!("{}\n\n", name.original);

        if self.is_child(name) {
            let section = format_section(&formatted, &self.parent_names(name));
            if !section.is_empty() {
                formatted.push_str(&format!("Parent names:\n{}\n", section));
            }
        }

        if self.is_parent(name) {
            let section = format_section(&formatted, &self.child_names(name));
            if !section.is_empty() {
                formatted.push_str(&format!("Child names:\n{}\n", section));
            }
        }

        let similar = self.similar_names(name);
        if !similar.is_empty() {
            let section = format_section(&formatted, &similar);
            if !section.is_empty() {
                formatted.push_str(&format!("Similar names:\n{}\n", section));
            }
        }

        if !self.copy_message().is_empty() {
            let context = self.context(name, max_samples).await?.to_string();
            formatted = self
                .copy_message()
                .replacen("{DATA}", &formatted, 1)
                .replacen("{CONTEXT}", &context, 1);
        }

        Ok(formatted.trim().to_string())
    }
}

/// `original: translated` lines for names not already listed in `existing`
fn format_section(existing: &str, names: &[&NameEntry]) -> String {
    names
        .iter()
        .filter(|n| !existing.contains(&format!("\n{}:", n.original)))
        .map(|n| format!("{}: {}\n", n.original, n.translated))
        .collect()
}
