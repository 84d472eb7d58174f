/*!
 * Relationship inference between names.
 *
 * A name is a parent of another when the other's original is a strict
 * substring of it (`张伟` is a child of `张伟明`). Parent/child and
 * similarity queries only look at the verified set: checked local names
 * and every global name. `child_names_unsafe` ignores verification and is
 * only meant for context search.
 */

use super::{Glossary, NameEntry};

/// Share of `a`'s characters that also occur somewhere in `b`.
///
/// Membership is per character, not positional; repeated characters in `a`
/// each count. An empty `a` has no overlap.
pub fn letter_overlap_ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count();
    if total == 0 {
        return 0.0;
    }

    let shared = a.chars().filter(|c| b.contains(*c)).count();
    shared as f64 / total as f64
}

/// Whether two names share at least half their characters.
///
/// The ratio is computed from `a`'s side and, failing that, from `b`'s side,
/// so names of unequal length can match through the shorter one.
pub fn is_similar(a: &str, b: &str) -> bool {
    if letter_overlap_ratio(a, b) >= 0.5 {
        return true;
    }

    letter_overlap_ratio(b, a) >= 0.5
}

fn contains_strictly(outer: &str, inner: &str) -> bool {
    outer != inner && outer.contains(inner)
}

impl Glossary {
    /// Checked local names followed by all global names
    pub fn verified_names(&self) -> Vec<&NameEntry> {
        self.local_names()
            .iter()
            .filter(|n| n.checked)
            .chain(self.global_names().iter())
            .collect()
    }

    /// Whether some verified name contains `name`
    pub fn is_child(&self, name: &NameEntry) -> bool {
        self.verified_names()
            .iter()
            .any(|v| contains_strictly(&v.original, &name.original))
    }

    /// Whether `name` contains some verified name
    pub fn is_parent(&self, name: &NameEntry) -> bool {
        self.verified_names()
            .iter()
            .any(|v| contains_strictly(&name.original, &v.original))
    }

    /// Verified names that contain `name`
    pub fn parent_names(&self, name: &NameEntry) -> Vec<&NameEntry> {
        self.verified_names()
            .into_iter()
            .filter(|v| contains_strictly(&v.original, &name.original))
            .collect()
    }

    /// Verified names contained in `name`
    pub fn child_names(&self, name: &NameEntry) -> Vec<&NameEntry> {
        self.verified_names()
            .into_iter()
            .filter(|v| contains_strictly(&name.original, &v.original))
            .collect()
    }

    /// Any known names contained in `name`, verified or not
    pub fn child_names_unsafe(&self, name: &NameEntry) -> Vec<&NameEntry> {
        self.names()
            .into_iter()
            .filter(|n| contains_strictly(&name.original, &n.original))
            .collect()
    }

    /// Verified names sharing at least half their characters with `name`
    pub fn similar_names(&self, name: &NameEntry) -> Vec<&NameEntry> {
        self.verified_names()
            .into_iter()
            .filter(|v| v.original != name.original)
            .filter(|v| is_similar(&name.original, &v.original))
            .collect()
    }
}
