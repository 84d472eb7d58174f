/*!
 * Literal text replacement helpers.
 *
 * Glossary names and user-entered corrections are arbitrary strings, so
 * every pattern built from them goes through `escape_literal` and every
 * replacement is inserted verbatim (no `$1` expansion).
 */

use regex::{NoExpand, Regex};

/// Escape every regex metacharacter in `text`
pub fn escape_literal(text: &str) -> String {
    regex::escape(text)
}

/// Build a regex matching `needle` literally
pub fn literal_pattern(needle: &str) -> Regex {
    // An escaped literal is always a valid pattern
    Regex::new(&escape_literal(needle)).unwrap_or_else(|_| unreachable!("escaped literal must compile"))
}

/// Replace every occurrence of `needle` in `text` with `replacement`.
///
/// Matching is literal and case-sensitive. An empty needle leaves the text
/// unchanged.
pub fn replace_literal(text: &str, needle: &str, replacement: &str) -> String {
    if needle.is_empty() {
        return text.to_string();
    }

    literal_pattern(needle)
        .replace_all(text, NoExpand(replacement))
        .into_owned()
}

/// Escape text for use inside HTML element content or a quoted attribute
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}
