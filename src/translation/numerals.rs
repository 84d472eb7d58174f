/*!
 * Numeral normalization.
 *
 * Chinese web novels write large quantities as `<digits><magnitude>`, e.g.
 * `5000万` for fifty million. The model handles these poorly, so they are
 * rewritten into English magnitude words before translation.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Magnitude characters and their multipliers, in processing order
pub const MAGNITUDES: [(char, f64); 6] = [
    ('十', 10.0),
    ('百', 100.0),
    ('千', 1_000.0),
    ('万', 10_000.0),
    ('亿', 100_000_000.0),
    ('兆', 1_000_000_000_000.0),
];

/// Long-scale unit names, largest first
const UNITS: [(f64, &str); 11] = [
    (1e33, "decillion"),
    (1e30, "nonillion"),
    (1e27, "octillion"),
    (1e24, "septillion"),
    (1e21, "sextillion"),
    (1e18, "quintillion"),
    (1e15, "quadrillion"),
    (1e12, "trillion"),
    (1e9, "billion"),
    (1e6, "million"),
    (1e3, "thousand"),
];

static PATTERNS: Lazy<Vec<(Regex, f64)>> = Lazy::new(|| {
    MAGNITUDES
        .iter()
        .map(|(c, value)| {
            let pattern = Regex::new(&format!("[0-9]+{}", c))
                .unwrap_or_else(|_| unreachable!("magnitude pattern must compile"));
            (pattern, *value)
        })
        .collect()
});

/// Render a value with the largest English unit that does not exceed it.
///
/// The quotient keeps two decimals with a trailing `.00` removed; values
/// below one thousand are printed as plain numbers.
pub fn format_magnitude(value: f64) -> String {
    for (unit, label) in UNITS {
        if value >= unit {
            let quotient = format!("{:.2}", value / unit);
            let quotient = quotient.strip_suffix(".00").unwrap_or(&quotient);
            return format!("{} {}", quotient, label);
        }
    }

    format!("{}", value)
}

/// Rewrite every `<digits><magnitude>` expression in `text`.
///
/// Magnitudes are handled one after the other in the order of `MAGNITUDES`.
/// Stacked magnitudes do not compose: once `3千` became `3 thousand`, the
/// following `万` no longer has digits in front of it. Expressions too large
/// to represent are left as written.
pub fn normalize_numerals(text: &str) -> String {
    let mut content = text.to_string();

    for (pattern, multiplier) in PATTERNS.iter() {
        if !pattern.is_match(&content) {
            continue;
        }

        content = pattern
            .replace_all(&content, |caps: &Captures| {
                let expression = &caps[0];
                let digits = expression.trim_end_matches(|c: char| !c.is_ascii_digit());
                match digits.parse::<f64>().map(|number| number * multiplier) {
                    Ok(value) if value.is_finite() => format_magnitude(value),
                    _ => expression.to_string(),
                }
            })
            .into_owned();
    }

    content
}
