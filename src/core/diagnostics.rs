use std::sync::LazyLock;

use regex::Regex;

use crate::constants::DIAGNOSTIC_PATTERN;

static DIAGNOSTIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DIAGNOSTIC_PATTERN).expect("diagnostic pattern is valid"));

/// Reduces raw compiler or runtime error text to a single actionable line.
///
/// A `Line <n>, Column <n>: <message>` diagnostic is returned verbatim,
/// otherwise the first line with any content. Blank input yields an empty
/// string.
pub fn simplify(raw: &str) -> String {
    if let Some(m) = DIAGNOSTIC_RE.find(raw) {
        return m.as_str().to_string();
    }

    raw.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}
