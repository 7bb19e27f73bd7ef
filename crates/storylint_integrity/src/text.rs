//! Plain-text helpers for canon snapshots and prompt payloads.

use regex::Regex;
use std::sync::LazyLock;

static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)`{1,3}.*?`{1,3}").expect("Valid code span regex"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("Valid link regex"));
static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#>*_~-]+").expect("Valid emphasis regex"));

/// Reduce markdown to a single line of prose.
///
/// Code spans are dropped, links keep their text, heading, quote and
/// emphasis punctuation becomes whitespace, and whitespace runs collapse.
///
/// # Examples
///
/// ```
/// use storylint_integrity::strip_markdown;
///
/// let text = "# Mara\n\n> Born in [Port Vell](../port-vell.md), **stubborn**.";
/// assert_eq!(strip_markdown(text), "Mara Born in Port Vell, stubborn .");
/// ```
pub fn strip_markdown(text: &str) -> String {
    let text = CODE.replace_all(text, "");
    let text = LINK.replace_all(&text, "$1");
    let text = EMPHASIS.replace_all(&text, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters, marking the cut with `...`.
///
/// A zero budget disables truncation.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if max_chars == 0 || text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
