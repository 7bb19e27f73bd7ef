//! Attribute mini-language inside scene markers.
//!
//! `key:value` pairs separated by whitespace. A value is a double-quoted
//! string, a bracketed list decoded as a JSON array, or a bare token.

use serde_json::Value;
use std::collections::BTreeMap;

/// Parse an attribute block into a key → value map.
///
/// Whitespace runs are collapsed first, so multi-line blocks behave like a
/// single line. Text that does not form a `key:` prefix is skipped. A later
/// occurrence of a key replaces an earlier one.
///
/// # Examples
///
/// ```
/// use storylint_parser::parse_attributes;
///
/// let attrs = parse_attributes(r#"id:scn-01 title:"Harbor at Dusk" characters:["mara","tam"]"#);
/// assert_eq!(attrs["id"], "scn-01");
/// assert_eq!(attrs["title"], "Harbor at Dusk");
/// assert_eq!(attrs["characters"][1], "tam");
/// ```
pub fn parse_attributes(block: &str) -> BTreeMap<String, Value> {
    let collapsed = block.split_whitespace().collect::<Vec<_>>().join(" ");
    let chars: Vec<char> = collapsed.chars().collect();
    let mut attrs = BTreeMap::new();

    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        let key_len = key_length(&chars[i..]);
        if key_len == 0 {
            i += 1;
            continue;
        }
        let key: String = chars[i..i + key_len].iter().collect();
        i += key_len;
        if chars.get(i) != Some(&':') {
            i += 1;
            continue;
        }
        i += 1;
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        if i >= chars.len() {
            break;
        }
        let (value, next) = parse_value(&chars, i);
        attrs.insert(key, value);
        i = next;
    }
    attrs
}

/// Length of a `[A-Za-z_][A-Za-z0-9_-]*` prefix, zero if none.
fn key_length(chars: &[char]) -> usize {
    match chars.first() {
        Some(c) if c.is_ascii_alphabetic() || *c == '_' => {}
        _ => return 0,
    }
    1 + chars[1..]
        .iter()
        .take_while(|c| c.is_ascii_alphanumeric() || **c == '_' || **c == '-')
        .count()
}

fn parse_value(chars: &[char], start: usize) -> (Value, usize) {
    match chars[start] {
        '"' => {
            let mut end = start + 1;
            while end < chars.len() && chars[end] != '"' {
                end += 1;
            }
            let text: String = chars[start + 1..end].iter().collect();
            (Value::String(text), end + 1)
        }
        '[' => {
            let mut end = start + 1;
            let mut depth = 1;
            while end < chars.len() && depth > 0 {
                match chars[end] {
                    '[' => depth += 1,
                    ']' => depth -= 1,
                    _ => {}
                }
                end += 1;
            }
            let raw: String = chars[start..end].iter().collect();
            let value = match serde_json::from_str::<Value>(&raw) {
                Ok(list @ Value::Array(_)) => list,
                _ => Value::String(raw),
            };
            (value, end)
        }
        _ => {
            let end = chars[start..]
                .iter()
                .position(|c| c.is_whitespace())
                .map_or(chars.len(), |offset| start + offset);
            let text: String = chars[start..end].iter().collect();
            (Value::String(text), end)
        }
    }
}

/// Render a scalar attribute as text. Strings are taken verbatim.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Coerce a list-typed attribute, wrapping a lone scalar and dropping
/// repeated entries after the first.
pub(crate) fn coerce_list(value: Option<&Value>) -> Vec<String> {
    let items: Vec<String> = match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(scalar) => scalar_text(scalar).into_iter().collect(),
    };
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
