//! HTML rendering for the notes viewer.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::Note;

/// Template used when the configured template file cannot be read.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/notes.html");

/// Matches `{{ name }}` with optional whitespace inside the braces.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern is valid"));

/// Replaces every `{{ name }}` in `template` with `data[name]`.
///
/// Unknown names become the empty string. Substitution is a single pass:
/// placeholders appearing inside substituted values are left as they are.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use notejar::web::interpolate;
///
/// let data = HashMap::from([("name", "world".to_string())]);
/// assert_eq!(interpolate("Hello {{ name }}!{{missing}}", &data), "Hello world!");
/// ```
pub fn interpolate(template: &str, data: &HashMap<&str, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            data.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// Renders notes as a sequence of `note` blocks, one per note.
///
/// Content and tags are HTML-escaped.
pub fn render_fragment(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|note| {
            let tags: String = note
                .tags()
                .iter()
                .map(|tag| format!(r#"<span class="tag">{}</span>"#, escape_html(tag)))
                .collect();
            format!(
                r#"<div class="note"><p>{}</p><div class="tags">{}</div></div>"#,
                escape_html(note.content()),
                tags
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
