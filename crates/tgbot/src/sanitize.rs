//! Outbound message text sanitizing: strip markup except an allow-list.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Tags Telegram's HTML parse mode renders in message text.
pub const DEFAULT_ALLOWED_TAGS: [&str; 5] = ["i", "b", "a", "code", "pre"];

lazy_static! {
    /// An HTML comment, an opening/closing tag with optional quoted attributes
    /// and one level of nested tags, or unterminated markup running to the end.
    static ref MARKUP: Regex = Regex::new(
        r#"(?s)<!--.*?-->|</?([A-Za-z][A-Za-z0-9-]*)(?:[^<>"']|"[^"]*"|'[^']*'|<[^<>]*>)*>|<[A-Za-z/!][^>]*$"#
    )
    .expect("markup pattern is valid");
}

/// Remove every tag whose name is not in `allowed`, keeping the inner text.
///
/// Tag names compare case-insensitively; allowed tags are kept verbatim,
/// attributes included. Comments are always removed.
pub fn sanitize<S: AsRef<str>>(text: &str, allowed: &[S]) -> String {
    MARKUP
        .replace_all(text, |caps: &Captures| match caps.get(1) {
            Some(name)
                if allowed
                    .iter()
                    .any(|t| t.as_ref().eq_ignore_ascii_case(name.as_str())) =>
            {
                caps[0].to_string()
            }
            _ => String::new(),
        })
        .into_owned()
}

/// [`sanitize`] with [`DEFAULT_ALLOWED_TAGS`].
pub fn sanitize_message(text: &str) -> String {
    sanitize(text, &DEFAULT_ALLOWED_TAGS)
}
