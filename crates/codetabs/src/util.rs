//! Shared helpers for HTML output.

use std::borrow::Cow;

/// Escape text for use in HTML content and double-quoted attribute values.
///
/// # Examples
///
/// ```
/// use codetabs::escape_html;
///
/// assert_eq!(escape_html("<b>\"x\" & y</b>"), "&lt;b&gt;&quot;x&quot; &amp; y&lt;/b&gt;");
/// assert_eq!(escape_html("plain"), "plain");
/// ```
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Join optional class names with single spaces, skipping empty entries.
///
/// Whitespace inside an entry is normalized, so `"a  b"` contributes `a b`.
pub(crate) fn join_classes<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> String {
    let mut out = String::new();
    for class in parts.into_iter().flatten().flat_map(str::split_whitespace) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(class);
    }
    out
}

/// Convert a camelCase prop name to kebab-case (`badgeLabel` -> `badge-label`).
pub(crate) fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else if c == '_' {
            out.push('-');
        } else {
            out.push(c);
        }
    }
    out
}

/// Format a pixel length the way the DOM style API expects (`12px`, `12.5px`).
#[must_use]
pub(crate) fn px(value: f64) -> String {
    format!("{value}px")
}
