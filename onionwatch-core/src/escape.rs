//! HTML escaping for values that end up inside the rendered page

/// Escape the five HTML-significant characters.
///
/// Applied once, when a discovered onion URL enters a `ScanRecord`; the
/// escaped form is what gets persisted and rendered.
pub fn escape_html(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&#34;".to_string(),
            '\'' => "&#39;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}
