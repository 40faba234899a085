//! HTML text escaping and template filling.

/// Escape special HTML characters for text and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
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

/// Fill `{key}` placeholders of `template` in a single pass.
///
/// Substituted values are never scanned again, so a value that itself
/// contains `{key}` is emitted as-is. Braces that do not name a known key
/// (CSS blocks, for instance) are left untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        filled.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let value = after.find('}').and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (end, *value))
        });
        match value {
            Some((end, value)) => {
                filled.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                filled.push('{');
                rest = after;
            }
        }
    }

    filled.push_str(rest);
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_fill_template() {
        let filled = fill_template(
            "<h1>{title}</h1><p>{body}</p>",
            &[("title", "Steam"), ("body", "loop")],
        );
        assert_eq!(filled, "<h1>Steam</h1><p>loop</p>");
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let filled = fill_template("body { margin: 0; } {missing} {x", &[("x", "y")]);
        assert_eq!(filled, "body { margin: 0; } {missing} {x");
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let filled = fill_template(
            "<ol>{panels}</ol><script>{script}</script>",
            &[("panels", "{script}"), ("script", "L.map()")],
        );
        assert_eq!(filled, "<ol>{script}</ol><script>L.map()</script>");
    }
}
