//! HTML minification.

use std::borrow::Cow;

/// Minify a page when `enabled`.
///
/// Returns `Cow::Borrowed` if minify disabled, `Cow::Owned` if minified.
pub fn minify_html(html: &str, enabled: bool) -> Cow<'_, str> {
    if !enabled {
        return Cow::Borrowed(html);
    }

    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;

    let minified = minify_html::minify(html.as_bytes(), &cfg);
    match String::from_utf8(minified) {
        Ok(minified) => Cow::Owned(minified),
        Err(_) => Cow::Borrowed(html),
    }
}
