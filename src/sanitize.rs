//! Allow-list HTML sanitizer for documents shown inline by the viewer.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Tags kept in sanitized output; everything else is stripped.
pub const ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "b", "blockquote", "code", "em", "i", "li", "ol", "strong", "ul",
    "h1", "h2", "h3", "p", "br", "hr", "pre",
];

/// Tags removed together with their content.
const CLEAN_CONTENT_TAGS: &[&str] = &["script", "style"];

const URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

static SANITIZER: LazyLock<ammonia::Builder<'static>> = LazyLock::new(|| {
    let tag_attributes: HashMap<&str, HashSet<&str>> = HashMap::from([
        ("a", HashSet::from(["href", "title"])),
        ("abbr", HashSet::from(["title"])),
        ("acronym", HashSet::from(["title"])),
    ]);

    let mut builder = ammonia::Builder::default();
    builder
        .tags(ALLOWED_TAGS.iter().copied().collect())
        .clean_content_tags(CLEAN_CONTENT_TAGS.iter().copied().collect())
        .tag_attributes(tag_attributes)
        .generic_attributes(HashSet::new())
        .url_schemes(URL_SCHEMES.iter().copied().collect());
    builder
});

/// Strip every tag and attribute outside the allow-list.
///
/// Disallowed tags are dropped rather than escaped, so their text survives
/// while the markup does not. Script and style bodies are removed entirely.
pub fn sanitize_html(raw: &str) -> String {
    SANITIZER.clean(raw).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_removed_heading_kept() {
        let out = sanitize_html("<h1>Test</h1><script>alert(1)</script>");
        assert!(out.contains("<h1>Test</h1>"));
        assert!(!out.contains("<script"));
        assert!(!out.contains("alert(1)"));
    }

    #[test]
    fn test_event_handlers_removed() {
        let out = sanitize_html(r#"<p onclick="steal()">hello</p><img src="x" onerror="boom()">"#);
        assert!(out.contains("<p>hello</p>"));
        assert!(!out.contains("onclick"));
        assert!(!out.contains("onerror"));
        assert!(!out.contains("<img"));
    }

    #[test]
    fn test_disallowed_tags_stripped_not_escaped() {
        let out = sanitize_html("<div><span>kept text</span></div>");
        assert_eq!(out, "kept text");
        assert!(!out.contains("&lt;"));
    }

    #[test]
    fn test_allowed_structure_survives() {
        let out = sanitize_html("<pre>code</pre><hr><br><ul><li>x</li></ul>");
        assert!(out.contains("<pre>code</pre>"));
        assert!(out.contains("<hr>"));
        assert!(out.contains("<br>"));
        assert!(out.contains("<ul><li>x</li></ul>"));
    }

    #[test]
    fn test_javascript_links_dropped() {
        let out = sanitize_html(r#"<a href="javascript:alert(1)" title="t">x</a>"#);
        assert!(!out.contains("javascript:"));
        let out = sanitize_html(r#"<a href="https://example.com">x</a>"#);
        assert!(out.contains(r#"href="https://example.com""#));
    }

    #[test]
    fn test_shared_sanitizer_is_reusable() {
        for _ in 0..3 {
            assert_eq!(sanitize_html("<p>again</p><script>x</script>"), "<p>again</p>");
        }
        assert_eq!(sanitize_html("<abbr title=\"t\" class=\"c\">a</abbr>"), "<abbr title=\"t\">a</abbr>");
    }

    #[test]
    fn test_style_content_removed() {
        let out = sanitize_html("<style>body { color: red }</style><p>ok</p>");
        assert_eq!(out, "<p>ok</p>");
    }
}
