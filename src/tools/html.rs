//! Small HTML helpers shared by the search and fetch tools.

use std::sync::OnceLock;

use regex::Regex;

/// Raw-text elements whose whole body is dropped before text extraction.
const NON_CONTENT_TAGS: [&str; 3] = ["script", "style", "noscript"];

/// Comments and non-content elements in one alternation, so whichever
/// construct opens first wins: a `<!--` inside a script string stays
/// script, a `<script>` inside a comment stays comment. Unclosed elements
/// run to the end of the document; an unclosed `<head>` ends at `<body>`.
fn non_content_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let mut alternatives = vec![
            r"<!--.*?(?:-->|\z)".to_string(),
            r"<head\b[^>]*>.*?(?:</head\s*>|<body\b[^>]*>|\z)".to_string(),
        ];
        alternatives.extend(
            NON_CONTENT_TAGS
                .iter()
                .map(|tag| format!(r"<{tag}\b[^>]*>.*?(?:</{tag}\s*>|\z)")),
        );
        Regex::new(&format!("(?is){}", alternatives.join("|"))).expect("non-content regex")
    })
}

/// A tag starts with a name, `/`, `!` or `?`; a bare `<` is text.
fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"(?s)</?[A-Za-z!?][^>]*>").expect("tag regex"))
}

fn numeric_entity_pattern() -> &'static Regex {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    ENTITY.get_or_init(|| Regex::new(r"&#([xX][0-9a-fA-F]+|[0-9]+);").expect("entity regex"))
}

/// Basic HTML entity decoding.
pub fn html_decode(s: &str) -> String {
    let named = s
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ");

    let numeric = numeric_entity_pattern().replace_all(&named, |caps: &regex::Captures| {
        let raw = &caps[1];
        let code = match raw.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    // `&amp;` last so "&amp;lt;" stays "&lt;"
    numeric.replace("&amp;", "&")
}

/// Strip tags from an HTML fragment and collapse whitespace into one line.
pub fn fragment_text(fragment: &str) -> String {
    let text = tag_pattern().replace_all(fragment, " ");
    collapse_whitespace(&html_decode(&text))
}

/// Extract readable text from an HTML document.
///
/// Non-content elements and comments are removed. Each remaining text node
/// becomes one line; lines are trimmed, inner whitespace collapsed, and
/// empty lines dropped.
pub fn extract_text(html: &str) -> String {
    let text = non_content_pattern().replace_all(html, "");
    let text = tag_pattern().replace_all(&text, "\n");

    text.lines()
        .map(|line| collapse_whitespace(&html_decode(line)))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(html_decode("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(html_decode("&#26085;&#x672C;"), "日本");
        assert_eq!(html_decode("&amp;lt;"), "&lt;");
        assert_eq!(html_decode("&#xD800;"), "&#xD800;");
    }

    #[test]
    fn extract_text_drops_non_content_elements() {
        let html = r#"<!DOCTYPE html>
<html>
<head><title>Ignored title</title><style>body { color: red; }</style></head>
<body>
  <!-- comment -->
  <SCRIPT type="text/javascript">var secret = "hidden";</SCRIPT>
  <h1>  地震速報  </h1>
  <p>First   paragraph with <b>bold</b> text.</p>
  <noscript>Enable JavaScript</noscript>
  <p>Tom &amp; Jerry</p>
</body>
</html>"#;

        let text = extract_text(html);
        assert_eq!(
            text,
            "地震速報\nFirst paragraph with\nbold\ntext.\nTom & Jerry"
        );
        assert!(!text.contains("secret"));
        assert!(!text.contains("Ignored title"));
        assert!(!text.contains("color"));
        assert!(!text.contains("Enable JavaScript"));
    }

    #[test]
    fn unclosed_script_is_dropped_to_end_of_document() {
        let text = extract_text("<html><body><p>記事本文</p><script>var secret = 'LEAK1';");
        assert_eq!(text, "記事本文");
    }

    #[test]
    fn comment_marker_inside_script_does_not_hide_body() {
        let html = r#"<body><script>var s = "<!--"; var secret = 'LEAK2';</script><p>本文</p><!-- c --></body>"#;
        assert_eq!(extract_text(html), "本文");
    }

    #[test]
    fn script_tag_inside_comment_stays_commented() {
        let html = "<p>前</p><!-- <script> --><p>後</p>";
        assert_eq!(extract_text(html), "前\n後");
    }

    #[test]
    fn head_without_end_tag_stops_at_body() {
        let html = "<html><head><title>タイトル</title><body><p>本文</p></body></html>";
        assert_eq!(extract_text(html), "本文");
    }

    #[test]
    fn bare_angle_brackets_in_prose_are_text() {
        assert_eq!(
            extract_text("<p>1 < 2 and 3 > 1</p><p>keep</p>"),
            "1 < 2 and 3 > 1\nkeep"
        );
        assert_eq!(fragment_text("<b>a</b> <= b"), "a <= b");
    }

    #[test]
    fn fragment_text_flattens_markup() {
        assert_eq!(
            fragment_text("<b>東京</b>  で\n<i>ニュース</i> &quot;速報&quot;"),
            "東京 で ニュース \"速報\""
        );
    }
}
