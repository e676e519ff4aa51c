//! Reference rewriting for HTML pages.
//!
//! Authors opt in per tag with `owww="true"`. Marked `link`, `script` and `a`
//! tags get the `.http` suffix appended to their local reference so the
//! browser requests the web action instead of the raw file name:
//!
//! ```html
//! <link rel="stylesheet" owww="true" href="style.css">
//! <!-- becomes -->
//! <link rel="stylesheet" owww="true" href="style.css.http">
//! ```
//!
//! Only the attribute value changes; the rest of the document is copied
//! through as-is, including markup the scanner does not understand. Comments
//! and the content of `script`, `style`, `textarea` and `title` elements are
//! text, so tags written inside them are never rewritten.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::manifest::{FileKind, Manifest};

/// Attribute that opts a tag into rewriting.
pub const MARKER_ATTRIBUTE: &str = "owww";

/// Suffix appended to rewritten references.
const DEPLOYED_SUFFIX: &str = ".http";

/// Which attribute of which tag is rewritten, and for which file suffix.
struct ReferenceRule {
    tag: &'static str,
    attribute: &'static str,
    suffix: &'static str,
}

const RULES: [ReferenceRule; 3] = [
    ReferenceRule {
        tag: "link",
        attribute: "href",
        suffix: ".css",
    },
    ReferenceRule {
        tag: "script",
        attribute: "src",
        suffix: ".js",
    },
    ReferenceRule {
        tag: "a",
        attribute: "href",
        suffix: ".html",
    },
];

/// Result of rewriting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// Rewritten document
    pub html: String,

    /// Number of references that were changed
    pub rewritten: usize,
}

/// An attribute inside a start tag. Ranges are relative to the attribute text.
#[derive(Debug)]
struct Attribute<'a> {
    name: &'a str,
    value: Option<(&'a str, Range<usize>)>,
}

/// Elements whose content is text, not markup.
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

/// Rewrite marked references in an HTML document.
pub fn rewrite_html(source: &str) -> Rewrite {
    // Comments come first so tags inside them are consumed without a match.
    // An unterminated comment runs to the end of the document.
    static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r#"(?is)<!--(?:.*?-->|.*$)|<(link|script|a|style|textarea|title)(\s(?:"[^"]*"|'[^']*'|[^'">])*)?>"#,
        )
        .expect("Invalid tag regex")
    });

    let mut html = String::with_capacity(source.len());
    let mut last = 0;
    let mut pos = 0;
    let mut rewritten = 0;

    while let Some(caps) = TAG_RE.captures_at(source, pos) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        pos = whole.end();

        let Some(tag) = caps.get(1) else {
            continue;
        };

        let name = tag.as_str().to_ascii_lowercase();
        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            pos = raw_text_end(source, pos, &name);
        }

        let Some(attrs) = caps.get(2) else {
            continue;
        };

        let Some(rule) = RULES.iter().find(|rule| rule.tag == name) else {
            continue;
        };

        let attributes = parse_attributes(attrs.as_str());
        if !is_marked(&attributes) {
            continue;
        }

        let Some((value, range)) = attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(rule.attribute))
            .and_then(|attr| attr.value.clone())
        else {
            continue;
        };

        if !value.ends_with(rule.suffix) {
            continue;
        }

        let start = attrs.start() + range.start;
        let end = attrs.start() + range.end;

        html.push_str(&source[last..start]);
        html.push_str(value);
        html.push_str(DEPLOYED_SUFFIX);
        last = end;
        rewritten += 1;
    }

    html.push_str(&source[last..]);

    Rewrite { html, rewritten }
}

/// Offset of the end tag closing a raw text element opened before `from`,
/// or the end of the document if it is never closed.
fn raw_text_end(source: &str, from: usize, tag: &str) -> usize {
    let bytes = source.as_bytes();
    let closing = format!("</{tag}");
    let closing = closing.as_bytes();

    (from..bytes.len())
        .find(|&i| {
            let Some(candidate) = bytes.get(i..i + closing.len()) else {
                return false;
            };
            candidate.eq_ignore_ascii_case(closing)
                && bytes
                    .get(i + closing.len())
                    .map_or(true, |&next| next == b'>' || next == b'/' || next.is_ascii_whitespace())
        })
        .unwrap_or(bytes.len())
}

/// Rewrite every HTML page of a manifest in place.
///
/// Returns the total number of rewritten references.
pub fn rewrite_manifest(manifest: &mut Manifest) -> usize {
    let mut total = 0;

    for record in manifest.records_mut() {
        if record.kind != FileKind::Html {
            continue;
        }

        let result = rewrite_html(&record.content);
        if result.rewritten > 0 {
            tracing::debug!(
                "Rewrote {} references in {}",
                result.rewritten,
                record.name
            );
            record.content = result.html;
        }
        total += result.rewritten;
    }

    total
}

fn is_marked(attributes: &[Attribute<'_>]) -> bool {
    attributes.iter().any(|attr| {
        attr.name.eq_ignore_ascii_case(MARKER_ATTRIBUTE)
            && attr
                .value
                .as_ref()
                .is_some_and(|(value, _)| value.eq_ignore_ascii_case("true"))
    })
}

/// Parse the attributes of a start tag.
fn parse_attributes(attrs: &str) -> Vec<Attribute<'_>> {
    // name="value", name='value', name=value or a bare name
    static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
            .expect("Invalid attribute regex")
    });

    ATTR_RE
        .captures_iter(attrs)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| (m.as_str(), m.range()));
            Some(Attribute { name, value })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::FileRecord;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn rewrites_marked_stylesheet() {
        let result = rewrite_html(r#"<link OWWW="true" href="style.css">"#);

        assert_eq!(result.html, r#"<link OWWW="true" href="style.css.http">"#);
        assert_eq!(result.rewritten, 1);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let once = rewrite_html(r#"<link OWWW="true" href="style.css">"#);
        let twice = rewrite_html(&once.html);

        assert_eq!(twice.html, once.html);
        assert_eq!(twice.rewritten, 0);
    }

    #[test]
    fn leaves_unmarked_tags_untouched() {
        let source = r#"<script src="a.js"></script><link rel="stylesheet" href="b.css"><a href="c.html">c</a>"#;

        let result = rewrite_html(source);

        assert_eq!(result.html, source);
        assert_eq!(result.rewritten, 0);
    }

    #[test]
    fn rewrites_each_tag_kind() {
        let source = r#"<!DOCTYPE html>
<html>
<head>
  <link rel="stylesheet" owww="true" href="style.css">
  <script owww="true" src="script.js"></script>
</head>
<body>
  <a owww="true" href="about.html">About</a>
  <a href="https://example.com/index.html">External</a>
</body>
</html>"#;

        let result = rewrite_html(source);

        assert_eq!(result.rewritten, 3);
        assert!(result.html.contains(r#"href="style.css.http""#));
        assert!(result.html.contains(r#"src="script.js.http""#));
        assert!(result.html.contains(r#"href="about.html.http""#));
        assert!(result
            .html
            .contains(r#"<a href="https://example.com/index.html">External</a>"#));
    }

    #[test]
    fn only_replaces_the_matching_suffix() {
        // A marked link to a non-stylesheet keeps its value.
        let source = r#"<link owww="true" rel="icon" href="favicon.ico"><a owww="true" href="app.js">x</a>"#;

        let result = rewrite_html(source);

        assert_eq!(result.html, source);
    }

    #[test]
    fn handles_quote_styles() {
        let result = rewrite_html("<script owww='true' src='app.js'></script><link owww=true href=main.css>");

        assert_eq!(
            result.html,
            "<script owww='true' src='app.js.http'></script><link owww=true href=main.css.http>"
        );
    }

    #[test]
    fn ignores_marker_with_other_values() {
        let source = r#"<link owww="false" href="style.css"><script owww src="a.js"></script>"#;

        let result = rewrite_html(source);

        assert_eq!(result.html, source);
    }

    #[test]
    fn skips_commented_out_tags() {
        let source = r#"<!-- <link owww="true" href="old.css"> --><link owww="true" href="new.css">"#;

        let result = rewrite_html(source);

        assert_eq!(
            result.html,
            r#"<!-- <link owww="true" href="old.css"> --><link owww="true" href="new.css.http">"#
        );
    }

    #[test]
    fn skips_tags_inside_inline_scripts() {
        let source = r#"<script>el.innerHTML = '<a owww="true" href="x.html">x</a>';</script><a owww="true" href="y.html">y</a>"#;

        let result = rewrite_html(source);

        assert_eq!(result.rewritten, 1);
        assert_eq!(
            result.html,
            r#"<script>el.innerHTML = '<a owww="true" href="x.html">x</a>';</script><a owww="true" href="y.html.http">y</a>"#
        );
    }

    #[test]
    fn marked_script_tag_is_rewritten_but_not_its_body() {
        let source = r#"<SCRIPT owww="true" src="app.js">var s = '<link owww="true" href="a.css">';</SCRIPT >"#;

        let result = rewrite_html(source);

        assert_eq!(
            result.html,
            r#"<SCRIPT owww="true" src="app.js.http">var s = '<link owww="true" href="a.css">';</SCRIPT >"#
        );
    }

    #[test]
    fn skips_text_of_textarea_style_and_title() {
        let source = r#"<textarea><link owww="true" href="a.css"></textarea><style>/* <a owww="true" href="b.html"> */</style><title><script owww="true" src="c.js"></title>"#;

        let result = rewrite_html(source);

        assert_eq!(result.html, source);
        assert_eq!(result.rewritten, 0);
    }

    #[test]
    fn unclosed_raw_text_runs_to_end() {
        let source = r#"<textarea>draft <a owww="true" href="x.html">"#;

        let result = rewrite_html(source);

        assert_eq!(result.html, source);
    }

    #[test]
    fn unterminated_comment_runs_to_end() {
        let source = r#"<link owww="true" href="a.css"><!-- todo <script owww="true" src="old.js"></script>"#;

        let result = rewrite_html(source);

        assert_eq!(result.rewritten, 1);
        assert_eq!(
            result.html,
            r#"<link owww="true" href="a.css.http"><!-- todo <script owww="true" src="old.js"></script>"#
        );
    }

    #[test]
    fn tolerates_broken_markup() {
        let source = r#"<div <link owww="true" href="x.css" <p>unclosed <a owww="true" href="y.html">"#;

        let result = rewrite_html(source);

        assert!(result.html.contains(r#"href="y.html.http""#));
        assert!(result.html.starts_with("<div <link"));
    }

    #[test]
    fn does_not_confuse_similar_tag_names() {
        let source = r#"<abbr owww="true" href="x.html">x</abbr><linked owww="true" href="y.css">"#;

        let result = rewrite_html(source);

        assert_eq!(result.html, source);
    }

    #[test]
    fn rewrites_only_html_records() {
        let mut manifest = Manifest::from_records([
            FileRecord {
                name: "index.html".to_string(),
                path: PathBuf::from("/site/index.html"),
                kind: FileKind::Html,
                content: r#"<script owww="true" src="app.js"></script>"#.to_string(),
            },
            FileRecord {
                name: "app.js".to_string(),
                path: PathBuf::from("/site/app.js"),
                kind: FileKind::Js,
                content: r#"document.write('<a owww="true" href="x.html">')"#.to_string(),
            },
        ]);

        let total = rewrite_manifest(&mut manifest);

        assert_eq!(total, 1);
        assert_eq!(
            manifest.find_by_name("index.html").unwrap().content,
            r#"<script owww="true" src="app.js.http"></script>"#
        );
        assert_eq!(
            manifest.find_by_name("app.js").unwrap().content,
            r#"document.write('<a owww="true" href="x.html">')"#
        );
    }
}
