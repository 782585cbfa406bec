//! Table-of-contents generation.
//!
//! Two paths share one idea (collect level 1-3 headings, link to them, swap
//! the navigation in for `{{TOC}}`) but differ in how anchors are named:
//!
//! - The rendered-HTML path gives every heading `heading-<n>-<slug>`, where
//!   `n` is the heading's position among all collected headings. Identical
//!   headings therefore get distinct ids.
//! - The raw-markdown path, used for GitHub and Dev.to exports, uses the
//!   GitHub anchor slug with no position. Identical headings collide, exactly
//!   as they do on those platforms.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::escape::{decode_entities, escape_html};
use crate::format::TOC_PLACEHOLDER;

/// One navigable heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocItem {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Rendered HTML with heading ids assigned, plus the headings found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlHeadings {
    pub html: String,
    pub items: Vec<TocItem>,
}

const EMPTY_TOC_HTML: &str =
    r#"<div class="toc-placeholder"><p><em>Table of Contents will appear here</em></p></div>"#;

const TOC_MARKDOWN_TITLE: &str = "## Table of Contents\n\n";

static HTML_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h([1-3])(\s[^>]*)?>(.*?)</h[1-3]\s*>").unwrap());
static ID_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\sid\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).unwrap()
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

static MD_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,3})\s+(.+)$").unwrap());
static ANCHOR_DROP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static HYPHENS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());

// === Rendered-HTML path ===

/// Collect `<h1>`-`<h3>` elements and stamp each with its generated id.
pub fn extract_headings_from_html(html: &str) -> HtmlHeadings {
    let mut items = Vec::new();

    let html = HTML_HEADING_RE
        .replace_all(html, |caps: &Captures| {
            let index = items.len();
            let level = &caps[1];
            let attrs = caps.get(2).map_or("", |m| m.as_str());
            let inner = &caps[3];

            let text = text_content(inner);
            let id = format!("heading-{index}-{}", html_slug(&text));

            let attrs = if ID_ATTR_RE.is_match(attrs) {
                ID_ATTR_RE
                    .replace(attrs, format!(r#" id="{id}""#).as_str())
                    .into_owned()
            } else {
                format!(r#"{attrs} id="{id}""#)
            };

            items.push(TocItem {
                id,
                text,
                level: level.parse().unwrap_or(1),
            });

            format!("<h{level}{attrs}>{inner}</h{level}>")
        })
        .into_owned();

    HtmlHeadings { html, items }
}

/// Nested navigation list for the HTML path.
pub fn toc_html(items: &[TocItem]) -> String {
    if items.is_empty() {
        return EMPTY_TOC_HTML.to_string();
    }

    let mut html = String::from(
        r#"<nav class="table-of-contents"><div class="toc-title"><strong>Table of Contents</strong></div><ul class="toc-list">"#,
    );
    let mut current = 1u8;

    for item in items {
        while current < item.level {
            html.push_str(r#"<ul class="toc-list">"#);
            current += 1;
        }
        while current > item.level {
            html.push_str("</ul>");
            current -= 1;
        }
        html.push_str(&format!(
            r##"<li class="toc-item toc-level-{}"><a href="#{}" class="toc-link">{}</a></li>"##,
            item.level,
            item.id,
            escape_html(&item.text)
        ));
    }

    while current > 1 {
        html.push_str("</ul>");
        current -= 1;
    }
    html.push_str("</ul></nav>");
    html
}

/// Replace `{{TOC}}` in rendered HTML with generated navigation.
///
/// Input without the placeholder is returned untouched, heading ids included.
pub fn process_toc_in_html(html: &str) -> String {
    if !html.contains(TOC_PLACEHOLDER) {
        return html.to_string();
    }
    let HtmlHeadings { html, items } = extract_headings_from_html(html);
    tracing::debug!(headings = items.len(), "injecting html table of contents");
    html.replace(TOC_PLACEHOLDER, &toc_html(&items))
}

fn html_slug(text: &str) -> String {
    NON_ALNUM_RE
        .replace_all(&text.to_lowercase(), "-")
        .into_owned()
}

fn text_content(inner: &str) -> String {
    decode_entities(&TAG_RE.replace_all(inner, "")).into_owned()
}

// === Raw-markdown path ===

/// GitHub-style heading anchor.
///
/// Lowercase, drop everything but `[a-z0-9]`, whitespace and hyphens, turn
/// whitespace runs into hyphens, collapse hyphen runs, trim edge hyphens.
pub fn github_anchor(text: &str) -> String {
    let lower = text.to_lowercase();
    let kept = ANCHOR_DROP_RE.replace_all(&lower, "");
    let hyphenated = WHITESPACE_RE.replace_all(&kept, "-");
    let collapsed = HYPHENS_RE.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Collect `#`, `##` and `###` lines.
pub fn extract_headings_from_markdown(markdown: &str) -> Vec<TocItem> {
    markdown
        .split('\n')
        .filter_map(|line| {
            let caps = MD_HEADING_RE.captures(line)?;
            let text = caps[2].trim().to_string();
            Some(TocItem {
                id: github_anchor(&text),
                level: caps[1].len() as u8,
                text,
            })
        })
        .collect()
}

/// Markdown navigation list, or an empty string when there are no headings.
pub fn toc_markdown(items: &[TocItem]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let mut markdown = String::from(TOC_MARKDOWN_TITLE);
    for item in items {
        let indent = "  ".repeat(usize::from(item.level.saturating_sub(1)));
        markdown.push_str(&format!("{indent}- [{}](#{})\n", item.text, item.id));
    }
    markdown
}

/// Replace `{{TOC}}` in markdown with a navigation list.
pub fn export_markdown_with_toc(markdown: &str) -> String {
    if !markdown.contains(TOC_PLACEHOLDER) {
        return markdown.to_string();
    }
    let items = extract_headings_from_markdown(markdown);
    tracing::debug!(headings = items.len(), "injecting markdown table of contents");
    markdown.replace(TOC_PLACEHOLDER, &toc_markdown(&items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_ids_are_ordinal_and_unique() {
        let result = extract_headings_from_html("<h2>Same</h2><p>x</p><h2>Same</h2>");
        let ids: Vec<&str> = result.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["heading-0-same", "heading-1-same"]);
        assert_eq!(
            result.html,
            r#"<h2 id="heading-0-same">Same</h2><p>x</p><h2 id="heading-1-same">Same</h2>"#
        );
    }

    #[test]
    fn html_slug_keeps_edge_hyphens() {
        let result = extract_headings_from_html("<h1>Hello, World!</h1>");
        assert_eq!(result.items[0].id, "heading-0-hello-world-");
        assert_eq!(result.items[0].text, "Hello, World!");
    }

    #[test]
    fn html_ordinal_counts_across_levels() {
        let html = "<h1>A</h1><h4>skip</h4><h3>B</h3><h2>C</h2>";
        let result = extract_headings_from_html(html);
        let got: Vec<(u8, &str)> = result
            .items
            .iter()
            .map(|i| (i.level, i.id.as_str()))
            .collect();
        assert_eq!(got, [(1, "heading-0-a"), (3, "heading-1-b"), (2, "heading-2-c")]);
        assert!(result.html.contains("<h4>skip</h4>"));
    }

    #[test]
    fn html_text_content_drops_markup_and_decodes_entities() {
        let result =
            extract_headings_from_html(r#"<h2 class="x" id="old">Q&amp;A <code>fn</code></h2>"#);
        let item = &result.items[0];
        assert_eq!(item.text, "Q&A fn");
        assert_eq!(item.id, "heading-0-q-a-fn");
        assert_eq!(
            result.html,
            r#"<h2 class="x" id="heading-0-q-a-fn">Q&amp;A <code>fn</code></h2>"#
        );
    }

    #[test]
    fn html_named_entities_decode_like_text_content() {
        let out = process_toc_in_html("<p>{{TOC}}</p><h2>Wait&hellip; &mdash; done</h2>");
        assert!(out.contains(r#"<h2 id="heading-0-wait-done">Wait&hellip; &mdash; done</h2>"#));
        assert!(out.contains("class=\"toc-link\">Wait\u{2026} \u{2014} done</a>"));
        assert!(!out.contains("&amp;hellip;"));
    }

    #[test]
    fn toc_html_escapes_link_text() {
        let items = vec![TocItem {
            id: "heading-0-a-b".into(),
            text: "a < b & c".into(),
            level: 1,
        }];
        assert!(toc_html(&items).contains(">a &lt; b &amp; c</a>"));
    }

    #[test]
    fn toc_html_nests_by_level() {
        let items = vec![
            TocItem {
                id: "heading-0-intro".into(),
                text: "Intro".into(),
                level: 1,
            },
            TocItem {
                id: "heading-1-setup".into(),
                text: "Setup".into(),
                level: 2,
            },
            TocItem {
                id: "heading-2-usage".into(),
                text: "Usage".into(),
                level: 1,
            },
        ];
        insta::assert_snapshot!(toc_html(&items), @r##"<nav class="table-of-contents"><div class="toc-title"><strong>Table of Contents</strong></div><ul class="toc-list"><li class="toc-item toc-level-1"><a href="#heading-0-intro" class="toc-link">Intro</a></li><ul class="toc-list"><li class="toc-item toc-level-2"><a href="#heading-1-setup" class="toc-link">Setup</a></li></ul><li class="toc-item toc-level-1"><a href="#heading-2-usage" class="toc-link">Usage</a></li></ul></nav>"##);
    }

    #[test]
    fn toc_html_closes_open_lists() {
        let items = vec![TocItem {
            id: "heading-0-deep".into(),
            text: "Deep".into(),
            level: 3,
        }];
        let html = toc_html(&items);
        assert!(html.ends_with("</li></ul></ul></ul></nav>"));
        assert_eq!(html.matches("<ul").count(), html.matches("</ul>").count());
    }

    #[test]
    fn toc_html_placeholder_when_empty() {
        assert_eq!(toc_html(&[]), EMPTY_TOC_HTML);
    }

    #[test]
    fn process_without_placeholder_is_unchanged() {
        let html = "<h1>Title</h1><p>body</p>";
        assert_eq!(process_toc_in_html(html), html);
    }

    #[test]
    fn process_replaces_every_placeholder() {
        let html = "<p>{{TOC}}</p><h1>Title</h1><p>{{TOC}}</p>";
        let out = process_toc_in_html(html);
        assert!(!out.contains(TOC_PLACEHOLDER));
        assert_eq!(out.matches(r#"class="table-of-contents""#).count(), 2);
        assert!(out.contains(r#"<h1 id="heading-0-title">Title</h1>"#));
        assert!(out.contains(r##"<a href="#heading-0-title" class="toc-link">Title</a>"##));
    }

    #[test]
    fn github_anchor_matches_platform_slugs() {
        assert_eq!(github_anchor("Getting Started"), "getting-started");
        assert_eq!(github_anchor("  What's new in v2.0?  "), "whats-new-in-v20");
        assert_eq!(github_anchor("A -- B"), "a-b");
        assert_eq!(github_anchor("-edge-"), "edge");
    }

    #[test]
    fn markdown_ids_collide_for_identical_headings() {
        let items = extract_headings_from_markdown("## Same\n\ntext\n\n## Same");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "same");
        assert_eq!(items[1].id, "same");
    }

    #[test]
    fn markdown_path_ignores_deep_headings() {
        let items = extract_headings_from_markdown("# One\n#### Four\n### Three\n##no-space");
        let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, ["One", "Three"]);
        assert_eq!(items[1].level, 3);
    }

    #[test]
    fn toc_markdown_indents_by_level() {
        let items = extract_headings_from_markdown("# Guide\n## Install\n### From source");
        assert_eq!(
            toc_markdown(&items),
            "## Table of Contents\n\n- [Guide](#guide)\n  - [Install](#install)\n    - [From source](#from-source)\n"
        );
        assert_eq!(toc_markdown(&[]), "");
    }

    #[test]
    fn export_replaces_placeholder() {
        let md = "# Doc\n\n{{TOC}}\n\n## Part";
        assert_eq!(
            export_markdown_with_toc(md),
            "# Doc\n\n## Table of Contents\n\n- [Doc](#doc)\n  - [Part](#part)\n\n\n## Part"
        );
        assert_eq!(export_markdown_with_toc("# Doc"), "# Doc");
    }

    #[test]
    fn export_without_headings_removes_placeholder() {
        assert_eq!(export_markdown_with_toc("intro {{TOC}} outro"), "intro  outro");
    }
}
