//! Cleans up HTML exported from Notion so it can be pasted into an article:
//! strips Notion's wrappers and attributes, drops the title heading (article
//! pages render their own), marks the lead paragraph, and re-flows the
//! markup one block per line.
//!
//! This is regex munging over trusted local input, not an HTML parser.

use std::sync::LazyLock;

use regex::Regex;

fn re(pattern: &str) -> Regex {
    // patterns are literals in this module
    Regex::new(pattern).unwrap()
}

static BODY_RE: LazyLock<Regex> = LazyLock::new(|| re(r"<body[^>]*>([\s\S]*)</body>"));
static PAGE_DIV_RE: LazyLock<Regex> = LazyLock::new(|| re(r#"(?i)<div[^>]*class="[^"]*page[^"]*"[^>]*>"#));
static BLOCK_DIV_RE: LazyLock<Regex> = LazyLock::new(|| re(r#"(?i)<div[^>]*class="[^"]*block[^"]*"[^>]*>"#));
static ARTICLE_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<article[^>]*>"));
static ARTICLE_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)</article>"));
static H1_RE: LazyLock<Regex> = LazyLock::new(|| re(r"<h1[^>]*>.*?</h1>"));
static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| re(r#"\s+class="[^"]*""#));
static ID_RE: LazyLock<Regex> = LazyLock::new(|| re(r#"\s+id="[^"]*""#));
static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| re(r#"\s+style="[^"]*""#));
static DATA_RE: LazyLock<Regex> = LazyLock::new(|| re(r#"\s+data-[^=]*="[^"]*""#));
static FIGURE_RE: LazyLock<Regex> = LazyLock::new(|| re(r"<figure[^>]*>"));
static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| re(r"\n\s*\n\s*\n"));

/// The class given to the first paragraph.
pub const LEAD_CLASS: &str = "article-lead";

/// Cleans a Notion HTML export. Accepts either a full document (only the
/// `<body>` contents are kept) or a fragment.
pub fn clean_notion_html(html: &str) -> String {
    let mut html = match BODY_RE.captures(html) {
        Some(caps) => caps[1].to_owned(),
        None => html.to_owned(),
    };

    // wrappers
    html = PAGE_DIV_RE.replace_all(&html, "").into_owned();
    html = BLOCK_DIV_RE.replace_all(&html, "").into_owned();
    html = ARTICLE_OPEN_RE.replace_all(&html, "").into_owned();
    html = ARTICLE_CLOSE_RE.replace_all(&html, "").into_owned();
    // every closing div goes, matched or not
    html = html.replace("</div>", "");

    html = H1_RE.replace_all(&html, "").into_owned();

    // attributes
    html = CLASS_RE.replace_all(&html, "").into_owned();
    html = ID_RE.replace_all(&html, "").into_owned();
    html = STYLE_RE.replace_all(&html, "").into_owned();
    html = DATA_RE.replace_all(&html, "").into_owned();
    html = FIGURE_RE.replace_all(&html, "<figure>").into_owned();

    html = html.replacen("<p>", &format!(r#"<p class="{}">"#, LEAD_CLASS), 1);

    html = BLANK_LINES_RE.replace_all(&html, "\n\n").into_owned();
    let html = html.trim();

    reflow(html)
}

/// One block element per line, list items indented.
fn reflow(html: &str) -> String {
    html.replace("<h2>", "\n<h2>")
        .replace("</h2>", "</h2>\n")
        .replace("<p", "\n<p")
        .replace("</p>", "</p>\n")
        .replace("<ul>", "\n<ul>\n")
        .replace("</ul>", "\n</ul>\n")
        .replace("<ol>", "\n<ol>\n")
        .replace("</ol>", "\n</ol>\n")
        .replace("<li>", "    <li>")
}
