//! Markdown support for article bodies: HTML rendering for the article page
//! and plain text for the catalog's search excerpt.

use pulldown_cmark::{html, Event, Options, Parser, Tag};

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Converts markdown to HTML.
///
/// Headings are demoted one level so they sit beneath the article title,
/// which is the page's `h1` (`#` becomes `h2`, and so on, bottoming out at
/// `h6`).
pub fn to_html(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(
        &mut out,
        Parser::new_ext(markdown, options()).map(demote_headings),
    );
    out
}

fn demote_headings(ev: Event) -> Event {
    match ev {
        Event::Start(Tag::Heading(level)) => Event::Start(Tag::Heading((level + 1).min(6))),
        Event::End(Tag::Heading(level)) => Event::End(Tag::Heading((level + 1).min(6))),
        _ => ev,
    }
}

/// Extracts the readable text of a markdown document with whitespace
/// collapsed, dropping markup, link targets, and raw HTML.
pub fn to_plain_text(markdown: &str) -> String {
    let mut out = String::new();
    for ev in Parser::new_ext(markdown, options()) {
        match ev {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(Tag::Paragraph)
            | Event::End(Tag::Heading(_))
            | Event::End(Tag::Item)
            | Event::End(Tag::TableCell) => out.push(' '),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_headings_are_demoted() {
        let html = to_html("# Title\n\n###### Tiny\n\nBody");
        assert!(html.contains("<h2>Title</h2>"), "{}", html);
        assert!(html.contains("<h6>Tiny</h6>"), "{}", html);
        assert!(html.contains("<p>Body</p>"), "{}", html);
    }

    #[test]
    fn test_tables_and_strikethrough() {
        let html = to_html("| a |\n|---|\n| b |\n\n~~gone~~");
        assert!(html.contains("<table>"), "{}", html);
        assert!(html.contains("<del>gone</del>"), "{}", html);
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            "Hello world. Some code and a link.",
            to_plain_text("# Hello\n\nworld. Some `code` and\n[a link](https://example.org).")
        );
        assert_eq!("one two", to_plain_text("- one\n- two\n"));
    }
}
