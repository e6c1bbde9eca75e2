//! Creates new articles: prompts for the article's details, renders its page
//! from the article template, and prepends a record to the catalog.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::info;

use crate::article::{self, ArticleRecord, Catalog};
use crate::config::Config;
use crate::date;
use crate::markdown;
use crate::template::{self, site_context, Context, Template, DEFAULT_ARTICLE_TEMPLATE};

/// The line that ends multi-line content input.
pub const END_OF_CONTENT: &str = "DONE";

/// The search excerpt keeps at most this many characters of the body text.
pub const EXCERPT_CHARS: usize = 200;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// The details gathered for a new article.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub description: String,

    /// `YYYY-MM-DD`.
    pub date: String,

    /// The article body, HTML or markdown depending on `markdown`.
    pub content: String,
    pub markdown: bool,
}

impl Draft {
    /// The body as HTML.
    pub fn html(&self) -> String {
        match self.markdown {
            true => markdown::to_html(&self.content),
            false => self.content.trim().to_owned(),
        }
    }

    /// The searchable excerpt stored in the catalog: the body's text with
    /// markup removed and whitespace collapsed, cut to [`EXCERPT_CHARS`] and
    /// followed by `...`.
    pub fn excerpt(&self) -> String {
        let text = match self.markdown {
            true => markdown::to_plain_text(&self.content),
            false => strip_tags(&self.content),
        };
        let mut excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
        excerpt.push_str("...");
        excerpt
    }
}

/// Replaces tags with spaces and collapses whitespace.
pub fn strip_tags(html: &str) -> String {
    TAG_RE
        .replace_all(html, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Asks questions on `output` and reads answers from `input`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Prints `query` and reads one line, without its line ending. Returns
    /// `None` at end of input.
    pub fn ask(&mut self, query: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", query)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(&['\r', '\n'][..]).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Reads lines until one is exactly [`END_OF_CONTENT`] or input ends.
    pub fn read_block(&mut self) -> io::Result<String> {
        let mut content = String::new();
        while let Some(line) = self.ask("")? {
            if line == END_OF_CONTENT {
                break;
            }
            content.push_str(&line);
            content.push('\n');
        }
        Ok(content)
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }

    /// Runs the interactive questionnaire. A blank date means `today`.
    pub fn draft(&mut self, today: NaiveDate, markdown: bool) -> Result<Draft> {
        let title = self.required("Article title: ")?;
        let description = self.required("Brief description (1-2 sentences): ")?;
        let answer = self
            .ask("Publish date (YYYY-MM-DD, or press Enter for today): ")?
            .unwrap_or_default();
        let date = match answer.trim() {
            "" => today.format("%Y-%m-%d").to_string(),
            d if date::parse(d).is_some() => d.to_owned(),
            d => return Err(Error::InvalidDate(d.to_owned())),
        };

        self.say("")?;
        self.say(match markdown {
            true => "Article content (Markdown format):",
            false => "Article content (HTML format):",
        })?;
        self.say(&format!(
            "Tip: You can paste your content below. Type \"{}\" on a new line when finished.",
            END_OF_CONTENT
        ))?;
        self.say("")?;
        let content = self.read_block()?;

        Ok(Draft {
            title: title.trim().to_owned(),
            description: description.trim().to_owned(),
            date,
            content,
            markdown,
        })
    }

    fn required(&mut self, query: &str) -> Result<String> {
        self.ask(query)?.ok_or(Error::UnexpectedEof)
    }
}

/// Where a new article ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Created {
    pub slug: String,

    /// The article page on disk.
    pub page_path: PathBuf,

    /// The catalog record that was prepended.
    pub record: ArticleRecord,
}

/// Turns a title into a URL-friendly slug.
pub fn slugify(title: &str) -> String {
    slug::slugify(title)
}

/// Writes the page for `draft` and prepends its record to the catalog.
/// Nothing is written if the draft can't be added to the catalog (e.g. an
/// article with the same URL already exists).
pub fn create_article(config: &Config, draft: &Draft, today: NaiveDate) -> Result<Created> {
    let slug = slugify(&draft.title);
    if slug.is_empty() {
        return Err(Error::EmptySlug(draft.title.clone()));
    }

    let url = format!("{}/", join_url_path(&config.articles_base, &slug));
    let record = ArticleRecord {
        title: draft.title.clone(),
        description: draft.description.clone(),
        content: draft.excerpt(),
        url,
        date: draft.date.clone(),
    };

    let mut catalog = Catalog::load(&config.catalog_path)?;
    catalog.prepend(record.clone())?;

    let template = Template::load(config.article_template.as_deref(), DEFAULT_ARTICLE_TEMPLATE)?;
    let page = render_page(config, &template, draft, &record, today)?;

    let dir = config.articles_directory.join(&slug);
    std::fs::create_dir_all(&dir)?;
    let page_path = dir.join("index.html");
    std::fs::write(&page_path, page)?;
    info!(path = %page_path.display(), "wrote article page");

    catalog.save(&config.catalog_path)?;
    info!(path = %config.catalog_path.display(), url = %record.url, "added article to catalog");

    Ok(Created {
        slug,
        page_path,
        record,
    })
}

fn join_url_path(base: &str, slug: &str) -> String {
    match base.is_empty() {
        true => slug.to_owned(),
        false => format!("{}/{}", base, slug),
    }
}

/// Renders the article page. The page lives at `{record.url}index.html`, so
/// site assets are reached through one `../` per directory level.
pub fn render_page(
    config: &Config,
    template: &Template,
    draft: &Draft,
    record: &ArticleRecord,
    today: NaiveDate,
) -> Result<String> {
    let depth = record.url.trim_matches('/').split('/').count();
    let canonical = config.url_for(&record.url)?;
    let image = config.url_for(&config.site.profile_image)?;
    let context = Context::new()
        .object("site", site_context(&config.site))
        .text("title", &draft.title)
        .text("description", &draft.description)
        .text("date", &draft.date)
        .text("long_date", &date::format_long(&draft.date))
        .text("canonical", canonical.as_str())
        .text("image", image.as_str())
        .raw("root", "../".repeat(depth))
        .raw("content", draft.html())
        .raw("year", today.year().to_string());
    Ok(template.render(context)?)
}

/// The result of a scaffolding operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error creating an article.
#[derive(Debug)]
pub enum Error {
    /// Returned when input ends before a required answer is given.
    UnexpectedEof,

    /// Returned when the publish date isn't `YYYY-MM-DD`.
    InvalidDate(String),

    /// Returned when the title has nothing to build a slug from.
    EmptySlug(String),

    /// Returned for catalog problems, including duplicate URLs.
    Catalog(article::Error),

    /// Returned for template problems.
    Template(template::Error),

    /// Returned when the article URL can't be joined onto the site URL.
    UrlParse(url::ParseError),

    /// Returned for other I/O errors.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnexpectedEof => write!(f, "input ended before the article was complete"),
            Error::InvalidDate(d) => write!(f, "invalid publish date `{}`; expected YYYY-MM-DD", d),
            Error::EmptySlug(title) => write!(f, "can't make a URL slug from title `{}`", title),
            Error::Catalog(err) => err.fmt(f),
            Error::Template(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UnexpectedEof => None,
            Error::InvalidDate(_) => None,
            Error::EmptySlug(_) => None,
            Error::Catalog(err) => Some(err),
            Error::Template(err) => Some(err),
            Error::UrlParse(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<article::Error> for Error {
    fn from(err: article::Error) -> Error {
        Error::Catalog(err)
    }
}

impl From<template::Error> for Error {
    fn from(err: template::Error) -> Error {
        Error::Template(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
