//! Writes an XML sitemap with one `<url>` entry for every static page and
//! every article in the catalog.

use std::fmt;
use std::io::{self, Write};

use chrono::NaiveDate;
use url::Url;

use crate::article::ArticleRecord;
use crate::config::StaticPage;
use crate::escape::EscapeHtml;

/// How often article pages are expected to change.
pub const ARTICLE_CHANGEFREQ: &str = "monthly";

/// The priority given to article pages.
pub const ARTICLE_PRIORITY: &str = "0.8";

const XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One `<url>` entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub loc: Url,
    pub lastmod: String,
    pub changefreq: String,
    pub priority: String,
}

/// Builds the sitemap entries: static pages first (last modified `today`),
/// then articles in catalog order (last modified on their publish date).
/// `site_root` must end in a slash.
pub fn entries(
    site_root: &Url,
    static_pages: &[StaticPage],
    articles: &[ArticleRecord],
    today: NaiveDate,
) -> Result<Vec<Entry>> {
    let today = today.format("%Y-%m-%d").to_string();
    let mut entries = Vec::with_capacity(static_pages.len() + articles.len());
    for page in static_pages {
        entries.push(Entry {
            loc: join(site_root, &page.path)?,
            lastmod: today.clone(),
            changefreq: page.changefreq.clone(),
            priority: page.priority.clone(),
        });
    }
    for article in articles {
        entries.push(Entry {
            loc: join(site_root, &article.url)?,
            lastmod: article.date.clone(),
            changefreq: ARTICLE_CHANGEFREQ.to_owned(),
            priority: ARTICLE_PRIORITY.to_owned(),
        });
    }
    Ok(entries)
}

fn join(site_root: &Url, path: &str) -> Result<Url> {
    site_root
        .join(path.trim_start_matches('/'))
        .map_err(|err| Error::Url {
            path: path.to_owned(),
            err,
        })
}

/// Writes `entries` as a sitemap document to `w`.
pub fn write_sitemap<W: Write>(entries: &[Entry], mut w: W) -> Result<()> {
    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(w, r#"<urlset xmlns="{}">"#, XMLNS)?;
    for entry in entries {
        writeln!(w, "  <url>")?;
        writeln!(w, "    <loc>{}</loc>", EscapeHtml(entry.loc.as_str()))?;
        writeln!(w, "    <lastmod>{}</lastmod>", EscapeHtml(&entry.lastmod))?;
        writeln!(w, "    <changefreq>{}</changefreq>", EscapeHtml(&entry.changefreq))?;
        writeln!(w, "    <priority>{}</priority>", EscapeHtml(&entry.priority))?;
        writeln!(w, "  </url>")?;
    }
    writeln!(w, "</urlset>")?;
    w.flush()?;
    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem generating the sitemap.
#[derive(Debug)]
pub enum Error {
    /// Returned when a page path can't be joined onto the site URL.
    Url { path: String, err: url::ParseError },

    /// Returned for errors writing the document.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Url { path, err } => write!(f, "Invalid page path `{}`: {}", path, err),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Url { path: _, err } => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts [`io::Error`]s into [`Error`]. This allows us to use the `?`
    /// operator when writing.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
