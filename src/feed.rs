//! Support for creating an Atom feed from the article catalog.

use crate::article::ArticleRecord;
use crate::config::Config;
use crate::date;
use atom_syndication::{Entry, Error as AtomError, Feed, Link, Person, Text};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use std::fmt;
use std::io::Write;
use tracing::warn;
use url::Url;

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub author: String,
    pub email: Option<String>,

    /// The site root; also used as the feed ID.
    pub site_root: Url,
}

impl From<&Config> for FeedConfig {
    fn from(config: &Config) -> FeedConfig {
        FeedConfig {
            title: config.site.title.clone(),
            author: config.site.author.clone(),
            email: config.site.email.clone(),
            site_root: config.site_root.clone(),
        }
    }
}

/// Creates a feed from some configuration ([`FeedConfig`]) and the catalog
/// and writes the result to a [`std::io::Write`]. Articles whose dates don't
/// parse are left out with a warning. The feed's `updated` time is the
/// newest article date, so rebuilding an unchanged catalog gives the same
/// document.
pub fn write_feed<W: Write>(config: &FeedConfig, articles: &[ArticleRecord], w: W) -> Result<()> {
    feed(config, articles)?.write_to(w)?;
    Ok(())
}

fn feed(config: &FeedConfig, articles: &[ArticleRecord]) -> Result<Feed> {
    let entries = feed_entries(config, articles)?;
    let updated = entries
        .iter()
        .map(|e| *e.updated())
        .max()
        .unwrap_or_else(|| midnight(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()));

    let mut feed = Feed::default();
    feed.set_title(config.title.clone());
    feed.set_id(config.site_root.to_string());
    feed.set_updated(updated);
    feed.set_authors(vec![author(config)]);
    feed.set_links(vec![alternate(config.site_root.as_str())]);
    feed.set_entries(entries);
    Ok(feed)
}

fn feed_entries(config: &FeedConfig, articles: &[ArticleRecord]) -> Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = Vec::with_capacity(articles.len());

    for article in articles {
        let published = match date::parse(&article.date) {
            Some(d) => midnight(d),
            None => {
                warn!(url = %article.url, date = %article.date, "leaving article out of feed");
                continue;
            }
        };
        let url = config
            .site_root
            .join(article.url.trim_start_matches('/'))
            .map_err(|err| Error::Url {
                path: article.url.clone(),
                err,
            })?;

        let mut entry = Entry::default();
        entry.set_id(url.to_string());
        entry.set_title(article.title.clone());
        entry.set_updated(published);
        entry.set_published(Some(published));
        entry.set_authors(vec![author(config)]);
        entry.set_links(vec![alternate(url.as_str())]);
        entry.set_summary(Some(Text::from(article.description.clone())));
        entries.push(entry);
    }
    Ok(entries)
}

fn midnight(d: NaiveDate) -> DateTime<FixedOffset> {
    let naive = d.and_hms_opt(0, 0, 0).unwrap_or_default();
    Utc.from_utc_datetime(&naive).into()
}

fn alternate(href: &str) -> Link {
    let mut link = Link::default();
    link.set_href(href);
    link.set_rel("alternate");
    link
}

fn author(config: &FeedConfig) -> Person {
    let mut person = Person::default();
    person.set_name(config.author.clone());
    person.set_email(config.email.clone());
    person
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include I/O, Atom, and URL
/// issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when an article URL can't be joined onto the site root.
    Url { path: String, err: url::ParseError },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::Url { path, err } => write!(f, "Invalid article url `{}`: {}", path, err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::Url { path: _, err } => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}
