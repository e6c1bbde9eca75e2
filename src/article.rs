//! Defines the [`ArticleRecord`], [`Catalog`], and [`Error`] types. The
//! catalog is a YAML document holding a sequence of records, newest first by
//! convention. It is the single source of article data for the writing page,
//! the sitemap, and the feed.

use std::{
    collections::HashSet,
    fmt,
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::date;

/// A single blog post's metadata and search excerpt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// The display title. Must not be empty.
    pub title: String,

    /// A short display description.
    pub description: String,

    /// A plain-text excerpt used only for searching. It is not necessarily
    /// the full article body.
    pub content: String,

    /// The relative path to the rendered article page, e.g.
    /// `articles/my-job-is-internet.html`. Unique across the catalog.
    pub url: String,

    /// The publish date as `YYYY-MM-DD`.
    pub date: String,
}

/// The full, ordered list of [`ArticleRecord`]s. Order is presentation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<ArticleRecord>,
}

impl Catalog {
    /// Builds a catalog from records, checking the catalog invariants.
    pub fn new(records: Vec<ArticleRecord>) -> Result<Catalog> {
        let mut seen: HashSet<&str> = HashSet::new();
        for record in &records {
            validate(record)?;
            if !seen.insert(&record.url) {
                return Err(Error::DuplicateUrl(record.url.clone()));
            }
        }
        Ok(Catalog { records })
    }

    /// Parses a catalog from a YAML sequence of records.
    pub fn from_reader<R: Read>(r: R) -> Result<Catalog> {
        let records: Vec<ArticleRecord> = serde_yaml::from_reader(r)?;
        Catalog::new(records)
    }

    /// Loads the catalog file at `path`.
    pub fn load(path: &Path) -> Result<Catalog> {
        let file = File::open(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        match Catalog::from_reader(file) {
            Ok(catalog) => {
                debug!(
                    path = %path.display(),
                    articles = catalog.len(),
                    "loaded catalog"
                );
                Ok(catalog)
            }
            Err(e) => Err(Error::Annotated(
                format!("loading catalog `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    /// Writes the catalog back out as YAML.
    pub fn write_to<W: Write>(&self, w: W) -> Result<()> {
        serde_yaml::to_writer(w, &self.records)?;
        Ok(())
    }

    /// Overwrites the catalog file at `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.write_to(File::create(path)?)
    }

    /// Inserts `record` at the front of the catalog, which is where new
    /// articles go. Fails without modifying the catalog if the record is
    /// invalid or its URL is already taken.
    pub fn prepend(&mut self, record: ArticleRecord) -> Result<()> {
        validate(&record)?;
        if self.records.iter().any(|r| r.url == record.url) {
            return Err(Error::DuplicateUrl(record.url));
        }
        self.records.insert(0, record);
        Ok(())
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn validate(record: &ArticleRecord) -> Result<()> {
    if record.title.trim().is_empty() {
        return Err(Error::EmptyTitle(record.url.clone()));
    }
    if record.url.starts_with("//") || url::Url::parse(&record.url).is_ok() {
        return Err(Error::AbsoluteUrl(record.url.clone()));
    }
    if date::parse(&record.date).is_none() {
        warn!(url = %record.url, date = %record.date, "article date is not YYYY-MM-DD");
    }
    Ok(())
}

/// Represents the result of a catalog operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading, validating, or saving a [`Catalog`].
#[derive(Debug)]
pub enum Error {
    /// Returned when two records share a URL.
    DuplicateUrl(String),

    /// Returned when a record has a blank title. Carries the record's URL.
    EmptyTitle(String),

    /// Returned when a record's URL isn't relative to the site root (it has a
    /// scheme or a host).
    AbsoluteUrl(String),

    /// Returned when the catalog file can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the catalog isn't a valid YAML sequence of records.
    Yaml(serde_yaml::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DuplicateUrl(url) => {
                write!(f, "duplicate article url `{}`", url)
            }
            Error::EmptyTitle(url) => {
                write!(f, "article `{}` has an empty title", url)
            }
            Error::AbsoluteUrl(url) => {
                write!(f, "article url `{}` must be relative to the site root", url)
            }
            Error::Open { path, err } => {
                write!(f, "opening catalog file `{}`: {}", path.display(), err)
            }
            Error::Yaml(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DuplicateUrl(_) => None,
            Error::EmptyTitle(_) => None,
            Error::AbsoluteUrl(_) => None,
            Error::Open { path: _, err } => Some(err),
            Error::Yaml(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] (de)serialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::Yaml(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
