//! Page templates. Templates use Go template syntax via [`gtmpl`]; the
//! defaults under `theme/` are compiled in and can be overridden per project.
//! Template context values are plain strings that callers escape before
//! insertion, since [`gtmpl`] doesn't escape anything itself.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use gtmpl::Value;

use crate::config::Site;
use crate::escape;

/// The built-in article page template.
pub const DEFAULT_ARTICLE_TEMPLATE: &str = include_str!("../theme/article.html");

/// The built-in writing (article archive) page template.
pub const DEFAULT_WRITING_TEMPLATE: &str = include_str!("../theme/writing.html");

/// A parsed-on-demand page template.
pub struct Template {
    source: String,
}

impl Template {
    pub fn from_source(source: &str) -> Template {
        Template {
            source: source.to_owned(),
        }
    }

    /// Loads the template at `path`, or falls back to `default` when no
    /// override is configured.
    pub fn load(path: Option<&Path>, default: &str) -> Result<Template> {
        match path {
            None => Ok(Template::from_source(default)),
            Some(path) => {
                let mut source = String::new();
                File::open(path)
                    .map_err(|err| Error::Open {
                        path: path.to_owned(),
                        err,
                    })?
                    .read_to_string(&mut source)?;
                Ok(Template { source })
            }
        }
    }

    /// Applies the template to `context`.
    pub fn render(&self, context: Context) -> Result<String> {
        gtmpl::template(&self.source, Value::Object(context.0))
            .map_err(|e| Error::Render(e.to_string()))
    }
}

/// A template context: a map of names to values.
#[derive(Clone, Debug, Default)]
pub struct Context(HashMap<String, Value>);

impl Context {
    pub fn new() -> Context {
        Context::default()
    }

    /// Inserts `value` as-is. Use for pre-rendered HTML.
    pub fn raw(mut self, key: &str, value: impl Into<String>) -> Context {
        self.0.insert(key.to_owned(), Value::String(value.into()));
        self
    }

    /// Inserts `value` with HTML escaping.
    pub fn text(self, key: &str, value: &str) -> Context {
        self.raw(key, escape::html(value))
    }

    /// Inserts a boolean for `{{ if }}` checks.
    pub fn flag(mut self, key: &str, value: bool) -> Context {
        self.0.insert(key.to_owned(), Value::Bool(value));
        self
    }

    /// Inserts a nested context.
    pub fn object(mut self, key: &str, value: Context) -> Context {
        self.0.insert(key.to_owned(), Value::Object(value.0));
        self
    }
}

/// The `site` object available to every template. `has_email` and
/// `has_linkedin` say whether the optional contact links are configured.
pub fn site_context(site: &Site) -> Context {
    Context::new()
        .flag("has_email", site.email.is_some())
        .flag("has_linkedin", site.linkedin.is_some())
        .text("url", site.url.as_str())
        .text("title", &site.title)
        .text("author", &site.author)
        .text("description", &site.description)
        .text("email", site.email.as_deref().unwrap_or_default())
        .text("linkedin", site.linkedin.as_deref().unwrap_or_default())
        .text("profile_image", &site.profile_image)
}

/// The result of a template operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading or rendering a template.
#[derive(Debug)]
pub enum Error {
    /// Returned when a template override can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing or executing a template.
    Render(String),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Open { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::Render(err) => write!(f, "Rendering template: {}", err),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { path: _, err } => Some(err),
            Error::Render(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator for fallible I/O operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
