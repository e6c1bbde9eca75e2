//! The display side of the writing page: the [`RenderSink`] trait, the HTML
//! fragment for one article, and [`Document`], an in-memory sink that stands
//! in for the page's results container and indicators.

use std::fmt::Write;

use crate::article::ArticleRecord;
use crate::date;
use crate::escape::{EscapeHref, EscapeHtml};

/// A surface that article fragments are rendered into. Mirrors the elements
/// the writing page exposes: a results container plus "no results" and
/// "loading" indicators.
pub trait RenderSink {
    /// Removes every fragment from the results container.
    fn clear(&mut self);

    /// Appends a fragment to the end of the results container.
    fn append(&mut self, fragment: &str);

    /// Shows or hides the "no results" indicator.
    fn set_no_results(&mut self, visible: bool);

    /// Shows or hides the "loading" indicator.
    fn set_loading(&mut self, visible: bool);
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    fn clear(&mut self) {
        (**self).clear()
    }

    fn append(&mut self, fragment: &str) {
        (**self).append(fragment)
    }

    fn set_no_results(&mut self, visible: bool) {
        (**self).set_no_results(visible)
    }

    fn set_loading(&mut self, visible: bool) {
        (**self).set_loading(visible)
    }
}

/// Renders the listing fragment for a single article.
pub fn article_fragment(article: &ArticleRecord) -> String {
    let mut out = String::new();
    // writing into a String can't fail
    let _ = write!(
        out,
        r#"
<article class="blog-item" data-title="{title}" data-content="{content}">
    <a href="{url}" class="blog-link">
        <div class="blog-info">
            <h3>{title}</h3>
            <p>{description}</p>
        </div>
        <span class="blog-date">{date}</span>
    </a>
</article>
"#,
        title = EscapeHtml(&article.title),
        content = EscapeHtml(&article.content),
        url = EscapeHref(&article.url),
        description = EscapeHtml(&article.description),
        date = date::format_month_year(&article.date),
    );
    out
}

/// Visibility of an indicator element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    Hidden,
}

impl Visibility {
    /// The inline CSS `display` value for the indicator.
    pub fn css(self) -> &'static str {
        match self {
            Visibility::Shown => "block",
            Visibility::Hidden => "none",
        }
    }
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Visibility {
        match visible {
            true => Visibility::Shown,
            false => Visibility::Hidden,
        }
    }
}

/// An in-memory page. Any element may be missing, in which case operations
/// on it do nothing, just as the browser script skips elements it can't find.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    container: Option<Vec<String>>,
    no_results: Option<Visibility>,
    loading: Option<Visibility>,
}

impl Document {
    /// A document with all three elements present. The "loading" indicator
    /// starts out shown and "no results" hidden, as in the page markup.
    pub fn new() -> Document {
        Document {
            container: Some(Vec::new()),
            no_results: Some(Visibility::Hidden),
            loading: Some(Visibility::Shown),
        }
    }

    /// A document that has the results container but no indicators.
    pub fn without_indicators() -> Document {
        Document {
            container: Some(Vec::new()),
            no_results: None,
            loading: None,
        }
    }

    /// The fragments in the results container, or `None` if there is no
    /// container.
    pub fn fragments(&self) -> Option<&[String]> {
        self.container.as_deref()
    }

    /// The concatenated HTML of the results container.
    pub fn container_html(&self) -> String {
        self.fragments().map(|f| f.concat()).unwrap_or_default()
    }

    pub fn no_results(&self) -> Option<Visibility> {
        self.no_results
    }

    pub fn loading(&self) -> Option<Visibility> {
        self.loading
    }
}

impl RenderSink for Document {
    fn clear(&mut self) {
        if let Some(container) = &mut self.container {
            container.clear();
        }
    }

    fn append(&mut self, fragment: &str) {
        if let Some(container) = &mut self.container {
            container.push(fragment.to_owned());
        }
    }

    fn set_no_results(&mut self, visible: bool) {
        if let Some(indicator) = &mut self.no_results {
            *indicator = visible.into();
        }
    }

    fn set_loading(&mut self, visible: bool) {
        if let Some(indicator) = &mut self.loading {
            *indicator = visible.into();
        }
    }
}
