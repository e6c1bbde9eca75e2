//! Exports the [`build_site`] function which stitches together the generated
//! outputs of the site: the writing page (pre-rendered through the same
//! [`SearchPager`] the page uses) along with the catalog data and script its
//! search reads, the sitemap ([`crate::sitemap`]), and the Atom feed
//! ([`crate::feed`]).

use crate::article::{Catalog, Error as CatalogError};
use crate::config::Config;
use crate::feed::{self, Error as FeedError, FeedConfig};
use crate::listing::SearchPager;
use crate::render::{Document, Visibility};
use crate::sitemap::{self, Error as SitemapError};
use crate::template::{site_context, Context, Error as TemplateError, Template, DEFAULT_WRITING_TEMPLATE};
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// The file names written into the output directory.
pub const WRITING_PAGE: &str = "writing.html";
pub const CATALOG_DATA: &str = "articles.json";
pub const SEARCH_SCRIPT: &str = "writing-search.js";
pub const SITEMAP: &str = "sitemap.xml";
pub const FEED: &str = "feed.atom";

/// The browser side of the writing page's search and infinite scroll.
pub const SEARCH_SCRIPT_SOURCE: &str = include_str!("../theme/writing-search.js");

/// What [`build_site`] produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub articles: usize,
    pub static_pages: usize,
    pub written: Vec<PathBuf>,
}

/// Builds the generated parts of the site into `output_directory`. `today`
/// is the last-modified date given to static pages in the sitemap.
pub fn build_site(config: &Config, output_directory: &Path, today: NaiveDate) -> Result<Summary> {
    let catalog = Catalog::load(&config.catalog_path)?;
    std::fs::create_dir_all(output_directory).map_err(|err| Error::CreateDir {
        path: output_directory.to_owned(),
        err,
    })?;

    let mut written = Vec::new();

    let writing_path = output_directory.join(WRITING_PAGE);
    std::fs::write(&writing_path, render_writing_page(config, &catalog, today)?)?;
    written.push(writing_path);

    let data_path = output_directory.join(CATALOG_DATA);
    write_catalog_data(&catalog, BufWriter::new(File::create(&data_path)?))?;
    written.push(data_path);

    let script_path = output_directory.join(SEARCH_SCRIPT);
    std::fs::write(&script_path, SEARCH_SCRIPT_SOURCE)?;
    written.push(script_path);

    let sitemap_path = output_directory.join(SITEMAP);
    write_sitemap(config, &catalog, today, BufWriter::new(File::create(&sitemap_path)?))?;
    written.push(sitemap_path);

    let feed_path = output_directory.join(FEED);
    feed::write_feed(
        &FeedConfig::from(config),
        catalog.records(),
        BufWriter::new(File::create(&feed_path)?),
    )?;
    written.push(feed_path);

    for path in &written {
        info!(path = %path.display(), "wrote");
    }
    Ok(Summary {
        articles: catalog.len(),
        static_pages: config.static_pages.len(),
        written,
    })
}

/// Renders the writing page with the first page of articles already in the
/// results container, so the archive works before (or without) the search
/// script. The indicators start out the way the script would leave them
/// after its initial load, and the container carries the pager cursor so the
/// script continues after the rendered page instead of repeating it.
pub fn render_writing_page(config: &Config, catalog: &Catalog, today: NaiveDate) -> Result<String> {
    let mut pager = SearchPager::new(catalog.records(), config.articles_per_page, Document::new());
    pager.load();
    let cursor = pager.cursor();
    let doc = pager.into_sink();

    let template = Template::load(config.writing_template.as_deref(), DEFAULT_WRITING_TEMPLATE)?;
    let canonical = config.url_for(WRITING_PAGE).map_err(|err| Error::Url {
        path: WRITING_PAGE.to_owned(),
        err,
    })?;
    let context = Context::new()
        .object("site", site_context(&config.site))
        .text("canonical", canonical.as_str())
        .raw("articles", doc.container_html())
        .raw("no_results", css(doc.no_results()))
        .raw("loading", css(doc.loading()))
        .raw("cursor", cursor.to_string())
        .raw("page_size", config.articles_per_page.to_string())
        .text("catalog", CATALOG_DATA)
        .text("search_script", SEARCH_SCRIPT)
        .raw("year", today.year().to_string());
    Ok(template.render(context)?)
}

/// Writes the catalog as a JSON array of records for the search script.
pub fn write_catalog_data<W: std::io::Write>(catalog: &Catalog, mut w: W) -> Result<()> {
    serde_json::to_writer(&mut w, catalog.records())?;
    w.flush()?;
    Ok(())
}

fn css(visibility: Option<Visibility>) -> &'static str {
    visibility.unwrap_or(Visibility::Hidden).css()
}

/// Writes the sitemap for `catalog` to `w`.
pub fn write_sitemap<W: std::io::Write>(
    config: &Config,
    catalog: &Catalog,
    today: NaiveDate,
    w: W,
) -> Result<()> {
    let entries = sitemap::entries(&config.site_root, &config.static_pages, catalog.records(), today)?;
    sitemap::write_sitemap(&entries, w)?;
    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during catalog loading,
/// templating, sitemap or feed generation, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading the catalog.
    Catalog(CatalogError),

    /// Returned for errors loading or rendering templates.
    Template(TemplateError),

    /// Returned for errors generating the sitemap.
    Sitemap(SitemapError),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for errors serializing the catalog data file.
    Json(serde_json::Error),

    /// Returned when a page path can't be joined onto the site URL.
    Url { path: String, err: url::ParseError },

    /// Returned for I/O problems while creating the output directory.
    CreateDir { path: PathBuf, err: std::io::Error },

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Catalog(err) => err.fmt(f),
            Error::Template(err) => err.fmt(f),
            Error::Sitemap(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Json(err) => err.fmt(f),
            Error::Url { path, err } => write!(f, "Invalid page path `{}`: {}", path, err),
            Error::CreateDir { path, err } => {
                write!(f, "Creating directory '{}': {}", path.display(), err)
            }
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Catalog(err) => Some(err),
            Error::Template(err) => Some(err),
            Error::Sitemap(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Url { path: _, err } => Some(err),
            Error::CreateDir { path: _, err } => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<CatalogError> for Error {
    /// Converts [`CatalogError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: CatalogError) -> Error {
        Error::Catalog(err)
    }
}

impl From<TemplateError> for Error {
    /// Converts [`TemplateError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: TemplateError) -> Error {
        Error::Template(err)
    }
}

impl From<SitemapError> for Error {
    /// Converts [`SitemapError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: SitemapError) -> Error {
        Error::Sitemap(err)
    }
}

impl From<serde_json::Error> for Error {
    /// Converts [`serde_json::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::article::{test::record, ArticleRecord};
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
    }

    fn testdata() -> Config {
        Config::from_directory(Path::new("./testdata")).unwrap()
    }

    #[test]
    fn test_build_site() -> Result<()> {
        let config = testdata();
        let out = tempfile::tempdir()?;
        let summary = build_site(&config, out.path(), today())?;

        assert_eq!(3, summary.articles);
        assert_eq!(2, summary.static_pages);
        assert_eq!(
            vec![
                out.path().join(WRITING_PAGE),
                out.path().join(CATALOG_DATA),
                out.path().join(SEARCH_SCRIPT),
                out.path().join(SITEMAP),
                out.path().join(FEED)
            ],
            summary.written
        );

        let data: Vec<ArticleRecord> =
            serde_json::from_reader(File::open(out.path().join(CATALOG_DATA))?)?;
        assert_eq!(Catalog::load(&config.catalog_path)?.records(), &data[..]);

        let script = std::fs::read_to_string(out.path().join(SEARCH_SCRIPT))?;
        assert_eq!(SEARCH_SCRIPT_SOURCE, script);

        let page = std::fs::read_to_string(out.path().join(WRITING_PAGE))?;
        assert!(page.contains(r#"<script src="writing-search.js"></script>"#));
        assert!(page.contains(r#"data-catalog="articles.json""#));

        let sitemap = std::fs::read_to_string(out.path().join(SITEMAP))?;
        assert_eq!(5, sitemap.matches("<url>").count());
        assert!(sitemap.contains("<lastmod>2026-02-01</lastmod>"));

        let feed = std::fs::read_to_string(out.path().join(FEED))?;
        assert_eq!(3, feed.matches("<entry>").count());
        Ok(())
    }

    #[test]
    fn test_writing_page_small_catalog() -> Result<()> {
        let config = testdata();
        let catalog = Catalog::load(&config.catalog_path)?;
        let page = render_writing_page(&config, &catalog, today())?;

        let first = page.find("articles/shipping-the-writing-page/").unwrap();
        let second = page.find("articles/what-product-managers-read/").unwrap();
        let third = page.find("articles/my-job-is-internet.html").unwrap();
        assert!(first < second && second < third);
        assert_eq!(3, page.matches(r#"<article class="blog-item""#).count());
        assert!(page.contains(r#"id="loadingIndicator" class="loading-indicator" style="display: none;""#));
        assert!(page.contains(r#"id="noResults" class="no-results" style="display: none;""#));
        assert!(page.contains(r#"<link rel="canonical" href="https://paulinamei.com/writing.html">"#));
        assert!(page.contains(r#"data-page-size="10" data-cursor="1""#));
        Ok(())
    }

    #[test]
    fn test_writing_page_renders_first_page_only() -> Result<()> {
        let mut config = testdata();
        config.articles_per_page = 2;
        let records = (0..5)
            .map(|i| record(&format!("Post {}", i), "", &format!("articles/p{}/", i), "2025-01-01"))
            .collect();
        let catalog = Catalog::new(records)?;
        let page = render_writing_page(&config, &catalog, today())?;

        assert_eq!(2, page.matches(r#"<article class="blog-item""#).count());
        assert!(page.contains("articles/p1/"));
        assert!(!page.contains("articles/p2/"));
        assert!(page.contains(r#"class="loading-indicator" style="display: block;""#));
        assert!(page.contains(r#"data-page-size="2" data-cursor="1""#));
        Ok(())
    }
}
