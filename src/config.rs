//! Loads the site settings object from `folio.yaml` and resolves it into a
//! [`Config`] whose paths are rooted at the project directory.

use crate::util::open;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "folio.yaml";

#[derive(Deserialize)]
struct PageSize(usize);
impl Default for PageSize {
    fn default() -> Self {
        PageSize(10)
    }
}

#[derive(Deserialize)]
struct Project {
    site: Site,

    #[serde(default)]
    articles_per_page: PageSize,

    #[serde(default = "default_catalog")]
    catalog: PathBuf,

    #[serde(default = "default_articles_directory")]
    articles_directory: PathBuf,

    #[serde(default = "default_static_pages")]
    static_pages: Vec<StaticPage>,

    #[serde(default)]
    templates: Templates,
}

fn default_catalog() -> PathBuf {
    PathBuf::from("articles.yaml")
}

fn default_articles_directory() -> PathBuf {
    PathBuf::from("articles")
}

fn default_static_pages() -> Vec<StaticPage> {
    vec![
        StaticPage {
            path: String::new(),
            changefreq: "weekly".to_owned(),
            priority: "1.0".to_owned(),
        },
        StaticPage {
            path: "writing.html".to_owned(),
            changefreq: "weekly".to_owned(),
            priority: "0.9".to_owned(),
        },
    ]
}

fn default_profile_image() -> String {
    "profile.jpg".to_owned()
}

/// Site-wide metadata shared by every page template.
#[derive(Clone, Debug, Deserialize)]
pub struct Site {
    /// The public root of the site, e.g. `https://paulinamei.com`.
    pub url: Url,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default = "default_profile_image")]
    pub profile_image: String,
}

/// A non-article page listed in the sitemap.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct StaticPage {
    /// The path relative to the site root; empty for the home page.
    pub path: String,
    pub changefreq: String,
    pub priority: String,
}

/// Optional template overrides, relative to the project directory.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Templates {
    #[serde(default)]
    pub article: Option<PathBuf>,
    #[serde(default)]
    pub writing: Option<PathBuf>,
}

pub struct Config {
    pub site: Site,

    /// The directory containing `folio.yaml`.
    pub root_directory: PathBuf,

    /// The site URL with a trailing slash, so relative paths join beneath it.
    pub site_root: Url,
    pub catalog_path: PathBuf,

    /// Where new article pages are written.
    pub articles_directory: PathBuf,

    /// The site-relative URL path of `articles_directory`, without leading or
    /// trailing slashes (e.g. `articles`).
    pub articles_base: String,
    pub articles_per_page: usize,
    pub static_pages: Vec<StaticPage>,
    pub article_template: Option<PathBuf>,
    pub writing_template: Option<PathBuf>,
}

impl Config {
    /// Finds `folio.yaml` in `dir` or the nearest parent directory that has
    /// one and loads it. A relative `dir` is resolved against the current
    /// directory first, so its real parents are searched too.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let dir = std::path::absolute(dir)
            .with_context(|| format!("Resolving project directory `{}`", dir.display()))?;
        Config::search(&dir)
    }

    fn search(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path).context("Loading configuration")
        } else {
            match dir.parent() {
                Some(parent) => Config::search(parent),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    pub fn from_project_file(path: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)
            .with_context(|| format!("Parsing `{}`", path.display()))?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => {
                let config = Config::from_project(project, project_root)?;
                debug!(
                    root = %config.root_directory.display(),
                    site = %config.site_root,
                    "loaded configuration"
                );
                Ok(config)
            }
        }
    }

    fn from_project(project: Project, project_root: &Path) -> Result<Config> {
        if project.articles_per_page.0 == 0 {
            return Err(anyhow!("`articles_per_page` must be greater than zero"));
        }
        Ok(Config {
            site_root: with_trailing_slash(&project.site.url),
            site: project.site,
            root_directory: project_root.to_owned(),
            catalog_path: project_root.join(project.catalog),
            articles_base: url_path(&project.articles_directory),
            articles_directory: project_root.join(project.articles_directory),
            articles_per_page: project.articles_per_page.0,
            static_pages: project.static_pages,
            article_template: project.templates.article.map(|p| project_root.join(p)),
            writing_template: project.templates.writing.map(|p| project_root.join(p)),
        })
    }

    /// Resolves a site-relative path (e.g. `articles/foo/`) to an absolute
    /// URL under the site root.
    pub fn url_for(&self, path: &str) -> std::result::Result<Url, url::ParseError> {
        self.site_root.join(path.trim_start_matches('/'))
    }
}

fn url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

// NOTE: without a trailing slash, [`Url::join`] treats the last path segment
// as a file name and replaces it.
fn with_trailing_slash(url: &Url) -> Url {
    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_testdata_project() -> Result<()> {
        let config = Config::from_directory(Path::new("./testdata"))?;
        assert_eq!("Paulina Mei", config.site.author);
        assert_eq!("https://paulinamei.com/", config.site_root.as_str());
        assert_eq!(10, config.articles_per_page);
        assert_eq!(std::path::absolute("testdata/articles.yaml")?, config.catalog_path);
        assert_eq!("articles", config.articles_base);
        assert_eq!(2, config.static_pages.len());
        assert_eq!("0.9", config.static_pages[1].priority);
        assert_eq!("profile.jpg", config.site.profile_image);
        Ok(())
    }

    #[test]
    fn test_searches_parent_directories() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join(PROJECT_FILE),
            "site:\n  url: https://example.org/blog\n  title: Example\n  author: Ex\n",
        )?;
        let nested = dir.path().join("articles").join("deep");
        std::fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested)?;
        assert_eq!(dir.path(), config.root_directory);
        assert_eq!(
            "https://example.org/blog/articles/foo/",
            config.url_for("articles/foo/")?.as_str()
        );
        assert_eq!("https://example.org/blog/", config.url_for("")?.as_str());
        Ok(())
    }

    #[test]
    fn test_relative_directory_is_resolved() -> Result<()> {
        let config = Config::from_directory(Path::new("testdata/drafts/unpublished"))?;
        assert!(config.root_directory.is_absolute());
        assert_eq!(std::path::absolute("testdata")?, config.root_directory);

        let config = Config::from_directory(Path::new("./testdata/."))?;
        assert_eq!(std::path::absolute("testdata")?, config.root_directory);
        Ok(())
    }

    #[test]
    fn test_rejects_zero_page_size() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join(PROJECT_FILE),
            "site:\n  url: https://example.org\n  title: Example\n  author: Ex\narticles_per_page: 0\n",
        )?;
        assert!(Config::from_directory(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_missing_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = match Config::from_project_file(&dir.path().join(PROJECT_FILE)) {
            Ok(_) => panic!("wanted an error"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("Opening project file"));
    }
}
