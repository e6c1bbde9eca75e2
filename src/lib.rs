//! The library code for `folio`, the tooling behind a static portfolio blog.
//! The architecture can be generally broken down into two halves:
//!
//! 1. The listing: loading the article catalog ([`crate::article`]),
//!    narrowing it with a search query ([`crate::search`]), slicing it into
//!    pages ([`crate::pager`]), and pushing HTML fragments for those pages into
//!    a display surface ([`crate::render`]). [`crate::listing::SearchPager`]
//!    owns all of the per-page-load state and reacts to input, key, and scroll
//!    events.
//! 2. The authoring tools: building the writing page, sitemap, and feed
//!    ([`crate::build`]), cleaning exported HTML ([`crate::clean`]), and
//!    scaffolding new articles ([`crate::scaffold`]).
//!
//! Both halves read the same structured catalog file, so nothing ever has to
//! scrape article data back out of generated pages or scripts.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod article;
pub mod build;
pub mod clean;
pub mod config;
pub mod date;
pub mod escape;
pub mod feed;
pub mod listing;
pub mod markdown;
pub mod pager;
pub mod render;
pub mod scaffold;
pub mod search;
pub mod sitemap;
pub mod template;
pub mod util;
