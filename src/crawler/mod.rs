//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of pages
//! - HTML parsing and link extraction
//! - The breadth-first frontier with depth and page budgets
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{CrawlReport, Crawler, PageFailure};
pub use fetcher::{build_http_client, PageFetcher, RawPage};
pub use frontier::{CrawlBudget, CrawlTarget, Frontier};
pub use parser::{HtmlLinkExtractor, LinkExtractor};

pub(crate) use fetcher::http_client_builder;
