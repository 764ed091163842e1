//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the frontier, fetcher,
//! link extractor and classifier together. Pages are processed one at a
//! time; cancellation is observed between pages, never mid-fetch.

use crate::classify::{Classifier, ExtensionSet, HttpProbe, Probe};
use crate::config::Config;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::{CrawlBudget, CrawlTarget, Frontier};
use crate::crawler::parser::{HtmlLinkExtractor, LinkExtractor};
use crate::state::{CrawlState, ResultList};
use crate::{FetchError, TrawlError};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// Pages between progress log lines
const PROGRESS_INTERVAL: u32 = 10;

/// A page that could not be fetched
///
/// Failures are recorded and the crawl continues with the next page.
#[derive(Debug)]
pub struct PageFailure {
    pub url: Url,
    pub error: FetchError,
}

/// Outcome of one crawl
#[derive(Debug)]
pub struct CrawlReport {
    /// `Completed` or `Interrupted`
    pub state: CrawlState,
    /// Download candidates in discovery order
    pub results: ResultList,
    /// Pages taken from the frontier, including failed fetches
    pub pages_processed: u32,
    pub failures: Vec<PageFailure>,
}

impl CrawlReport {
    pub fn is_interrupted(&self) -> bool {
        self.state == CrawlState::Interrupted
    }
}

/// Main crawler structure
pub struct Crawler {
    fetcher: PageFetcher,
    extractor: Box<dyn LinkExtractor>,
    extensions: ExtensionSet,
    probe: Option<Box<dyn Probe>>,
}

impl Crawler {
    /// Creates a crawler from configuration
    ///
    /// Deep classification (`crawler.deep-classify`) adds a network probe
    /// sharing the page fetcher's client.
    pub fn new(config: &Config) -> Result<Self, TrawlError> {
        let fetcher = PageFetcher::new(&config.http)?;
        let probe: Option<Box<dyn Probe>> = if config.crawler.deep_classify {
            Some(Box::new(HttpProbe::with_client(fetcher.client().clone())))
        } else {
            None
        };

        Ok(Self {
            fetcher,
            extractor: Box::new(HtmlLinkExtractor),
            extensions: ExtensionSet::from_config(&config.classifier),
            probe,
        })
    }

    /// Replaces the link extractor
    pub fn with_extractor(mut self, extractor: Box<dyn LinkExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Replaces (or removes) the network probe
    pub fn with_probe(mut self, probe: Option<Box<dyn Probe>>) -> Self {
        self.probe = probe;
        self
    }

    pub fn is_deep(&self) -> bool {
        self.probe.is_some()
    }

    /// Runs a breadth-first crawl from `seed`
    ///
    /// Cancelling `cancel` stops the crawl before the next page; the report
    /// then carries state `Interrupted` and every candidate found so far.
    pub async fn crawl(
        &mut self,
        seed: Url,
        budget: CrawlBudget,
        cancel: &CancellationToken,
    ) -> CrawlReport {
        info!(
            "Starting crawl of {} (max depth {}, max pages {}{})",
            seed,
            budget.max_depth(),
            budget.max_pages(),
            if self.is_deep() { ", deep" } else { "" }
        );

        let mut frontier = Frontier::start(seed, budget);
        let mut classifier = Classifier::new(self.extensions.clone());
        let mut results = ResultList::new();
        let mut failures = Vec::new();
        let start_time = Instant::now();

        loop {
            if cancel.is_cancelled() {
                frontier.interrupt();
                info!("Crawl interrupted");
                break;
            }

            let Some(target) = frontier.next_target() else {
                break;
            };
            debug!("Processing URL: {} (depth {})", target.url, target.depth);

            if let Err(error) = self
                .process_page(&target, &mut frontier, &mut classifier, &mut results)
                .await
            {
                warn!("Failed to fetch {}: {}", target.url, error);
                failures.push(PageFailure {
                    url: target.url,
                    error,
                });
            }

            let pages = frontier.pages_processed();
            if pages % PROGRESS_INTERVAL == 0 {
                info!(
                    "Progress: {} pages crawled, {} queued, {} downloads found",
                    pages,
                    frontier.queued(),
                    results.len()
                );
            }
        }

        info!(
            "Crawl {}: {} pages crawled, {} failed, {} downloads found in {:?}",
            frontier.state(),
            frontier.pages_processed(),
            failures.len(),
            results.len(),
            start_time.elapsed()
        );

        CrawlReport {
            state: frontier.state(),
            results,
            pages_processed: frontier.pages_processed(),
            failures,
        }
    }

    /// Fetches one page, classifies its links and enqueues the navigational ones
    async fn process_page(
        &self,
        target: &CrawlTarget,
        frontier: &mut Frontier,
        classifier: &mut Classifier,
        results: &mut ResultList,
    ) -> Result<(), FetchError> {
        let page = self.fetcher.fetch(&target.url).await?;
        frontier.mark_visited(&page.final_url);

        if !page.is_html() {
            debug!(
                "Skipping link extraction for {} ({})",
                page.final_url,
                page.content_type.as_deref().unwrap_or("unknown type")
            );
            return Ok(());
        }

        let links = self.extractor.extract_links(&page.body, &page.final_url);
        let classification = classifier.partition(&links, self.probe.as_deref()).await;

        let added = results.extend(classification.candidates);
        let queued = frontier.discover(target, &classification.navigational);
        debug!(
            "{}: {} links, {} new downloads, {} pages queued",
            page.final_url,
            links.len(),
            added,
            queued
        );

        Ok(())
    }
}
