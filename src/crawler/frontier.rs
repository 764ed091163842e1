//! Crawl frontier
//!
//! This module handles:
//! - The FIFO queue of pages still to fetch (breadth-first order)
//! - The visited set, keyed by URL without fragment
//! - Depth and page budgets
//! - Domain scoping of discovered links

use crate::config::CrawlerConfig;
use crate::state::CrawlState;
use crate::url::{crawl_key, same_scope};
use crate::TrawlError;
use std::collections::{HashSet, VecDeque};
use tracing::debug;
use url::Url;

/// A page waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub url: Url,
    /// Link distance from the seed (the seed is 0)
    pub depth: u32,
}

/// Limits for one crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlBudget {
    max_depth: u32,
    max_pages: u32,
}

impl CrawlBudget {
    /// Creates a budget; both limits must be at least 1
    pub fn new(max_depth: u32, max_pages: u32) -> Result<Self, TrawlError> {
        if max_depth < 1 {
            return Err(TrawlError::Budget("max_depth must be at least 1".to_string()));
        }
        if max_pages < 1 {
            return Err(TrawlError::Budget("max_pages must be at least 1".to_string()));
        }
        Ok(Self {
            max_depth,
            max_pages,
        })
    }

    pub fn from_config(config: &CrawlerConfig) -> Result<Self, TrawlError> {
        Self::new(config.max_depth, config.max_pages)
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }
}

/// Breadth-first frontier for one crawl
#[derive(Debug)]
pub struct Frontier {
    seed: Url,
    budget: CrawlBudget,
    queue: VecDeque<CrawlTarget>,
    visited: HashSet<Url>,
    enqueued: HashSet<Url>,
    pages_processed: u32,
    state: CrawlState,
}

impl Frontier {
    /// Creates a running frontier holding only the seed at depth 0
    pub fn start(seed: Url, budget: CrawlBudget) -> Self {
        let key = crawl_key(&seed);
        let mut queue = VecDeque::new();
        queue.push_back(CrawlTarget {
            url: key.clone(),
            depth: 0,
        });

        Self {
            seed,
            budget,
            queue,
            visited: HashSet::new(),
            enqueued: HashSet::from([key]),
            pages_processed: 0,
            state: CrawlState::Running,
        }
    }

    /// Pops the next page to fetch
    ///
    /// The returned page is already marked visited and counted against the
    /// page budget. Returns None, moving the crawl to `Completed`, once the
    /// queue is drained or the page budget is spent.
    pub fn next_target(&mut self) -> Option<CrawlTarget> {
        if self.state != CrawlState::Running {
            return None;
        }

        while self.pages_processed < self.budget.max_pages {
            let Some(target) = self.queue.pop_front() else {
                break;
            };
            if target.depth > self.budget.max_depth || self.visited.contains(&target.url) {
                continue;
            }

            self.visited.insert(target.url.clone());
            self.pages_processed += 1;
            return Some(target);
        }

        self.finish(CrawlState::Completed);
        None
    }

    /// Records a page as visited without fetching it (e.g. a redirect target)
    pub fn mark_visited(&mut self, url: &Url) {
        self.visited.insert(crawl_key(url));
    }

    /// Enqueues in-scope links found on `parent`
    ///
    /// Returns the number of links added. Links are skipped when they leave
    /// the seed's domain, were already seen, or would exceed the depth limit.
    pub fn discover<'a, I>(&mut self, parent: &CrawlTarget, links: I) -> usize
    where
        I: IntoIterator<Item = &'a Url>,
    {
        let depth = parent.depth + 1;
        if depth > self.budget.max_depth {
            return 0;
        }

        let mut added = 0;
        for link in links {
            if !same_scope(link, &self.seed) {
                debug!("Out of scope: {}", link);
                continue;
            }

            let key = crawl_key(link);
            if self.visited.contains(&key) || !self.enqueued.insert(key.clone()) {
                continue;
            }

            self.queue.push_back(CrawlTarget { url: key, depth });
            added += 1;
        }
        added
    }

    /// Stops the crawl early; results gathered so far remain valid
    pub fn interrupt(&mut self) {
        self.finish(CrawlState::Interrupted);
    }

    fn finish(&mut self, next: CrawlState) {
        match self.state.transition(next) {
            Ok(state) => self.state = state,
            Err(e) => debug!("Frontier already finished: {}", e),
        }
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn budget(&self) -> CrawlBudget {
        self.budget
    }

    pub fn pages_processed(&self) -> u32 {
        self.pages_processed
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(&crawl_key(url))
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of pages waiting in the queue
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}
