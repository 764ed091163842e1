//! Order-preserving, URL-deduplicated list of download candidates

use crate::classify::DownloadCandidate;
use std::collections::HashSet;

/// Accumulates classified candidates across crawled pages
///
/// Each URL appears at most once; the first discovery wins and insertion
/// order is discovery order. After the crawl the list is handed read-only to
/// the selection UI.
#[derive(Debug, Clone, Default)]
pub struct ResultList {
    items: Vec<DownloadCandidate>,
    seen: HashSet<String>,
}

impl ResultList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a candidate unless its URL is already present
    ///
    /// Returns true if the candidate was added.
    pub fn push(&mut self, candidate: DownloadCandidate) -> bool {
        if !self.seen.insert(candidate.url.as_str().to_string()) {
            return false;
        }
        self.items.push(candidate);
        true
    }

    /// Appends every candidate in order, returning how many were new
    pub fn extend<I>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = DownloadCandidate>,
    {
        candidates
            .into_iter()
            .map(|candidate| self.push(candidate))
            .filter(|added| *added)
            .count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DownloadCandidate> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DownloadCandidate> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[DownloadCandidate] {
        &self.items
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.seen.contains(url)
    }
}

impl<'a> IntoIterator for &'a ResultList {
    type Item = &'a DownloadCandidate;
    type IntoIter = std::slice::Iter<'a, DownloadCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
