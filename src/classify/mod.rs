//! Link classification
//!
//! Partitions absolute URLs into download candidates (with an inferred file
//! name) and navigational links. Strategies run in a fixed order and the
//! first one that matches wins:
//!
//! 1. Path extension (`/files/report.pdf`)
//! 2. Query parameter (`/get?download=archive.zip`)
//! 3. Network probe of the response headers (deep mode only)

mod disposition;
mod heuristics;
mod probe;

pub use disposition::{downloadable_mime, parse_content_disposition, DownloadableMime};
pub use heuristics::{
    by_path_extension, by_query_parameter, file_name_from_path, split_extension,
    StaticStrategy, FILE_QUERY_KEYS, STATIC_STRATEGIES,
};
pub use probe::{candidate_from_probe, HttpProbe, Probe, ProbeResponse};

use crate::config::ClassifierConfig;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};
use url::Url;

/// A URL classified as a downloadable resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadCandidate {
    /// Best-effort file name
    pub name: String,
    /// Absolute fetch URL (the post-redirect URL for probed candidates)
    pub url: Url,
}

impl fmt::Display for DownloadCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.url)
    }
}

/// Allow-list of download extensions
///
/// Entries are stored lower-case with their leading dot; lookups are
/// case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct ExtensionSet {
    extensions: HashSet<String>,
}

impl ExtensionSet {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(&config.download_extensions)
    }

    /// Returns true if `ext` (with its leading dot) is allowed
    pub fn contains(&self, ext: &str) -> bool {
        self.extensions.contains(&ext.to_lowercase())
    }

    /// Returns true if the file name's extension is allowed
    pub fn matches(&self, name: &str) -> bool {
        split_extension(name).is_some_and(|ext| self.contains(ext))
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

/// Outcome of classifying one batch of links
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Download candidates, in input order
    pub candidates: Vec<DownloadCandidate>,
    /// Input URLs that produced no candidate
    pub navigational: Vec<Url>,
}

/// Classifies links using the ordered strategy list
///
/// One classifier lives for one crawl so the probe runs at most once per URL
/// across every page that links to it.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    extensions: ExtensionSet,
    probed: HashMap<String, Option<DownloadCandidate>>,
}

impl Classifier {
    pub fn new(extensions: ExtensionSet) -> Self {
        Self {
            extensions,
            probed: HashMap::new(),
        }
    }

    pub fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    /// Runs the static strategies (no network) against one URL
    pub fn classify_static(&self, url: &Url) -> Option<DownloadCandidate> {
        STATIC_STRATEGIES.iter().find_map(|(name, strategy)| {
            let candidate = strategy(url, &self.extensions)?;
            debug!("{} matched by {} strategy", url, name);
            Some(candidate)
        })
    }

    /// Classifies a batch of URLs, returning only the download candidates
    pub async fn classify(
        &mut self,
        urls: &[Url],
        probe: Option<&dyn Probe>,
    ) -> Vec<DownloadCandidate> {
        self.partition(urls, probe).await.candidates
    }

    /// Classifies a batch of URLs into candidates and navigational links
    ///
    /// Duplicate input URLs are considered once. When `probe` is given, URLs
    /// the static strategies reject are probed over the network; a failed
    /// probe is logged and the URL is treated as navigational.
    pub async fn partition(&mut self, urls: &[Url], probe: Option<&dyn Probe>) -> Classification {
        let mut result = Classification::default();
        let mut seen = HashSet::new();

        for url in urls {
            if !seen.insert(url.as_str()) {
                continue;
            }

            let candidate = match self.classify_static(url) {
                Some(candidate) => Some(candidate),
                None => match probe {
                    Some(probe) => self.probe_once(url, probe).await,
                    None => None,
                },
            };

            match candidate {
                Some(candidate) => result.candidates.push(candidate),
                None => result.navigational.push(url.clone()),
            }
        }

        result
    }

    async fn probe_once(&mut self, url: &Url, probe: &dyn Probe) -> Option<DownloadCandidate> {
        if let Some(cached) = self.probed.get(url.as_str()) {
            return cached.clone();
        }

        let candidate = match probe.probe(url).await {
            Ok(observed) => {
                let candidate = candidate_from_probe(&observed, &self.extensions);
                if candidate.is_some() {
                    debug!("{} matched by probe strategy", url);
                }
                candidate
            }
            Err(e) => {
                warn!("Probe skipped for {}: {}", url, e);
                None
            }
        };

        self.probed.insert(url.as_str().to_string(), candidate.clone());
        candidate
    }
}

/// Removes candidates whose URL was already seen, keeping the first
pub fn dedupe(candidates: Vec<DownloadCandidate>) -> Vec<DownloadCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.url.as_str().to_string()))
        .collect()
}
