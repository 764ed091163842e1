//! Trawl: a download-link crawler
//!
//! This crate crawls the pages reachable from a seed URL within its domain,
//! classifies the links it finds as downloadable resources, and fetches a
//! selected resource to local storage with progress reporting.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod download;
pub mod state;
pub mod ui;
pub mod url;

use thiserror::Error;

/// Main error type for Trawl operations
#[derive(Debug, Error)]
pub enum TrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    #[error("Invalid crawl budget: {0}")]
    Budget(String),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid header in config: {0}")]
    InvalidHeader(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL not provided")]
    Empty,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Errors from fetching a single page
///
/// A fetch error only ever affects the page it was raised for; the crawl
/// records it and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Unsupported URL scheme '{scheme}' for {url}")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {source}")]
    Connect { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("Invalid request header '{0}'")]
    InvalidHeader(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl FetchError {
    /// Classifies a transport error raised while fetching `url`
    pub(crate) fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            FetchError::Timeout { url }
        } else if error.is_connect() {
            FetchError::Connect { url, source: error }
        } else if let Some(status) = error.status() {
            FetchError::Status {
                url,
                status: status.as_u16(),
            }
        } else {
            FetchError::Request { url, source: error }
        }
    }
}

/// Errors from the network probe used by deep classification
///
/// These never leave the classifier: a failed probe just means the URL
/// yields no candidate.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Unsupported URL scheme '{scheme}' for {url}")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("HTTP {status} probing {url}")]
    Status { url: String, status: u16 },

    #[error("Probe failed for {url}: {source}")]
    Request { url: String, source: reqwest::Error },
}

/// Result type alias for Trawl operations
pub type Result<T> = std::result::Result<T, TrawlError>;

// Re-export commonly used types
pub use classify::{Classifier, DownloadCandidate, ExtensionSet};
pub use config::Config;
pub use crawler::{CrawlBudget, CrawlReport, Crawler};
pub use download::{sanitize_filename, DownloadError, Downloader, ProgressSink};
pub use state::{CrawlState, ResultList};
pub use crate::url::{domain_of, resolve, same_scope};
