//! Error types for the download module.

use crate::FetchError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while downloading a resource
///
/// Whenever one of these is returned after the partial file was created,
/// that file has already been removed.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The URL cannot be downloaded (no host)
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("unsupported URL scheme '{scheme}' for {url}")]
    UnsupportedScheme { url: String, scheme: String },

    /// DNS resolution, connection refused, TLS errors, broken streams
    #[error("network error downloading {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Connecting, or waiting for the next body chunk, took too long
    #[error("timeout downloading {url}")]
    Timeout { url: String },

    #[error("HTTP {status} downloading {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("IO error writing to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("download of {url} cancelled")]
    Cancelled { url: String },

    /// The HTTP client could not be built
    #[error(transparent)]
    Client(#[from] FetchError),
}

impl DownloadError {
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Maps a transport error, separating timeouts from other failures
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else {
            Self::network(url, source)
        }
    }

    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn cancelled(url: impl Into<String>) -> Self {
        Self::Cancelled { url: url.into() }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
