//! Network probe used by deep classification
//!
//! This module handles:
//! - HEAD requests to read `Content-Disposition` and `Content-Type`
//! - GET fallback (headers only) when HEAD is unsupported or uninformative
//! - Turning the observed headers into a download candidate

use super::disposition::{downloadable_mime, parse_content_disposition};
use super::heuristics::{file_name_from_path, split_extension};
use super::{DownloadCandidate, ExtensionSet};
use crate::config::HttpConfig;
use crate::crawler::build_http_client;
use crate::{FetchError, ProbeError};
use async_trait::async_trait;
use reqwest::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

/// Name given to probed resources whose headers and path supply none
const FALLBACK_NAME: &str = "download";

/// Headers observed for a probed URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// URL after redirects
    pub final_url: Url,
    pub content_disposition: Option<String>,
    pub content_type: Option<String>,
}

impl ProbeResponse {
    fn from_response(response: &Response) -> Self {
        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Self {
            final_url: response.url().clone(),
            content_disposition: header(CONTENT_DISPOSITION),
            content_type: header(CONTENT_TYPE),
        }
    }
}

/// Capability to inspect a URL's response headers over the network
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, url: &Url) -> Result<ProbeResponse, ProbeError>;
}

/// Probe backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    /// Creates a probe sharing the crawler's headers and timeout
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    /// Probes a URL with HEAD, falling back to a GET whose body is never read
    ///
    /// The GET fallback runs when HEAD fails, returns a non-2xx status, or
    /// carries no `Content-Disposition`. If the fallback fails, a successful
    /// HEAD answer is still returned.
    async fn probe(&self, url: &Url) -> Result<ProbeResponse, ProbeError> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ProbeError::UnsupportedScheme {
                url: url.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        let head = match self.client.head(url.clone()).send().await {
            Ok(response) if response.status().is_success() => {
                let observed = ProbeResponse::from_response(&response);
                if observed.content_disposition.is_some() {
                    return Ok(observed);
                }
                Some(observed)
            }
            Ok(response) => {
                debug!("HEAD {} returned {}", url, response.status());
                None
            }
            Err(e) => {
                debug!("HEAD {} failed: {}", url, e);
                None
            }
        };

        match self.client.get(url.clone()).send().await {
            Ok(response) if response.status().is_success() => {
                Ok(ProbeResponse::from_response(&response))
            }
            Ok(response) => head.ok_or_else(|| ProbeError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            }),
            Err(e) => head.ok_or_else(|| ProbeError::Request {
                url: url.to_string(),
                source: e,
            }),
        }
    }
}

/// Heuristic 3: classifies a URL from its probed response headers
///
/// The name comes from `Content-Disposition`, else from the final URL's path.
/// A name with an allowed extension yields a candidate for the final URL.
/// Otherwise a downloadable `Content-Type` yields one, with the MIME type's
/// extension appended when the name has none.
pub fn candidate_from_probe(
    observed: &ProbeResponse,
    extensions: &ExtensionSet,
) -> Option<DownloadCandidate> {
    let name = observed
        .content_disposition
        .as_deref()
        .and_then(parse_content_disposition)
        .or_else(|| file_name_from_path(&observed.final_url))
        .unwrap_or_default();

    if extensions.matches(&name) {
        return Some(DownloadCandidate {
            name,
            url: observed.final_url.clone(),
        });
    }

    let mime = downloadable_mime(observed.content_type.as_deref()?)?;

    let mut name = name;
    if split_extension(&name).is_none() {
        if let Some(ext) = mime.extension {
            if name.is_empty() {
                name.push_str(FALLBACK_NAME);
            }
            name.push_str(ext);
        }
    }
    if name.is_empty() {
        name.push_str(FALLBACK_NAME);
    }

    Some(DownloadCandidate {
        name,
        url: observed.final_url.clone(),
    })
}
