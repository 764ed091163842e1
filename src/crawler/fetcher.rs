//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and headers
//! - GET requests to fetch page content
//! - Redirect handling
//! - Error classification

use crate::config::HttpConfig;
use crate::FetchError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client, ClientBuilder};
use tracing::debug;
use url::Url;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// A fetched page before any parsing
#[derive(Debug, Clone)]
pub struct RawPage {
    /// Response body bytes
    pub body: Vec<u8>,
    /// URL after redirects; relative links resolve against this
    pub final_url: Url,
    /// Content-Type header value
    pub content_type: Option<String>,
}

impl RawPage {
    /// Returns true if the body should be handed to the link extractor
    ///
    /// A missing Content-Type is treated as HTML.
    pub fn is_html(&self) -> bool {
        let Some(content_type) = self.content_type.as_deref() else {
            return true;
        };
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        essence.is_empty() || essence == "text/html" || essence == "application/xhtml+xml"
    }
}

/// Converts the configured extra headers into a header map
fn default_headers(config: &HttpConfig) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| FetchError::InvalidHeader(name.clone()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| FetchError::InvalidHeader(name.clone()))?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

/// Client builder carrying the user agent, headers and redirect policy
///
/// Callers add their own timeouts before building.
pub(crate) fn http_client_builder(config: &HttpConfig) -> Result<ClientBuilder, FetchError> {
    Ok(Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(default_headers(config)?)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true))
}

/// Builds the HTTP client shared by page fetches and probes
///
/// # Example
///
/// ```no_run
/// use trawl::config::HttpConfig;
/// use trawl::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, FetchError> {
    Ok(http_client_builder(config)?
        .timeout(config.timeout())
        .connect_timeout(config.timeout())
        .build()?)
}

/// Retrieves pages over HTTP(S)
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches one page with a single GET
    ///
    /// Redirects are followed; any non-2xx final status is an error. There
    /// are no retries.
    pub async fn fetch(&self, url: &Url) -> Result<RawPage, FetchError> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(FetchError::UnsupportedScheme {
                url: url.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        if final_url != *url {
            debug!("{} redirected to {}", url, final_url);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

        Ok(RawPage {
            body: body.to_vec(),
            final_url,
            content_type,
        })
    }
}
