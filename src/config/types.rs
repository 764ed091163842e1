use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Extensions treated as downloadable when no allow-list is configured
pub const DEFAULT_DOWNLOAD_EXTENSIONS: &[&str] = &[
    ".pdf", ".zip", ".tar", ".gz", ".7z", ".rar", ".doc", ".docx", ".xls", ".xlsx", ".ppt",
    ".pptx", ".mp3", ".mp4", ".avi", ".mov", ".ogg", ".iso", ".exe", ".dmg", ".apk", ".csv",
    ".xml", ".json", ".deb", ".rpm",
];

/// Main configuration structure for Trawl
///
/// Every section is optional in the TOML file; missing sections and keys
/// fall back to [`Config::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub classifier: ClassifierConfig,
    pub download: DownloadConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum link distance from the seed page
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of pages fetched in one crawl
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Probe ambiguous links over the network when classifying
    #[serde(rename = "deep-classify")]
    pub deep_classify: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_pages: 100,
            deep_classify: false,
        }
    }
}

/// HTTP request configuration shared by the fetcher, probe and downloader
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Timeout for page fetches and probes (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Extra request headers
    pub headers: BTreeMap<String, String>,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: format!("trawl/{}", env!("CARGO_PKG_VERSION")),
            headers: BTreeMap::new(),
        }
    }
}

/// Link classification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Lower-case file extensions, including the leading dot
    #[serde(rename = "download-extensions")]
    pub download_extensions: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            download_extensions: DEFAULT_DOWNLOAD_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

/// Download configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Destination directory for downloaded files
    pub directory: PathBuf,

    /// Size of the slices written to disk between progress reports (bytes)
    #[serde(rename = "chunk-size")]
    pub chunk_size: usize,

    /// Longest wait to connect, for the response headers, or for the next body chunk (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl DownloadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("downloads"),
            chunk_size: 8192,
            timeout_secs: 30,
        }
    }
}
