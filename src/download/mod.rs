//! Download manager
//!
//! Streams a selected resource to local storage with progress reporting
//! and cooperative cancellation.
//!
//! # Example
//!
//! ```no_run
//! use trawl::config::{DownloadConfig, HttpConfig};
//! use trawl::Downloader;
//! use tokio_util::sync::CancellationToken;
//! use std::path::Path;
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = Downloader::new(&HttpConfig::default(), &DownloadConfig::default())?;
//! let url = Url::parse("https://example.com/files/report.pdf")?;
//! let path = downloader
//!     .download(
//!         &url,
//!         "report.pdf",
//!         Path::new("./downloads"),
//!         &|written: u64, total: Option<u64>| println!("{written}/{total:?}"),
//!         &CancellationToken::new(),
//!     )
//!     .await?;
//! println!("Downloaded: {}", path.display());
//! # Ok(())
//! # }
//! ```

mod error;
mod filename;
mod manager;

pub use error::DownloadError;
pub use filename::{sanitize_filename, FALLBACK_FILENAME};
pub use manager::{Downloader, ProgressSink};
