//! Streaming download of a single resource to local storage.

use super::error::DownloadError;
use super::filename::sanitize_filename;
use crate::config::{DownloadConfig, HttpConfig};
use crate::crawler::http_client_builder;
use crate::FetchError;
use futures_util::StreamExt;
use reqwest::{Client, Response};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// Receives download progress
///
/// Called with the bytes written so far and the expected total, which is
/// `None` when the server sends no `Content-Length`.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, written: u64, total: Option<u64>);
}

impl<F> ProgressSink for F
where
    F: Fn(u64, Option<u64>) + Send + Sync,
{
    fn on_progress(&self, written: u64, total: Option<u64>) {
        self(written, total)
    }
}

/// Suffix of the file a download streams into before it is complete
const PARTIAL_SUFFIX: &str = ".part";

/// Sibling of `file_path` the body is written to until the transfer succeeds
fn partial_path(file_path: &Path) -> PathBuf {
    let mut name = file_path.file_name().unwrap_or_default().to_os_string();
    name.push(PARTIAL_SUFFIX);
    file_path.with_file_name(name)
}

/// Fetches resources over HTTP(S) and streams them to disk
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    chunk_size: usize,
    read_timeout: Duration,
}

impl Downloader {
    /// Creates a downloader sharing the crawler's headers
    ///
    /// The download timeout bounds connecting, waiting for the response
    /// headers and each wait for body data, not the whole transfer.
    pub fn new(http: &HttpConfig, download: &DownloadConfig) -> Result<Self, DownloadError> {
        let client = http_client_builder(http)?
            .connect_timeout(download.timeout())
            .build()
            .map_err(FetchError::from)?;

        Ok(Self {
            client,
            chunk_size: download.chunk_size.max(1),
            read_timeout: download.timeout(),
        })
    }

    /// Downloads `url` into `dest_dir` under the sanitized `suggested_name`
    ///
    /// The body is written to `<name>.part` and renamed onto the final
    /// name once complete, replacing any existing file. Progress is
    /// reported after every `chunk-size` slice written. On any failure,
    /// including cancellation, only the partial file is removed and an
    /// existing file with the final name is left untouched.
    pub async fn download(
        &self,
        url: &Url,
        suggested_name: &str,
        dest_dir: &Path,
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, DownloadError> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(DownloadError::UnsupportedScheme {
                url: url.to_string(),
                scheme: url.scheme().to_string(),
            });
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(DownloadError::invalid_url(url.as_str()));
        }
        if cancel.is_cancelled() {
            return Err(DownloadError::cancelled(url.as_str()));
        }

        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(|e| DownloadError::io(dest_dir, e))?;
        let file_path = dest_dir.join(sanitize_filename(suggested_name));

        debug!("GET {}", url);
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DownloadError::cancelled(url.as_str())),
            response = tokio::time::timeout(self.read_timeout, self.client.get(url.clone()).send()) => {
                response
                    .map_err(|_| DownloadError::timeout(url.as_str()))?
                    .map_err(|e| DownloadError::from_reqwest(url.as_str(), e))?
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url.as_str(), status.as_u16()));
        }

        let part_path = partial_path(&file_path);
        let mut file = File::create(&part_path)
            .await
            .map_err(|e| DownloadError::io(&part_path, e))?;

        let result = self
            .stream_to_file(&mut file, response, url, &part_path, progress, cancel)
            .await;
        drop(file);

        let result = match result {
            Ok(bytes_written) => tokio::fs::rename(&part_path, &file_path)
                .await
                .map(|()| bytes_written)
                .map_err(|e| DownloadError::io(&file_path, e)),
            Err(e) => Err(e),
        };

        match result {
            Ok(bytes_written) => {
                info!(
                    "Downloaded {} ({} bytes) to {}",
                    url,
                    bytes_written,
                    file_path.display()
                );
                Ok(file_path)
            }
            Err(e) => {
                debug!("Removing partial file {} after error", part_path.display());
                if let Err(cleanup) = tokio::fs::remove_file(&part_path).await {
                    if cleanup.kind() != std::io::ErrorKind::NotFound {
                        warn!(
                            "Failed to remove partial file {}: {}",
                            part_path.display(),
                            cleanup
                        );
                    }
                }
                Err(e)
            }
        }
    }

    /// Streams the response body to file in fixed-size slices
    async fn stream_to_file(
        &self,
        file: &mut File,
        response: Response,
        url: &Url,
        file_path: &Path,
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<u64, DownloadError> {
        let total = response.content_length();
        let mut writer = BufWriter::new(file);
        let mut stream = response.bytes_stream();
        let mut bytes_written: u64 = 0;

        progress.on_progress(0, total);

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(DownloadError::cancelled(url.as_str())),
                next = tokio::time::timeout(self.read_timeout, stream.next()) => next,
            };

            let chunk = match next {
                Err(_) => return Err(DownloadError::timeout(url.as_str())),
                Ok(None) => break,
                Ok(Some(chunk)) => {
                    chunk.map_err(|e| DownloadError::from_reqwest(url.as_str(), e))?
                }
            };

            for slice in chunk.chunks(self.chunk_size) {
                if cancel.is_cancelled() {
                    return Err(DownloadError::cancelled(url.as_str()));
                }
                writer
                    .write_all(slice)
                    .await
                    .map_err(|e| DownloadError::io(file_path, e))?;
                bytes_written += slice.len() as u64;
                progress.on_progress(bytes_written, total);
            }
        }

        if cancel.is_cancelled() {
            return Err(DownloadError::cancelled(url.as_str()));
        }

        writer
            .flush()
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;

        Ok(bytes_written)
    }
}
