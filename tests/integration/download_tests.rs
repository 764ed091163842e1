//! Integration tests for the download manager
//!
//! These tests stream responses from wiremock servers into temporary
//! directories.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use trawl::config::{DownloadConfig, HttpConfig};
use trawl::{DownloadError, Downloader};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn downloader(chunk_size: usize, timeout_secs: u64) -> Downloader {
    let config = DownloadConfig {
        directory: PathBuf::from("unused"),
        chunk_size,
        timeout_secs,
    };
    Downloader::new(&HttpConfig::default(), &config).unwrap()
}

fn url(server: &MockServer, path: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), path)).unwrap()
}

fn body(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn dir_is_empty(dir: &std::path::Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[tokio::test]
async fn test_download_success_with_progress() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let expected = body(20_000);

    Mock::given(method("GET"))
        .and(path("/files/data.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(expected.clone()))
        .mount(&mock_server)
        .await;

    let reports = Mutex::new(Vec::new());
    let progress = |written: u64, total: Option<u64>| reports.lock().unwrap().push((written, total));

    let file_path = downloader(4096, 30)
        .download(
            &url(&mock_server, "/files/data.bin"),
            "data.bin",
            temp_dir.path(),
            &progress,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(file_path, temp_dir.path().join("data.bin"));
    assert_eq!(std::fs::read(&file_path).unwrap(), expected);

    let reports = reports.into_inner().unwrap();
    assert!(reports.len() >= 6, "expected a report per slice: {reports:?}");
    assert!(reports.windows(2).all(|w| w[0].0 <= w[1].0));
    assert!(reports.iter().all(|(_, total)| *total == Some(20_000)));
    assert_eq!(reports.last(), Some(&(20_000, Some(20_000))));
}

#[tokio::test]
async fn test_cancel_mid_download_removes_file() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/big.iso"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body(64 * 1024)))
        .mount(&mock_server)
        .await;

    let cancel = CancellationToken::new();
    let progress = |written: u64, _total: Option<u64>| {
        if written >= 4096 {
            cancel.cancel();
        }
    };

    let result = downloader(1024, 30)
        .download(
            &url(&mock_server, "/big.iso"),
            "big.iso",
            temp_dir.path(),
            &progress,
            &cancel,
        )
        .await;

    assert!(matches!(result, Err(DownloadError::Cancelled { .. })));
    assert!(dir_is_empty(temp_dir.path()));
}

#[tokio::test]
async fn test_http_error_creates_no_file() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = downloader(8192, 30)
        .download(
            &url(&mock_server, "/missing.pdf"),
            "missing.pdf",
            temp_dir.path(),
            &|_: u64, _: Option<u64>| {},
            &CancellationToken::new(),
        )
        .await;

    assert!(matches!(
        result,
        Err(DownloadError::HttpStatus { status: 404, .. })
    ));
    assert!(dir_is_empty(temp_dir.path()));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/slow.zip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"data".to_vec())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let result = downloader(8192, 1)
        .download(
            &url(&mock_server, "/slow.zip"),
            "slow.zip",
            temp_dir.path(),
            &|_: u64, _: Option<u64>| {},
            &CancellationToken::new(),
        )
        .await;

    assert!(matches!(result, Err(DownloadError::Timeout { .. })));
    assert!(dir_is_empty(temp_dir.path()));
}

#[tokio::test]
async fn test_traversal_name_stays_in_destination() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("nested").join("downloads");

    Mock::given(method("GET"))
        .and(path("/get"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"payload".to_vec()))
        .mount(&mock_server)
        .await;

    let file_path = downloader(8192, 30)
        .download(
            &url(&mock_server, "/get"),
            "../../evil (1).txt",
            &dest,
            &|_: u64, _: Option<u64>| {},
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(file_path, dest.join("evil _1_.txt"));
    assert_eq!(std::fs::read(&file_path).unwrap(), b"payload");
}

#[tokio::test]
async fn test_existing_file_is_overwritten() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("report.pdf"), b"old contents, longer").unwrap();

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
        .mount(&mock_server)
        .await;

    let file_path = downloader(8192, 30)
        .download(
            &url(&mock_server, "/report.pdf"),
            "report.pdf",
            temp_dir.path(),
            &|_: u64, _: Option<u64>| {},
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(std::fs::read(file_path).unwrap(), b"new");
}

#[tokio::test]
async fn test_empty_body_downloads_empty_file() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/empty.csv"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let file_path = downloader(8192, 30)
        .download(
            &url(&mock_server, "/empty.csv"),
            "empty.csv",
            temp_dir.path(),
            &|_: u64, _: Option<u64>| {},
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(std::fs::metadata(file_path).unwrap().len(), 0);
}

#[tokio::test]
async fn test_cancelled_redownload_keeps_existing_file() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let existing = temp_dir.path().join("report.pdf");
    std::fs::write(&existing, b"previously downloaded report").unwrap();

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body(64 * 1024)))
        .mount(&mock_server)
        .await;

    let cancel = CancellationToken::new();
    let progress = |written: u64, _total: Option<u64>| {
        if written >= 2048 {
            cancel.cancel();
        }
    };

    let result = downloader(1024, 30)
        .download(
            &url(&mock_server, "/report.pdf"),
            "report.pdf",
            temp_dir.path(),
            &progress,
            &cancel,
        )
        .await;

    assert!(matches!(result, Err(DownloadError::Cancelled { .. })));
    assert_eq!(
        std::fs::read(&existing).unwrap(),
        b"previously downloaded report"
    );
    assert!(!temp_dir.path().join("report.pdf.part").exists());
}

#[tokio::test]
async fn test_truncated_body_removes_partial_file() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = tokio::io::AsyncReadExt::read(&mut socket, &mut request).await;
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100000\r\n\r\n")
            .await
            .unwrap();
        socket.write_all(&body(5000)).await.unwrap();
        socket.flush().await.unwrap();
    });

    let temp_dir = TempDir::new().unwrap();
    let written = Mutex::new(0u64);
    let progress = |bytes: u64, _total: Option<u64>| *written.lock().unwrap() = bytes;

    let result = downloader(1024, 30)
        .download(
            &Url::parse(&format!("http://{}/data.bin", addr)).unwrap(),
            "data.bin",
            temp_dir.path(),
            &progress,
            &CancellationToken::new(),
        )
        .await;
    server.await.unwrap();

    assert!(
        matches!(result, Err(DownloadError::Network { .. })),
        "unexpected result: {result:?}"
    );
    assert!(*written.lock().unwrap() > 0);
    assert!(dir_is_empty(temp_dir.path()));
}
