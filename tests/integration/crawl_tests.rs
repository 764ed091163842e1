//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use tokio_util::sync::CancellationToken;
use trawl::config::Config;
use trawl::crawler::LinkExtractor;
use trawl::{CrawlBudget, CrawlState, Crawler, FetchError};
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_raw(body.into(), "text/html; charset=utf-8")
}

fn links(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!("<html><body>{}</body></html>", anchors)
}

fn seed(server: &MockServer, path: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), path)).unwrap()
}

async fn crawl(config: &Config, seed: Url, max_depth: u32, max_pages: u32) -> trawl::CrawlReport {
    let mut crawler = Crawler::new(config).unwrap();
    crawler
        .crawl(
            seed,
            CrawlBudget::new(max_depth, max_pages).unwrap(),
            &CancellationToken::new(),
        )
        .await
}

#[tokio::test]
async fn test_single_page_finds_downloads() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body>
            <a href="/files/report.PDF">Report</a>
            <a href="/get?download=archive.zip">Archive</a>
            <a href="/about">About</a>
            <a href="mailto:someone@example.com">Mail</a>
            <div data-download-url="/dl/data.csv">Data</div>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = crawl(&Config::default(), seed(&mock_server, "/"), 1, 1).await;

    assert_eq!(report.state, CrawlState::Completed);
    assert_eq!(report.pages_processed, 1);
    let names: Vec<&str> = report.results.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["report.PDF", "archive.zip", "data.csv"]);
    assert!(report.results.as_slice()[1]
        .url
        .as_str()
        .ends_with("/get?download=archive.zip"));
}

#[tokio::test]
async fn test_page_budget_on_complete_graph() {
    let mock_server = MockServer::start().await;

    let hrefs: Vec<String> = (0..50).map(|i| format!("/p{}", i)).collect();
    let hrefs: Vec<&str> = hrefs.iter().map(String::as_str).collect();

    Mock::given(method("GET"))
        .and(path_regex(r"^/p\d+$"))
        .respond_with(html(links(&hrefs)))
        .mount(&mock_server)
        .await;

    let report = crawl(&Config::default(), seed(&mock_server, "/p0"), 3, 5).await;

    assert_eq!(report.state, CrawlState::Completed);
    assert_eq!(report.pages_processed, 5);
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 5);
}

#[tokio::test]
async fn test_depth_limit_enforced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(links(&["/a"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(links(&["/b", "/files/a.zip"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(links(&["/c", "/files/b.zip"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(html(links(&["/files/c.zip"])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = crawl(&Config::default(), seed(&mock_server, "/"), 2, 100).await;

    assert_eq!(report.pages_processed, 3);
    let names: Vec<&str> = report.results.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["a.zip", "b.zip"]);
}

#[tokio::test]
async fn test_fetch_failure_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(links(&["/broken", "/ok"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html(links(&["/files/manual.pdf"])))
        .mount(&mock_server)
        .await;

    let report = crawl(&Config::default(), seed(&mock_server, "/"), 2, 100).await;

    assert_eq!(report.state, CrawlState::Completed);
    assert_eq!(report.pages_processed, 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].url.path(), "/broken");
    assert!(matches!(
        report.failures[0].error,
        FetchError::Status { status: 500, .. }
    ));
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results.as_slice()[0].name, "manual.pdf");
}

#[tokio::test]
async fn test_results_deduplicated_across_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(links(&["/files/x.pdf", "/a", "/files/x.pdf"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(links(&["/files/x.pdf", "/files/y.pdf", "/"])))
        .mount(&mock_server)
        .await;

    let report = crawl(&Config::default(), seed(&mock_server, "/"), 2, 100).await;

    let names: Vec<&str> = report.results.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["x.pdf", "y.pdf"]);
    assert_eq!(report.pages_processed, 2);
}

#[tokio::test]
async fn test_download_links_are_not_crawled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(links(&["/files/big.iso"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/big.iso"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = crawl(&Config::default(), seed(&mock_server, "/"), 2, 100).await;
    assert_eq!(report.results.len(), 1);
}

#[tokio::test]
async fn test_out_of_scope_links_not_followed() {
    let mock_server = MockServer::start().await;
    let port = Url::parse(&mock_server.uri()).unwrap().port().unwrap();
    let external = format!("http://localhost:{}/external", port);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(links(&[external.as_str(), "/inside"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/inside"))
        .respond_with(html(links(&[])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/external"))
        .respond_with(html(links(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = crawl(&Config::default(), seed(&mock_server, "/"), 2, 100).await;
    assert_eq!(report.pages_processed, 2);
}

#[tokio::test]
async fn test_redirect_target_marked_visited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(links(&["/old", "/new"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", "/new"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html(links(&["files/rel.zip"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = crawl(&Config::default(), seed(&mock_server, "/"), 2, 100).await;

    assert_eq!(report.pages_processed, 2);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results.as_slice()[0].url.path(), "/files/rel.zip");
}

#[tokio::test]
async fn test_non_html_body_not_parsed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(links(&["/blob"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blob"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="/hidden">hidden</a>"#, "application/octet-stream"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html(links(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = crawl(&Config::default(), seed(&mock_server, "/"), 3, 100).await;
    assert_eq!(report.pages_processed, 2);
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn test_deep_mode_probes_ambiguous_links() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(links(&["/export", "/about"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/export"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", r#"attachment; filename="report.pdf""#),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/export"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html(links(&[])))
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.crawler.deep_classify = true;
    let report = crawl(&config, seed(&mock_server, "/"), 2, 100).await;

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results.as_slice()[0].name, "report.pdf");
    assert_eq!(report.results.as_slice()[0].url.path(), "/export");
}

#[tokio::test]
async fn test_cancelled_crawl_is_interrupted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html(links(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut crawler = Crawler::new(&Config::default()).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = crawler
        .crawl(
            seed(&mock_server, "/"),
            CrawlBudget::new(2, 10).unwrap(),
            &cancel,
        )
        .await;

    assert_eq!(report.state, CrawlState::Interrupted);
    assert_eq!(report.pages_processed, 0);
    assert!(report.results.is_empty());
}

/// Follows only links written as `alternate:<href>` in the page text
struct AlternateLinkExtractor;

impl LinkExtractor for AlternateLinkExtractor {
    fn extract_links(&self, body: &[u8], base: &Url) -> Vec<Url> {
        let body = String::from_utf8_lossy(body);
        body.split("alternate:")
            .skip(1)
            .filter_map(|rest| rest.split_whitespace().next())
            .filter_map(|href| base.join(href).ok())
            .collect()
    }
}

#[tokio::test]
async fn test_custom_link_extractor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/files/ignored.pdf">x</a> alternate:/files/feed.zip"#,
        ))
        .mount(&mock_server)
        .await;

    let mut crawler = Crawler::new(&Config::default())
        .unwrap()
        .with_extractor(Box::new(AlternateLinkExtractor));
    let report = crawler
        .crawl(
            seed(&mock_server, "/"),
            CrawlBudget::new(1, 1).unwrap(),
            &CancellationToken::new(),
        )
        .await;

    let names: Vec<&str> = report.results.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["feed.zip"]);
}
