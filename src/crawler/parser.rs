//! HTML parser for extracting links
//!
//! Collects every `<a href>` and every `data-download-url` attribute, resolved
//! against the page URL.

use crate::url::resolve;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts absolute links from a page body
pub trait LinkExtractor: Send + Sync {
    /// Returns the page's links, deduplicated, in document order
    ///
    /// Never fails: unresolvable hrefs are skipped and malformed markup is
    /// parsed best-effort.
    fn extract_links(&self, body: &[u8], base: &Url) -> Vec<Url>;
}

/// Link extractor backed by `scraper`
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl LinkExtractor for HtmlLinkExtractor {
    /// # Link Extraction Rules
    ///
    /// **Include:**
    /// - `<a href="...">` tags, including those with `download` or `rel="nofollow"`
    /// - `data-download-url="..."` on any element
    ///
    /// **Exclude:**
    /// - Empty and fragment-only hrefs
    /// - `javascript:`, `mailto:`, `tel:` and `data:` links
    /// - Hrefs that cannot be resolved
    ///
    /// # Example
    ///
    /// ```
    /// use trawl::crawler::{HtmlLinkExtractor, LinkExtractor};
    /// use url::Url;
    ///
    /// let html = br#"<a href="/files/a.pdf">A</a><a href="mailto:x@y.z">Mail</a>"#;
    /// let base = Url::parse("https://example.com/page").unwrap();
    /// let links = HtmlLinkExtractor.extract_links(html, &base);
    /// assert_eq!(links[0].as_str(), "https://example.com/files/a.pdf");
    /// assert_eq!(links.len(), 1);
    /// ```
    fn extract_links(&self, body: &[u8], base: &Url) -> Vec<Url> {
        let html = String::from_utf8_lossy(body);
        let document = Html::parse_document(&html);

        let mut links = Vec::new();
        let mut seen = HashSet::new();

        let sources = [("a[href]", "href"), ("[data-download-url]", "data-download-url")];
        for (selector, attribute) in sources {
            let Ok(selector) = Selector::parse(selector) else {
                continue;
            };
            for element in document.select(&selector) {
                let Some(href) = element.value().attr(attribute) else {
                    continue;
                };
                if let Some(url) = resolve_link(href, base) {
                    if seen.insert(url.as_str().to_string()) {
                        links.push(url);
                    }
                }
            }
        }

        links
    }
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    // Same-page anchors
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    resolve(base, href).ok()
}
