use crate::UrlError;
use url::Url;

/// Schemes a resolved link may carry
///
/// Anything else (`mailto:`, `javascript:`, `tel:`, `data:`...) is not a
/// resource location the crawler can reason about.
const RECOGNIZED_SCHEMES: &[&str] = &["http", "https", "ftp", "file", "ws", "wss"];

/// Resolves an href against a base URL
///
/// # Resolution Rules
///
/// Standard URL resolution applies:
/// - Relative paths are joined onto the base path (`../` segments removed)
/// - Protocol-relative hrefs (`//host/path`) inherit the base scheme
/// - Absolute hrefs replace the base entirely
/// - Query strings and fragments of the href are preserved
///
/// # Arguments
///
/// * `base` - The URL of the page the href was found on
/// * `href` - The raw href attribute value
///
/// # Returns
///
/// * `Ok(Url)` - The absolute URL
/// * `Err(UrlError::Malformed)` - The href cannot be joined, or the result has
///   no recognized scheme
///
/// # Examples
///
/// ```
/// use trawl::url::resolve;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/index.html").unwrap();
/// let url = resolve(&base, "../files/a.pdf?v=2#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/files/a.pdf?v=2#top");
///
/// assert!(resolve(&base, "mailto:someone@example.com").is_err());
/// ```
pub fn resolve(base: &Url, href: &str) -> Result<Url, UrlError> {
    let href = href.trim();

    let url = base
        .join(href)
        .map_err(|e| UrlError::Malformed(format!("{} (href '{}'): {}", base, href, e)))?;

    if !has_recognized_scheme(&url) {
        return Err(UrlError::Malformed(format!(
            "unrecognized scheme '{}' in {}",
            url.scheme(),
            url
        )));
    }

    Ok(url)
}

/// Returns true if the URL's scheme is one the resolver accepts
pub fn has_recognized_scheme(url: &Url) -> bool {
    RECOGNIZED_SCHEMES.contains(&url.scheme())
}

/// Parses operator-supplied seed input into an absolute URL
///
/// Leading and trailing whitespace is ignored.
///
/// # Returns
///
/// * `Ok(Url)` - The parsed seed
/// * `Err(UrlError::Empty)` - The input is blank
/// * `Err(UrlError::Malformed)` - The input is not an absolute URL with a
///   recognized scheme
pub fn parse_seed(input: &str) -> Result<Url, UrlError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = Url::parse(input).map_err(|e| UrlError::Malformed(format!("{}: {}", input, e)))?;

    if !has_recognized_scheme(&url) {
        return Err(UrlError::Malformed(format!(
            "unrecognized scheme '{}' in {}",
            url.scheme(),
            input
        )));
    }

    Ok(url)
}

/// Returns the identity under which a page is tracked by the frontier
///
/// Fragments never reach the server, so `/a#x` and `/a#y` are the same page.
pub fn crawl_key(url: &Url) -> Url {
    let mut key = url.clone();
    key.set_fragment(None);
    key
}
