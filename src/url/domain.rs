use url::Url;

/// Computes the domain identity of a URL
///
/// This function retrieves the host portion of a URL, converts it to lowercase
/// and strips a single leading `www.` label. If the URL has no host (e.g.
/// `file:` URLs), it returns None.
///
/// # Arguments
///
/// * `url` - The URL to extract the domain from
///
/// # Returns
///
/// * `Some(String)` - The lowercase domain without `www.`
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use trawl::url::domain_of;
///
/// let url = Url::parse("https://www.Example.com/path").unwrap();
/// assert_eq!(domain_of(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://docs.example.com/path").unwrap();
/// assert_eq!(domain_of(&url), Some("docs.example.com".to_string()));
/// ```
pub fn domain_of(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match host.strip_prefix("www.") {
        Some(stripped) => Some(stripped.to_string()),
        None => Some(host),
    }
}
