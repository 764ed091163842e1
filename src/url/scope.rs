use super::domain::domain_of;
use url::Url;

/// Checks whether `candidate` is `base` itself or one of its subdomains
///
/// Both arguments are bare domains as returned by [`domain_of`].
///
/// # Examples
///
/// ```
/// use trawl::url::is_subdomain_of;
///
/// assert!(is_subdomain_of("example.com", "example.com"));
/// assert!(is_subdomain_of("docs.example.com", "example.com"));
/// assert!(is_subdomain_of("api.v2.example.com", "example.com"));
/// assert!(!is_subdomain_of("badexample.com", "example.com"));
/// assert!(!is_subdomain_of("example.com", "docs.example.com"));
/// ```
pub fn is_subdomain_of(candidate: &str, base: &str) -> bool {
    candidate == base || candidate.ends_with(&format!(".{}", base))
}

/// Decides whether `a` lies in the crawl scope of `b`
///
/// The relation is asymmetric: subdomains of `b` are in scope, but a parent
/// domain of `b` is not. URLs without a host are never in scope.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use trawl::url::same_scope;
///
/// let seed = Url::parse("http://example.com/").unwrap();
/// assert!(same_scope(&Url::parse("http://a.example.com/x").unwrap(), &seed));
/// assert!(same_scope(&Url::parse("http://www.example.com/").unwrap(), &seed));
/// assert!(!same_scope(&Url::parse("http://other.com/").unwrap(), &seed));
/// ```
pub fn same_scope(a: &Url, b: &Url) -> bool {
    match (domain_of(a), domain_of(b)) {
        (Some(a), Some(b)) => is_subdomain_of(&a, &b),
        _ => false,
    }
}
