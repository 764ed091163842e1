//! Static classification strategies
//!
//! These inspect only the URL itself and never touch the network.

use super::{DownloadCandidate, ExtensionSet};
use std::borrow::Cow;
use url::Url;

/// Query parameter names that commonly carry a file name, highest priority first
pub const FILE_QUERY_KEYS: &[&str] = &["file", "filename", "download", "name", "attachment"];

/// A strategy that classifies a URL from its text alone
pub type StaticStrategy = fn(&Url, &ExtensionSet) -> Option<DownloadCandidate>;

/// Static strategies in evaluation order; the first match wins
pub const STATIC_STRATEGIES: &[(&str, StaticStrategy)] = &[
    ("extension", by_path_extension),
    ("query-parameter", by_query_parameter),
];

/// Splits the extension (with its leading dot) off a file name
///
/// A name consisting only of dots and an extension (`.pdf`, `..pdf`) has no
/// base name and therefore no extension, and neither does a trailing dot.
///
/// # Examples
///
/// ```
/// use trawl::classify::split_extension;
///
/// assert_eq!(split_extension("report.PDF"), Some(".PDF"));
/// assert_eq!(split_extension("archive.tar.gz"), Some(".gz"));
/// assert_eq!(split_extension(".bashrc"), None);
/// assert_eq!(split_extension("README"), None);
/// ```
pub fn split_extension(name: &str) -> Option<&str> {
    let idx = name.rfind('.')?;
    if idx + 1 == name.len() || name[..idx].trim_start_matches('.').is_empty() {
        return None;
    }
    Some(&name[idx..])
}

/// Returns the last path segment of a URL, percent-decoded
///
/// Returns None when the path ends in `/` or has no segments.
pub fn file_name_from_path(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next_back()?;
    if segment.is_empty() {
        return None;
    }

    let decoded = urlencoding::decode(segment)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| segment.to_string());
    Some(decoded)
}

/// Heuristic 1: the final path segment ends in a download extension
pub fn by_path_extension(url: &Url, extensions: &ExtensionSet) -> Option<DownloadCandidate> {
    let name = file_name_from_path(url)?;
    if !extensions.matches(&name) {
        return None;
    }

    Some(DownloadCandidate {
        name,
        url: url.clone(),
    })
}

/// Heuristic 2: a well-known query parameter names a downloadable file
///
/// Keys are tried in [`FILE_QUERY_KEYS`] order; when a key repeats, its last
/// value is the one considered.
pub fn by_query_parameter(url: &Url, extensions: &ExtensionSet) -> Option<DownloadCandidate> {
    url.query()?;
    let pairs: Vec<(Cow<'_, str>, Cow<'_, str>)> = url.query_pairs().collect();

    FILE_QUERY_KEYS.iter().find_map(|key| {
        let value = pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())?;

        extensions.matches(value).then(|| DownloadCandidate {
            name: value.to_string(),
            url: url.clone(),
        })
    })
}
