//! Filename sanitization for downloads.

/// Name used when nothing usable survives sanitization
pub const FALLBACK_FILENAME: &str = "download";

/// Turns a suggested name into a safe file name inside the destination
///
/// Only the base name is kept (directory parts split on `/` or `\` are
/// dropped), then every character outside `[A-Za-z0-9_.\- ]` becomes `_`.
/// An empty result, `.` or `..` becomes `download`.
///
/// # Examples
///
/// ```
/// use trawl::sanitize_filename;
///
/// assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
/// assert_eq!(sanitize_filename("report (final)!.pdf"), "report _final__.pdf");
/// assert_eq!(sanitize_filename(".."), "download");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("").trim();

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();

    match sanitized.as_str() {
        "" | "." | ".." => FALLBACK_FILENAME.to_string(),
        _ => sanitized,
    }
}
