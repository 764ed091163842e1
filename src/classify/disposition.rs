//! Response header helpers for the network probe
//!
//! Extracts file names from `Content-Disposition` and maps `Content-Type`
//! values to downloadable MIME types.

use std::borrow::Cow;

/// A MIME type treated as a downloadable resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadableMime {
    pub mime: &'static str,
    /// Extension appended to names that lack one
    pub extension: Option<&'static str>,
}

const fn mime(mime: &'static str, extension: Option<&'static str>) -> DownloadableMime {
    DownloadableMime { mime, extension }
}

const DOWNLOADABLE_MIME_TYPES: &[DownloadableMime] = &[
    mime("application/pdf", Some(".pdf")),
    mime("application/zip", Some(".zip")),
    mime("application/x-zip-compressed", Some(".zip")),
    mime("application/x-tar", Some(".tar")),
    mime("application/gzip", Some(".gz")),
    mime("application/x-gzip", Some(".gz")),
    mime("application/x-7z-compressed", Some(".7z")),
    mime("application/vnd.rar", Some(".rar")),
    mime("application/x-rar-compressed", Some(".rar")),
    mime("application/msword", Some(".doc")),
    mime(
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some(".docx"),
    ),
    mime("application/vnd.ms-excel", Some(".xls")),
    mime(
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some(".xlsx"),
    ),
    mime("application/vnd.ms-powerpoint", Some(".ppt")),
    mime(
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        Some(".pptx"),
    ),
    mime("audio/mpeg", Some(".mp3")),
    mime("audio/ogg", Some(".ogg")),
    mime("video/mp4", Some(".mp4")),
    mime("video/x-msvideo", Some(".avi")),
    mime("video/quicktime", Some(".mov")),
    mime("application/x-iso9660-image", Some(".iso")),
    mime("application/x-msdownload", Some(".exe")),
    mime("application/x-apple-diskimage", Some(".dmg")),
    mime("application/vnd.android.package-archive", Some(".apk")),
    mime("application/vnd.debian.binary-package", Some(".deb")),
    mime("application/x-rpm", Some(".rpm")),
    mime("text/csv", Some(".csv")),
    mime("application/octet-stream", None),
];

/// Looks up a `Content-Type` header value in the downloadable MIME table
///
/// Parameters such as `; charset=...` are ignored and matching is
/// case-insensitive.
pub fn downloadable_mime(content_type: &str) -> Option<&'static DownloadableMime> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    DOWNLOADABLE_MIME_TYPES.iter().find(|m| m.mime == essence)
}

/// Parses a `Content-Disposition` header to extract the file name
///
/// Preference order:
/// - `filename*=UTF-8''annual%20report.pdf` (RFC 5987 extended value)
/// - `filename="annual report.pdf"`
/// - `filename=report.pdf`
///
/// # Examples
///
/// ```
/// use trawl::classify::parse_content_disposition;
///
/// assert_eq!(
///     parse_content_disposition(r#"attachment; filename="a b.pdf""#),
///     Some("a b.pdf".to_string())
/// );
/// assert_eq!(
///     parse_content_disposition("attachment; filename=x.zip; filename*=UTF-8''%E2%82%AC.zip"),
///     Some("€.zip".to_string())
/// );
/// ```
pub fn parse_content_disposition(header: &str) -> Option<String> {
    let params = parse_params(header);

    let extended = params
        .iter()
        .find(|(key, _)| key == "filename*")
        .and_then(|(_, value)| decode_extended_value(value))
        .filter(|name| !name.is_empty());
    if extended.is_some() {
        return extended;
    }

    params
        .into_iter()
        .find(|(key, _)| key == "filename")
        .map(|(_, value)| value)
        .filter(|name| !name.is_empty())
}

/// Splits a header into lower-cased `key=value` parameters
///
/// Quoted values are unquoted (with `\"` escapes honoured) and may contain `;`.
fn parse_params(header: &str) -> Vec<(String, String)> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in header.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => {
                current.push(c);
                escaped = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ';' if !in_quotes => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);

    segments
        .iter()
        .filter_map(|segment| {
            let (key, value) = segment.split_once('=')?;
            Some((key.trim().to_ascii_lowercase(), unquote(value.trim())))
        })
        .collect()
}

fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return value.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Decodes an RFC 5987 `charset'language'value` string
fn decode_extended_value(value: &str) -> Option<String> {
    let mut parts = value.splitn(3, '\'');
    let charset = parts.next()?.trim();
    let _language = parts.next()?;
    let encoded = parts.next()?.trim();

    if charset.eq_ignore_ascii_case("iso-8859-1") {
        let bytes = urlencoding::decode_binary(encoded.as_bytes());
        return Some(bytes.iter().map(|&b| b as char).collect());
    }

    urlencoding::decode(encoded).ok().map(Cow::into_owned)
}
