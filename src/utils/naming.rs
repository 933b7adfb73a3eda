//! File naming helpers.
//!
//! Everything that ends up as a path component goes through
//! [`sanitize_filename`], and image files are named after their content via
//! [`content_hash`] so that identical bytes always land in the same file.

use chrono::{DateTime, Utc};
use url::Url;

/// Image extensions kept as-is when inferring a file extension from a URL.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp"];

const FALLBACK_EXTENSION: &str = ".jpg";
const MAX_FILENAME_LEN: usize = 100;

/// Turn an arbitrary string into a safe, lower-case path component.
///
/// ASCII alphanumerics, `-` and `_` are kept; every other run of characters
/// collapses into a single `-`. The result never starts or ends with `-`, is
/// at most 100 characters long, and falls back to `untitled` when nothing
/// usable is left.
///
/// ```
/// use blogport::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("My \"Great\" Post"), "my-great-post");
/// assert_eq!(sanitize_filename("???"), "untitled");
/// ```
pub fn sanitize_filename(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if out.len() > MAX_FILENAME_LEN {
        out.truncate(MAX_FILENAME_LEN);
        while out.ends_with('-') {
            out.pop();
        }
    }

    if out.is_empty() {
        "untitled".to_string()
    } else {
        out
    }
}

/// Short content hash used in image file names: the first 8 hex characters
/// of the MD5 digest.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hex = format!("{:x}", md5::compute(bytes));
    hex.truncate(8);
    hex
}

/// Infer the file extension (with its leading dot) of an image URL.
///
/// Only the last path segment is considered, so query strings and fragments
/// never leak into the name. Anything that is not a known image extension
/// becomes `.jpg`.
pub fn image_extension(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(u) => u.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    path.rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

/// Parse a candidate image URL, accepting only absolute `http`/`https` URLs.
pub fn parse_image_url(candidate: &str) -> Option<Url> {
    let url = Url::parse(candidate.trim()).ok()?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Some(url),
        _ => None,
    }
}

/// Whether `candidate` would be downloaded by the acquisition engine.
pub fn is_valid_image_url(candidate: &str) -> bool {
    parse_image_url(candidate).is_some()
}

/// Timestamp formatted for use in file and folder names.
pub fn timestamp_slug(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H-%M-%S").to_string()
}
