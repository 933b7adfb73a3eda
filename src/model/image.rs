//! Image download bookkeeping: tasks, results, the ledger and the
//! URL to local path mapping.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use url::Url;

/// Where an image is referenced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRole {
    /// The post's structured cover image.
    Cover,
    /// An `![alt](url)` reference inside the content.
    Inline,
}

impl ImageRole {
    /// Prefix of the stored file name.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            ImageRole::Cover => "cover",
            ImageRole::Inline => "image",
        }
    }
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_prefix())
    }
}

/// One image to fetch for one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDownloadTask {
    /// Identity of the post referencing the image.
    pub post_id: String,
    /// Sanitized folder name under `images/`.
    pub post_dir: String,
    /// Source URL, already validated.
    pub url: Url,
    /// The URL exactly as it appears in the post.
    pub original_url: String,
    pub role: ImageRole,
}

/// Outcome of an image task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Stored at the given path, relative to the output root.
    Success(String),
    /// Every attempt failed; carries the last error.
    Fail(String),
}

/// Result of one attempted [`ImageDownloadTask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDownloadResult {
    post_id: String,
    url: String,
    status: Status,
}

impl ImageDownloadResult {
    /// A successful download stored at `local_path`.
    pub fn success(task: &ImageDownloadTask, local_path: impl Into<String>) -> Self {
        Self {
            post_id: task.post_id.clone(),
            url: task.original_url.clone(),
            status: Status::Success(local_path.into()),
        }
    }

    /// A download that exhausted its attempts.
    pub fn fail(task: &ImageDownloadTask, error: impl fmt::Display) -> Self {
        Self {
            post_id: task.post_id.clone(),
            url: task.original_url.clone(),
            status: Status::Fail(error.to_string()),
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, Status::Success(_))
    }

    /// Local relative path on success.
    pub fn local_path(&self) -> Option<&str> {
        match &self.status {
            Status::Success(path) => Some(path),
            Status::Fail(_) => None,
        }
    }

    /// Last error description on failure.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            Status::Success(_) => None,
            Status::Fail(e) => Some(e),
        }
    }
}

/// A failed download as listed in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedDownload {
    pub post_id: String,
    pub url: String,
    pub error: String,
}

/// Counters derived from a [`Ledger`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerStats {
    pub attempted: usize,
    pub downloaded: usize,
    pub failed: usize,
    pub failures: Vec<FailedDownload>,
}

/// Append-only record of every image download outcome in a run.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<ImageDownloadResult>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result. Entries are never changed afterwards.
    pub fn record(&mut self, result: ImageDownloadResult) {
        self.entries.push(result);
    }

    pub fn entries(&self) -> &[ImageDownloadResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> LedgerStats {
        let failures: Vec<FailedDownload> = self
            .entries
            .iter()
            .filter_map(|r| {
                r.error().map(|e| FailedDownload {
                    post_id: r.post_id.clone(),
                    url: r.url.clone(),
                    error: e.to_string(),
                })
            })
            .collect();

        LedgerStats {
            attempted: self.entries.len(),
            downloaded: self.entries.len() - failures.len(),
            failed: failures.len(),
            failures,
        }
    }
}

impl FromIterator<ImageDownloadResult> for Ledger {
    fn from_iter<I: IntoIterator<Item = ImageDownloadResult>>(iter: I) -> Self {
        let mut ledger = Ledger::new();
        for result in iter {
            ledger.record(result);
        }
        ledger
    }
}

/// Lookup from remote image URL to local relative path.
///
/// Images are stored per post, so lookups are scoped by post id: the same
/// URL referenced by two posts maps to two different files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageMap {
    by_post: HashMap<String, HashMap<String, String>>,
}

impl ImageMap {
    /// Build the mapping from the successful entries of a ledger.
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let mut by_post: HashMap<String, HashMap<String, String>> = HashMap::new();
        for result in ledger.entries() {
            if let Some(path) = result.local_path() {
                by_post
                    .entry(result.post_id.clone())
                    .or_default()
                    .insert(result.url.clone(), path.to_string());
            }
        }
        Self { by_post }
    }

    /// Local path of `url` as downloaded for `post_id`.
    pub fn get(&self, post_id: &str, url: &str) -> Option<&str> {
        self.by_post
            .get(post_id)
            .and_then(|urls| urls.get(url))
            .map(String::as_str)
    }

    /// Number of mapped (post, url) pairs.
    pub fn len(&self) -> usize {
        self.by_post.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(post_id: &str, url: &str) -> ImageDownloadTask {
        ImageDownloadTask {
            post_id: post_id.into(),
            post_dir: post_id.into(),
            url: Url::parse(url).unwrap(),
            original_url: url.into(),
            role: ImageRole::Inline,
        }
    }

    #[test]
    fn test_result_accessors() {
        let t = task("p1", "https://x.io/a.png");
        let ok = ImageDownloadResult::success(&t, "images/p1/image-12345678.png");
        assert!(ok.is_success());
        assert_eq!(ok.local_path(), Some("images/p1/image-12345678.png"));
        assert_eq!(ok.error(), None);

        let ko = ImageDownloadResult::fail(&t, "HTTP 500");
        assert!(!ko.is_success());
        assert_eq!(ko.error(), Some("HTTP 500"));
        assert_eq!(ko.status(), &Status::Fail("HTTP 500".into()));
    }

    #[test]
    fn test_ledger_stats() {
        let ledger: Ledger = vec![
            ImageDownloadResult::success(&task("p1", "https://x.io/a.png"), "a"),
            ImageDownloadResult::fail(&task("p2", "https://x.io/b.png"), "timed out"),
            ImageDownloadResult::success(&task("p2", "https://x.io/c.png"), "c"),
        ]
        .into_iter()
        .collect();

        let stats = ledger.stats();
        assert_eq!(stats.attempted, 3);
        assert_eq!(stats.downloaded, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(
            stats.failures,
            vec![FailedDownload {
                post_id: "p2".into(),
                url: "https://x.io/b.png".into(),
                error: "timed out".into(),
            }]
        );
    }

    #[test]
    fn test_image_map_is_post_scoped() {
        let url = "https://x.io/shared.png";
        let ledger: Ledger = vec![
            ImageDownloadResult::success(&task("p1", url), "images/p1/image-aaaaaaaa.png"),
            ImageDownloadResult::success(&task("p2", url), "images/p2/image-aaaaaaaa.png"),
            ImageDownloadResult::fail(&task("p3", url), "HTTP 404"),
        ]
        .into_iter()
        .collect();

        let map = ImageMap::from_ledger(&ledger);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("p1", url), Some("images/p1/image-aaaaaaaa.png"));
        assert_eq!(map.get("p2", url), Some("images/p2/image-aaaaaaaa.png"));
        assert_eq!(map.get("p3", url), None);
    }
}
