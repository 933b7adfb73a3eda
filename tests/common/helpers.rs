#![allow(dead_code)]

use async_trait::async_trait;
use blogport::export::ExporterBuilder;
use blogport::images::ImageDownloaderBuilder;
use blogport::model::{CoverImage, Post, PostStatus};
use blogport::progress::ProgressBarOpts;
use blogport::{Fetch, FetchError, HttpClientConfig};
use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use walkdir::WalkDir;

// Common test constants
pub const TEST_USER_AGENT: &str = "blogport-test-agent";
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-bytes";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Fixed export time: 2024-03-09T14:30:05Z
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 5).unwrap()
}

pub const TEST_STAMP: &str = "2024-03-09T14-30-05";

// === Post Helpers ===

/// Creates a post with the given id, title and status
pub fn create_post(id: &str, title: &str, status: Option<PostStatus>) -> Post {
    let mut post = Post::default();
    post.id = id.to_string();
    post.title = title.to_string();
    post.slug = title.to_lowercase().replace(' ', "-");
    post.status = status;
    post.content = Some(format!("Body of {}", title));
    post.excerpt = Some(format!("About {}", title));
    post.tags = vec!["test".to_string()];
    post.published_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
    post
}

/// Creates a post with a cover image and inline images
pub fn create_post_with_images(id: &str, cover: Option<&str>, inline: &[&str]) -> Post {
    let content = inline
        .iter()
        .enumerate()
        .map(|(i, url)| format!("![image {}]({})", i, url))
        .collect::<Vec<_>>()
        .join("\n\n");
    let mut post = Post::default();
    post.id = id.to_string();
    post.title = format!("Post {}", id);
    post.slug = format!("post-{}", id);
    post.content = Some(content);
    post.cover_image = cover.map(CoverImage::new);
    post
}

/// Creates `count` posts with one inline image each
pub fn create_posts_with_one_image(count: usize) -> Vec<Post> {
    (0..count)
        .map(|i| {
            let url = format!("https://img.example.com/{}.png", i);
            create_post_with_images(&i.to_string(), None, &[url.as_str()])
        })
        .collect()
}

// === Fake Fetchers ===

/// Serves fixed bodies per URL and records concurrency.
///
/// Unknown URLs answer `HTTP 404`.
#[derive(Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, Vec<u8>>,
    default_body: Option<Vec<u8>>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every URL with `body`.
    pub fn serving_all(body: &[u8]) -> Self {
        Self {
            default_body: Some(body.to_vec()),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetch for StaticFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.bodies.get(url.as_str()).or(self.default_body.as_ref()) {
            Some(body) => Ok(body.clone()),
            None => Err(FetchError::Status(404)),
        }
    }
}

/// Fails the first `failures` calls, then serves `body`.
pub struct FlakyFetcher {
    failures: usize,
    body: Vec<u8>,
    calls: AtomicUsize,
}

impl FlakyFetcher {
    pub fn new(failures: usize, body: &[u8]) -> Self {
        Self {
            failures,
            body: body.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Never succeeds.
    pub fn always_failing() -> Self {
        Self::new(usize::MAX, b"")
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetch for FlakyFetcher {
    async fn fetch(&self, _url: &Url) -> Result<Vec<u8>, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err(FetchError::Status(500))
        } else {
            Ok(self.body.clone())
        }
    }
}

// === Builder Helpers ===

/// Image downloader builder with a hidden progress bar and a fast backoff
pub fn create_test_downloader_builder(dir: &Path) -> ImageDownloaderBuilder {
    ImageDownloaderBuilder::hidden()
        .directory(dir.to_path_buf())
        .backoff_base(Duration::from_millis(1))
}

/// Exporter builder writing to `dir`, images served by `fetcher`
pub fn create_test_exporter_builder(dir: &Path, fetcher: Arc<dyn Fetch>) -> ExporterBuilder {
    ExporterBuilder::hidden()
        .output_dir(dir.to_path_buf())
        .backoff_base(Duration::from_millis(1))
        .fetcher(fetcher)
}

// === HTTP Configuration Helpers ===

/// Creates test headers with common user agent
pub fn create_test_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(TEST_USER_AGENT));
    headers
}

/// Creates a test HTTP client configuration with custom retries
pub fn create_test_http_config_with_retries(retries: u32) -> HttpClientConfig {
    HttpClientConfig {
        retries,
        proxy: None,
        headers: Some(create_test_headers()),
    }
}

// === Progress Bar Helpers ===

/// Creates hidden progress bar options for testing
pub fn create_hidden_progress_opts() -> ProgressBarOpts {
    ProgressBarOpts::hidden()
}

// === Assertion Helpers ===

/// Asserts that a file exists at the given path
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "File should exist at path: {:?}", path);
}

/// Reads a file into a string
pub fn read_to_string(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e))
}

/// Lists every file below `dir`, relative and sorted
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| entry.expect("Failed to read entry"))
        .filter(|entry| !entry.file_type().is_dir())
        .map(|entry| entry.path().strip_prefix(dir).unwrap().to_path_buf())
        .collect()
}
