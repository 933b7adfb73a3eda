//! Configuration of the image acquisition engine.

use crate::progress::ProgressBarOpts;

use reqwest::header::HeaderMap;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration structure for the image downloader.
#[derive(Debug, Clone)]
pub struct ImageDownloaderConfig {
    /// Output root; images land in `<root>/images/<post>/`.
    pub directory: PathBuf,
    /// Maximum number of images fetched at the same time.
    pub concurrent_downloads: usize,
    /// Attempts per image, including the first one.
    pub retries: u32,
    /// Deadline of a single attempt.
    pub timeout: Duration,
    /// Backoff unit: attempt `n` is followed by a wait of `base * 2^n`.
    pub backoff_base: Duration,
    /// Download images at all.
    pub enabled: bool,
    /// Plan only, never touch the network.
    pub dry_run: bool,
    /// Progress bar options.
    pub progress: ProgressBarOpts,
    /// Custom HTTP headers.
    pub headers: Option<HeaderMap>,
}

impl ImageDownloaderConfig {
    pub const DEFAULT_CONCURRENT_DOWNLOADS: usize = 5;
    pub const DEFAULT_RETRIES: u32 = 3;
    pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
}

impl Default for ImageDownloaderConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            concurrent_downloads: Self::DEFAULT_CONCURRENT_DOWNLOADS,
            retries: Self::DEFAULT_RETRIES,
            timeout: Duration::from_millis(Self::DEFAULT_TIMEOUT_MS),
            backoff_base: Duration::from_secs(1),
            enabled: true,
            dry_run: false,
            progress: ProgressBarOpts::default(),
            headers: None,
        }
    }
}
