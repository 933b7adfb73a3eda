//! Core image acquisition: bounded concurrency, per-attempt deadline,
//! exponential backoff and content-addressed storage.

use super::config::ImageDownloaderConfig;
use super::extract::collect_tasks;
use crate::error::FetchError;
use crate::http::Fetch;
use crate::model::{ImageDownloadResult, ImageDownloadTask, ImageMap, Ledger, Post};
use crate::progress::ProgressDisplay;
use crate::utils::{content_hash, image_extension};

use futures::future::join_all;
use reqwest::header::HeaderMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::{fs, sync::Semaphore, time};
use tracing::{debug, info, warn};

/// Fetches every image referenced by a post collection.
///
/// Created with [`ImageDownloaderBuilder`](super::ImageDownloaderBuilder).
#[derive(Clone)]
pub struct ImageDownloader {
    config: ImageDownloaderConfig,
    fetcher: Arc<dyn Fetch>,
}

impl fmt::Debug for ImageDownloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageDownloader")
            .field("config", &self.config)
            .finish()
    }
}

/// Wait after failed attempt `attempt` (counted from 1): `base * 2^attempt`.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

impl ImageDownloader {
    pub(crate) fn new(config: ImageDownloaderConfig, fetcher: Arc<dyn Fetch>) -> Self {
        Self { config, fetcher }
    }

    /// Gets the output root.
    pub fn directory(&self) -> &PathBuf {
        &self.config.directory
    }

    /// Gets the number of attempts per image.
    pub fn retries(&self) -> u32 {
        self.config.retries
    }

    /// Gets the number of concurrent downloads.
    pub fn concurrent_downloads(&self) -> usize {
        self.config.concurrent_downloads
    }

    /// Gets the per-attempt deadline.
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Gets whether downloading is enabled.
    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// Gets the custom headers.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.config.headers.as_ref()
    }

    /// Download every valid cover and inline image of `posts`.
    ///
    /// Returns once every task settled. The mapping only holds successes;
    /// the ledger holds one entry per attempted task. When downloading is
    /// disabled or in dry-run mode nothing is fetched and both are empty.
    pub async fn download(&self, posts: &[Post]) -> (ImageMap, Ledger) {
        if !self.config.enabled || self.config.dry_run {
            debug!(
                enabled = self.config.enabled,
                dry_run = self.config.dry_run,
                "Image download skipped"
            );
            return (ImageMap::default(), Ledger::new());
        }

        let tasks = collect_tasks(posts);
        if tasks.is_empty() {
            debug!("No images referenced");
            return (ImageMap::default(), Ledger::new());
        }

        info!(
            images = tasks.len(),
            concurrency = self.config.concurrent_downloads,
            "Downloading images"
        );

        // One limiter per run, dropped when the run is over.
        let limiter = Semaphore::new(self.config.concurrent_downloads);
        let progress = ProgressDisplay::new(self.config.progress.clone(), tasks.len());

        let results = join_all(
            tasks
                .iter()
                .map(|task| self.run_task(task, &limiter, &progress)),
        )
        .await;

        progress.finish();

        let ledger: Ledger = results.into_iter().collect();
        let map = ImageMap::from_ledger(&ledger);
        let stats = ledger.stats();
        info!(
            attempted = stats.attempted,
            downloaded = stats.downloaded,
            failed = stats.failed,
            "Image download finished"
        );

        (map, ledger)
    }

    /// Run one task to completion, holding a limiter permit throughout.
    async fn run_task(
        &self,
        task: &ImageDownloadTask,
        limiter: &Semaphore,
        progress: &ProgressDisplay,
    ) -> ImageDownloadResult {
        let _permit = match limiter.acquire().await {
            Ok(permit) => permit,
            Err(e) => return ImageDownloadResult::fail(task, e),
        };

        let mut last_error: Option<FetchError> = None;
        for attempt in 1..=self.config.retries {
            debug!(url = %task.url, attempt, "Fetching image");
            match self.attempt(task).await {
                Ok(local_path) => {
                    progress.settle(&task.original_url);
                    return ImageDownloadResult::success(task, local_path);
                }
                Err(e) => {
                    warn!(
                        post = %task.post_id,
                        url = %task.url,
                        attempt,
                        max_attempts = self.config.retries,
                        error = %e,
                        "Image download attempt failed"
                    );
                    last_error = Some(e);
                    if attempt < self.config.retries {
                        time::sleep(backoff_delay(self.config.backoff_base, attempt)).await;
                    }
                }
            }
        }

        progress.settle(&task.original_url);
        match last_error {
            Some(e) => ImageDownloadResult::fail(task, e),
            None => ImageDownloadResult::fail(task, "no attempt was made"),
        }
    }

    /// A single attempt: fetch under the deadline, then persist.
    async fn attempt(&self, task: &ImageDownloadTask) -> Result<String, FetchError> {
        let bytes = time::timeout(self.config.timeout, self.fetcher.fetch(&task.url))
            .await
            .map_err(|_| FetchError::Timeout(self.config.timeout))??;

        if bytes.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        let file_name = format!(
            "{}-{}{}",
            task.role.file_prefix(),
            content_hash(&bytes),
            image_extension(&task.original_url)
        );

        let output_dir = self.config.directory.join("images").join(&task.post_dir);
        // create_dir_all succeeds when a concurrent task created it first.
        fs::create_dir_all(&output_dir).await?;

        // Write then rename; the staging name is unique per task so two
        // tasks never share a half-written file.
        let staging_key = format!("{}\n{}", task.post_id, task.original_url);
        let staging = output_dir.join(format!(
            ".{}.{}.part",
            file_name,
            content_hash(staging_key.as_bytes())
        ));
        fs::write(&staging, &bytes).await?;
        fs::rename(&staging, output_dir.join(&file_name)).await?;

        debug!(url = %task.url, file = %file_name, "Image stored");
        Ok(format!("images/{}/{}", task.post_dir, file_name))
    }
}
