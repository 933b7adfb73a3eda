//! Builder for [`ImageDownloader`].
//!
//! ```rust
//! use blogport::images::ImageDownloaderBuilder;
//! use std::time::Duration;
//!
//! # fn example() -> blogport::Result<()> {
//! let downloader = ImageDownloaderBuilder::new()
//!     .directory("export".into())
//!     .concurrent_downloads(4)
//!     .retries(3)
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use super::{config::ImageDownloaderConfig, engine::ImageDownloader};
use crate::error::{Error, Result};
use crate::http::{create_http_client, Fetch, HttpClientConfig, HttpFetcher};
use crate::progress::ProgressBarOpts;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use std::{path::PathBuf, sync::Arc, time::Duration};

/// A builder used to create an [`ImageDownloader`].
#[derive(Default)]
pub struct ImageDownloaderBuilder {
    config: ImageDownloaderConfig,
}

impl ImageDownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        ImageDownloaderBuilder::default()
    }

    /// Convenience function to hide the progress bar.
    pub fn hidden() -> Self {
        Self::new().progress(ProgressBarOpts::hidden())
    }

    /// Sets the output root.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.config.directory = directory;
        self
    }

    /// Set the number of attempts per image.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Set the number of concurrent downloads.
    pub fn concurrent_downloads(mut self, concurrent_downloads: usize) -> Self {
        self.config.concurrent_downloads = concurrent_downloads;
        self
    }

    /// Set the per-attempt deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the backoff unit used between attempts.
    pub fn backoff_base(mut self, backoff_base: Duration) -> Self {
        self.config.backoff_base = backoff_base;
        self
    }

    /// Enable or disable downloading altogether.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Plan only, without network calls.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// Set the progress bar options.
    pub fn progress(mut self, progress: ProgressBarOpts) -> Self {
        self.config.progress = progress;
        self
    }

    /// Add the http headers.
    ///
    /// Calling `.headers()` multiple times merges all maps.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.config.headers.take().unwrap_or_default();
        new.extend(headers);
        self.config.headers = Some(new);
        self
    }

    /// Add a single http header.
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.config.headers.take().unwrap_or_default();
        new.insert(name, value);
        self.config.headers = Some(new);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.config.concurrent_downloads == 0 {
            return Err(Error::config("image concurrency must be at least 1"));
        }
        if self.config.retries == 0 {
            return Err(Error::config("image retry count must be at least 1"));
        }
        if self.config.timeout.is_zero() {
            return Err(Error::config("image timeout must be greater than 0ms"));
        }
        Ok(())
    }

    /// Create the [`ImageDownloader`] backed by an HTTP client.
    ///
    /// The client has no retry middleware; attempts are counted by the
    /// downloader itself.
    pub fn build(self) -> Result<ImageDownloader> {
        self.validate()?;
        let client = create_http_client(HttpClientConfig {
            retries: 0,
            proxy: None,
            headers: self.config.headers.clone(),
        })?;
        Ok(ImageDownloader::new(
            self.config,
            Arc::new(HttpFetcher::new(client)),
        ))
    }

    /// Create the [`ImageDownloader`] with a custom [`Fetch`] implementation.
    pub fn build_with_fetcher(self, fetcher: Arc<dyn Fetch>) -> Result<ImageDownloader> {
        self.validate()?;
        Ok(ImageDownloader::new(self.config, fetcher))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let downloader = ImageDownloaderBuilder::new().build().unwrap();
        assert_eq!(downloader.concurrent_downloads(), 5);
        assert_eq!(downloader.retries(), 3);
        assert_eq!(downloader.timeout(), Duration::from_millis(30_000));
        assert!(downloader.enabled());
    }

    #[test]
    fn test_builder_rejects_zero_values() {
        assert!(matches!(
            ImageDownloaderBuilder::new().concurrent_downloads(0).build(),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            ImageDownloaderBuilder::new().retries(0).build(),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            ImageDownloaderBuilder::new().timeout(Duration::ZERO).build(),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_builder_merges_headers() {
        use reqwest::header::{ACCEPT, USER_AGENT};

        let downloader = ImageDownloaderBuilder::new()
            .header(USER_AGENT, HeaderValue::from_static("a"))
            .header(ACCEPT, HeaderValue::from_static("image/*"))
            .build()
            .unwrap();
        let headers = downloader.headers().unwrap();
        assert_eq!(headers.len(), 2);
    }
}
