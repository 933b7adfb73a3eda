//! Builder for [`Exporter`].
//!
//! ```rust
//! use blogport::export::{ExportFormat, ExporterBuilder};
//!
//! # fn example() -> blogport::Result<()> {
//! let exporter = ExporterBuilder::new()
//!     .output_dir("export".into())
//!     .format(ExportFormat::Markdown)
//!     .download_images(true)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use super::config::{ExportConfig, ExportFormat};
use super::exporter::Exporter;
use crate::error::{Error, Result};
use crate::http::{create_http_client, Fetch, HttpClientConfig, HttpFetcher};
use crate::progress::ProgressBarOpts;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// A builder used to create an [`Exporter`].
#[derive(Default)]
pub struct ExporterBuilder {
    config: ExportConfig,
    fetcher: Option<Arc<dyn Fetch>>,
}

impl ExporterBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        ExporterBuilder::default()
    }

    /// Convenience function to hide the image progress bar.
    pub fn hidden() -> Self {
        Self::new().progress(ProgressBarOpts::hidden())
    }

    pub fn output_dir(mut self, output_dir: PathBuf) -> Self {
        self.config.output_dir = output_dir;
        self
    }

    pub fn base_name(mut self, base_name: impl Into<String>) -> Self {
        self.config.base_name = base_name.into();
        self
    }

    pub fn format(mut self, format: ExportFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn include_content(mut self, include_content: bool) -> Self {
        self.config.include_content = include_content;
        self
    }

    pub fn include_images(mut self, include_images: bool) -> Self {
        self.config.include_images = include_images;
        self
    }

    /// Download referenced images and localize their references.
    pub fn download_images(mut self, download_images: bool) -> Self {
        self.config.images.enabled = download_images;
        self
    }

    pub fn bundle(mut self, bundle: bool) -> Self {
        self.config.bundle = bundle;
        self
    }

    /// Archive bundles. Ignored for flat exports.
    pub fn zip(mut self, zip: bool) -> Self {
        self.config.zip = zip;
        self
    }

    pub fn customer(mut self, customer: Option<String>) -> Self {
        self.config.customer = customer.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn bundle_title(mut self, bundle_title: impl Into<String>) -> Self {
        self.config.bundle_title = bundle_title.into();
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self.config.images.dry_run = dry_run;
        self
    }

    /// Set the number of concurrent image downloads.
    pub fn concurrent_downloads(mut self, concurrent_downloads: usize) -> Self {
        self.config.images.concurrent_downloads = concurrent_downloads;
        self
    }

    /// Set the number of attempts per image.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.images.retries = retries;
        self
    }

    /// Set the deadline of a single image download attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.images.timeout = timeout;
        self
    }

    /// Set the backoff unit used between image download attempts.
    pub fn backoff_base(mut self, backoff_base: Duration) -> Self {
        self.config.images.backoff_base = backoff_base;
        self
    }

    /// Set the image progress bar options.
    pub fn progress(mut self, progress: ProgressBarOpts) -> Self {
        self.config.images.progress = progress;
        self
    }

    /// Fetch images through `fetcher` instead of the HTTP client.
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetch>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    fn validate(&self) -> Result<()> {
        let config = &self.config;
        if config.base_name.trim().is_empty() {
            return Err(Error::config("base name must not be empty"));
        }
        if config.bundle_title.trim().is_empty() {
            return Err(Error::config("bundle title must not be empty"));
        }
        if config.images.concurrent_downloads == 0 {
            return Err(Error::config("image concurrency must be at least 1"));
        }
        if config.images.retries == 0 {
            return Err(Error::config("image retry count must be at least 1"));
        }
        if config.images.timeout.is_zero() {
            return Err(Error::config("image timeout must be greater than 0ms"));
        }
        Ok(())
    }

    /// Create the [`Exporter`].
    pub fn build(self) -> Result<Exporter> {
        self.validate()?;
        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => {
                let client = create_http_client(HttpClientConfig {
                    retries: 0,
                    proxy: None,
                    headers: self.config.images.headers.clone(),
                })?;
                Arc::new(HttpFetcher::new(client))
            }
        };
        Ok(Exporter::new(self.config, fetcher))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let exporter = ExporterBuilder::new().build().unwrap();
        let config = exporter.config();
        assert_eq!(config.format, ExportFormat::All);
        assert_eq!(config.base_name, "blog-export");
        assert!(config.include_content);
        assert!(!config.bundle);
        assert!(config.zip);
        assert!(!config.images.enabled);
    }

    #[test]
    fn test_builder_dry_run_reaches_images() {
        let exporter = ExporterBuilder::new().dry_run(true).build().unwrap();
        assert!(exporter.config().dry_run);
        assert!(exporter.config().images.dry_run);
    }

    #[test]
    fn test_builder_validation() {
        assert!(matches!(
            ExporterBuilder::new().base_name(" ").build(),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            ExporterBuilder::new().bundle_title("").build(),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            ExporterBuilder::new().concurrent_downloads(0).build(),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            ExporterBuilder::new().retries(0).build(),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_blank_customer_is_dropped() {
        let exporter = ExporterBuilder::new()
            .customer(Some("  ".into()))
            .build()
            .unwrap();
        assert_eq!(exporter.config().customer, None);
    }
}
