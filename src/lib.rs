//! Blogport exports blog posts from a content API into portable Markdown,
//! JSON and CSV files, downloading referenced images and pointing every
//! representation at the local copies.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use blogport::{api::Credentials, api::PostClient, export::ExporterBuilder, Error};
//! use std::path::{Path, PathBuf};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let credentials = Credentials::load(Path::new("blogport.toml"))?;
//! let posts = PostClient::new(&credentials)?.fetch_all().await?;
//!
//! let exporter = ExporterBuilder::new()
//!     .output_dir(PathBuf::from("export"))
//!     .download_images(true)
//!     .bundle(true)
//!     .build()?;
//! let outcome = exporter.export(&posts, chrono::Utc::now()).await?;
//! for artifact in &outcome.artifacts {
//!     println!("{}", artifact.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`api`] - credentials and the paged content API client
//! - [`model`] - posts, image download tasks and results, the ledger
//! - [`images`] - the bounded-concurrency image acquisition engine
//! - [`rewrite`] - localizing image references in posts
//! - [`export`] - flat and bundle exports in Markdown, JSON and CSV
//! - [`report`] - export summary and delivery README
//! - [`archive`] - ZIP packaging of bundles
//! - [`error`] - centralized error handling with the `Error` enum
//! - [`http`] - HTTP client functionality and the `Fetch` seam
//! - [`progress`] - progress bar styling and display management
//! - [`utils`] - file naming helpers

pub mod api;
pub mod archive;
pub mod error;
pub mod export;
pub mod http;
pub mod images;
pub mod model;
pub mod progress;
pub mod report;
pub mod rewrite;
pub mod utils;

pub use api::{Credentials, PostClient};
pub use archive::{package_bundle, ArchiveInfo};
pub use error::{Error, FetchError, Result};
pub use export::{ExportFormat, ExportOutcome, Exporter, ExporterBuilder};
pub use http::{create_http_client, Fetch, HttpClientConfig};
pub use images::{ImageDownloader, ImageDownloaderBuilder};
pub use model::{ImageMap, Ledger, Post, PostStatus};
pub use progress::ProgressBarOpts;
pub use report::SummaryReport;
pub use rewrite::{relocate_post, rewrite_post, rewrite_posts};
