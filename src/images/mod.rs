//! Image acquisition engine.
//!
//! Fetches every cover and inline image referenced by a post collection with
//! a fixed concurrency ceiling, a deadline per attempt and exponential
//! backoff between attempts. Images are stored under
//! `images/<post>/<cover|image>-<hash><ext>`.
//!
//! - `extract` - turning posts into download tasks
//! - `config` - engine configuration and defaults
//! - `builder` - [`ImageDownloaderBuilder`]
//! - `engine` - [`ImageDownloader`] and the retry loop
//!
//! # Examples
//!
//! ```rust,no_run
//! use blogport::images::ImageDownloaderBuilder;
//! use blogport::model::Post;
//!
//! # async fn example(posts: Vec<Post>) -> blogport::Result<()> {
//! let downloader = ImageDownloaderBuilder::new()
//!     .directory("export".into())
//!     .concurrent_downloads(5)
//!     .build()?;
//!
//! let (map, ledger) = downloader.download(&posts).await;
//! println!("{} of {} images stored", map.len(), ledger.len());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod extract;

pub use builder::ImageDownloaderBuilder;
pub use config::ImageDownloaderConfig;
pub use engine::{backoff_delay, ImageDownloader};
pub use extract::{collect_tasks, inline_image_urls, post_tasks};
