//! Data model shared by every stage of an export.
//!
//! - [`post`] - the [`Post`] record as delivered by the content API
//! - [`image`] - image download tasks, results, the [`Ledger`] and the
//!   [`ImageMap`] built from it

pub mod image;
pub mod post;

pub use image::{
    FailedDownload, ImageDownloadResult, ImageDownloadTask, ImageMap, ImageRole, Ledger,
    LedgerStats, Status,
};
pub use post::{unique_file_stems, CoverImage, Post, PostStatus};
