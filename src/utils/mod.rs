//! Shared utility functions.
//!
//! This module contains the path and naming helpers used by the image
//! acquisition engine, the exporter and the bundle packager.
//!
//! # Examples
//!
//! ```rust
//! use blogport::utils::{content_hash, image_extension, sanitize_filename};
//!
//! assert_eq!(sanitize_filename("Hello, World!"), "hello-world");
//! assert_eq!(image_extension("https://cdn.example.com/a/photo.PNG?w=300"), ".png");
//! assert_eq!(content_hash(b"").len(), 8);
//! ```

pub mod naming;

pub use naming::{
    content_hash, image_extension, is_valid_image_url, parse_image_url, sanitize_filename,
    timestamp_slug, IMAGE_EXTENSIONS,
};
