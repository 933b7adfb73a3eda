//! Content API access: credentials and the paged post client.

pub mod client;
pub mod credentials;

pub use client::{read_posts_file, status_hint, PostClient};
pub use credentials::Credentials;
