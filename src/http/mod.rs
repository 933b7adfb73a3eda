//! HTTP module containing HTTP client functionality.
//!
//! - [`client`] - client creation with tracing and optional retry middleware
//! - [`fetch`] - the [`Fetch`] trait used by the image acquisition engine and
//!   its reqwest-backed implementation

pub mod client;
pub mod fetch;

pub use client::{create_http_client, HttpClientConfig, DEFAULT_USER_AGENT};
pub use fetch::{Fetch, HttpFetcher};
