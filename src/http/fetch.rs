//! The network seam of the image acquisition engine.
//!
//! The engine only needs "give me the bytes behind this URL". [`Fetch`]
//! captures exactly that, which keeps retry, timeout and concurrency logic
//! testable without a network.

use crate::error::FetchError;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use tracing::debug;
use url::Url;

/// Retrieves the body behind a URL.
///
/// Implementations report non-success statuses and empty bodies as errors;
/// the caller applies deadlines and retries.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// [`Fetch`] implementation backed by the crate's HTTP client.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: ClientWithMiddleware,
}

impl HttpFetcher {
    pub fn new(client: ClientWithMiddleware) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        debug!("Fetching {}", url);
        let res = self.client.get(url.as_str()).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = res.bytes().await?;
        if body.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        Ok(body.to_vec())
    }
}
