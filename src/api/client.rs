//! Paged client for the content API.

use super::credentials::Credentials;
use crate::error::{Error, Result};
use crate::http::{create_http_client, HttpClientConfig};
use crate::model::Post;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tokio::time;
use tracing::{debug, info};
use url::Url;

/// Upper bound on pages, so a server that never stops paging cannot loop
/// the client forever.
const MAX_PAGES: u32 = 10_000;

/// A page of posts, either bare or wrapped with a continuation flag.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PageBody {
    List(Vec<Post>),
    Envelope {
        posts: Vec<Post>,
        #[serde(default, rename = "hasMore")]
        has_more: Option<bool>,
    },
}

impl PageBody {
    fn into_parts(self) -> (Vec<Post>, Option<bool>) {
        match self {
            PageBody::List(posts) => (posts, None),
            PageBody::Envelope { posts, has_more } => (posts, has_more),
        }
    }
}

/// Guidance for an API failure class.
pub fn status_hint(status: StatusCode) -> Option<&'static str> {
    match status {
        StatusCode::UNAUTHORIZED => Some(
            "Authentication failed: check that api_token in the credentials file is valid and not expired.",
        ),
        StatusCode::FORBIDDEN => Some(
            "Permission denied: the token is valid but cannot read posts of this publication.",
        ),
        StatusCode::NOT_FOUND => Some(
            "Not found: check api_url and publication in the credentials file.",
        ),
        StatusCode::TOO_MANY_REQUESTS => {
            Some("Rate limited: raise page_delay_ms in the credentials file.")
        }
        _ => None,
    }
}

/// Fetches every post of a publication, page by page.
#[derive(Clone)]
pub struct PostClient {
    client: ClientWithMiddleware,
    posts_url: Url,
    token: String,
    publication: Option<String>,
    per_page: u32,
    page_delay: Duration,
}

impl fmt::Debug for PostClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostClient")
            .field("posts_url", &self.posts_url.as_str())
            .field("publication", &self.publication)
            .field("per_page", &self.per_page)
            .field("page_delay", &self.page_delay)
            .finish()
    }
}

impl PostClient {
    /// Client with transient-failure retries, configured from `credentials`.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let client = create_http_client(HttpClientConfig::default())?;
        Self::with_client(client, credentials)
    }

    pub fn with_client(client: ClientWithMiddleware, credentials: &Credentials) -> Result<Self> {
        let base = credentials.api_url.trim().trim_end_matches('/');
        let posts_url = Url::parse(&format!("{}/posts", base))
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", credentials.api_url, e)))?;
        Ok(Self {
            client,
            posts_url,
            token: credentials.api_token.clone(),
            publication: credentials.publication.clone(),
            per_page: credentials.per_page,
            page_delay: credentials.page_delay(),
        })
    }

    /// Override the pause between two page requests.
    pub fn page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    fn page_url(&self, page: u32) -> Url {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &self.per_page.to_string());
        if let Some(publication) = &self.publication {
            query.append_pair("publication", publication);
        }
        let mut url = self.posts_url.clone();
        url.set_query(Some(&query.finish()));
        url
    }

    async fn fetch_page(&self, page: u32) -> Result<(Vec<Post>, Option<bool>)> {
        let url = self.page_url(page);
        debug!(%url, page, "Requesting posts");

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body.trim().chars().take(200).collect()
            };
            return Err(Error::Api {
                status: status.as_u16(),
                message,
                hint: status_hint(status).map(String::from),
            });
        }

        let bytes = response.bytes().await?;
        let body: PageBody = serde_json::from_slice(&bytes).map_err(|e| Error::Api {
            status: status.as_u16(),
            message: format!("unexpected response body: {}", e),
            hint: None,
        })?;
        Ok(body.into_parts())
    }

    /// Fetch every page and return the posts in server order.
    ///
    /// Paging stops on an empty page, on `hasMore: false`, or on a short page
    /// when the server does not send `hasMore`. Local-path fields are cleared
    /// on every fetched post.
    pub async fn fetch_all(&self) -> Result<Vec<Post>> {
        let mut all = Vec::new();

        for page in 1..=MAX_PAGES {
            if page > 1 && !self.page_delay.is_zero() {
                time::sleep(self.page_delay).await;
            }

            let (mut posts, has_more) = self.fetch_page(page).await?;
            let received = posts.len();
            debug!(page, received, ?has_more, "Page received");

            posts.iter_mut().for_each(Post::clear_local_paths);
            all.extend(posts);

            let more = match has_more {
                Some(more) => more && received > 0,
                None => received as u32 >= self.per_page,
            };
            if !more {
                break;
            }
        }

        info!(posts = all.len(), "Fetched posts");
        Ok(all)
    }
}

/// Read posts from a JSON file holding an array of posts, or a page
/// envelope. Local-path fields are cleared like on API records.
pub fn read_posts_file(path: &Path) -> Result<Vec<Post>> {
    let raw = std::fs::read(path)?;
    let body: PageBody = serde_json::from_slice(&raw)?;
    let (mut posts, _) = body.into_parts();
    posts.iter_mut().for_each(Post::clear_local_paths);
    Ok(posts)
}
