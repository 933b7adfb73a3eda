//! Content API credentials, read from a TOML file.
//!
//! ```toml
//! api_url = "https://blog.example.com/api/v1"
//! api_token = "secret"
//! publication = "main"   # optional
//! per_page = 20          # optional, 1-100
//! page_delay_ms = 500    # optional
//! ```

use crate::error::{Error, Result};

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

fn default_per_page() -> u32 {
    Credentials::DEFAULT_PER_PAGE
}

fn default_page_delay_ms() -> u64 {
    Credentials::DEFAULT_PAGE_DELAY_MS
}

#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credentials {
    pub api_url: String,
    pub api_token: String,
    #[serde(default)]
    pub publication: Option<String>,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

// The token never shows up in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_url", &self.api_url)
            .field("api_token", &"***")
            .field("publication", &self.publication)
            .field("per_page", &self.per_page)
            .field("page_delay_ms", &self.page_delay_ms)
            .finish()
    }
}

impl Credentials {
    pub const DEFAULT_PER_PAGE: u32 = 20;
    pub const MAX_PER_PAGE: u32 = 100;
    pub const DEFAULT_PAGE_DELAY_MS: u64 = 500;

    /// Read and validate a credentials file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "cannot read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse and validate credentials from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let credentials: Credentials = toml::from_str(raw)
            .map_err(|e| Error::config(format!("invalid credentials file: {}", e)))?;
        credentials.validate()?;
        Ok(credentials)
    }

    fn validate(&self) -> Result<()> {
        let url = Url::parse(self.api_url.trim())
            .map_err(|e| Error::config(format!("api_url '{}' is not a URL: {}", self.api_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "api_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.api_token.trim().is_empty() {
            return Err(Error::config("api_token must not be empty"));
        }
        if !(1..=Self::MAX_PER_PAGE).contains(&self.per_page) {
            return Err(Error::config(format!(
                "per_page must be between 1 and {}, got {}",
                Self::MAX_PER_PAGE,
                self.per_page
            )));
        }
        Ok(())
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_credentials() {
        let creds = Credentials::from_toml_str(
            r#"
            api_url = "https://blog.example.com/api"
            api_token = "t0ken"
            "#,
        )
        .unwrap();
        assert_eq!(creds.per_page, 20);
        assert_eq!(creds.page_delay(), Duration::from_millis(500));
        assert_eq!(creds.publication, None);
        assert!(!format!("{:?}", creds).contains("t0ken"));
    }

    #[test]
    fn test_invalid_credentials() {
        let cases = [
            r#"api_token = "t""#,
            r#"api_url = "not a url"
               api_token = "t""#,
            r#"api_url = "ftp://x.io"
               api_token = "t""#,
            r#"api_url = "https://x.io"
               api_token = " ""#,
            r#"api_url = "https://x.io"
               api_token = "t"
               per_page = 0"#,
            r#"api_url = "https://x.io"
               api_token = "t"
               per_page = 101"#,
        ];
        for raw in cases {
            assert!(
                matches!(Credentials::from_toml_str(raw), Err(Error::Config { .. })),
                "accepted: {}",
                raw
            );
        }
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = Credentials::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
