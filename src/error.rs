//! Error handling for blogport.
//!
//! Two families of errors exist. [`Error`] aborts an export run: bad
//! configuration, API connectivity problems, failed writes or a broken
//! archive. [`FetchError`] describes a single failed image download attempt;
//! the acquisition engine records it in the ledger and moves on, and it has
//! no conversion into [`Error`].

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors that abort an export run.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration or credentials.
    ///
    /// Raised before any network activity takes place.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The content API rejected a request or could not be reached.
    ///
    /// `hint` carries guidance for the failure class, e.g. whether the token
    /// is wrong or only lacks permissions.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        hint: Option<String>,
    },

    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// I/O Error.
    ///
    /// Export writes are not retried, so any failure while writing an
    /// artifact ends up here.
    #[error("I/O error: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest error: {source}")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error from the HTTP middleware stack.
    #[error("HTTP middleware error: {source}")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },

    /// JSON (de)serialization error.
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Archive packaging failed.
    #[error("Archive error: {message}")]
    Archive {
        message: String,
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error from an underlying system.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for [`Error::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Guidance attached to API failures, if any.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Error::Api { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::Archive {
            message: e.to_string(),
            cause: Some(Box::new(e)),
        }
    }
}

/// Result type alias for operations that can fail with a blogport error.
pub type Result<T> = std::result::Result<T, Error>;

/// A single failed image download attempt.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The attempt did not finish within the configured deadline.
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The server answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),

    /// The server answered successfully but sent no bytes.
    #[error("empty response body")]
    EmptyBody,

    /// Transport level failure (DNS, TLS, connection reset, ...).
    #[error("request failed: {0}")]
    Request(String),

    /// The image was fetched but could not be persisted.
    #[error("could not write image: {source}")]
    Write {
        #[from]
        source: io::Error,
    },
}

impl From<reqwest_middleware::Error> for FetchError {
    fn from(e: reqwest_middleware::Error) -> Self {
        FetchError::Request(e.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Request(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(
            FetchError::Timeout(Duration::from_millis(250)).to_string(),
            "timed out after 250ms"
        );
        assert_eq!(FetchError::Status(500).to_string(), "HTTP 500");
        assert_eq!(FetchError::EmptyBody.to_string(), "empty response body");
    }

    #[test]
    fn test_api_error_hint() {
        let e = Error::Api {
            status: 401,
            message: "Unauthorized".into(),
            hint: Some("check the token".into()),
        };
        assert_eq!(e.hint(), Some("check the token"));
        assert!(e.to_string().contains("401"));
        assert_eq!(Error::config("missing").hint(), None);
    }
}
