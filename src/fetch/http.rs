//! HTTP client abstraction for testability.

use std::time::Duration;
use thiserror::Error;

/// Transport-level failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpError {
    #[error("failed to create HTTP client: {0}")]
    Client(String),

    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("failed to read response from {url}: {reason}")]
    Body { url: String, reason: String },
}

impl HttpError {
    /// Status code of a non-success response.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Trait for synchronous HTTP GET.
///
/// Allows the pipeline to run against an in-memory client in tests.
pub trait HttpClient {
    /// Performs an HTTP GET request, returning the response body.
    ///
    /// Non-success status codes are reported as [`HttpError::Status`].
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError>;
}

/// Real HTTP client implementation using blocking reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client sending `user_agent`.
    ///
    /// `timeout_secs = None` keeps reqwest's default timeout.
    pub fn new(user_agent: &str, timeout_secs: Option<u64>) -> Result<Self, HttpError> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(user_agent);
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let response = self.client.get(url).send().map_err(|e| HttpError::Request {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(HttpError::Status {
                status: response.status().as_u16(),
                url: url.to_owned(),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| HttpError::Body {
                url: url.to_owned(),
                reason: e.to_string(),
            })
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockHttpClient;
    use super::*;

    #[test]
    fn test_mock_client_success() {
        let mock = MockHttpClient::new().with("http://data/a.geojson", "{}");

        assert_eq!(mock.get("http://data/a.geojson").unwrap(), b"{}".to_vec());
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_mock_client_unknown_url_is_404() {
        let mock = MockHttpClient::new();
        let err = mock.get("http://data/missing").unwrap_err();

        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_http_error_display() {
        let err = HttpError::Status {
            status: 401,
            url: "https://tiles/0/0/0.png".into(),
        };
        assert_eq!(err.to_string(), "HTTP 401 from https://tiles/0/0/0.png");
        assert_eq!(err.status(), Some(401));

        let err = HttpError::Client("tls".into());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(ReqwestClient::new("steamloop-test", Some(5)).is_ok());
        assert!(ReqwestClient::new("steamloop-test", None).is_ok());
    }
}
