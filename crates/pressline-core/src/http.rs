//! Blocking HTTP facade over async reqwest.
//!
//! Uses async reqwest internally with a shared runtime, but presents a
//! sync interface: acquisition is a sequential pipeline, so callers get
//! plain `Result<Vec<u8>, HttpError>` instead of futures.

use std::sync::LazyLock;
use std::time::Duration;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Total per-request timeout. Edition archives can run to tens of MB, so
/// this is generous; it exists to bound a stalled endpoint, not to pace
/// normal transfers.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Error from a single HTTP operation
#[derive(Debug)]
pub enum HttpError {
    /// Non-success status, or a transport error with no status
    Http {
        status: Option<u16>,
        message: String,
    },
    /// Local I/O error while handling the response
    Io(std::io::Error),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for HttpError {}

impl From<std::io::Error> for HttpError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl HttpError {
    /// Create from a reqwest error, keeping the status but not the URL
    /// (query strings may carry publication identifiers).
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.without_url().to_string(),
        }
    }

    /// Whether a status code represents success.
    pub fn status_was(&self, code: u16) -> bool {
        matches!(self, Self::Http { status: Some(s), .. } if *s == code)
    }

    /// Return the HTTP status, if the error carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => *status,
            Self::Io(_) => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => {
                // 429 = rate limited, 5xx = server side; both worth retrying.
                // No status = connection-level failure, also worth retrying.
                matches!(status, Some(429) | Some(500..=599) | None)
            }
            Self::Io(e) => e.kind() != std::io::ErrorKind::StorageFull,
        }
    }
}

/// Shared async HTTP client with connection pooling.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .pool_max_idle_per_host(4)
        .build()
        .expect("failed to build HTTP client")
});

/// Get shared HTTP client.
pub fn http_client() -> &'static reqwest::Client {
    &SHARED_CLIENT
}

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Blocking GET returning the full response body.
///
/// A non-success status is an `Err(HttpError::Http)` carrying the status
/// code; callers that treat particular statuses as normal control flow
/// (the probe loop treats any non-2xx as end-of-edition) match on
/// [`HttpError::status`].
pub fn get_bytes(url: &str, headers: &[(&str, &str)]) -> Result<Vec<u8>, HttpError> {
    SHARED_RUNTIME.handle().block_on(async {
        let mut req = SHARED_CLIENT.get(url);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let resp = req.send().await.map_err(HttpError::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(HttpError::Http {
                status: Some(status.as_u16()),
                message: status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(HttpError::from_reqwest)?;
        Ok(body.to_vec())
    })
}

/// Blocking GET returning the body as UTF-8 text.
pub fn get_text(url: &str, headers: &[(&str, &str)]) -> Result<String, HttpError> {
    let bytes = get_bytes(url, headers)?;
    String::from_utf8(bytes).map_err(|e| HttpError::Http {
        status: None,
        message: format!("response was not valid UTF-8: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_err(status: u16) -> HttpError {
        HttpError::Http {
            status: Some(status),
            message: "test".to_string(),
        }
    }

    #[test]
    fn http_404_not_retryable() {
        assert!(!http_err(404).is_retryable());
    }

    #[test]
    fn http_500_retryable() {
        assert!(http_err(500).is_retryable());
    }

    #[test]
    fn http_429_retryable() {
        assert!(http_err(429).is_retryable());
    }

    #[test]
    fn http_none_status_retryable() {
        let err = HttpError::Http {
            status: None,
            message: "connection refused".to_string(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn io_storage_full_not_retryable() {
        let err = HttpError::Io(std::io::Error::new(
            std::io::ErrorKind::StorageFull,
            "disk full",
        ));
        assert!(!err.is_retryable());
    }

    #[test]
    fn io_timeout_retryable() {
        let err = HttpError::Io(std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout"));
        assert!(err.is_retryable());
    }

    #[test]
    fn status_accessor() {
        assert_eq!(http_err(503).status(), Some(503));
        assert_eq!(HttpError::Io(std::io::Error::other("x")).status(), None);
    }

    #[test]
    fn status_was_matches() {
        assert!(http_err(404).status_was(404));
        assert!(!http_err(404).status_was(500));
    }

    #[test]
    fn display_http_with_status() {
        assert_eq!(format!("{}", http_err(404)), "HTTP 404: test");
    }

    #[test]
    fn display_io_error() {
        let err = HttpError::Io(std::io::Error::other("broken"));
        assert!(format!("{err}").contains("IO error"));
    }
}
