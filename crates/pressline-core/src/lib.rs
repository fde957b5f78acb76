//! Pressline Core - Common infrastructure for e-paper acquisition
//!
//! This crate provides the transport and observability pieces shared by
//! the fetchers: a sync-facade HTTP client over a shared tokio runtime,
//! an error taxonomy with retry classification, and logging setup.

pub mod http;
pub mod logging;
pub mod retry;

// Re-exports for convenience
pub use http::{HttpError, SHARED_RUNTIME, get_bytes, get_text, http_client};
pub use logging::init_logging;
pub use retry::retry_with_backoff;
