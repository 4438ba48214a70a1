//! Remote book catalog access.
//!
//! - [`client`] - HTTP fetching with timeouts and capped response bodies
//! - [`record`] - normalization of `docs`/`works` records into [`BookRecord`]
//! - [`detail`] - best-effort per-record enrichment for the detail view

mod client;
mod detail;
mod record;

pub use client::{CatalogClient, DEFAULT_BASE_URL};
pub use detail::{BookDetail, DetailView, MAX_DESCRIPTION_CHARS};
pub use record::{cover_url, BookRecord, PLACEHOLDER_COVER_URL};

use thiserror::Error;

/// Errors from a catalog request.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Body was not the JSON shape we expect
    #[error("Malformed response: {0}")]
    Malformed(serde_json::Error),
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
}

/// Coarse classification surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Catalog unreachable or too slow.
    Network,
    /// Catalog answered, but not with something usable.
    Response,
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Timeout | CatalogError::Network(_) => ErrorKind::Network,
            CatalogError::HttpStatus(_)
            | CatalogError::ResponseTooLarge
            | CatalogError::Malformed(_)
            | CatalogError::InvalidUrl
            | CatalogError::InsecureBaseUrl => ErrorKind::Response,
        }
    }
}
