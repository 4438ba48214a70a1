use super::detail::BookDetail;
use super::record::{BookRecord, RawPage};
use super::CatalogError;
use crate::feed::PageRequest;
use futures::StreamExt;
use reqwest::redirect::Policy;
use std::time::Duration;

/// Default remote catalog.
pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Limit redirects to 3 hops and reject loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );
        attempt.follow()
    })
}

/// HTTP access to the remote catalog.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl CatalogClient {
    /// Build a client for `base_url`.
    ///
    /// HTTPS is required except for localhost, which the test suite uses.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let base = base_url.trim_end_matches('/');
        let parsed = url::Url::parse(base).map_err(|_| CatalogError::InvalidUrl)?;
        match parsed.scheme() {
            "https" => {}
            "http" if matches!(parsed.host_str(), Some("127.0.0.1" | "localhost")) => {
                tracing::warn!(base_url = %base, "Using non-HTTPS catalog base URL (localhost only)");
            }
            _ => {
                tracing::error!(base_url = %base, "Rejecting catalog base URL (HTTPS required except localhost)");
                return Err(CatalogError::InsecureBaseUrl);
            }
        }

        let http = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(CatalogError::Network)?;

        Ok(Self {
            http,
            base_url: base.to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch and normalize one page of records.
    pub async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<BookRecord>, CatalogError> {
        let url = request
            .url(&self.base_url)
            .map_err(|_| CatalogError::InvalidUrl)?;
        tracing::debug!(url = %url, "Fetching catalog page");

        let bytes = self.get_bytes(url.as_str()).await?;
        let page: RawPage = serde_json::from_slice(&bytes).map_err(CatalogError::Malformed)?;
        let (records, skipped) = page.into_records(request.records_field());

        if skipped > 0 {
            tracing::warn!(
                offset = request.offset,
                skipped,
                "Catalog records without a usable title skipped"
            );
        }
        Ok(records)
    }

    /// Fetch the detail entry for a record key such as `/works/OL45804W`.
    pub async fn fetch_detail(&self, detail_key: &str) -> Result<BookDetail, CatalogError> {
        if !detail_key.starts_with('/') {
            return Err(CatalogError::InvalidUrl);
        }
        let url = format!("{}{}.json", self.base_url, detail_key);
        url::Url::parse(&url).map_err(|_| CatalogError::InvalidUrl)?;
        tracing::debug!(url = %url, "Fetching record detail");

        let bytes = self.get_bytes(&url).await?;
        BookDetail::from_json(&bytes).map_err(CatalogError::Malformed)
    }

    /// GET `url` and read its body. One deadline covers the whole exchange.
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        tokio::time::timeout(self.timeout, self.get_bytes_unbounded(url))
            .await
            .map_err(|_| CatalogError::Timeout)?
    }

    async fn get_bytes_unbounded(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let response = self.http.get(url).send().await.map_err(CatalogError::Network)?;

        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus(response.status().as_u16()));
        }

        read_limited_bytes(response, MAX_RESPONSE_SIZE).await
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, CatalogError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(CatalogError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(CatalogError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(CatalogError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
