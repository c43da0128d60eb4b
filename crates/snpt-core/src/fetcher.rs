//! HTTP fetching of document bytes.

use crate::config::ProxyConfig;
use crate::{Error, Result};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// HTTP client for fetching documents into the local store.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher with the default 5 s timeout and no proxy.
    pub fn new() -> Result<Self> {
        Self::with_options(Duration::from_millis(5000), None)
    }

    /// Creates a fetcher with an explicit timeout and optional proxy.
    pub fn with_options(timeout: Duration, proxy: Option<&ProxyConfig>) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("outfitter-snpt/", env!("CARGO_PKG_VERSION")))
            .gzip(true);
        if let Some(proxy) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.endpoint()).map_err(Error::Network)?);
        }
        let client = builder.build().map_err(Error::Network)?;
        Ok(Self { client })
    }

    /// Fetches a document's bytes, content type, and checksum.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedResource> {
        debug!(%url, "fetching resource");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()
            .map_err(Error::Network)?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string());

        let bytes = response.bytes().await?.to_vec();
        let sha256 = hex_digest(&bytes);

        info!(%url, bytes = bytes.len(), "fetched resource");
        Ok(FetchedResource {
            bytes,
            content_type,
            sha256,
        })
    }
}

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// The raw document bytes.
    pub bytes: Vec<u8>,
    /// Content type from the response header, without parameters.
    pub content_type: Option<String>,
    /// Hex `SHA256` digest of the bytes.
    pub sha256: String,
}

/// Hex SHA-256 digest of a byte slice.
#[must_use]
pub fn hex_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(64);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

// Note: Default is not implemented as Fetcher::new() can fail.
// Use Fetcher::new() directly and handle the Result.
