//! Collaborator interfaces the snippet pipeline consumes.
//!
//! The pipeline does not fetch, store, or parse documents itself; it
//! talks to a [`ResourceProvider`] for bytes, a [`DocumentParser`] for
//! sentences, and a [`ContentTypePolicy`] to decide what is parseable.
//! [`FetchingProvider`] is the production provider, pairing the local
//! [`DocumentStore`] with the HTTP [`Fetcher`]; tests and embedders may
//! substitute their own implementations through the traits.

use crate::Result;
use crate::config::ProxyConfig;
use crate::fetcher::Fetcher;
use crate::store::DocumentStore;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// A parsed document: the ordered sentences extraction works over.
///
/// "Sentence" means one parsed unit of document text as the parser
/// chooses to split it, not necessarily a grammatical sentence.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    sentences: Vec<String>,
}

impl ParsedDocument {
    /// Wraps a parser's sentence sequence.
    #[must_use]
    pub fn new(sentences: Vec<String>) -> Self {
        Self { sentences }
    }

    /// The document's sentences in original order.
    #[must_use]
    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }
}

/// Supplies a document's bytes from local storage or the network.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// The document's bytes from local storage, `None` when absent.
    async fn load_local(&self, url: &Url) -> Result<Option<Vec<u8>>>;

    /// Fetches the document from the network into local storage.
    ///
    /// Bounded by `timeout`; a later `load_local` returns the fetched
    /// bytes on success.
    async fn fetch_remote(
        &self,
        url: &Url,
        timeout: Duration,
        proxy: Option<&ProxyConfig>,
    ) -> Result<()>;

    /// The content type recorded for the document, if known.
    async fn cached_content_type(&self, url: &Url) -> Option<String>;
}

/// Parses raw document bytes into sentences.
pub trait DocumentParser: Send + Sync {
    /// Parses the bytes under the given content type.
    fn parse(&self, url: &Url, content_type: &str, bytes: &[u8]) -> Result<ParsedDocument>;
}

/// Decides which documents are worth handing to the parser.
pub trait ContentTypePolicy: Send + Sync {
    /// True if documents with this file extension are parseable.
    fn is_supported_extension(&self, ext: &str) -> bool;

    /// True if documents with this MIME type are parseable.
    fn is_supported_mime_type(&self, mime: &str) -> bool;
}

/// Production resource provider: a local [`DocumentStore`] filled by HTTP
/// fetches.
pub struct FetchingProvider {
    store: DocumentStore,
}

impl FetchingProvider {
    /// Creates a provider over the given store.
    #[must_use]
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ResourceProvider for FetchingProvider {
    async fn load_local(&self, url: &Url) -> Result<Option<Vec<u8>>> {
        self.store.load(url)
    }

    async fn fetch_remote(
        &self,
        url: &Url,
        timeout: Duration,
        proxy: Option<&ProxyConfig>,
    ) -> Result<()> {
        let fetcher = Fetcher::with_options(timeout, proxy)?;
        let fetched = fetcher.fetch(url).await?;
        self.store.save(
            url,
            &fetched.bytes,
            fetched.content_type.as_deref(),
            &fetched.sha256,
        )
    }

    async fn cached_content_type(&self, url: &Url) -> Option<String> {
        self.store.content_type(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetching_provider_reads_its_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::with_root(dir.path().to_path_buf()).unwrap();
        let url = Url::parse("http://example.com/doc.txt").unwrap();
        store
            .save(&url, b"stored bytes", Some("text/plain"), "digest")
            .unwrap();

        let provider = FetchingProvider::new(store);
        assert_eq!(
            provider.load_local(&url).await.unwrap(),
            Some(b"stored bytes".to_vec())
        );
        assert_eq!(
            provider.cached_content_type(&url).await,
            Some("text/plain".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetching_provider_absent_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::with_root(dir.path().to_path_buf()).unwrap();
        let provider = FetchingProvider::new(store);
        let url = Url::parse("http://example.com/missing").unwrap();

        assert_eq!(provider.load_local(&url).await.unwrap(), None);
        assert_eq!(provider.cached_content_type(&url).await, None);
    }
}
