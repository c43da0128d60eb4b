//! Top-level request handling: cache lookup, document acquisition,
//! extraction, and cache population.

use crate::cache::{CacheKey, SnippetCache};
use crate::config::SnippetConfig;
use crate::extract::{SnippetExtractor, default_min_sentence_len};
use crate::matcher::SentenceMatcher;
use crate::provider::{ContentTypePolicy, DocumentParser, ParsedDocument, ResourceProvider};
use crate::term::{TermHasher, TermSet, Tokenizer};
use crate::utils::safe_truncate;
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Where a snippet's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetSource {
    /// Served from the snippet cache.
    Cache,
    /// Computed from a locally stored document.
    File,
    /// Computed after fetching the document from the network.
    Web,
}

/// A successfully retrieved snippet.
#[derive(Debug, Clone)]
pub struct Snippet {
    /// The excerpt text.
    pub text: String,
    /// Where the text came from.
    pub source: SnippetSource,
}

/// Computes and caches query-relevant snippets for documents.
///
/// Each service instance owns its cache; collaborators (resource
/// provider, parser, content-type policy, tokenizer, hasher) are injected
/// at construction. The service never panics on a bad document: every
/// failure in the pipeline comes back as an [`Error`] the caller can
/// recover from, typically by skipping the document or retrying with
/// fetching enabled.
pub struct SnippetService {
    provider: Arc<dyn ResourceProvider>,
    parser: Arc<dyn DocumentParser>,
    policy: Arc<dyn ContentTypePolicy>,
    extractor: SnippetExtractor,
    cache: SnippetCache,
    config: SnippetConfig,
}

impl SnippetService {
    /// Creates a service with the given collaborators and configuration.
    #[must_use]
    pub fn new(
        provider: Arc<dyn ResourceProvider>,
        parser: Arc<dyn DocumentParser>,
        policy: Arc<dyn ContentTypePolicy>,
        tokenizer: Arc<dyn Tokenizer>,
        hasher: Arc<dyn TermHasher>,
        config: SnippetConfig,
    ) -> Self {
        let cache = SnippetCache::with_capacity(config.cache.max_entries);
        let extractor = SnippetExtractor::new(SentenceMatcher::new(tokenizer, hasher));
        Self {
            provider,
            parser,
            policy,
            extractor,
            cache,
            config,
        }
    }

    /// Retrieves a snippet for the document covering the query terms.
    ///
    /// Answers from the cache when possible; otherwise loads the document
    /// (fetching it from the network first when `fetch_online` is set and
    /// the local store is empty), parses it, extracts the snippet, and
    /// caches the result. The returned text never exceeds
    /// `max_snippet_len` bytes.
    pub async fn retrieve(
        &self,
        url: &Url,
        terms: &TermSet,
        fetch_online: bool,
        max_snippet_len: usize,
    ) -> Result<Snippet> {
        if terms.is_empty() {
            return Err(Error::NoTermsGiven);
        }

        let key = CacheKey::new(url, terms);
        if let Some(text) = self.cache.lookup(&key).await {
            debug!(%url, "snippet served from cache");
            return Ok(Snippet {
                text,
                source: SnippetSource::Cache,
            });
        }

        let (bytes, source) = self.acquire(url, fetch_online).await?;
        let Some(bytes) = bytes else {
            return Err(Error::ResourceLoading);
        };

        let document = self.parse_document(url, &bytes).await?;
        let sentences = document.sentences();
        if sentences.is_empty() {
            return Err(Error::ParserNoLines);
        }

        let min_sentence_len = default_min_sentence_len(terms.len());
        let Some(text) =
            self.extractor
                .extract(sentences, terms, min_sentence_len, max_snippet_len)
        else {
            return Err(Error::NoMatch);
        };
        let text = safe_truncate(&text, max_snippet_len).to_string();

        self.cache.store(key, text.clone()).await;
        info!(%url, source = ?source, len = text.len(), "snippet computed");
        Ok(Snippet { text, source })
    }

    /// True if a snippet for this document and term set is cached.
    ///
    /// Pure check: no fetch, no cache mutation.
    pub async fn exists_in_cache(&self, url: &Url, terms: &TermSet) -> bool {
        if terms.is_empty() {
            return false;
        }
        self.cache.contains(&CacheKey::new(url, terms)).await
    }

    /// The document's raw bytes, independent of snippet extraction.
    ///
    /// Acquisition failures are logged and surface as `None`; `retrieve`
    /// is the error-reporting path.
    pub async fn get_resource(&self, url: &Url, fetch_online: bool) -> Option<Vec<u8>> {
        match self.acquire(url, fetch_online).await {
            Ok((bytes, _)) => bytes,
            Err(error) => {
                warn!(%url, %error, "failed to acquire resource");
                None
            },
        }
    }

    /// The service's snippet cache, for stats and introspection.
    #[must_use]
    pub fn cache(&self) -> &SnippetCache {
        &self.cache
    }

    /// Loads the document locally, optionally fetching it first.
    async fn acquire(&self, url: &Url, fetch_online: bool) -> Result<(Option<Vec<u8>>, SnippetSource)> {
        let mut source = SnippetSource::File;
        let mut bytes = self
            .provider
            .load_local(url)
            .await
            .map_err(|e| Error::SourceLoading(e.to_string()))?;

        if bytes.is_none() && fetch_online {
            self.provider
                .fetch_remote(
                    url,
                    self.config.fetch.timeout(),
                    self.config.fetch.proxy.as_ref(),
                )
                .await
                .map_err(|e| Error::SourceLoading(e.to_string()))?;
            bytes = self
                .provider
                .load_local(url)
                .await
                .map_err(|e| Error::SourceLoading(e.to_string()))?;
            source = SnippetSource::Web;
        }

        Ok((bytes, source))
    }

    /// Selects a content type and parses the document.
    ///
    /// The recorded content type wins when present; otherwise the URL's
    /// file extension decides, with extensionless paths parsed as HTML.
    async fn parse_document(&self, url: &Url, bytes: &[u8]) -> Result<ParsedDocument> {
        if let Some(mime) = self.provider.cached_content_type(url).await {
            if self.policy.is_supported_mime_type(&mime) {
                return self.parser.parse(url, &mime, bytes);
            }
            return Err(Error::ParserFailed(format!(
                "unsupported content type '{mime}'"
            )));
        }

        match url_extension(url) {
            Some(ext) if !self.policy.is_supported_extension(&ext) => Err(Error::ParserFailed(
                format!("unsupported file extension '{ext}'"),
            )),
            _ => self.parser.parse(url, "text/html", bytes),
        }
    }
}

/// The lowercased extension of the URL's final path segment, if any.
fn url_extension(url: &Url) -> Option<String> {
    let path = url.path();
    let name = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}
