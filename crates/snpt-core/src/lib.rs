//! # snpt-core
//!
//! Core functionality for snpt - query-relevant snippet extraction and
//! caching for a crawling/search service.
//!
//! Given a previously fetched document and a set of query-term
//! fingerprints, this crate selects a short excerpt showing why the
//! document matched and memoizes the result so repeated searches for the
//! same document/term combination avoid recomputation.
//!
//! ## Architecture
//!
//! The crate is organized around several key components:
//!
//! - **Extraction**: sentence scoring, span trimming, and recursive
//!   multi-term coverage ([`SnippetExtractor`])
//! - **Caching**: a bounded snippet cache with insertion-order eviction
//!   ([`SnippetCache`]), built on a generic score structure
//!   ([`ScoreBoard`])
//! - **Acquisition**: a local document store filled by bounded HTTP
//!   fetches ([`DocumentStore`], [`Fetcher`], [`FetchingProvider`])
//! - **Orchestration**: the request pipeline tying cache, acquisition,
//!   parsing, and extraction together ([`SnippetService`])
//!
//! Fetching, parsing, tokenization, and fingerprinting are consumed
//! through narrow traits ([`ResourceProvider`], [`DocumentParser`],
//! [`ContentTypePolicy`], [`Tokenizer`], [`TermHasher`]) so the
//! surrounding service can substitute its own implementations.
//!
//! ## Quick Start
//!
//! ```rust
//! use snpt_core::{
//!     DigestTermHasher, SentenceMatcher, SnippetExtractor, TermHasher, TermSet, WordTokenizer,
//! };
//! use std::sync::Arc;
//!
//! let matcher = SentenceMatcher::new(Arc::new(WordTokenizer), Arc::new(DigestTermHasher));
//! let extractor = SnippetExtractor::new(matcher);
//!
//! let sentences = vec!["the quick brown fox jumps far".to_string()];
//! let terms: TermSet = [DigestTermHasher.fingerprint("fox")].into_iter().collect();
//!
//! let snippet = extractor.extract(&sentences, &terms, 8, 120);
//! assert_eq!(snippet.as_deref(), Some("the quick brown fox jumps far"));
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`] with structured error
//! information. Every failure in the retrieval pipeline is recoverable at
//! the caller level - skip the document, or retry with fetching enabled
//! when [`Error::is_recoverable`] says it is worth it.

/// Bounded snippet cache with insertion-order eviction
pub mod cache;
/// Service configuration
pub mod config;
/// Error types and result aliases
pub mod error;
/// Snippet selection and trimming
pub mod extract;
/// HTTP fetching of document bytes
pub mod fetcher;
/// Word-to-offset mapping for sentences
pub mod matcher;
/// Default document parser and content-type policy
pub mod parser;
/// Collaborator interfaces consumed by the pipeline
pub mod provider;
/// Generic key-to-score association
pub mod score;
/// Top-level request handling
pub mod service;
/// Local filesystem store for fetched documents
pub mod store;
/// Term fingerprints and tokenization collaborators
pub mod term;
/// UTF-8 boundary helpers
pub mod utils;

// Re-export commonly used types
pub use cache::{CacheKey, CacheStatsSnapshot, DEFAULT_CAPACITY, SnippetCache};
pub use config::{CacheSettings, FetchSettings, ProxyConfig, SnippetConfig};
pub use error::{Error, Result};
pub use extract::{SnippetExtractor, default_min_sentence_len};
pub use fetcher::{FetchedResource, Fetcher};
pub use matcher::SentenceMatcher;
pub use parser::{StandardContentPolicy, TextParser};
pub use provider::{
    ContentTypePolicy, DocumentParser, FetchingProvider, ParsedDocument, ResourceProvider,
};
pub use score::ScoreBoard;
pub use service::{Snippet, SnippetService, SnippetSource};
pub use store::{DocumentStore, ResourceMeta};
pub use term::{
    DigestTermHasher, Fingerprint, TermHasher, TermSet, Tokenizer, WordTokenizer,
    document_fingerprint,
};
pub use utils::{floor_char_boundary, safe_truncate};
