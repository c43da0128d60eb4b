//! Error types and handling for snpt-core operations.
//!
//! All failures in the snippet pipeline are returned to the caller, never
//! thrown across component boundaries. The retrieval taxonomy
//! ([`Error::NoTermsGiven`] through [`Error::NoMatch`]) mirrors the stages
//! of a [`retrieve`](crate::SnippetService::retrieve) call; the remaining
//! variants cover the ambient infrastructure (I/O, network, storage,
//! configuration).
//!
//! Errors carry a coarse [`category`](Error::category) for logging and a
//! [`is_recoverable`](Error::is_recoverable) hint so callers can decide
//! whether re-invoking `retrieve` (for example with fetching enabled) is
//! worth trying.

use thiserror::Error;

/// The main error type for snpt-core operations.
///
/// All public functions in snpt-core return `Result<T, Error>` for
/// consistent error handling. None of these conditions is fatal: a failed
/// snippet is skipped by the surrounding search service, not escalated.
#[derive(Error, Debug)]
pub enum Error {
    /// The caller supplied an empty query-term set.
    ///
    /// Raised before the cache or any resource provider is consulted.
    #[error("no query term fingerprints given")]
    NoTermsGiven,

    /// A network fetch attempt raised an I/O error.
    ///
    /// The fetch is bounded by the configured timeout; a timeout surfaces
    /// here as well. Retrying is reasonable.
    #[error("error loading resource from the web: {0}")]
    SourceLoading(String),

    /// No document bytes were available after the local lookup and, if
    /// attempted, the network fetch.
    #[error("resource unavailable after local and remote lookup")]
    ResourceLoading,

    /// The parser rejected the document or its content type is not
    /// supported.
    #[error("parser failed: {0}")]
    ParserFailed(String),

    /// The parser succeeded but produced zero sentences.
    #[error("parser returned no sentences")]
    ParserNoLines,

    /// No sentence above the length threshold contained any query term.
    #[error("no matching snippet found")]
    NoMatch,

    /// I/O operation failed.
    ///
    /// Covers filesystem operations in the local document store. The
    /// underlying `std::io::Error` is preserved.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Covers HTTP requests issued by the fetcher. The underlying
    /// `reqwest::Error` is preserved for detailed connection information.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Document store operation failed beyond basic file I/O.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable by retrying the operation.
    ///
    /// Returns `true` for failures that are typically temporary: fetch
    /// errors, network timeouts and connection failures, interrupted I/O.
    /// Permanent conditions (unsupported content, no match, bad
    /// configuration) return `false`.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::SourceLoading(_) => true,
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Io(e) => {
                matches!(
                    e.kind(),
                    std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
                )
            },
            _ => false,
        }
    }

    /// Get the error category as a static string identifier.
    ///
    /// Used for structured logging and grouping in monitoring; the
    /// retrieval taxonomy keeps one category per pipeline stage.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::NoTermsGiven => "no_terms_given",
            Self::SourceLoading(_) => "source_loading",
            Self::ResourceLoading => "resource_loading",
            Self::ParserFailed(_) => "parser_failed",
            Self::ParserNoLines => "parser_no_lines",
            Self::NoMatch => "no_match",
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_retrieval_taxonomy_display() {
        let cases: Vec<(Error, &str)> = vec![
            (Error::NoTermsGiven, "no query term fingerprints given"),
            (
                Error::SourceLoading("connection reset".to_string()),
                "error loading resource from the web: connection reset",
            ),
            (
                Error::ResourceLoading,
                "resource unavailable after local and remote lookup",
            ),
            (
                Error::ParserFailed("unsupported mime".to_string()),
                "parser failed: unsupported mime",
            ),
            (Error::ParserNoLines, "parser returned no sentences"),
            (Error::NoMatch, "no matching snippet found"),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_error_categories() {
        let cases: Vec<(Error, &str)> = vec![
            (Error::NoTermsGiven, "no_terms_given"),
            (Error::SourceLoading("x".into()), "source_loading"),
            (Error::ResourceLoading, "resource_loading"),
            (Error::ParserFailed("x".into()), "parser_failed"),
            (Error::ParserNoLines, "parser_no_lines"),
            (Error::NoMatch, "no_match"),
            (Error::Io(io::Error::other("x")), "io"),
            (Error::Storage("x".into()), "storage"),
            (Error::Config("x".into()), "config"),
            (Error::Serialization("x".into()), "serialization"),
        ];

        for (error, expected_category) in cases {
            assert_eq!(error.category(), expected_category);
        }
    }

    #[test]
    fn test_error_recoverability() {
        let recoverable = vec![
            Error::SourceLoading("timeout".into()),
            Error::Io(io::Error::new(io::ErrorKind::TimedOut, "timeout")),
            Error::Io(io::Error::new(io::ErrorKind::Interrupted, "interrupted")),
        ];
        let permanent = vec![
            Error::NoTermsGiven,
            Error::ResourceLoading,
            Error::ParserFailed("bad".into()),
            Error::ParserNoLines,
            Error::NoMatch,
            Error::Io(io::Error::new(io::ErrorKind::NotFound, "missing")),
            Error::Storage("disk".into()),
            Error::Config("field".into()),
            Error::Serialization("json".into()),
        ];

        for error in recoverable {
            assert!(error.is_recoverable(), "expected {error:?} recoverable");
        }
        for error in permanent {
            assert!(!error.is_recoverable(), "expected {error:?} permanent");
        }
    }

    #[test]
    fn test_error_from_io_preserves_source() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: Error = io_error.into();

        let source = std::error::Error::source(&error);
        assert!(source.is_some());
        assert!(source.unwrap().to_string().contains("access denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let bad: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let error: Error = bad.unwrap_err().into();

        assert_eq!(error.category(), "serialization");
        assert!(!error.is_recoverable());
    }
}
