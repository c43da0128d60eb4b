//! Local filesystem store for previously fetched documents.
//!
//! Each document is kept under its URL fingerprint: one content file with
//! the raw bytes and one JSON sidecar with the metadata the snippet
//! pipeline needs later (content type for parser selection, fetch
//! timestamp, checksum). The store persists documents only; computed
//! snippets live in the in-memory [`SnippetCache`](crate::SnippetCache)
//! and are never written to disk.

use crate::term::document_fingerprint;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Metadata recorded next to a stored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceMeta {
    /// The document's URL.
    pub url: String,
    /// Content type reported when the document was fetched, if any.
    pub content_type: Option<String>,
    /// When the document was stored.
    pub fetched_at: DateTime<Utc>,
    /// Hex `SHA256` digest of the stored bytes.
    pub sha256: String,
}

/// Filesystem store addressed by document URL.
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Creates a store at the default root directory.
    ///
    /// `SNPT_DATA_DIR` overrides the root explicitly (tests and dev);
    /// otherwise the platform data directory is used.
    pub fn new() -> Result<Self> {
        if let Ok(dir) = std::env::var("SNPT_DATA_DIR") {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return Self::with_root(PathBuf::from(trimmed));
            }
        }

        let dirs = ProjectDirs::from("dev", "outfitter", "snpt")
            .ok_or_else(|| Error::Storage("Failed to determine data directory".into()))?;
        Self::with_root(dirs.data_dir().join("documents"))
    }

    /// Creates a store rooted at an explicit directory.
    pub fn with_root(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root)
            .map_err(|e| Error::Storage(format!("Failed to create store root: {e}")))?;
        Ok(Self { root })
    }

    /// The store's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn content_path(&self, url: &Url) -> PathBuf {
        self.root.join(format!("{}.bin", document_fingerprint(url)))
    }

    fn meta_path(&self, url: &Url) -> PathBuf {
        self.root.join(format!("{}.json", document_fingerprint(url)))
    }

    /// Stores a document's bytes and metadata, replacing any previous
    /// version.
    pub fn save(
        &self,
        url: &Url,
        bytes: &[u8],
        content_type: Option<&str>,
        sha256: &str,
    ) -> Result<()> {
        fs::write(self.content_path(url), bytes)
            .map_err(|e| Error::Storage(format!("Failed to write document: {e}")))?;

        let meta = ResourceMeta {
            url: url.to_string(),
            content_type: content_type.map(str::to_string),
            fetched_at: Utc::now(),
            sha256: sha256.to_string(),
        };
        let json = serde_json::to_vec_pretty(&meta)?;
        fs::write(self.meta_path(url), json)
            .map_err(|e| Error::Storage(format!("Failed to write document metadata: {e}")))?;

        debug!(%url, bytes = bytes.len(), "stored document");
        Ok(())
    }

    /// Loads a document's bytes, or `None` when the document was never
    /// stored.
    pub fn load(&self, url: &Url) -> Result<Option<Vec<u8>>> {
        let path = self.content_path(url);
        if !path.exists() {
            return Ok(None);
        }
        let bytes =
            fs::read(&path).map_err(|e| Error::Storage(format!("Failed to read document: {e}")))?;
        Ok(Some(bytes))
    }

    /// The content type recorded for a stored document, if any.
    #[must_use]
    pub fn content_type(&self, url: &Url) -> Option<String> {
        let bytes = fs::read(self.meta_path(url)).ok()?;
        let meta: ResourceMeta = serde_json::from_slice(&bytes).ok()?;
        meta.content_type
    }

    /// True if the document's bytes are present.
    #[must_use]
    pub fn contains(&self, url: &Url) -> bool {
        self.content_path(url).exists()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, DocumentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::with_root(dir.path().join("documents")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (_dir, store) = store();
        let url = Url::parse("http://example.com/page.html").unwrap();

        store
            .save(&url, b"<html>hello</html>", Some("text/html"), "digest")
            .unwrap();

        assert_eq!(
            store.load(&url).unwrap(),
            Some(b"<html>hello</html>".to_vec())
        );
        assert_eq!(store.content_type(&url), Some("text/html".to_string()));
        assert!(store.contains(&url));
    }

    #[test]
    fn test_load_absent_document() {
        let (_dir, store) = store();
        let url = Url::parse("http://example.com/never-stored").unwrap();

        assert_eq!(store.load(&url).unwrap(), None);
        assert_eq!(store.content_type(&url), None);
        assert!(!store.contains(&url));
    }

    #[test]
    fn test_save_replaces_previous_version() {
        let (_dir, store) = store();
        let url = Url::parse("http://example.com/page").unwrap();

        store.save(&url, b"first", Some("text/plain"), "a").unwrap();
        store.save(&url, b"second", None, "b").unwrap();

        assert_eq!(store.load(&url).unwrap(), Some(b"second".to_vec()));
        assert_eq!(store.content_type(&url), None);
    }

    #[test]
    fn test_documents_are_keyed_by_url() {
        let (_dir, store) = store();
        let first = Url::parse("http://example.com/a").unwrap();
        let second = Url::parse("http://example.com/b").unwrap();

        store.save(&first, b"alpha", None, "a").unwrap();
        store.save(&second, b"beta", None, "b").unwrap();

        assert_eq!(store.load(&first).unwrap(), Some(b"alpha".to_vec()));
        assert_eq!(store.load(&second).unwrap(), Some(b"beta".to_vec()));
    }
}
