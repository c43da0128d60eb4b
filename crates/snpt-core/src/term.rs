//! Term fingerprints, term sets, and the tokenization collaborators.
//!
//! A [`Fingerprint`] is the fixed-size identifier a word or query term is
//! reduced to before matching; the surrounding search service normally
//! supplies its own [`TermHasher`] so snippet matching agrees with its
//! index. [`TermSet`] is the deduplicated, order-independent set of query
//! fingerprints a retrieval request carries, and its
//! [`canonical`](TermSet::canonical) string is the query half of a cache
//! key.

use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;
use url::Url;

/// Fixed-size derived identifier for a word or query term.
///
/// Opaque to the snippet pipeline: equality and ordering are all it needs.
/// Displayed as 16 hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Wraps a raw fingerprint value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw fingerprint value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// A deduplicated set of query-term fingerprints; insertion order is
/// irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermSet {
    terms: BTreeSet<Fingerprint>,
}

impl TermSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            terms: BTreeSet::new(),
        }
    }

    /// Inserts a fingerprint; duplicates are ignored.
    pub fn insert(&mut self, term: Fingerprint) {
        self.terms.insert(term);
    }

    /// True if the fingerprint is a member.
    #[must_use]
    pub fn contains(&self, term: &Fingerprint) -> bool {
        self.terms.contains(term)
    }

    /// Number of distinct fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when the set holds no fingerprints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterates the fingerprints in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Fingerprint> {
        self.terms.iter()
    }

    /// Deterministic canonical string for cache-key construction.
    ///
    /// Fingerprints in ascending order, fixed-width hex, concatenated:
    /// identical sets produce identical strings for any insertion order.
    #[must_use]
    pub fn canonical(&self) -> String {
        use fmt::Write as _;
        let mut out = String::with_capacity(self.terms.len() * 16);
        for term in &self.terms {
            let _ = write!(out, "{term}");
        }
        out
    }
}

impl FromIterator<Fingerprint> for TermSet {
    fn from_iter<I: IntoIterator<Item = Fingerprint>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

/// Hash of a document's URL: the document half of a cache key.
#[must_use]
pub fn document_fingerprint(url: &Url) -> String {
    use fmt::Write as _;
    let digest = Sha256::digest(url.as_str().as_bytes());
    let mut out = String::with_capacity(16);
    for byte in &digest[..8] {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Splits a sentence into words.
///
/// Implementations must yield every word: the sentence matcher derives
/// word offsets from the lengths of the tokens in order, so filtering
/// short words would shift every later offset.
pub trait Tokenizer: Send + Sync {
    /// The sentence's words, in order of appearance.
    fn tokenize(&self, sentence: &str) -> Vec<String>;
}

/// Reduces a word to its fixed-size fingerprint.
pub trait TermHasher: Send + Sync {
    /// The word's fingerprint.
    fn fingerprint(&self, word: &str) -> Fingerprint;
}

/// Default tokenizer: lowercased runs of alphanumeric characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, sentence: &str) -> Vec<String> {
        sentence
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .collect()
    }
}

/// Default hasher: leading bytes of the word's SHA-256 digest.
#[derive(Debug, Default, Clone, Copy)]
pub struct DigestTermHasher;

impl TermHasher for DigestTermHasher {
    fn fingerprint(&self, word: &str) -> Fingerprint {
        let digest = Sha256::digest(word.as_bytes());
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&digest[..8]);
        Fingerprint::from_raw(u64::from_be_bytes(raw))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fingerprint_display_is_fixed_width() {
        assert_eq!(Fingerprint::from_raw(0).to_string(), "0".repeat(16));
        assert_eq!(
            Fingerprint::from_raw(0x00ab_cdef_0123_4567).to_string(),
            "00abcdef01234567"
        );
    }

    #[test]
    fn test_canonical_ignores_insertion_order() {
        let forward: TermSet = [1u64, 2, 3]
            .into_iter()
            .map(Fingerprint::from_raw)
            .collect();
        let backward: TermSet = [3u64, 2, 1]
            .into_iter()
            .map(Fingerprint::from_raw)
            .collect();

        assert_eq!(forward.canonical(), backward.canonical());
        assert_eq!(forward.canonical().len(), 3 * 16);
    }

    #[test]
    fn test_term_set_deduplicates() {
        let set: TermSet = [7u64, 7, 7].into_iter().map(Fingerprint::from_raw).collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_document_fingerprint_is_stable() {
        let a = Url::parse("http://example.com/page").unwrap();
        let b = Url::parse("http://example.com/page").unwrap();
        let c = Url::parse("http://example.com/other").unwrap();

        assert_eq!(document_fingerprint(&a), document_fingerprint(&b));
        assert_ne!(document_fingerprint(&a), document_fingerprint(&c));
        assert_eq!(document_fingerprint(&a).len(), 16);
    }

    #[test]
    fn test_word_tokenizer_keeps_short_words() {
        let words = WordTokenizer.tokenize("The quick, brown fox!");
        assert_eq!(words, vec!["the", "quick", "brown", "fox"]);
    }

    #[test]
    fn test_word_tokenizer_empty_sentence() {
        assert!(WordTokenizer.tokenize("").is_empty());
        assert!(WordTokenizer.tokenize("  ... !!").is_empty());
    }

    #[test]
    fn test_digest_hasher_is_deterministic() {
        let hasher = DigestTermHasher;
        assert_eq!(hasher.fingerprint("fox"), hasher.fingerprint("fox"));
        assert_ne!(hasher.fingerprint("fox"), hasher.fingerprint("dog"));
    }

    proptest! {
        #[test]
        fn prop_canonical_symmetry(raw in proptest::collection::vec(any::<u64>(), 0..32)) {
            let forward: TermSet = raw.iter().copied().map(Fingerprint::from_raw).collect();
            let reversed: TermSet = raw.iter().rev().copied().map(Fingerprint::from_raw).collect();

            prop_assert_eq!(forward.canonical(), reversed.canonical());
        }
    }
}
