//! Word-to-offset mapping for a single sentence.

use crate::term::{Fingerprint, TermHasher, Tokenizer};
use std::collections::HashMap;
use std::sync::Arc;

/// Detects which terms occur in a sentence and where.
///
/// For each word the matcher records the offset at which the word begins,
/// accumulated from the token lengths in scan order (each token advances
/// the position by its length plus one separator). A repeated word's later
/// offset overwrites the earlier one.
#[derive(Clone)]
pub struct SentenceMatcher {
    tokenizer: Arc<dyn Tokenizer>,
    hasher: Arc<dyn TermHasher>,
}

impl SentenceMatcher {
    /// Creates a matcher over the given tokenizer and hasher.
    pub fn new(tokenizer: Arc<dyn Tokenizer>, hasher: Arc<dyn TermHasher>) -> Self {
        Self { tokenizer, hasher }
    }

    /// Maps each word fingerprint in the sentence to its start offset.
    ///
    /// An empty sentence yields an empty map.
    #[must_use]
    pub fn offsets(&self, sentence: &str) -> HashMap<Fingerprint, usize> {
        let mut map = HashMap::new();
        let mut pos = 0usize;
        for word in self.tokenizer.tokenize(sentence) {
            map.insert(self.hasher.fingerprint(&word), pos);
            pos += word.len() + 1;
        }
        map
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::term::{DigestTermHasher, TermHasher as _, WordTokenizer};

    fn matcher() -> SentenceMatcher {
        SentenceMatcher::new(Arc::new(WordTokenizer), Arc::new(DigestTermHasher))
    }

    #[test]
    fn test_offsets_accumulate_by_token_length() {
        let map = matcher().offsets("the quick fox");
        let hasher = DigestTermHasher;

        assert_eq!(map.get(&hasher.fingerprint("the")), Some(&0));
        assert_eq!(map.get(&hasher.fingerprint("quick")), Some(&4));
        assert_eq!(map.get(&hasher.fingerprint("fox")), Some(&10));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_repeated_word_keeps_last_offset() {
        let map = matcher().offsets("dog bites dog");
        let hasher = DigestTermHasher;

        // "dog" at 0 then again at 10; the later scan position wins.
        assert_eq!(map.get(&hasher.fingerprint("dog")), Some(&10));
        assert_eq!(map.get(&hasher.fingerprint("bites")), Some(&4));
    }

    #[test]
    fn test_empty_sentence_yields_empty_map() {
        assert!(matcher().offsets("").is_empty());
    }

    #[test]
    fn test_absent_term_not_in_map() {
        let map = matcher().offsets("jumps over");
        assert!(!map.contains_key(&DigestTermHasher.fingerprint("fox")));
    }
}
