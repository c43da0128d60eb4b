//! Snippet selection: pick the sentence(s) best covering a set of query
//! terms and trim them into a bounded excerpt.
//!
//! Selection scores every sufficiently long sentence by how many query
//! terms it contains, takes the shortest sentence among the top scorers,
//! cuts it down to the length budget through a sequence of fallback
//! strategies, then recurses over the terms the chosen sentence did not
//! cover. Elided text is marked with the literal `[..]` gap marker and
//! partial results from recursion are joined with `" / "`.
//!
//! Extraction is pure: it reads its inputs, performs no I/O, and may run
//! on independent requests in parallel without coordination.

use crate::matcher::SentenceMatcher;
use crate::score::ScoreBoard;
use crate::term::TermSet;
use crate::utils::floor_char_boundary;

/// Minimum length budget handed to a recursive call, so that leftover
/// terms still get a usable excerpt even when the primary match consumed
/// most of the caller's budget.
const MIN_RECURSION_BUDGET: usize = 20;

/// Default sentence-length threshold for a query of `term_count` terms.
///
/// Biases selection against sentences too short to carry context for all
/// the terms that must fit.
#[must_use]
pub const fn default_min_sentence_len(term_count: usize) -> usize {
    8 + 6 * term_count
}

/// Selects and trims query-relevant excerpts from a parsed document.
#[derive(Clone)]
pub struct SnippetExtractor {
    matcher: SentenceMatcher,
}

impl SnippetExtractor {
    /// Creates an extractor matching sentences with the given matcher.
    #[must_use]
    pub fn new(matcher: SentenceMatcher) -> Self {
        Self { matcher }
    }

    /// Produces the best excerpt covering as many of `terms` as possible.
    ///
    /// Sentences of length at or below `min_sentence_len` are not
    /// candidates. Returns `None` when no candidate sentence contains any
    /// query term. The result aims at `max_len` but the caller owns the
    /// absolute bound and hard-truncates if needed.
    #[must_use]
    pub fn extract(
        &self,
        sentences: &[String],
        terms: &TermSet,
        min_sentence_len: usize,
        max_len: usize,
    ) -> Option<String> {
        if sentences.is_empty() || terms.is_empty() {
            return None;
        }

        // Score each candidate sentence by the number of distinct terms
        // it contains.
        let mut hits: ScoreBoard<usize> = ScoreBoard::new();
        for (index, sentence) in sentences.iter().enumerate() {
            if sentence.len() > min_sentence_len {
                let words = self.matcher.offsets(sentence);
                for term in terms.iter() {
                    if words.contains_key(term) {
                        hits.bump(index);
                    }
                }
            }
        }

        let best = hits.max_score().unwrap_or(0);
        if best <= 0 {
            return None;
        }

        // Among the top scorers, the shortest sentence wins; the scan in
        // document order makes the tie-break deterministic.
        let mut chosen = None;
        let mut shortest = usize::MAX;
        for (index, sentence) in sentences.iter().enumerate() {
            if hits.score(&index) == Some(best) && sentence.len() < shortest {
                chosen = Some(index);
                shortest = sentence.len();
            }
        }
        let chosen = chosen?;
        let mut result = sentences[chosen].clone();

        // Rebuild the word map for the winning sentence and locate the
        // span of matched terms; unmatched terms are left for recursion.
        let words = self.matcher.offsets(&sentences[chosen]);
        let mut remaining = TermSet::new();
        let mut minpos = result.len();
        let mut span_end = None;
        for term in terms.iter() {
            match words.get(term) {
                Some(&pos) => {
                    if span_end.is_none_or(|end| pos > end) {
                        span_end = Some(pos);
                    }
                    if pos < minpos {
                        minpos = pos;
                    }
                },
                None => remaining.insert(*term),
            }
        }
        // Widen past the tail of the last matched word, clamped to the
        // sentence.
        let mut maxpos = (span_end? + 10).min(result.len());

        // Even cutting at both ends leaves the span over budget: collapse
        // the middle, keeping a prefix of the first match and a suffix
        // past the last one.
        if maxpos.saturating_sub(minpos) + 10 > max_len {
            let before = result.len();
            let head_end = floor_char_boundary(&result, (minpos + 20).min(result.len()));
            let tail_start = floor_char_boundary(&result, (maxpos + 26).min(result.len()));
            result = format!(
                "{} [..] {}",
                result[..head_end].trim(),
                result[tail_start..].trim()
            );
            maxpos = (maxpos + before + 6).saturating_sub(result.len());
        }

        // The right edge still overshoots: center a window of the budget
        // width around the span and bracket both ends.
        if maxpos > max_len {
            let span = maxpos.saturating_sub(minpos) + 10;
            let around = max_len.saturating_sub(span) / 2;
            let end = floor_char_boundary(&result, (maxpos + around).min(result.len()));
            let start = floor_char_boundary(&result, minpos.saturating_sub(around)).min(end);
            result = format!("[..] {} [..]", result[start..end].trim());
            minpos = around;
            maxpos = result.len().saturating_sub(around + 5);
        }

        // Cut at the right.
        if result.len() > max_len {
            let end = floor_char_boundary(&result, maxpos.min(result.len()));
            result = format!("{} [..]", result[..end].trim());
        }

        // Cut at the left.
        if result.len() > max_len {
            let start = floor_char_boundary(&result, minpos.min(result.len()));
            result = format!("[..] {}", result[start..].trim());
        }

        // Pathologically small budget: keep a fixed window near each end.
        if result.len() > max_len {
            let head_end = floor_char_boundary(&result, 20.min(result.len()));
            let head_start = floor_char_boundary(&result, 6.min(result.len())).min(head_end);
            let tail_end = floor_char_boundary(&result, result.len().saturating_sub(6));
            let tail_start =
                floor_char_boundary(&result, result.len().saturating_sub(26)).min(tail_end);
            result = format!(
                "{} [..] {}",
                result[head_start..head_end].trim(),
                result[tail_start..tail_end].trim()
            );
        }

        // Cover the terms the winning sentence lacked with further
        // excerpts from the rest of the document. The remaining set is
        // strictly smaller on every successful pass, so this terminates.
        if !remaining.is_empty() {
            let budget = max_len
                .saturating_sub(result.len())
                .max(MIN_RECURSION_BUDGET);
            if let Some(next) = self.extract(sentences, &remaining, min_sentence_len, budget) {
                result = format!("{result} / {next}");
            }
        }

        Some(result)
    }
}
