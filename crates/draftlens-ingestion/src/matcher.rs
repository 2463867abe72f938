//! Corpus matching: whole-document similarity per reference, then
//! sentence-level matched segments for every reference that clears the
//! document threshold.

use rayon::prelude::*;

use draftlens_common::config::MatchingConfig;
use draftlens_common::report::{Match, MatchedSegment};
use draftlens_common::ReferenceDocument;

use crate::normalise::normalise;
use crate::segmenter::{split_sentences, Sentence};
use crate::similarity::SimilarityScorer;

/// A sentence paired with its normalised form.
struct PreparedSentence {
    sentence: Sentence,
    normalised: String,
}

fn prepare(text: &str, min_chars: usize) -> Vec<PreparedSentence> {
    split_sentences(text, min_chars)
        .into_iter()
        .map(|sentence| {
            let normalised = normalise(&sentence.text);
            PreparedSentence { sentence, normalised }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct CorpusMatcher {
    config: MatchingConfig,
    min_sentence_chars: usize,
    document_scorer: SimilarityScorer,
    segment_scorer: SimilarityScorer,
}

impl CorpusMatcher {
    pub fn new(config: MatchingConfig, min_sentence_chars: usize) -> Self {
        let document_scorer = SimilarityScorer::new(config.document_metric);
        let segment_scorer = SimilarityScorer::new(config.segment_metric);
        Self { config, min_sentence_chars, document_scorer, segment_scorer }
    }

    /// Compare `text` against every reference. Returns the references whose
    /// whole-document similarity is strictly above the document threshold,
    /// sorted by similarity descending; ties keep corpus order.
    pub fn find_matches(&self, text: &str, corpus: &[ReferenceDocument]) -> Vec<Match> {
        if corpus.is_empty() {
            return Vec::new();
        }
        let doc_norm = normalise(text);
        let doc_sentences = prepare(text, self.min_sentence_chars);

        // Indexed parallel iterators collect in input order.
        let mut matches: Vec<Match> = corpus
            .par_iter()
            .filter_map(|reference| {
                let similarity = self.document_scorer.similarity(&doc_norm, &normalise(&reference.text));
                if similarity <= self.config.document_threshold {
                    return None;
                }
                let segments = self.matched_segments(
                    &doc_sentences,
                    &reference.text,
                    self.config.max_segments_per_match,
                );
                Some(Match {
                    source_id: reference.id.clone(),
                    title: reference.title.clone(),
                    similarity: similarity * 100.0,
                    matched_segments: segments,
                })
            })
            .collect();

        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

        tracing::debug!(
            references = corpus.len(),
            matches = matches.len(),
            "corpus matching complete"
        );
        matches
    }

    /// Whole-text similarity (0–1) of two texts plus their matched segments,
    /// capped at the comparison segment limit. Offsets refer to `a`.
    pub fn compare_texts(&self, a: &str, b: &str) -> (f64, Vec<MatchedSegment>) {
        let similarity = self.document_scorer.similarity(&normalise(a), &normalise(b));
        let a_sentences = prepare(a, self.min_sentence_chars);
        let segments = self.matched_segments(&a_sentences, b, self.config.compare_segment_limit);
        (similarity, segments)
    }

    /// Sentence × sentence comparison; pairs strictly above the segment
    /// threshold, best first, at most `limit`.
    fn matched_segments(
        &self,
        doc_sentences: &[PreparedSentence],
        other_text: &str,
        limit: usize,
    ) -> Vec<MatchedSegment> {
        let other_sentences = prepare(other_text, self.min_sentence_chars);
        let mut segments = Vec::new();

        for ds in doc_sentences {
            for os in &other_sentences {
                let sim = self.segment_scorer.similarity(&ds.normalised, &os.normalised);
                if sim > self.config.segment_threshold {
                    segments.push(MatchedSegment {
                        original_span: ds.sentence.text.clone(),
                        matched_span: os.sentence.text.clone(),
                        similarity: sim * 100.0,
                        start_index: ds.sentence.start,
                        end_index: ds.sentence.end,
                    });
                }
            }
        }

        segments.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        segments.truncate(limit);
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> CorpusMatcher {
        CorpusMatcher::new(MatchingConfig::default(), 10)
    }

    const TEXT: &str = "Deep learning models require large labelled datasets. \
                        We propose a semi-supervised approach to reduce annotation cost. \
                        Experiments on three benchmarks show consistent gains.";

    #[test]
    fn test_identical_reference_matches_fully() {
        let corpus = vec![ReferenceDocument::new("r1", "Same", TEXT)];
        let matches = matcher().find_matches(TEXT, &corpus);
        assert_eq!(matches.len(), 1);
        assert!((matches[0].similarity - 100.0).abs() < 1e-9);
        assert_eq!(matches[0].matched_segments.len(), 3);
        for seg in &matches[0].matched_segments {
            assert!(seg.similarity > 70.0);
            assert!(seg.start_index <= seg.end_index && seg.end_index <= TEXT.len());
            assert_eq!(&TEXT[seg.start_index..seg.end_index], seg.original_span);
        }
    }

    #[test]
    fn test_unrelated_reference_is_dropped() {
        let corpus = vec![ReferenceDocument::new("r1", "Other", "zzzz qqqq xxxx")];
        assert!(matcher().find_matches(TEXT, &corpus).is_empty());
    }

    #[test]
    fn test_unrelated_prose_is_not_a_match() {
        let corpus = vec![ReferenceDocument::new("tern", "Arctic tern", draftlens_test_utils::ARCTIC_TERN)];
        assert!(matcher().find_matches(TEXT, &corpus).is_empty());

        let (sim, segments) = matcher().compare_texts(TEXT, draftlens_test_utils::ARCTIC_TERN);
        assert!(sim < 0.05, "unrelated prose scored {sim}");
        assert!(segments.is_empty());
    }

    #[test]
    fn test_character_bigrams_saturate_on_long_prose() {
        let bigram = SimilarityScorer::new(draftlens_common::config::SimilarityMetric::CharacterBigram);
        let sim = bigram.similarity(&normalise(TEXT), &normalise(draftlens_test_utils::ARCTIC_TERN));
        assert!(sim > MatchingConfig::default().document_threshold);
    }

    #[test]
    fn test_empty_corpus() {
        assert!(matcher().find_matches(TEXT, &[]).is_empty());
    }

    #[test]
    fn test_segments_capped_at_three() {
        let repeated = format!("{TEXT} {TEXT}");
        let corpus = vec![ReferenceDocument::new("r1", "Twice", repeated)];
        let matches = matcher().find_matches(TEXT, &corpus);
        assert_eq!(matches[0].matched_segments.len(), 3);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let corpus = vec![
            ReferenceDocument::new("first", "A", TEXT),
            ReferenceDocument::new("second", "B", TEXT),
        ];
        let matches = matcher().find_matches(TEXT, &corpus);
        let ids: Vec<&str> = matches.iter().map(|m| m.source_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_compare_texts_uses_compare_limit() {
        let (sim, segments) = matcher().compare_texts(TEXT, TEXT);
        assert_eq!(sim, 1.0);
        assert_eq!(segments.len(), 3);
    }
}
