//! Bounded Dice similarity between two normalised strings.

use std::collections::HashSet;

use draftlens_common::config::SimilarityMetric;

/// Symmetric similarity in [0, 1]. Identical strings score 1; an empty
/// string against a non-empty one scores 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer {
    metric: SimilarityMetric,
}

impl SimilarityScorer {
    pub fn new(metric: SimilarityMetric) -> Self {
        Self { metric }
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        if a.trim().is_empty() || b.trim().is_empty() {
            return 0.0;
        }
        let score = match self.metric {
            SimilarityMetric::CharacterBigram  => strsim::sorensen_dice(a, b),
            SimilarityMetric::WordShingle { n } => shingle_dice(a, b, n.max(1)),
        };
        score.clamp(0.0, 1.0)
    }
}

/// Dice coefficient over the sets of word n-grams. Texts shorter than `n`
/// words contribute a single shingle of all their words.
fn shingle_dice(a: &str, b: &str, n: usize) -> f64 {
    let sa = shingles(a, n);
    let sb = shingles(b, n);
    if sa.is_empty() || sb.is_empty() {
        return 0.0;
    }
    let common = sa.intersection(&sb).count();
    (2 * common) as f64 / (sa.len() + sb.len()) as f64
}

fn shingles(text: &str, n: usize) -> HashSet<Vec<&str>> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return HashSet::new();
    }
    if words.len() < n {
        return HashSet::from([words]);
    }
    words.windows(n).map(<[&str]>::to_vec).collect()
}
