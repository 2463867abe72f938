//! Local heuristic analyzers, one per analyzer kind.
//!
//! Every analyzer is a pure function of the immutable `AnalysisInput`
//! snapshot and its own slice of `AnalysisConfig`. They never fail on odd
//! input: short or empty text degrades to a zero/neutral score with an
//! explanatory issue.

use std::sync::Arc;

use draftlens_common::{AnalysisConfig, AnalyzerKind, Document, ReferenceDocument, Result, SubReport};
use draftlens_ingestion::CorpusMatcher;

pub mod citations;
pub mod methodology;
pub mod originality;
pub mod readability;
pub mod structure;
pub mod tone;
pub mod writing;

pub use citations::CitationAnalyzer;
pub use methodology::MethodologyAnalyzer;
pub use originality::OriginalityAnalyzer;
pub use readability::ReadabilityAnalyzer;
pub use structure::StructureAnalyzer;
pub use tone::ToneAnalyzer;
pub use writing::WritingQualityAnalyzer;

/// Immutable snapshot shared by every analyzer of one request.
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub document: Document,
    pub corpus: Vec<ReferenceDocument>,
    /// Abstract plus every non-reference section.
    pub body_text: String,
}

impl AnalysisInput {
    pub fn new(document: Document, corpus: Vec<ReferenceDocument>) -> Self {
        let body_text = document.body_text();
        Self { document, corpus, body_text }
    }
}

/// A local analyzer producing one kind of sub-report.
pub trait Analyzer: Send + Sync {
    fn kind(&self) -> AnalyzerKind;

    fn analyze(&self, input: &AnalysisInput) -> Result<SubReport>;
}

/// The built-in heuristic analyzer for every kind, configured from `config`.
pub fn default_analyzers(config: &AnalysisConfig) -> Vec<Arc<dyn Analyzer>> {
    let min_sentence = config.segmentation.min_sentence_chars;
    vec![
        Arc::new(StructureAnalyzer),
        Arc::new(WritingQualityAnalyzer::new(config.writing.clone(), min_sentence)),
        Arc::new(CitationAnalyzer::new(config.citations.clone())),
        Arc::new(OriginalityAnalyzer::new(
            CorpusMatcher::new(config.matching.clone(), min_sentence),
            config.originality.clone(),
        )),
        Arc::new(MethodologyAnalyzer),
        Arc::new(ReadabilityAnalyzer::new(config.readability.clone(), min_sentence)),
        Arc::new(ToneAnalyzer::new(config.tone.clone())),
    ]
}

/// Count whitespace-separated words.
pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Round to two decimals for report display.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_analyzers_cover_every_kind() {
        let analyzers = default_analyzers(&AnalysisConfig::default());
        let mut kinds: Vec<AnalyzerKind> = analyzers.iter().map(|a| a.kind()).collect();
        kinds.sort();
        assert_eq!(kinds, AnalyzerKind::ALL.to_vec());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(0.0), 0.0);
    }
}
