//! Analysis configuration: every heuristic threshold and weight in one place.
//!
//! The whole object is passed to the reviewer at construction time. Every
//! field has a default, so a config file only needs the values it overrides:
//!
//! ```toml
//! normalization = "partial_sum"
//!
//! [matching]
//! document_threshold = 0.20
//!
//! [remote]
//! enabled = true
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DraftlensError;
use crate::report::AnalyzerKind;
use crate::weights::ScoreWeights;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub normalization: ScoreNormalization,
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub originality: OriginalityConfig,
    #[serde(default)]
    pub readability: ReadabilityConfig,
    #[serde(default)]
    pub tone: ToneConfig,
    #[serde(default)]
    pub citations: CitationConfig,
    #[serde(default)]
    pub writing: WritingConfig,
    #[serde(default)]
    pub suggestions: SuggestionThresholds,
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// How the overall score treats analyzers that did not produce a sub-report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreNormalization {
    /// Σ(wᵢ·sᵢ) / Σwᵢ over produced sub-reports.
    #[default]
    Renormalized,
    /// Σ(wᵢ·sᵢ) over produced sub-reports; caps below 100 when analyzers
    /// are omitted.
    PartialSum,
}

// ── Segmentation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Lines at or above this many characters are never headers.
    #[serde(default = "default_max_header_chars")]
    pub max_header_chars: usize,
    /// Sentences shorter than this are noise.
    #[serde(default = "default_min_sentence_chars")]
    pub min_sentence_chars: usize,
}

fn default_max_header_chars()   -> usize { 100 }
fn default_min_sentence_chars() -> usize { 10 }

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_header_chars: default_max_header_chars(),
            min_sentence_chars: default_min_sentence_chars(),
        }
    }
}

// ── Matching ──────────────────────────────────────────────────────────────────

/// Similarity metric used by the matcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimilarityMetric {
    /// Sørensen–Dice over character bigrams, whitespace ignored.
    #[default]
    CharacterBigram,
    /// Dice over word n-grams.
    WordShingle { n: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Metric for whole-document similarity; word trigrams by default.
    #[serde(default = "default_document_metric")]
    pub document_metric: SimilarityMetric,
    /// Metric for sentence pairs.
    #[serde(default)]
    pub segment_metric: SimilarityMetric,
    /// Whole-document similarity (0–1) a reference must exceed.
    #[serde(default = "default_document_threshold")]
    pub document_threshold: f64,
    /// Sentence-pair similarity (0–1) a segment must exceed.
    #[serde(default = "default_segment_threshold")]
    pub segment_threshold: f64,
    #[serde(default = "default_max_segments_per_match")]
    pub max_segments_per_match: usize,
    /// Segment cap for pairwise `compare`.
    #[serde(default = "default_compare_segment_limit")]
    pub compare_segment_limit: usize,
    /// Verdict thresholds (0–100) for pairwise comparison.
    #[serde(default = "default_duplicate_above")]
    pub duplicate_above: f64,
    #[serde(default = "default_highly_similar_above")]
    pub highly_similar_above: f64,
    #[serde(default = "default_same_topic_above")]
    pub same_topic_above: f64,
}

fn default_document_threshold()     -> f64   { 0.15 }
fn default_segment_threshold()      -> f64   { 0.70 }
fn default_max_segments_per_match() -> usize { 3 }
fn default_compare_segment_limit()  -> usize { 10 }
fn default_duplicate_above()        -> f64   { 70.0 }
fn default_highly_similar_above()   -> f64   { 40.0 }
fn default_same_topic_above()       -> f64   { 20.0 }

fn default_document_metric() -> SimilarityMetric {
    SimilarityMetric::WordShingle { n: 3 }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            document_metric: default_document_metric(),
            segment_metric: SimilarityMetric::default(),
            document_threshold: default_document_threshold(),
            segment_threshold: default_segment_threshold(),
            max_segments_per_match: default_max_segments_per_match(),
            compare_segment_limit: default_compare_segment_limit(),
            duplicate_above: default_duplicate_above(),
            highly_similar_above: default_highly_similar_above(),
            same_topic_above: default_same_topic_above(),
        }
    }
}

// ── Originality ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginalityConfig {
    #[serde(default = "default_penalty_per_match")]
    pub penalty_per_match: f64,
    #[serde(default = "default_penalty_cap")]
    pub penalty_cap: f64,
    /// Plagiarism score at which the level becomes "moderate".
    #[serde(default = "default_moderate_from")]
    pub moderate_from: f64,
    #[serde(default = "default_high_from")]
    pub high_from: f64,
    #[serde(default = "default_very_high_from")]
    pub very_high_from: f64,
}

fn default_penalty_per_match() -> f64 { 2.0 }
fn default_penalty_cap()       -> f64 { 20.0 }
fn default_moderate_from()     -> f64 { 10.0 }
fn default_high_from()         -> f64 { 25.0 }
fn default_very_high_from()    -> f64 { 50.0 }

impl Default for OriginalityConfig {
    fn default() -> Self {
        Self {
            penalty_per_match: default_penalty_per_match(),
            penalty_cap: default_penalty_cap(),
            moderate_from: default_moderate_from(),
            high_from: default_high_from(),
            very_high_from: default_very_high_from(),
        }
    }
}

// ── Readability ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadabilityConfig {
    /// Words longer than this many characters are complex.
    #[serde(default = "default_complex_word_chars")]
    pub complex_word_chars: usize,
    #[serde(default = "default_complex_word_ratio_limit")]
    pub complex_word_ratio_limit: f64,
    /// Average sentence length (words) above which a warning is raised.
    #[serde(default = "default_long_average_sentence")]
    pub long_average_sentence: f64,
}

fn default_complex_word_chars()       -> usize { 12 }
fn default_complex_word_ratio_limit() -> f64   { 0.20 }
fn default_long_average_sentence()    -> f64   { 25.0 }

impl Default for ReadabilityConfig {
    fn default() -> Self {
        Self {
            complex_word_chars: default_complex_word_chars(),
            complex_word_ratio_limit: default_complex_word_ratio_limit(),
            long_average_sentence: default_long_average_sentence(),
        }
    }
}

// ── Tone ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneConfig {
    #[serde(default = "default_first_person_limit")]
    pub first_person_limit: usize,
    #[serde(default = "default_contraction_limit")]
    pub contraction_limit: usize,
    #[serde(default = "default_informal_limit")]
    pub informal_limit: usize,
    #[serde(default = "default_tone_penalty")]
    pub penalty_per_issue: f64,
    /// Score strictly above this is formal.
    #[serde(default = "default_formal_above")]
    pub formal_above: f64,
}

fn default_first_person_limit() -> usize { 10 }
fn default_contraction_limit()  -> usize { 0 }
fn default_informal_limit()     -> usize { 5 }
fn default_tone_penalty()       -> f64   { 15.0 }
fn default_formal_above()       -> f64   { 75.0 }

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            first_person_limit: default_first_person_limit(),
            contraction_limit: default_contraction_limit(),
            informal_limit: default_informal_limit(),
            penalty_per_issue: default_tone_penalty(),
            formal_above: default_formal_above(),
        }
    }
}

// ── Citations ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationConfig {
    /// Reference-list lines must be longer than this to count as entries.
    #[serde(default = "default_min_reference_chars")]
    pub min_reference_chars: usize,
    #[serde(default = "default_mismatch_penalty")]
    pub penalty_per_mismatch: f64,
}

fn default_min_reference_chars() -> usize { 20 }
fn default_mismatch_penalty()    -> f64   { 5.0 }

impl Default for CitationConfig {
    fn default() -> Self {
        Self {
            min_reference_chars: default_min_reference_chars(),
            penalty_per_mismatch: default_mismatch_penalty(),
        }
    }
}

// ── Writing quality ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WritingConfig {
    #[serde(default = "default_passive_ratio_limit")]
    pub passive_ratio_limit: f64,
    /// Sentences with more words than this are "very long".
    #[serde(default = "default_long_sentence_words")]
    pub long_sentence_words: usize,
    #[serde(default = "default_long_sentence_ratio_limit")]
    pub long_sentence_ratio_limit: f64,
    #[serde(default = "default_wordy_phrase_limit")]
    pub wordy_phrase_limit: usize,
    #[serde(default = "default_writing_penalty")]
    pub penalty_per_issue: f64,
}

fn default_passive_ratio_limit()       -> f64   { 0.25 }
fn default_long_sentence_words()       -> usize { 35 }
fn default_long_sentence_ratio_limit() -> f64   { 0.15 }
fn default_wordy_phrase_limit()        -> usize { 3 }
fn default_writing_penalty()           -> f64   { 15.0 }

impl Default for WritingConfig {
    fn default() -> Self {
        Self {
            passive_ratio_limit: default_passive_ratio_limit(),
            long_sentence_words: default_long_sentence_words(),
            long_sentence_ratio_limit: default_long_sentence_ratio_limit(),
            wordy_phrase_limit: default_wordy_phrase_limit(),
            penalty_per_issue: default_writing_penalty(),
        }
    }
}

// ── Suggestion thresholds ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionThresholds {
    /// Plagiarism score strictly above this yields a critical suggestion.
    #[serde(default = "default_plagiarism_critical_above")]
    pub plagiarism_critical_above: f64,
    #[serde(default = "default_structure_below")]
    pub structure_below: f64,
    #[serde(default = "default_methodology_below")]
    pub methodology_below: f64,
    #[serde(default = "default_writing_quality_below")]
    pub writing_quality_below: f64,
    #[serde(default = "default_academic_tone_below")]
    pub academic_tone_below: f64,
    #[serde(default = "default_clarity_below")]
    pub clarity_below: f64,
    #[serde(default = "default_citations_below")]
    pub citations_below: f64,
}

fn default_plagiarism_critical_above() -> f64 { 25.0 }
fn default_structure_below()           -> f64 { 70.0 }
fn default_methodology_below()         -> f64 { 60.0 }
fn default_writing_quality_below()     -> f64 { 75.0 }
fn default_academic_tone_below()       -> f64 { 80.0 }
fn default_clarity_below()             -> f64 { 70.0 }
fn default_citations_below()           -> f64 { 90.0 }

impl Default for SuggestionThresholds {
    fn default() -> Self {
        Self {
            plagiarism_critical_above: default_plagiarism_critical_above(),
            structure_below: default_structure_below(),
            methodology_below: default_methodology_below(),
            writing_quality_below: default_writing_quality_below(),
            academic_tone_below: default_academic_tone_below(),
            clarity_below: default_clarity_below(),
            citations_below: default_citations_below(),
        }
    }
}

// ── Remote analyzer ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Whether the binary attaches the LLM-backed remote analyzer.
    #[serde(default)]
    pub enabled: bool,
    /// Text sent to the remote service is truncated to this many characters.
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
    #[serde(default)]
    pub timeouts: RemoteTimeouts,
}

fn default_max_input_chars() -> usize { 4000 }

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_input_chars: default_max_input_chars(),
            timeouts: RemoteTimeouts::default(),
        }
    }
}

/// Per-kind timeout budgets in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteTimeouts {
    pub structure_ms: u64,
    pub writing_quality_ms: u64,
    pub citations_ms: u64,
    pub originality_ms: u64,
    pub methodology_ms: u64,
    pub clarity_ms: u64,
    pub academic_tone_ms: u64,
}

impl Default for RemoteTimeouts {
    fn default() -> Self {
        Self {
            structure_ms:       15_000,
            writing_quality_ms: 30_000,
            citations_ms:       15_000,
            originality_ms:     30_000,
            methodology_ms:     20_000,
            clarity_ms:         20_000,
            academic_tone_ms:   20_000,
        }
    }
}

impl RemoteTimeouts {
    pub fn timeout_for(&self, kind: AnalyzerKind) -> Duration {
        let ms = match kind {
            AnalyzerKind::Structure      => self.structure_ms,
            AnalyzerKind::WritingQuality => self.writing_quality_ms,
            AnalyzerKind::Citations      => self.citations_ms,
            AnalyzerKind::Originality    => self.originality_ms,
            AnalyzerKind::Methodology    => self.methodology_ms,
            AnalyzerKind::Clarity        => self.clarity_ms,
            AnalyzerKind::AcademicTone   => self.academic_tone_ms,
        };
        Duration::from_millis(ms)
    }

    /// Set every budget to the same value.
    pub fn uniform(ms: u64) -> Self {
        Self {
            structure_ms: ms,
            writing_quality_ms: ms,
            citations_ms: ms,
            originality_ms: ms,
            methodology_ms: ms,
            clarity_ms: ms,
            academic_tone_ms: ms,
        }
    }
}

// ── Loading and validation ────────────────────────────────────────────────────

impl AnalysisConfig {
    /// Reject configurations the analyzers cannot run with.
    pub fn validate(&self) -> Result<(), DraftlensError> {
        if !self.weights.validate() {
            return Err(DraftlensError::Config(format!(
                "score weights must be non-negative and sum to 1.0 (got {:.4})",
                self.weights.sum()
            )));
        }

        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(DraftlensError::Config(format!("{name} must be within [0, 1] (got {v})")))
            }
        };
        unit("matching.document_threshold", self.matching.document_threshold)?;
        unit("matching.segment_threshold", self.matching.segment_threshold)?;
        unit("readability.complex_word_ratio_limit", self.readability.complex_word_ratio_limit)?;
        unit("writing.passive_ratio_limit", self.writing.passive_ratio_limit)?;
        unit("writing.long_sentence_ratio_limit", self.writing.long_sentence_ratio_limit)?;

        for (name, metric) in [
            ("matching.document_metric", self.matching.document_metric),
            ("matching.segment_metric", self.matching.segment_metric),
        ] {
            if let SimilarityMetric::WordShingle { n: 0 } = metric {
                return Err(DraftlensError::Config(format!("{name}.n must be at least 1")));
            }
        }

        let o = &self.originality;
        if !(o.moderate_from <= o.high_from && o.high_from <= o.very_high_from) {
            return Err(DraftlensError::Config(
                "originality level thresholds must be ascending".to_string(),
            ));
        }

        let m = &self.matching;
        if !(m.same_topic_above <= m.highly_similar_above && m.highly_similar_above <= m.duplicate_above) {
            return Err(DraftlensError::Config(
                "comparison verdict thresholds must be ascending".to_string(),
            ));
        }

        Ok(())
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from YAML file
    pub fn from_yaml(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load from JSON file
    pub fn from_json(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load from a file, choosing the format by extension (toml, yaml/yml,
    /// json). The result is validated.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let config = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml(path)?,
            "json"         => Self::from_json(path)?,
            _              => Self::from_toml_str(&std::fs::read_to_string(path)?)?,
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), "analysis config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.matching.document_threshold, 0.15);
        assert_eq!(config.matching.segment_threshold, 0.70);
        assert_eq!(config.matching.max_segments_per_match, 3);
        assert_eq!(config.matching.document_metric, SimilarityMetric::WordShingle { n: 3 });
        assert_eq!(config.matching.segment_metric, SimilarityMetric::CharacterBigram);
        assert_eq!(config.segmentation.max_header_chars, 100);
        assert_eq!(config.normalization, ScoreNormalization::Renormalized);
        assert!(!config.remote.enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            normalization = "partial_sum"

            [matching]
            document_threshold = 0.25
            document_metric = { type = "word_shingle", n = 2 }

            [remote.timeouts]
            clarity_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.normalization, ScoreNormalization::PartialSum);
        assert_eq!(config.matching.document_threshold, 0.25);
        assert_eq!(config.matching.segment_threshold, 0.70);
        assert_eq!(config.matching.document_metric, SimilarityMetric::WordShingle { n: 2 });
        assert_eq!(config.matching.segment_metric, SimilarityMetric::CharacterBigram);
        assert_eq!(config.remote.timeouts.timeout_for(AnalyzerKind::Clarity), Duration::from_millis(500));
        assert_eq!(
            config.remote.timeouts.timeout_for(AnalyzerKind::Structure),
            Duration::from_millis(15_000)
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_weights_rejected() {
        let mut config = AnalysisConfig::default();
        config.weights.structure = 0.9;
        assert!(matches!(config.validate(), Err(DraftlensError::Config(_))));
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let mut config = AnalysisConfig::default();
        config.matching.segment_threshold = 70.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_shingle_rejected() {
        let mut config = AnalysisConfig::default();
        config.matching.segment_metric = SimilarityMetric::WordShingle { n: 0 };
        assert!(config.validate().is_err());
        config.matching.segment_metric = SimilarityMetric::CharacterBigram;
        config.matching.document_metric = SimilarityMetric::WordShingle { n: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_yaml_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "tone:\n  first_person_limit: 3").unwrap();
        let config = AnalysisConfig::load(file.path()).unwrap();
        assert_eq!(config.tone.first_person_limit, 3);
        assert_eq!(config.tone.informal_limit, 5);
    }
}
