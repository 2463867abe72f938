//! Analysis report model: per-analyzer sub-reports, suggestions and the
//! aggregated report returned to callers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::SectionType;
use crate::error::DraftlensError;

/// Clamp a score into the [0, 100] range. NaN collapses to 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

// ── Analyzer kinds ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerKind {
    Structure,
    WritingQuality,
    Citations,
    Originality,
    Methodology,
    Clarity,
    AcademicTone,
}

impl AnalyzerKind {
    pub const ALL: [AnalyzerKind; 7] = [
        AnalyzerKind::Structure,
        AnalyzerKind::WritingQuality,
        AnalyzerKind::Citations,
        AnalyzerKind::Originality,
        AnalyzerKind::Methodology,
        AnalyzerKind::Clarity,
        AnalyzerKind::AcademicTone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyzerKind::Structure      => "structure",
            AnalyzerKind::WritingQuality => "writing_quality",
            AnalyzerKind::Citations      => "citations",
            AnalyzerKind::Originality    => "originality",
            AnalyzerKind::Methodology    => "methodology",
            AnalyzerKind::Clarity        => "clarity",
            AnalyzerKind::AcademicTone   => "academic_tone",
        }
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalyzerKind {
    type Err = DraftlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        let kind = match key.as_str() {
            "structure"                       => AnalyzerKind::Structure,
            "writing_quality" | "writing"     => AnalyzerKind::WritingQuality,
            "citations" | "citation"          => AnalyzerKind::Citations,
            "originality" | "plagiarism"      => AnalyzerKind::Originality,
            "methodology"                     => AnalyzerKind::Methodology,
            "clarity" | "readability"         => AnalyzerKind::Clarity,
            "academic_tone" | "tone"          => AnalyzerKind::AcademicTone,
            _ => return Err(DraftlensError::UnknownAnalyzerKind(s.to_string())),
        };
        Ok(kind)
    }
}

// ── Issues ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Error    => "error",
            Severity::Warning  => "warning",
            Severity::Info     => "info",
        }
    }
}

impl FromStr for Severity {
    type Err = DraftlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical"            => Ok(Severity::Critical),
            "error"               => Ok(Severity::Error),
            "warning" | "warn"    => Ok(Severity::Warning),
            "info" | "suggestion" => Ok(Severity::Info),
            other => Err(DraftlensError::InvalidRequest(format!("unknown severity '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self { severity, message: message.into() }
    }
}

// ── Kind-specific details ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureDetails {
    pub has_all_sections: bool,
    pub present_sections: Vec<SectionType>,
    pub missing_sections: Vec<SectionType>,
}

/// The six elements a complete methodology section describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodologyElement {
    ResearchDesign,
    DataCollection,
    SampleSize,
    AnalysisMethods,
    ValidityReliability,
    EthicalConsiderations,
}

impl MethodologyElement {
    pub const ALL: [MethodologyElement; 6] = [
        MethodologyElement::ResearchDesign,
        MethodologyElement::DataCollection,
        MethodologyElement::SampleSize,
        MethodologyElement::AnalysisMethods,
        MethodologyElement::ValidityReliability,
        MethodologyElement::EthicalConsiderations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MethodologyElement::ResearchDesign        => "research_design",
            MethodologyElement::DataCollection        => "data_collection",
            MethodologyElement::SampleSize            => "sample_size",
            MethodologyElement::AnalysisMethods       => "analysis_methods",
            MethodologyElement::ValidityReliability   => "validity_reliability",
            MethodologyElement::EthicalConsiderations => "ethical_considerations",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MethodologyElement::ResearchDesign        => "research design",
            MethodologyElement::DataCollection        => "data collection",
            MethodologyElement::SampleSize            => "sample size",
            MethodologyElement::AnalysisMethods       => "analysis methods",
            MethodologyElement::ValidityReliability   => "validity and reliability",
            MethodologyElement::EthicalConsiderations => "ethical considerations",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodologyDetails {
    pub section_found: bool,
    pub completeness: String,
    pub has_all_elements: bool,
    pub present_elements: Vec<MethodologyElement>,
    pub missing_elements: Vec<MethodologyElement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadabilityGrade {
    #[serde(rename = "Very Easy")]
    VeryEasy,
    #[serde(rename = "Easy")]
    Easy,
    #[serde(rename = "Fairly Easy")]
    FairlyEasy,
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "Fairly Difficult")]
    FairlyDifficult,
    #[serde(rename = "Difficult")]
    Difficult,
    #[serde(rename = "Very Difficult")]
    VeryDifficult,
}

impl ReadabilityGrade {
    /// Bucket a 0–100 readability score.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => ReadabilityGrade::VeryEasy,
            s if s >= 80.0 => ReadabilityGrade::Easy,
            s if s >= 70.0 => ReadabilityGrade::FairlyEasy,
            s if s >= 60.0 => ReadabilityGrade::Standard,
            s if s >= 50.0 => ReadabilityGrade::FairlyDifficult,
            s if s >= 30.0 => ReadabilityGrade::Difficult,
            _              => ReadabilityGrade::VeryDifficult,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadabilityGrade::VeryEasy        => "Very Easy",
            ReadabilityGrade::Easy            => "Easy",
            ReadabilityGrade::FairlyEasy      => "Fairly Easy",
            ReadabilityGrade::Standard        => "Standard",
            ReadabilityGrade::FairlyDifficult => "Fairly Difficult",
            ReadabilityGrade::Difficult       => "Difficult",
            ReadabilityGrade::VeryDifficult   => "Very Difficult",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarityDetails {
    pub readability_score: f64,
    pub readability_grade: ReadabilityGrade,
    pub avg_sentence_length: f64,
    pub avg_word_length: f64,
    pub complex_word_ratio: f64,
    pub sentence_count: usize,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneDetails {
    pub is_formal: bool,
    pub first_person_usage: usize,
    pub contractions: usize,
    pub informal_language: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationDetails {
    pub in_text_citations: usize,
    pub reference_entries: usize,
    pub mismatch: usize,
}

/// A pair of near-identical spans, one from the candidate document and one
/// from a corpus reference. Offsets are byte offsets into the candidate's
/// full text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedSegment {
    pub original_span: String,
    pub matched_span: String,
    /// 0–100
    pub similarity: f64,
    pub start_index: usize,
    pub end_index: usize,
}

/// One corpus reference that cleared the whole-document threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub source_id: String,
    pub title: String,
    /// 0–100
    pub similarity: f64,
    pub matched_segments: Vec<MatchedSegment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlagiarismLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl PlagiarismLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlagiarismLevel::Low      => "low",
            PlagiarismLevel::Moderate => "moderate",
            PlagiarismLevel::High     => "high",
            PlagiarismLevel::VeryHigh => "very-high",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PlagiarismLevel::Low =>
                "Minimal similarity detected. The draft appears to be original work.",
            PlagiarismLevel::Moderate =>
                "Some similarity detected. Review the matched passages and make sure they are properly cited.",
            PlagiarismLevel::High =>
                "Significant similarity detected. Paraphrase or quote and cite the matched passages.",
            PlagiarismLevel::VeryHigh =>
                "Very high similarity detected. Substantial portions match existing work and must be rewritten or attributed.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginalityDetails {
    pub plagiarism_score: f64,
    pub level: PlagiarismLevel,
    pub message: String,
    pub matches: Vec<Match>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingQualityDetails {
    pub sentence_count: usize,
    pub passive_voice_ratio: f64,
    pub long_sentence_ratio: f64,
    pub wordy_phrases: usize,
    pub repeated_words: usize,
}

/// Kind-specific payload of a sub-report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubReportDetails {
    Structure(StructureDetails),
    WritingQuality(WritingQualityDetails),
    Citations(CitationDetails),
    Originality(OriginalityDetails),
    Methodology(MethodologyDetails),
    Clarity(ClarityDetails),
    AcademicTone(ToneDetails),
}

impl SubReportDetails {
    pub fn kind(&self) -> AnalyzerKind {
        match self {
            SubReportDetails::Structure(_)      => AnalyzerKind::Structure,
            SubReportDetails::WritingQuality(_) => AnalyzerKind::WritingQuality,
            SubReportDetails::Citations(_)      => AnalyzerKind::Citations,
            SubReportDetails::Originality(_)    => AnalyzerKind::Originality,
            SubReportDetails::Methodology(_)    => AnalyzerKind::Methodology,
            SubReportDetails::Clarity(_)        => AnalyzerKind::Clarity,
            SubReportDetails::AcademicTone(_)   => AnalyzerKind::AcademicTone,
        }
    }
}

// ── Sub-report ────────────────────────────────────────────────────────────────

/// Scored output of one analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubReport {
    pub score: f64,
    pub issues: Vec<Issue>,
    pub suggestions: Vec<String>,
    pub details: SubReportDetails,
}

impl SubReport {
    pub fn new(score: f64, details: SubReportDetails) -> Self {
        Self {
            score: clamp_score(score),
            issues: Vec::new(),
            suggestions: Vec::new(),
            details,
        }
    }

    pub fn kind(&self) -> AnalyzerKind {
        self.details.kind()
    }

    pub fn push_issue(&mut self, severity: Severity, message: impl Into<String>) {
        self.issues.push(Issue::new(severity, message));
    }

    pub fn push_suggestion(&mut self, suggestion: impl Into<String>) {
        self.suggestions.push(suggestion.into());
    }

    pub fn has_issue(&self, severity: Severity) -> bool {
        self.issues.iter().any(|i| i.severity == severity)
    }
}

// ── Suggestions ───────────────────────────────────────────────────────────────

/// Ordering is significant: `Critical < High < Medium < Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionPriority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub priority: SuggestionPriority,
    pub category: AnalyzerKind,
    pub title: String,
    pub description: String,
    pub actions: Vec<String>,
}

// ── Provenance ────────────────────────────────────────────────────────────────

/// Where a sub-report came from. Every variant carries the same
/// `SubReport` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportSource {
    /// Local pattern/statistics analyzer, no remote configured for this kind.
    Heuristic,
    /// Remote analyzer result.
    Remote { model: String },
    /// Remote analyzer failed; local heuristic result substituted.
    HeuristicFallback { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducedReport {
    pub source: ReportSource,
    #[serde(flatten)]
    pub report: SubReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerFailure {
    pub kind: AnalyzerKind,
    pub message: String,
}

// ── Aggregated report ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Analyzing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub document_hash: String,
    pub status: ReportStatus,
    pub reports: BTreeMap<AnalyzerKind, ProducedReport>,
    pub failures: Vec<AnalyzerFailure>,
    pub overall_score: f64,
    pub suggestions: Vec<Suggestion>,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisReport {
    /// Empty report in the `analyzing` state.
    pub fn new(document_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_hash: document_hash.into(),
            status: ReportStatus::Analyzing,
            reports: BTreeMap::new(),
            failures: Vec::new(),
            overall_score: 0.0,
            suggestions: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn record(&mut self, source: ReportSource, report: SubReport) {
        self.reports.insert(report.kind(), ProducedReport { source, report });
    }

    pub fn record_failure(&mut self, kind: AnalyzerKind, message: impl Into<String>) {
        self.failures.push(AnalyzerFailure { kind, message: message.into() });
    }

    pub fn get(&self, kind: AnalyzerKind) -> Option<&SubReport> {
        self.reports.get(&kind).map(|p| &p.report)
    }

    pub fn source(&self, kind: AnalyzerKind) -> Option<&ReportSource> {
        self.reports.get(&kind).map(|p| &p.source)
    }

    pub fn score(&self, kind: AnalyzerKind) -> Option<f64> {
        self.get(kind).map(|r| r.score)
    }

    pub fn sub_reports(&self) -> impl Iterator<Item = &SubReport> {
        self.reports.values().map(|p| &p.report)
    }

    /// Seal the report. Any analyzer crash marks it `failed`; the surviving
    /// sub-reports, score and suggestions are kept either way.
    pub fn finalize(&mut self, overall_score: f64, suggestions: Vec<Suggestion>) {
        self.overall_score = clamp_score(overall_score);
        self.suggestions = suggestions;
        self.status = if !self.failures.is_empty() {
            ReportStatus::Failed
        } else {
            ReportStatus::Completed
        };
        self.timestamp = Utc::now();
    }
}

// ── Pairwise comparison ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityVerdict {
    PossibleDuplicate,
    HighlySimilar,
    SameTopic,
    LowSimilarity,
}

impl SimilarityVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityVerdict::PossibleDuplicate => "possible duplicate",
            SimilarityVerdict::HighlySimilar     => "highly similar",
            SimilarityVerdict::SameTopic         => "same topic",
            SimilarityVerdict::LowSimilarity     => "low similarity",
        }
    }
}

impl fmt::Display for SimilarityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// 0–100
    pub similarity: f64,
    pub matched_segments: Vec<MatchedSegment>,
    pub verdict: SimilarityVerdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(score: f64) -> SubReport {
        SubReport::new(
            score,
            SubReportDetails::AcademicTone(ToneDetails {
                is_formal: true,
                first_person_usage: 0,
                contractions: 0,
                informal_language: 0,
            }),
        )
    }

    #[test]
    fn test_sub_report_score_is_clamped() {
        assert_eq!(tone(140.0).score, 100.0);
        assert_eq!(tone(-3.0).score, 0.0);
        assert_eq!(tone(f64::NAN).score, 0.0);
    }

    #[test]
    fn test_readability_grade_buckets() {
        assert_eq!(ReadabilityGrade::from_score(95.0), ReadabilityGrade::VeryEasy);
        assert_eq!(ReadabilityGrade::from_score(60.0), ReadabilityGrade::Standard);
        assert_eq!(ReadabilityGrade::from_score(30.0), ReadabilityGrade::Difficult);
        assert_eq!(ReadabilityGrade::from_score(29.9), ReadabilityGrade::VeryDifficult);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(SuggestionPriority::Critical < SuggestionPriority::High);
        assert!(SuggestionPriority::Medium < SuggestionPriority::Low);
    }

    #[test]
    fn test_analyzer_kind_parse_aliases() {
        assert_eq!("tone".parse::<AnalyzerKind>().unwrap(), AnalyzerKind::AcademicTone);
        assert_eq!("writing-quality".parse::<AnalyzerKind>().unwrap(), AnalyzerKind::WritingQuality);
        assert!("grammar".parse::<AnalyzerKind>().is_err());
    }

    #[test]
    fn test_report_lifecycle() {
        let mut report = AnalysisReport::new("abc");
        assert_eq!(report.status, ReportStatus::Analyzing);
        report.record(ReportSource::Heuristic, tone(80.0));
        report.finalize(80.0, Vec::new());
        assert_eq!(report.status, ReportStatus::Completed);
        assert_eq!(report.score(AnalyzerKind::AcademicTone), Some(80.0));
        assert_eq!(report.score(AnalyzerKind::Structure), None);
    }

    #[test]
    fn test_report_with_only_failures_is_failed() {
        let mut report = AnalysisReport::new("abc");
        report.record_failure(AnalyzerKind::Clarity, "boom");
        report.finalize(0.0, Vec::new());
        assert_eq!(report.status, ReportStatus::Failed);
    }

    #[test]
    fn test_one_crash_fails_but_keeps_other_results() {
        let mut report = AnalysisReport::new("abc");
        report.record(ReportSource::Heuristic, tone(75.0));
        report.record_failure(AnalyzerKind::Clarity, "boom");
        report.finalize(75.0, Vec::new());
        assert_eq!(report.status, ReportStatus::Failed);
        assert_eq!(report.overall_score, 75.0);
        assert_eq!(report.score(AnalyzerKind::AcademicTone), Some(75.0));
    }

    #[test]
    fn test_report_serializes_kind_keys() {
        let mut report = AnalysisReport::new("abc");
        report.record(ReportSource::Heuristic, tone(90.0));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["reports"]["academic_tone"]["score"], 90.0);
        assert_eq!(json["reports"]["academic_tone"]["source"]["type"], "heuristic");
        assert_eq!(json["reports"]["academic_tone"]["details"]["kind"], "academic_tone");
    }
}
