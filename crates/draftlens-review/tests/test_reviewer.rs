//! End-to-end review pipeline: concurrency, remote fallback policy, crash
//! isolation and aggregation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use draftlens_common::config::RemoteTimeouts;
use draftlens_common::report::{
    OriginalityDetails, PlagiarismLevel, ReportSource, ReportStatus, SimilarityVerdict, StructureDetails,
    SuggestionPriority,
};
use draftlens_common::{
    AnalysisConfig, AnalyzerKind, DraftlensError, Result, SectionType, SubReport, SubReportDetails,
};
use draftlens_review::{AnalysisInput, Analyzer, RemoteAnalyzer, RemoteError, RemoteRequest, Reviewer};
use draftlens_test_utils::{complete_paper, paper_missing_sections, reference, ARCTIC_TERN};
use pretty_assertions::assert_eq;

// ── Mocks ────────────────────────────────────────────────────────────────────

struct FailingRemote;

#[async_trait]
impl RemoteAnalyzer for FailingRemote {
    fn model(&self) -> &str { "failing" }
    fn supports(&self, _kind: AnalyzerKind) -> bool { true }
    async fn analyze(&self, _request: RemoteRequest) -> std::result::Result<SubReport, RemoteError> {
        Err(RemoteError::Transport("connection refused".to_string()))
    }
}

struct SlowRemote;

#[async_trait]
impl RemoteAnalyzer for SlowRemote {
    fn model(&self) -> &str { "slow" }
    fn supports(&self, kind: AnalyzerKind) -> bool { kind == AnalyzerKind::Structure }
    async fn analyze(&self, request: RemoteRequest) -> std::result::Result<SubReport, RemoteError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(fixed_structure(request.kind, 1.0))
    }
}

/// Answers structure requests with a fixed score.
struct FixedRemote(f64);

#[async_trait]
impl RemoteAnalyzer for FixedRemote {
    fn model(&self) -> &str { "fixed-model" }
    fn supports(&self, kind: AnalyzerKind) -> bool { kind == AnalyzerKind::Structure }
    async fn analyze(&self, request: RemoteRequest) -> std::result::Result<SubReport, RemoteError> {
        Ok(fixed_structure(request.kind, self.0))
    }
}

/// Returns a structure report whose score was never clamped.
struct UnboundedRemote(f64);

#[async_trait]
impl RemoteAnalyzer for UnboundedRemote {
    fn model(&self) -> &str { "unbounded" }
    fn supports(&self, kind: AnalyzerKind) -> bool { kind == AnalyzerKind::Structure }
    async fn analyze(&self, _request: RemoteRequest) -> std::result::Result<SubReport, RemoteError> {
        let mut report = fixed_structure(AnalyzerKind::Structure, 50.0);
        report.score = self.0;
        Ok(report)
    }
}

/// Answers with a structure report whatever kind is asked.
struct WrongKindRemote;

#[async_trait]
impl RemoteAnalyzer for WrongKindRemote {
    fn model(&self) -> &str { "confused" }
    fn supports(&self, kind: AnalyzerKind) -> bool { kind == AnalyzerKind::AcademicTone }
    async fn analyze(&self, _request: RemoteRequest) -> std::result::Result<SubReport, RemoteError> {
        Ok(fixed_structure(AnalyzerKind::Structure, 10.0))
    }
}

fn fixed_structure(kind: AnalyzerKind, score: f64) -> SubReport {
    assert_eq!(kind, AnalyzerKind::Structure);
    SubReport::new(
        score,
        SubReportDetails::Structure(StructureDetails {
            has_all_sections: true,
            present_sections: SectionType::REQUIRED.to_vec(),
            missing_sections: Vec::new(),
        }),
    )
}

struct PanickingAnalyzer(AnalyzerKind);

impl Analyzer for PanickingAnalyzer {
    fn kind(&self) -> AnalyzerKind { self.0 }
    fn analyze(&self, _input: &AnalysisInput) -> Result<SubReport> {
        panic!("analyzer blew up")
    }
}

struct ErroringAnalyzer;

impl Analyzer for ErroringAnalyzer {
    fn kind(&self) -> AnalyzerKind { AnalyzerKind::Citations }
    fn analyze(&self, _input: &AnalysisInput) -> Result<SubReport> {
        Err(DraftlensError::Analyzer {
            kind: "citations".to_string(),
            message: "bad input".to_string(),
        })
    }
}

fn reviewer() -> Reviewer {
    Reviewer::new(AnalysisConfig::default()).unwrap()
}

fn originality(report: &SubReport) -> &OriginalityDetails {
    match &report.details {
        SubReportDetails::Originality(d) => d,
        other => panic!("unexpected details {other:?}"),
    }
}

// ── Pipeline ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_full_analysis_of_complete_paper() {
    let report = reviewer().analyze(&complete_paper(), &[], None).await.unwrap();

    assert_eq!(report.status, ReportStatus::Completed);
    assert_eq!(report.reports.len(), 7);
    assert!(report.failures.is_empty());
    assert!((0.0..=100.0).contains(&report.overall_score));
    assert_eq!(report.document_hash, complete_paper().content_hash());
    for kind in AnalyzerKind::ALL {
        assert_eq!(report.source(kind), Some(&ReportSource::Heuristic));
        let score = report.score(kind).unwrap();
        assert!((0.0..=100.0).contains(&score));
    }
    assert_eq!(report.score(AnalyzerKind::Structure), Some(100.0));
    assert_eq!(report.score(AnalyzerKind::Methodology), Some(100.0));

    let orig = originality(report.get(AnalyzerKind::Originality).unwrap());
    assert_eq!(orig.plagiarism_score, 0.0);
    assert_eq!(orig.level, PlagiarismLevel::Low);
}

#[tokio::test]
async fn test_structure_only_overall_equals_structure_score() {
    let report = reviewer()
        .analyze(&paper_missing_sections(), &[], Some(&[AnalyzerKind::Structure]))
        .await
        .unwrap();
    assert_eq!(report.reports.len(), 1);
    let structure = report.score(AnalyzerKind::Structure).unwrap();
    assert!((report.overall_score - structure).abs() < 1e-9);
}

#[tokio::test]
async fn test_empty_kind_list_rejected() {
    let err = reviewer().analyze(&complete_paper(), &[], Some(&[])).await.unwrap_err();
    assert!(matches!(err, DraftlensError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_copied_paper_is_flagged() {
    let paper = complete_paper();
    let corpus = vec![
        reference("unrelated", "Quantum chromodynamics describes the strong interaction between quarks."),
        reference("copy", &paper.full_text()),
    ];
    let report = reviewer()
        .analyze(&paper, &corpus, Some(&[AnalyzerKind::Originality, AnalyzerKind::Structure]))
        .await
        .unwrap();

    let orig = originality(report.get(AnalyzerKind::Originality).unwrap());
    assert_eq!(orig.matches[0].source_id, "copy");
    assert!(orig.matches[0].matched_segments.len() <= 3);
    assert!(orig.plagiarism_score > 50.0);
    assert_eq!(orig.level, PlagiarismLevel::VeryHigh);

    assert_eq!(report.suggestions[0].priority, SuggestionPriority::Critical);
    assert_eq!(report.suggestions[0].category, AnalyzerKind::Originality);
}

#[tokio::test]
async fn test_unrelated_corpus_leaves_originality_intact() {
    let corpus = vec![reference("tern", ARCTIC_TERN)];
    let report = reviewer()
        .analyze(&complete_paper(), &corpus, Some(&[AnalyzerKind::Originality]))
        .await
        .unwrap();

    let orig = originality(report.get(AnalyzerKind::Originality).unwrap());
    assert!(orig.matches.is_empty());
    assert_eq!(orig.plagiarism_score, 0.0);
    assert_eq!(orig.level, PlagiarismLevel::Low);
    assert_eq!(report.score(AnalyzerKind::Originality), Some(100.0));
}

#[tokio::test]
async fn test_analysis_is_deterministic() {
    let paper = paper_missing_sections();
    let a = reviewer().analyze(&paper, &[], None).await.unwrap();
    let b = reviewer().analyze(&paper, &[], None).await.unwrap();
    assert_eq!(a.overall_score, b.overall_score);
    assert_eq!(a.suggestions, b.suggestions);
    assert_ne!(a.id, b.id);
}

// ── Remote fallback ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_failing_remote_falls_back_to_heuristic() {
    let reviewer = reviewer().with_remote(Arc::new(FailingRemote));
    let report = reviewer
        .analyze(&complete_paper(), &[], Some(&[AnalyzerKind::Structure, AnalyzerKind::Clarity]))
        .await
        .unwrap();

    assert_eq!(report.status, ReportStatus::Completed);
    for kind in [AnalyzerKind::Structure, AnalyzerKind::Clarity] {
        match report.source(kind) {
            Some(ReportSource::HeuristicFallback { reason }) => assert!(reason.contains("connection refused")),
            other => panic!("unexpected source {other:?}"),
        }
    }
    assert_eq!(report.score(AnalyzerKind::Structure), Some(100.0));
}

#[tokio::test]
async fn test_slow_remote_times_out() {
    let mut config = AnalysisConfig::default();
    config.remote.timeouts = RemoteTimeouts::uniform(20);
    let reviewer = Reviewer::new(config).unwrap().with_remote(Arc::new(SlowRemote));

    let report = reviewer
        .analyze(&complete_paper(), &[], Some(&[AnalyzerKind::Structure]))
        .await
        .unwrap();
    match report.source(AnalyzerKind::Structure) {
        Some(ReportSource::HeuristicFallback { reason }) => assert!(reason.contains("timed out")),
        other => panic!("unexpected source {other:?}"),
    }
    assert_eq!(report.score(AnalyzerKind::Structure), Some(100.0));
}

#[tokio::test]
async fn test_remote_result_is_used_and_tagged() {
    let reviewer = reviewer().with_remote(Arc::new(FixedRemote(42.0)));
    let report = reviewer
        .analyze(&complete_paper(), &[], Some(&[AnalyzerKind::Structure, AnalyzerKind::AcademicTone]))
        .await
        .unwrap();

    assert_eq!(
        report.source(AnalyzerKind::Structure),
        Some(&ReportSource::Remote { model: "fixed-model".to_string() })
    );
    assert_eq!(report.score(AnalyzerKind::Structure), Some(42.0));
    // unsupported kinds stay local
    assert_eq!(report.source(AnalyzerKind::AcademicTone), Some(&ReportSource::Heuristic));
}

#[tokio::test]
async fn test_out_of_range_remote_score_is_clamped() {
    for (raw, expected) in [(150.0, 100.0), (-20.0, 0.0)] {
        let report = reviewer()
            .with_remote(Arc::new(UnboundedRemote(raw)))
            .analyze(&complete_paper(), &[], Some(&[AnalyzerKind::Structure]))
            .await
            .unwrap();
        assert_eq!(
            report.source(AnalyzerKind::Structure),
            Some(&ReportSource::Remote { model: "unbounded".to_string() })
        );
        assert_eq!(report.score(AnalyzerKind::Structure), Some(expected));
        assert!((0.0..=100.0).contains(&report.overall_score));
    }
}

#[tokio::test]
async fn test_non_finite_remote_score_falls_back() {
    let reviewer = reviewer().with_remote(Arc::new(UnboundedRemote(f64::NAN)));
    let report = reviewer
        .analyze(&complete_paper(), &[], Some(&[AnalyzerKind::Structure]))
        .await
        .unwrap();
    match report.source(AnalyzerKind::Structure) {
        Some(ReportSource::HeuristicFallback { reason }) => assert!(reason.contains("non-finite")),
        other => panic!("unexpected source {other:?}"),
    }
    assert_eq!(report.score(AnalyzerKind::Structure), Some(100.0));
}

#[tokio::test]
async fn test_wrong_kind_from_remote_is_malformed() {
    let reviewer = reviewer().with_remote(Arc::new(WrongKindRemote));
    let report = reviewer
        .analyze(&complete_paper(), &[], Some(&[AnalyzerKind::AcademicTone]))
        .await
        .unwrap();
    match report.source(AnalyzerKind::AcademicTone) {
        Some(ReportSource::HeuristicFallback { reason }) => assert!(reason.contains("malformed")),
        other => panic!("unexpected source {other:?}"),
    }
}

// ── Crash isolation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_panicking_analyzer_is_isolated() {
    let reviewer = reviewer()
        .with_analyzer(Arc::new(PanickingAnalyzer(AnalyzerKind::Clarity)))
        .with_analyzer(Arc::new(ErroringAnalyzer));
    let report = reviewer
        .analyze(
            &complete_paper(),
            &[],
            Some(&[AnalyzerKind::Structure, AnalyzerKind::Clarity, AnalyzerKind::Citations]),
        )
        .await
        .unwrap();

    assert_eq!(report.status, ReportStatus::Failed);
    assert_eq!(report.reports.len(), 1);
    let failed: Vec<AnalyzerKind> = report.failures.iter().map(|f| f.kind).collect();
    assert_eq!(failed, vec![AnalyzerKind::Clarity, AnalyzerKind::Citations]);
    assert!(report.failures[0].message.contains("analyzer blew up"));
    assert!(report.failures[1].message.contains("bad input"));
    // only structure contributes
    assert_eq!(report.overall_score, 100.0);
}

#[tokio::test]
async fn test_fallback_alone_does_not_fail_the_report() {
    let reviewer = reviewer().with_remote(Arc::new(FailingRemote));
    let report = reviewer
        .analyze(&complete_paper(), &[], Some(&[AnalyzerKind::Structure]))
        .await
        .unwrap();
    assert_eq!(report.status, ReportStatus::Completed);
    assert!(report.failures.is_empty());
    assert!(matches!(
        report.source(AnalyzerKind::Structure),
        Some(ReportSource::HeuristicFallback { .. })
    ));
}

#[tokio::test]
async fn test_all_analyzers_crashing_fails_the_report() {
    let reviewer = reviewer().with_analyzer(Arc::new(PanickingAnalyzer(AnalyzerKind::Structure)));
    let report = reviewer
        .analyze(&complete_paper(), &[], Some(&[AnalyzerKind::Structure]))
        .await
        .unwrap();
    assert_eq!(report.status, ReportStatus::Failed);
    assert_eq!(report.overall_score, 0.0);
}

// ── Comparison ───────────────────────────────────────────────────────────────

#[test]
fn test_identical_documents_compare_as_duplicates() {
    let paper = complete_paper();
    let comparison = reviewer().compare(&paper, &paper);
    assert!((comparison.similarity - 100.0).abs() < 1e-9);
    assert_eq!(comparison.verdict, SimilarityVerdict::PossibleDuplicate);
    assert!(!comparison.matched_segments.is_empty());
    assert!(comparison.matched_segments.len() <= 10);
}

#[test]
fn test_unrelated_documents_compare_low() {
    let a = complete_paper();
    let b = draftlens_common::Document::new("Quarks").with_abstract("Zzz qqq xxx vvv.");
    let comparison = reviewer().compare(&a, &b);
    assert_eq!(comparison.verdict, SimilarityVerdict::LowSimilarity);
    assert!(comparison.matched_segments.is_empty());
}

#[test]
fn test_paper_and_unrelated_prose_compare_low() {
    let tern = draftlens_common::Document::new("Migration of the Arctic Tern").with_abstract(ARCTIC_TERN);
    let comparison = reviewer().compare(&complete_paper(), &tern);
    assert!(comparison.similarity < 5.0, "similarity {}", comparison.similarity);
    assert_eq!(comparison.verdict, SimilarityVerdict::LowSimilarity);
    assert!(comparison.matched_segments.is_empty());
}
