//! Report-level improvement suggestions derived from sub-report scores.

use draftlens_common::config::SuggestionThresholds;
use draftlens_common::report::{Suggestion, SuggestionPriority};
use draftlens_common::{AnalysisReport, AnalyzerKind, SubReport, SubReportDetails};

/// Build the priority-sorted suggestion list. Within one priority the
/// order is fixed: originality, structure, methodology, writing quality,
/// academic tone, clarity, citations.
pub fn build_suggestions(report: &AnalysisReport, thresholds: &SuggestionThresholds) -> Vec<Suggestion> {
    let mut out = Vec::new();

    if let Some(r) = report.get(AnalyzerKind::Originality) {
        if let SubReportDetails::Originality(d) = &r.details {
            // details carry a rounded copy; the score does not
            let plagiarism = 100.0 - r.score;
            if plagiarism > thresholds.plagiarism_critical_above {
                out.push(suggestion(
                    SuggestionPriority::Critical,
                    r,
                    "Reduce similarity with existing work",
                    format!(
                        "Plagiarism score is {:.1}% ({}). {}",
                        plagiarism,
                        d.level.as_str(),
                        d.message
                    ),
                ));
            }
        }
    }

    let below = |kind: AnalyzerKind, limit: f64| report.get(kind).filter(|r| r.score < limit);

    if let Some(r) = below(AnalyzerKind::Structure, thresholds.structure_below) {
        out.push(suggestion(
            SuggestionPriority::High,
            r,
            "Complete the paper structure",
            format!("Structure score is {:.0}/100; required sections are missing.", r.score),
        ));
    }
    if let Some(r) = below(AnalyzerKind::Methodology, thresholds.methodology_below) {
        out.push(suggestion(
            SuggestionPriority::High,
            r,
            "Strengthen the methodology",
            format!("Methodology score is {:.0}/100; key methodological elements are not described.", r.score),
        ));
    }
    if let Some(r) = below(AnalyzerKind::WritingQuality, thresholds.writing_quality_below) {
        out.push(suggestion(
            SuggestionPriority::Medium,
            r,
            "Improve writing quality",
            format!("Writing quality score is {:.0}/100.", r.score),
        ));
    }
    if let Some(r) = below(AnalyzerKind::AcademicTone, thresholds.academic_tone_below) {
        out.push(suggestion(
            SuggestionPriority::Medium,
            r,
            "Use a more formal academic tone",
            format!("Academic tone score is {:.0}/100.", r.score),
        ));
    }
    if let Some(r) = below(AnalyzerKind::Clarity, thresholds.clarity_below) {
        out.push(suggestion(
            SuggestionPriority::Low,
            r,
            "Improve readability",
            format!("Readability score is {:.0}/100.", r.score),
        ));
    }
    if let Some(r) = below(AnalyzerKind::Citations, thresholds.citations_below) {
        if let SubReportDetails::Citations(d) = &r.details {
            if d.mismatch > 0 {
                out.push(suggestion(
                    SuggestionPriority::Low,
                    r,
                    "Reconcile citations and references",
                    format!(
                        "{} in-text citations against {} reference entries.",
                        d.in_text_citations, d.reference_entries
                    ),
                ));
            }
        }
    }

    // Stable: ties keep the fixed order above.
    out.sort_by_key(|s| s.priority);
    out
}

fn suggestion(priority: SuggestionPriority, r: &SubReport, title: &str, description: String) -> Suggestion {
    Suggestion {
        priority,
        category: r.kind(),
        title: title.to_string(),
        description,
        actions: r.suggestions.clone(),
    }
}
