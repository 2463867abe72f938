//! Originality: corpus matches folded into a plagiarism score and level.
//!
//! plagiarism = min(mean match similarity + min(matches × 2, 20), 100)
//! originality sub-report score = 100 − plagiarism

use draftlens_common::config::OriginalityConfig;
use draftlens_common::report::{Match, OriginalityDetails, PlagiarismLevel};
use draftlens_common::{AnalyzerKind, Result, Severity, SubReport, SubReportDetails};
use draftlens_ingestion::CorpusMatcher;

use super::{round2, AnalysisInput, Analyzer};

/// Plagiarism score (0–100) for a set of matches. No matches scores 0.
pub fn plagiarism_score(matches: &[Match], config: &OriginalityConfig) -> f64 {
    if matches.is_empty() {
        return 0.0;
    }
    let avg = matches.iter().map(|m| m.similarity).sum::<f64>() / matches.len() as f64;
    let bonus = (matches.len() as f64 * config.penalty_per_match).min(config.penalty_cap);
    (avg + bonus).min(100.0)
}

pub fn plagiarism_level(score: f64, config: &OriginalityConfig) -> PlagiarismLevel {
    match score {
        s if s < config.moderate_from  => PlagiarismLevel::Low,
        s if s < config.high_from      => PlagiarismLevel::Moderate,
        s if s < config.very_high_from => PlagiarismLevel::High,
        _                              => PlagiarismLevel::VeryHigh,
    }
}

pub struct OriginalityAnalyzer {
    matcher: CorpusMatcher,
    config: OriginalityConfig,
}

impl OriginalityAnalyzer {
    pub fn new(matcher: CorpusMatcher, config: OriginalityConfig) -> Self {
        Self { matcher, config }
    }

    /// Build the sub-report from already computed matches.
    pub fn from_matches(&self, matches: Vec<Match>) -> SubReport {
        let plagiarism = plagiarism_score(&matches, &self.config);
        let level = plagiarism_level(plagiarism, &self.config);

        let severity = match level {
            PlagiarismLevel::Low      => None,
            PlagiarismLevel::Moderate => Some(Severity::Warning),
            PlagiarismLevel::High     => Some(Severity::Error),
            PlagiarismLevel::VeryHigh => Some(Severity::Critical),
        };
        let suggestions: Vec<String> = matches
            .iter()
            .map(|m| format!("Paraphrase or cite the passages matching \"{}\" ({:.0}% similar)", m.title, m.similarity))
            .collect();

        let mut report = SubReport::new(
            100.0 - plagiarism,
            SubReportDetails::Originality(OriginalityDetails {
                plagiarism_score: round2(plagiarism),
                level,
                message: level.message().to_string(),
                matches,
            }),
        );
        if let Some(severity) = severity {
            report.push_issue(severity, format!("Plagiarism score {plagiarism:.1}: {}", level.message()));
        }
        for s in suggestions {
            report.push_suggestion(s);
        }
        report
    }
}

impl Analyzer for OriginalityAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Originality
    }

    fn analyze(&self, input: &AnalysisInput) -> Result<SubReport> {
        let matches = self.matcher.find_matches(&input.document.full_text(), &input.corpus);
        tracing::debug!(
            references = input.corpus.len(),
            matches = matches.len(),
            "originality matching complete"
        );
        Ok(self.from_matches(matches))
    }
}
