//! Citation consistency: in-text markers against reference-list entries.
//!
//! Counting is approximate. Any parenthetical that ends in a year is taken
//! as an author-year citation, so dated asides are over-counted, and a
//! multi-source parenthetical counts once.

use std::sync::OnceLock;

use regex::Regex;

use draftlens_common::config::CitationConfig;
use draftlens_common::report::CitationDetails;
use draftlens_common::{AnalyzerKind, Document, Result, SectionType, Severity, SubReport, SubReportDetails};

use super::{AnalysisInput, Analyzer};

/// "(Smith, 2020)", "(Nelson and Schunn, 2009b)", "(Lee et al. 2019)".
fn author_year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\([A-Za-z][^()]*?,?\s+\d{4}[a-z]?\)").unwrap())
}

/// "[3]", "[1, 4]", "[2-5]", "[2–5]".
fn numeric_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\d+(?:\s*[,\-–]\s*\d+)*\]").unwrap())
}

/// Number of in-text citation markers.
pub fn count_in_text_citations(text: &str) -> usize {
    author_year_regex().find_iter(text).count() + numeric_regex().find_iter(text).count()
}

/// Number of reference-list entries: lines longer than `min_chars`
/// characters inside the references section(s).
pub fn count_reference_entries(document: &Document, min_chars: usize) -> usize {
    document
        .sections_of(SectionType::References)
        .flat_map(|s| s.content.lines())
        .filter(|line| line.trim().chars().count() > min_chars)
        .count()
}

pub struct CitationAnalyzer {
    config: CitationConfig,
}

impl CitationAnalyzer {
    pub fn new(config: CitationConfig) -> Self {
        Self { config }
    }

    /// `body_text` is the prose searched for markers; the reference list is
    /// excluded so its own dates are not counted.
    pub fn evaluate(&self, document: &Document, body_text: &str) -> SubReport {
        let in_text = count_in_text_citations(body_text);
        let references = count_reference_entries(document, self.config.min_reference_chars);
        let mismatch = in_text.abs_diff(references);

        let score = if mismatch == 0 {
            100.0
        } else {
            (100.0 - mismatch as f64 * self.config.penalty_per_mismatch).max(0.0)
        };

        let mut report = SubReport::new(
            score,
            SubReportDetails::Citations(CitationDetails {
                in_text_citations: in_text,
                reference_entries: references,
                mismatch,
            }),
        );

        if in_text == 0 {
            report.push_issue(Severity::Warning, "No in-text citations found");
            report.push_suggestion("Support claims with in-text citations to the literature");
            if references > 0 {
                report.push_suggestion("Cite every reference-list entry in the text");
            }
        } else if in_text > references {
            report.push_issue(
                Severity::Warning,
                format!("{in_text} in-text citations but only {references} reference entries"),
            );
            report.push_suggestion("Add the missing entries to the reference list");
        } else if references > in_text {
            report.push_issue(
                Severity::Warning,
                format!("{references} reference entries but only {in_text} in-text citations"),
            );
            report.push_suggestion("Cite every reference-list entry in the text or remove unused entries");
        }

        report
    }
}

impl Analyzer for CitationAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Citations
    }

    fn analyze(&self, input: &AnalysisInput) -> Result<SubReport> {
        Ok(self.evaluate(&input.document, &input.body_text))
    }
}
