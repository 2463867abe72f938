//! Methodology completeness: keyword families for the six elements a
//! methodology section is expected to describe.

use std::sync::OnceLock;

use regex::Regex;

use draftlens_common::report::{MethodologyDetails, MethodologyElement};
use draftlens_common::{AnalyzerKind, Document, Result, SectionType, Severity, SubReport, SubReportDetails};

use super::{AnalysisInput, Analyzer};

fn element_regex(element: MethodologyElement) -> &'static Regex {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    let all = RES.get_or_init(|| {
        MethodologyElement::ALL
            .iter()
            .map(|e| Regex::new(element_pattern(*e)).unwrap())
            .collect()
    });
    let idx = MethodologyElement::ALL
        .iter()
        .position(|e| *e == element)
        .unwrap_or_default();
    &all[idx]
}

fn element_pattern(element: MethodologyElement) -> &'static str {
    match element {
        MethodologyElement::ResearchDesign =>
            r"(?i)\b(research design|study design|experimental design|quasi-experiment\w*|qualitative|quantitative|mixed[- ]methods?|case stud(y|ies)|longitudinal|cross[- ]sectional|randomi[sz]ed)",
        MethodologyElement::DataCollection =>
            r"(?i)\b(data (were|was) (collected|gathered|obtained)|data collection|collected|survey\w*|questionnaires?|interviews?|datasets?|focus groups?|observations?)",
        MethodologyElement::SampleSize =>
            r"(?i)(\bsample size|\bsample of\b|\bn\s*=\s*\d+|\b\d+\s+(participants|respondents|subjects|patients|students|samples)|\bparticipants\b|\brespondents\b)",
        MethodologyElement::AnalysisMethods =>
            r"(?i)\b(statistical analysis|data analysis|analy[sz](is|ed|es)|regression|anova|t-tests?|chi-square|correlation|thematic|coding|spss|stata)",
        MethodologyElement::ValidityReliability =>
            r"(?i)\b(validity|valid|reliability|reliable|cronbach|triangulat\w*|inter-rater|pilot(ed)? (study|test))",
        MethodologyElement::EthicalConsiderations =>
            r"(?i)\b(ethic\w*|informed consent|institutional review board|irb|anonymi[sz]\w*|confidential\w*)",
    }
}

fn element_advice(element: MethodologyElement) -> &'static str {
    match element {
        MethodologyElement::ResearchDesign =>
            "State the overall research design (e.g. experimental, qualitative, mixed methods)",
        MethodologyElement::DataCollection =>
            "Describe how data were collected and with which instruments",
        MethodologyElement::SampleSize =>
            "Report the sample size and how participants were selected",
        MethodologyElement::AnalysisMethods =>
            "Specify the analysis techniques and tools used",
        MethodologyElement::ValidityReliability =>
            "Explain how validity and reliability were ensured",
        MethodologyElement::EthicalConsiderations =>
            "Include ethical approval details and informed consent procedures",
    }
}

pub struct MethodologyAnalyzer;

impl MethodologyAnalyzer {
    pub fn evaluate(document: &Document) -> SubReport {
        let Some(text) = document.section_text(SectionType::Methodology) else {
            let mut report = SubReport::new(
                0.0,
                SubReportDetails::Methodology(MethodologyDetails {
                    section_found: false,
                    completeness: "0/6 key elements".to_string(),
                    has_all_elements: false,
                    present_elements: Vec::new(),
                    missing_elements: MethodologyElement::ALL.to_vec(),
                }),
            );
            report.push_issue(Severity::Critical, "Methodology section not found");
            report.push_suggestion(
                "Add a methodology section describing the research design, data collection, sample, analysis, validity and ethics",
            );
            return report;
        };

        Self::evaluate_text(&text)
    }

    /// Score the text of a methodology section.
    pub fn evaluate_text(text: &str) -> SubReport {
        let (present, missing): (Vec<MethodologyElement>, Vec<MethodologyElement>) = MethodologyElement::ALL
            .into_iter()
            .partition(|e| element_regex(*e).is_match(text));

        let total = MethodologyElement::ALL.len();
        let score = present.len() as f64 / total as f64 * 100.0;

        let mut report = SubReport::new(
            score,
            SubReportDetails::Methodology(MethodologyDetails {
                section_found: true,
                completeness: format!("{}/{} key elements", present.len(), total),
                has_all_elements: missing.is_empty(),
                present_elements: present.clone(),
                missing_elements: missing.clone(),
            }),
        );

        if present.is_empty() {
            report.push_issue(
                Severity::Critical,
                "Methodology section does not describe any key methodological element",
            );
            report.push_suggestion(
                "Rewrite the methodology to cover research design, data collection, sample, analysis, validity and ethics",
            );
            return report;
        }

        for element in &missing {
            report.push_issue(
                Severity::Warning,
                format!("No mention of {}", element.display_name()),
            );
            report.push_suggestion(element_advice(*element));
        }
        report
    }
}

impl Analyzer for MethodologyAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Methodology
    }

    fn analyze(&self, input: &AnalysisInput) -> Result<SubReport> {
        Ok(Self::evaluate(&input.document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftlens_common::Section;
    use draftlens_test_utils::{complete_paper, paper_missing_sections};

    fn details(report: &SubReport) -> &MethodologyDetails {
        match &report.details {
            SubReportDetails::Methodology(d) => d,
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[test]
    fn test_complete_methodology() {
        let report = MethodologyAnalyzer::evaluate(&complete_paper());
        assert_eq!(report.score, 100.0);
        assert!(details(&report).has_all_elements);
        assert_eq!(details(&report).completeness, "6/6 key elements");
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_missing_section_is_single_critical() {
        let report = MethodologyAnalyzer::evaluate(&paper_missing_sections());
        assert_eq!(report.score, 0.0);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].severity, Severity::Critical);
        assert!(!details(&report).section_found);
    }

    #[test]
    fn test_no_keywords_is_single_critical() {
        let doc = Document::new("T").with_section(Section::new(
            SectionType::Methodology,
            "We thought about the problem for a long time and wrote things down.",
        ));
        let report = MethodologyAnalyzer::evaluate(&doc);
        assert_eq!(report.score, 0.0);
        assert!(!details(&report).has_all_elements);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_partial_elements_warn_per_missing() {
        let report = MethodologyAnalyzer::evaluate_text(
            "A qualitative case study design was used. Interviews were recorded with 12 participants.",
        );
        let d = details(&report);
        assert_eq!(
            d.present_elements,
            vec![
                MethodologyElement::ResearchDesign,
                MethodologyElement::DataCollection,
                MethodologyElement::SampleSize,
            ]
        );
        assert_eq!(report.score, 50.0);
        assert_eq!(report.issues.len(), 3);
        assert!(report.issues.iter().all(|i| i.severity == Severity::Warning));
    }
}
