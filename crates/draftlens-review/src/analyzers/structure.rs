//! Required-section coverage.

use draftlens_common::report::StructureDetails;
use draftlens_common::{AnalyzerKind, Document, Result, SectionType, Severity, SubReport, SubReportDetails};

use super::{AnalysisInput, Analyzer};

pub struct StructureAnalyzer;

impl StructureAnalyzer {
    pub fn evaluate(document: &Document) -> SubReport {
        let (present, missing): (Vec<SectionType>, Vec<SectionType>) = SectionType::REQUIRED
            .into_iter()
            .partition(|ty| document.has_section(*ty));

        let required = SectionType::REQUIRED.len() as f64;
        let score = (required - missing.len() as f64) / required * 100.0;

        let mut report = SubReport::new(
            score,
            SubReportDetails::Structure(StructureDetails {
                has_all_sections: missing.is_empty(),
                present_sections: present,
                missing_sections: missing.clone(),
            }),
        );

        for ty in &missing {
            report.push_issue(Severity::Error, format!("Missing {} section", ty.display_name()));
            report.push_suggestion(section_advice(*ty));
        }

        if !in_canonical_order(document) {
            report.push_issue(
                Severity::Warning,
                "Sections appear out of the conventional order \
                 (abstract, introduction, methodology, results, discussion, conclusion, references)",
            );
        }

        report
    }
}

impl Analyzer for StructureAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Structure
    }

    fn analyze(&self, input: &AnalysisInput) -> Result<SubReport> {
        Ok(Self::evaluate(&input.document))
    }
}

fn section_advice(ty: SectionType) -> String {
    let what = match ty {
        SectionType::Abstract     => "summarising the problem, approach, key results and contribution",
        SectionType::Introduction => "motivating the problem and stating the research question",
        SectionType::Methodology  => "describing the research design, data collection and analysis",
        SectionType::Results      => "reporting the findings without interpretation",
        SectionType::Discussion   => "interpreting the findings and their limitations",
        SectionType::Conclusion   => "summarising the contribution and future work",
        SectionType::References   => "listing every cited source",
        _                         => "covering this part of the paper",
    };
    format!("Add a {} section {}", ty.display_name(), what)
}

/// Whether the present required sections appear in canonical order. The
/// abstract field always counts as coming first.
fn in_canonical_order(document: &Document) -> bool {
    let rank = |ty: SectionType| SectionType::REQUIRED.iter().position(|r| *r == ty);

    let mut last = if document.abstract_text.trim().is_empty() { None } else { rank(SectionType::Abstract) };
    for section in document.sections.iter().filter(|s| !s.is_empty()) {
        let Some(r) = rank(section.section_type) else { continue };
        if last.is_some_and(|l| r < l) {
            return false;
        }
        last = Some(r);
    }
    true
}
