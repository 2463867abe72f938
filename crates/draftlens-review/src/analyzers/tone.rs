//! Academic tone: first-person pronouns, contractions and informal phrasing.

use std::sync::OnceLock;

use regex::Regex;

use draftlens_common::config::ToneConfig;
use draftlens_common::report::ToneDetails;
use draftlens_common::{AnalyzerKind, Result, Severity, SubReport, SubReportDetails};

use super::{AnalysisInput, Analyzer};

fn first_person_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // case-sensitive "I" and "us": "the US" is not a pronoun
        Regex::new(r"\bI\b|\b[Uu]s\b|(?i:\b(me|my|mine|myself|we|our|ours|ourselves)\b)").unwrap()
    })
}

/// Latin abbreviations whose letters read as pronouns.
fn abbreviation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(i\.\s?e|e\.\s?g)\.").unwrap())
}

fn contraction_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(\w+n['’]t|(it|that|there|here|what|who|let)['’]s|i['’]m|\w+['’](re|ve|ll|d))\b",
        )
        .unwrap()
    })
}

fn informal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(a lot|lots of|kind of|sort of|pretty much|really|basically|stuff|things like|gonna|wanna|gotta|awesome|cool|totally|okay|anyway|i guess|huge)\b",
        )
        .unwrap()
    })
}

pub struct ToneAnalyzer {
    config: ToneConfig,
}

impl ToneAnalyzer {
    pub fn new(config: ToneConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(&self, text: &str) -> SubReport {
        let unabbreviated = abbreviation_regex().replace_all(text, " ");
        let first_person = first_person_regex().find_iter(&unabbreviated).count();
        let contractions = contraction_regex().find_iter(text).count();
        let informal = informal_regex().find_iter(text).count();

        let mut issues = Vec::new();
        let mut suggestions = Vec::new();

        if first_person > self.config.first_person_limit {
            issues.push((
                Severity::Warning,
                format!("First-person pronouns used {first_person} times"),
            ));
            suggestions.push(
                "Reduce first-person pronouns; prefer impersonal constructions such as \"this study\"".to_string(),
            );
        }
        if contractions > self.config.contraction_limit {
            issues.push((
                Severity::Error,
                format!("Found {contractions} contraction(s)"),
            ));
            suggestions.push("Replace contractions with their full forms (do not, cannot, will not)".to_string());
        }
        if informal > self.config.informal_limit {
            issues.push((
                Severity::Warning,
                format!("Informal phrasing used {informal} times"),
            ));
            suggestions.push(
                "Replace colloquial phrases such as \"a lot of\" with formal alternatives like \"numerous\"".to_string(),
            );
        }

        let score = (100.0 - issues.len() as f64 * self.config.penalty_per_issue).max(0.0);
        let mut report = SubReport::new(
            score,
            SubReportDetails::AcademicTone(ToneDetails {
                is_formal: score > self.config.formal_above,
                first_person_usage: first_person,
                contractions,
                informal_language: informal,
            }),
        );
        for (severity, message) in issues {
            report.push_issue(severity, message);
        }
        for s in suggestions {
            report.push_suggestion(s);
        }
        report
    }
}

impl Analyzer for ToneAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::AcademicTone
    }

    fn analyze(&self, input: &AnalysisInput) -> Result<SubReport> {
        Ok(self.evaluate(&input.body_text))
    }
}
