//! Writing quality: passive voice, very long sentences, wordy phrases and
//! accidentally repeated words.

use std::sync::OnceLock;

use regex::Regex;

use draftlens_common::config::WritingConfig;
use draftlens_common::report::WritingQualityDetails;
use draftlens_common::{AnalyzerKind, Result, Severity, SubReport, SubReportDetails};
use draftlens_ingestion::split_sentences;

use super::{round2, AnalysisInput, Analyzer};

fn passive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(am|is|are|was|were|be|been|being)\s+(\w+ly\s+)?\w+(ed|en)\b").unwrap()
    })
}

fn wordy_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(in order to|due to the fact that|at this point in time|it is important to note that|in spite of the fact that|for the purpose of|in the event that|has the ability to|a large number of|with regard to|in terms of|the fact that)\b",
        )
        .unwrap()
    })
}

/// Adjacent duplicate words ("the the"), compared case-insensitively with
/// surrounding punctuation ignored.
fn count_repeated_words(text: &str) -> usize {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .collect();
    words
        .windows(2)
        .filter(|pair| !pair[0].is_empty() && pair[0] == pair[1])
        .count()
}

pub struct WritingQualityAnalyzer {
    config: WritingConfig,
    min_sentence_chars: usize,
}

impl WritingQualityAnalyzer {
    pub fn new(config: WritingConfig, min_sentence_chars: usize) -> Self {
        Self { config, min_sentence_chars }
    }

    pub fn evaluate(&self, text: &str) -> SubReport {
        let sentences = split_sentences(text, self.min_sentence_chars);
        let sentence_count = sentences.len();

        if sentence_count == 0 {
            let mut report = SubReport::new(
                0.0,
                SubReportDetails::WritingQuality(WritingQualityDetails {
                    sentence_count: 0,
                    passive_voice_ratio: 0.0,
                    long_sentence_ratio: 0.0,
                    wordy_phrases: 0,
                    repeated_words: 0,
                }),
            );
            report.push_issue(Severity::Error, "Text too short to assess writing quality");
            return report;
        }

        let passive = sentences.iter().filter(|s| passive_regex().is_match(&s.text)).count();
        let long = sentences
            .iter()
            .filter(|s| s.word_count() > self.config.long_sentence_words)
            .count();
        let passive_ratio = passive as f64 / sentence_count as f64;
        let long_ratio = long as f64 / sentence_count as f64;
        let wordy = wordy_regex().find_iter(text).count();
        let repeated = count_repeated_words(text);

        let mut issues: Vec<(Severity, String, &str)> = Vec::new();
        if passive_ratio > self.config.passive_ratio_limit {
            issues.push((
                Severity::Warning,
                format!("{:.0}% of sentences use the passive voice", passive_ratio * 100.0),
                "Prefer the active voice where the actor matters",
            ));
        }
        if long_ratio > self.config.long_sentence_ratio_limit {
            issues.push((
                Severity::Warning,
                format!(
                    "{:.0}% of sentences exceed {} words",
                    long_ratio * 100.0,
                    self.config.long_sentence_words
                ),
                "Split very long sentences into two or more shorter ones",
            ));
        }
        if wordy > self.config.wordy_phrase_limit {
            issues.push((
                Severity::Info,
                format!("{wordy} wordy phrases such as \"in order to\" or \"due to the fact that\""),
                "Tighten wordy phrases (\"in order to\" becomes \"to\", \"due to the fact that\" becomes \"because\")",
            ));
        }
        if repeated > 0 {
            issues.push((
                Severity::Error,
                format!("{repeated} accidentally repeated word(s)"),
                "Proofread for repeated words such as \"the the\"",
            ));
        }

        let score = (100.0 - issues.len() as f64 * self.config.penalty_per_issue).max(0.0);
        let mut report = SubReport::new(
            score,
            SubReportDetails::WritingQuality(WritingQualityDetails {
                sentence_count,
                passive_voice_ratio: round2(passive_ratio),
                long_sentence_ratio: round2(long_ratio),
                wordy_phrases: wordy,
                repeated_words: repeated,
            }),
        );
        for (severity, message, suggestion) in issues {
            report.push_issue(severity, message);
            report.push_suggestion(suggestion);
        }
        report
    }
}

impl Analyzer for WritingQualityAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::WritingQuality
    }

    fn analyze(&self, input: &AnalysisInput) -> Result<SubReport> {
        Ok(self.evaluate(&input.body_text))
    }
}
