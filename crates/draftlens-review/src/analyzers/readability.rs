//! Readability (clarity): sentence and word statistics over the body text.
//!
//! score = 206.835 − 1.015 × ASL − 84.6 × AWL, clamped to [0, 100], where
//! ASL is words per sentence and AWL non-whitespace characters per word.

use draftlens_common::config::ReadabilityConfig;
use draftlens_common::report::{ClarityDetails, ReadabilityGrade};
use draftlens_common::{AnalyzerKind, Result, Severity, SubReport, SubReportDetails};
use draftlens_ingestion::split_sentences;

use super::{round2, word_count, AnalysisInput, Analyzer};

pub struct ReadabilityAnalyzer {
    config: ReadabilityConfig,
    min_sentence_chars: usize,
}

impl ReadabilityAnalyzer {
    pub fn new(config: ReadabilityConfig, min_sentence_chars: usize) -> Self {
        Self { config, min_sentence_chars }
    }

    pub fn evaluate(&self, text: &str) -> SubReport {
        let sentence_count = split_sentences(text, self.min_sentence_chars).len();
        let words: Vec<&str> = text.split_whitespace().collect();
        let word_total = words.len();

        if sentence_count == 0 || word_total == 0 {
            let mut report = SubReport::new(
                0.0,
                SubReportDetails::Clarity(ClarityDetails {
                    readability_score: 0.0,
                    readability_grade: ReadabilityGrade::VeryDifficult,
                    avg_sentence_length: 0.0,
                    avg_word_length: 0.0,
                    complex_word_ratio: 0.0,
                    sentence_count,
                    word_count: word_total,
                }),
            );
            report.push_issue(Severity::Error, "Text too short to assess readability");
            report.push_suggestion("Provide the full body text of the paper");
            return report;
        }

        let chars: usize = words.iter().map(|w| w.chars().count()).sum();
        let asl = word_total as f64 / sentence_count as f64;
        let awl = chars as f64 / word_total as f64;
        let complex = words
            .iter()
            .filter(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric()).chars().count() > self.config.complex_word_chars
            })
            .count();
        let complex_ratio = complex as f64 / word_total as f64;

        let score = (206.835 - 1.015 * asl - 84.6 * awl).clamp(0.0, 100.0);
        let grade = ReadabilityGrade::from_score(score);

        let mut report = SubReport::new(
            score,
            SubReportDetails::Clarity(ClarityDetails {
                readability_score: round2(score),
                readability_grade: grade,
                avg_sentence_length: round2(asl),
                avg_word_length: round2(awl),
                complex_word_ratio: round2(complex_ratio),
                sentence_count,
                word_count: word_total,
            }),
        );

        if complex_ratio > self.config.complex_word_ratio_limit {
            report.push_issue(
                Severity::Warning,
                format!(
                    "{:.0}% of words are longer than {} characters",
                    complex_ratio * 100.0,
                    self.config.complex_word_chars
                ),
            );
            report.push_suggestion("Replace long technical words with simpler alternatives where possible");
        }

        if asl > self.config.long_average_sentence {
            report.push_issue(
                Severity::Warning,
                format!("Average sentence length is {asl:.1} words"),
            );
            report.push_suggestion("Break long sentences into shorter ones");
        }

        if score < 30.0 {
            report.push_suggestion("Simplify sentence structure and vocabulary to improve readability");
        }

        report
    }
}

impl Analyzer for ReadabilityAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Clarity
    }

    fn analyze(&self, input: &AnalysisInput) -> Result<SubReport> {
        let report = self.evaluate(&input.body_text);
        tracing::debug!(score = report.score, words = word_count(&input.body_text), "readability evaluated");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> ReadabilityAnalyzer {
        ReadabilityAnalyzer::new(ReadabilityConfig::default(), 10)
    }

    fn details(report: &SubReport) -> &ClarityDetails {
        match &report.details {
            SubReportDetails::Clarity(d) => d,
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let report = analyzer().evaluate("");
        assert_eq!(report.score, 0.0);
        assert_eq!(details(&report).sentence_count, 0);
        assert!(report.has_issue(Severity::Error));
    }

    #[test]
    fn test_statistics() {
        // 2 sentences, 8 words, 28 non-whitespace characters
        let text = "The cat sat down. The dog ran off.";
        let report = analyzer().evaluate(text);
        let d = details(&report);
        assert_eq!(d.sentence_count, 2);
        assert_eq!(d.word_count, 8);
        assert_eq!(d.avg_sentence_length, 4.0);
        assert_eq!(d.avg_word_length, 3.5);
        let expected = (206.835f64 - 1.015 * 4.0 - 84.6 * 3.5).clamp(0.0, 100.0);
        assert_eq!(report.score, expected);
        assert_eq!(d.readability_grade, ReadabilityGrade::from_score(expected));
    }

    #[test]
    fn test_complex_words_flagged() {
        let text = "Internationalization notwithstanding, characterization necessitates interdisciplinary collaboration.";
        let report = analyzer().evaluate(text);
        assert!(details(&report).complex_word_ratio > 0.2);
        assert!(report.has_issue(Severity::Warning));
    }

    #[test]
    fn test_long_average_sentence_warns() {
        let sentence = format!("{} end.", "word ".repeat(30));
        let report = analyzer().evaluate(&sentence);
        assert!(details(&report).avg_sentence_length > 25.0);
        assert!(report.issues.iter().any(|i| i.message.starts_with("Average sentence length")));
    }
}
