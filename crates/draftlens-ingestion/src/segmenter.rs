//! Sentence and section segmentation of raw extracted text.
//!
//! Header detection works line by line: a line is a header when it is short
//! enough and `SectionType::from_heading` recognises it. Everything between
//! two headers is the first header's content.

use std::sync::OnceLock;

use regex::Regex;

use draftlens_common::config::SegmentationConfig;
use draftlens_common::{Document, Section, SectionType};

/// A sentence with byte offsets into the text it was split from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Sentence {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

fn sentence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // A run of non-terminators plus its terminators; the final run may be
    // unterminated.
    RE.get_or_init(|| Regex::new(r"[^.!?]+[.!?]*").unwrap())
}

/// Split text into sentences. Sentences shorter than `min_chars` characters
/// (after trimming) are discarded.
pub fn split_sentences(text: &str, min_chars: usize) -> Vec<Sentence> {
    sentence_regex()
        .find_iter(text)
        .filter_map(|m| {
            let raw = m.as_str();
            let trimmed = raw.trim();
            if trimmed.chars().count() < min_chars {
                return None;
            }
            let start = m.start() + (raw.len() - raw.trim_start().len());
            Some(Sentence {
                text: trimmed.to_string(),
                start,
                end: start + trimmed.len(),
            })
        })
        .collect()
}

/// Recognise a header line. Lines at or above the length limit never are.
fn detect_header(line: &str, max_chars: usize) -> Option<SectionType> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.chars().count() >= max_chars {
        return None;
    }
    SectionType::from_heading(trimmed)
}

/// Split raw text into typed sections.
///
/// A header with no content before the next header is dropped. Text before
/// the first header becomes an `other` section when non-empty.
pub fn segment(raw: &str, config: &SegmentationConfig) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<(SectionType, String)> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for line in raw.lines() {
        match detect_header(line, config.max_header_chars) {
            Some(ty) => {
                flush(&mut sections, current.take(), &buffer);
                buffer.clear();
                current = Some((ty, line.trim().to_string()));
            }
            None => buffer.push(line),
        }
    }
    flush(&mut sections, current, &buffer);

    tracing::debug!(sections = sections.len(), "segmented raw text");
    sections
}

fn flush(sections: &mut Vec<Section>, header: Option<(SectionType, String)>, lines: &[&str]) {
    let content = lines.join("\n").trim().to_string();
    if content.is_empty() {
        return;
    }
    let section = match header {
        Some((ty, heading)) => Section::new(ty, content).with_heading(heading),
        None                => Section::new(SectionType::Other, content),
    };
    sections.push(section);
}

/// Build a `Document` from a title and raw extracted text. The first
/// abstract section, if any, moves into the document's abstract field.
pub fn parse_document(title: &str, raw: &str, config: &SegmentationConfig) -> Document {
    let mut sections = segment(raw, config);
    let abstract_text = sections
        .iter()
        .position(|s| s.section_type == SectionType::Abstract)
        .map(|idx| sections.remove(idx).content)
        .unwrap_or_default();

    Document {
        title: title.trim().to_string(),
        abstract_text,
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cfg() -> SegmentationConfig {
        SegmentationConfig::default()
    }

    #[test]
    fn test_split_sentences_offsets() {
        let text = "First sentence here. Second one is here!  Third?";
        let sentences = split_sentences(text, 1);
        assert_eq!(sentences.len(), 3);
        for s in &sentences {
            assert_eq!(&text[s.start..s.end], s.text);
        }
        assert_eq!(sentences[1].text, "Second one is here!");
    }

    #[test]
    fn test_short_sentences_discarded() {
        let sentences = split_sentences("Ok. This sentence is long enough.", 10);
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].text, "This sentence is long enough.");
    }

    #[test]
    fn test_trailing_unterminated_run_is_a_sentence() {
        let sentences = split_sentences("A finished sentence. And an unfinished tail", 10);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1].text, "And an unfinished tail");
    }

    #[test]
    fn test_empty_input() {
        assert!(split_sentences("", 10).is_empty());
        assert!(segment("", &cfg()).is_empty());
    }

    #[test]
    fn test_segment_detects_headers() {
        let raw = "1. Introduction\nWe introduce the problem.\n\n2. Methods\nWe ran a survey.\nReferences\nSmith, J. (2020). Something long enough.";
        let sections = segment(raw, &cfg());
        let types: Vec<SectionType> = sections.iter().map(|s| s.section_type).collect();
        assert_eq!(
            types,
            vec![SectionType::Introduction, SectionType::Methodology, SectionType::References]
        );
        assert_eq!(sections[0].heading.as_deref(), Some("1. Introduction"));
        assert_eq!(sections[1].content, "We ran a survey.");
    }

    #[test]
    fn test_empty_header_is_dropped() {
        let raw = "Introduction\nResults\nThe model converged quickly.";
        let sections = segment(raw, &cfg());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].section_type, SectionType::Results);
    }

    #[test]
    fn test_preamble_becomes_other() {
        let raw = "A Study of Things\nJane Doe\nIntroduction\nThings matter.";
        let sections = segment(raw, &cfg());
        assert_eq!(sections[0].section_type, SectionType::Other);
        assert_eq!(sections[0].content, "A Study of Things\nJane Doe");
        assert_eq!(sections[1].section_type, SectionType::Introduction);
    }

    #[test]
    fn test_long_line_is_not_header() {
        let long = format!("Results {}", "x".repeat(120));
        let sections = segment(&format!("Introduction\nText here.\n{long}"), &cfg());
        assert_eq!(sections.len(), 1);
        assert!(sections[0].content.contains(&long));
    }

    #[test]
    fn test_parse_document_moves_abstract() {
        let doc = parse_document(
            " Title ",
            "Abstract\nWe summarise.\nIntroduction\nWe introduce.",
            &cfg(),
        );
        assert_eq!(doc.title, "Title");
        assert_eq!(doc.abstract_text, "We summarise.");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].section_type, SectionType::Introduction);
    }
}
