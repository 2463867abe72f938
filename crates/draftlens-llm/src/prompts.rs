//! Prompt builders, one per remotely analyzable kind. Every prompt asks for
//! a single JSON object whose shape matches the parsers in `analyzer.rs`.

use draftlens_common::AnalyzerKind;
use draftlens_review::{RemoteRequest, SectionMeta};

pub const SYSTEM_PROMPT: &str =
    "You are an experienced academic reviewer. You assess research paper drafts \
     and always answer with a single valid JSON object and nothing else.";

const ISSUE_SHAPE: &str =
    r#""issues": [{"severity": "critical|error|warning|info", "message": "..."}],
  "suggestions": ["..."]"#;

/// Sampling temperature per kind. Structure is the most mechanical check.
pub fn temperature(kind: AnalyzerKind) -> f32 {
    match kind {
        AnalyzerKind::Structure => 0.2,
        _                       => 0.3,
    }
}

pub fn max_tokens(kind: AnalyzerKind) -> u32 {
    match kind {
        AnalyzerKind::Methodology | AnalyzerKind::Clarity | AnalyzerKind::AcademicTone => 1500,
        _ => 2000,
    }
}

/// `None` for kinds without a remote prompt.
pub fn build_prompt(request: &RemoteRequest) -> Option<String> {
    let prompt = match request.kind {
        AnalyzerKind::Structure      => structure_prompt(&request.sections),
        AnalyzerKind::Methodology    => methodology_prompt(&request.text),
        AnalyzerKind::Clarity        => clarity_prompt(&request.text),
        AnalyzerKind::AcademicTone   => tone_prompt(&request.text),
        AnalyzerKind::WritingQuality => writing_prompt(&request.text),
        AnalyzerKind::Citations | AnalyzerKind::Originality => return None,
    };
    Some(prompt)
}

fn structure_prompt(sections: &[SectionMeta]) -> String {
    let listing = sections
        .iter()
        .map(|s| format!("- {}: {} characters", s.section_type.as_str(), s.length))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Evaluate the structure of an academic paper with these sections:

{listing}

A complete paper has abstract, introduction, methodology, results, discussion,
conclusion and references, in that order. Judge whether sections are missing,
out of order or disproportionately short.

Respond with ONLY a valid JSON object:
{{
  "score": <0-100>,
  "has_all_sections": <true|false>,
  "missing_sections": ["introduction", ...],
  "present_sections": ["abstract", ...],
  {ISSUE_SHAPE}
}}"#
    )
}

fn methodology_prompt(text: &str) -> String {
    format!(
        r#"Evaluate this methodology section of an academic paper:

{text}

Check for: research design, data collection, sample size, analysis methods,
validity and reliability, ethical considerations.

Respond with ONLY a valid JSON object:
{{
  "score": <0-100>,
  "has_all_elements": <true|false>,
  "missing_elements": ["research_design|data_collection|sample_size|analysis_methods|validity_reliability|ethical_considerations", ...],
  {ISSUE_SHAPE}
}}"#
    )
}

fn clarity_prompt(text: &str) -> String {
    format!(
        r#"Evaluate the clarity and readability of this academic text:

{text}

Consider sentence length, word complexity, jargon and how easily the argument
can be followed.

Respond with ONLY a valid JSON object:
{{
  "score": <0-100>,
  "avg_sentence_length": <average words per sentence>,
  "avg_word_length": <average characters per word>,
  "complex_word_ratio": <fraction of complex words, 0-1>,
  {ISSUE_SHAPE}
}}"#
    )
}

fn tone_prompt(text: &str) -> String {
    format!(
        r#"Evaluate the academic tone of this text:

{text}

Count first-person pronouns, contractions and informal or colloquial phrases.

Respond with ONLY a valid JSON object:
{{
  "score": <0-100>,
  "is_formal": <true|false>,
  "first_person_usage": <count>,
  "contractions": <count>,
  "informal_language": <count>,
  {ISSUE_SHAPE}
}}"#
    )
}

fn writing_prompt(text: &str) -> String {
    format!(
        r#"Evaluate the writing quality of this academic text:

{text}

Look for passive voice overuse, overly long sentences, wordy phrases and
accidentally repeated words.

Respond with ONLY a valid JSON object:
{{
  "score": <0-100>,
  "passive_voice_ratio": <fraction of sentences in passive voice, 0-1>,
  "long_sentence_ratio": <fraction of sentences over 35 words, 0-1>,
  "wordy_phrases": <count>,
  "repeated_words": <count>,
  {ISSUE_SHAPE}
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftlens_common::SectionType;

    fn request(kind: AnalyzerKind, text: &str) -> RemoteRequest {
        RemoteRequest {
            kind,
            text: text.to_string(),
            sections: vec![
                SectionMeta { section_type: SectionType::Introduction, length: 1200 },
                SectionMeta { section_type: SectionType::Results, length: 800 },
            ],
        }
    }

    #[test]
    fn test_structure_prompt_lists_sections() {
        let prompt = build_prompt(&request(AnalyzerKind::Structure, "")).unwrap();
        assert!(prompt.contains("- introduction: 1200 characters"));
        assert!(prompt.contains("- results: 800 characters"));
        assert!(prompt.contains("\"missing_sections\""));
    }

    #[test]
    fn test_text_prompts_embed_text() {
        for kind in [
            AnalyzerKind::Methodology,
            AnalyzerKind::Clarity,
            AnalyzerKind::AcademicTone,
            AnalyzerKind::WritingQuality,
        ] {
            let prompt = build_prompt(&request(kind, "A distinctive sentence about otters.")).unwrap();
            assert!(prompt.contains("A distinctive sentence about otters."), "{kind}");
            assert!(prompt.contains("Respond with ONLY a valid JSON object"), "{kind}");
        }
    }

    #[test]
    fn test_corpus_kinds_have_no_prompt() {
        assert!(build_prompt(&request(AnalyzerKind::Citations, "x")).is_none());
        assert!(build_prompt(&request(AnalyzerKind::Originality, "x")).is_none());
    }

    #[test]
    fn test_sampling_parameters() {
        assert_eq!(temperature(AnalyzerKind::Structure), 0.2);
        assert_eq!(temperature(AnalyzerKind::Clarity), 0.3);
        assert_eq!(max_tokens(AnalyzerKind::Methodology), 1500);
        assert_eq!(max_tokens(AnalyzerKind::Clarity), 1500);
        assert_eq!(max_tokens(AnalyzerKind::AcademicTone), 1500);
        assert_eq!(max_tokens(AnalyzerKind::Structure), 2000);
        assert_eq!(max_tokens(AnalyzerKind::WritingQuality), 2000);
    }
}
