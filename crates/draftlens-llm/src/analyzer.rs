//! `LlmRemoteAnalyzer` — the LLM-backed implementation of the review
//! pipeline's remote analyzer contract.
//!
//! Replies are expected to be a single JSON object. Models routinely wrap it
//! in markdown fences or return numbers as strings ("18%", "22 words"), so
//! parsing is tolerant of presentation but strict about substance: a reply
//! without a usable `score` is malformed and the reviewer falls back to the
//! local heuristic.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use draftlens_common::config::SegmentationConfig;
use draftlens_common::report::{
    ClarityDetails, MethodologyDetails, MethodologyElement, ReadabilityGrade, StructureDetails, ToneDetails,
    WritingQualityDetails,
};
use draftlens_common::{AnalyzerKind, SectionType, Severity, SubReport, SubReportDetails};
use draftlens_ingestion::split_sentences;
use draftlens_review::{RemoteAnalyzer, RemoteError, RemoteRequest};

use crate::backend::{LlmBackend, LlmRequest, Message};
use crate::prompts;

const SUPPORTED: [AnalyzerKind; 5] = [
    AnalyzerKind::Structure,
    AnalyzerKind::Methodology,
    AnalyzerKind::Clarity,
    AnalyzerKind::AcademicTone,
    AnalyzerKind::WritingQuality,
];

pub struct LlmRemoteAnalyzer {
    backend: Arc<dyn LlmBackend>,
    min_sentence_chars: usize,
}

impl LlmRemoteAnalyzer {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            backend,
            min_sentence_chars: SegmentationConfig::default().min_sentence_chars,
        }
    }

    /// Sentence length floor used for the locally computed counts.
    pub fn with_min_sentence_chars(mut self, min_sentence_chars: usize) -> Self {
        self.min_sentence_chars = min_sentence_chars;
        self
    }
}

#[async_trait::async_trait]
impl RemoteAnalyzer for LlmRemoteAnalyzer {
    fn model(&self) -> &str {
        self.backend.model_id()
    }

    fn supports(&self, kind: AnalyzerKind) -> bool {
        SUPPORTED.contains(&kind)
    }

    async fn analyze(&self, request: RemoteRequest) -> Result<SubReport, RemoteError> {
        let kind = request.kind;
        let prompt = match prompts::build_prompt(&request) {
            Some(p) if self.supports(kind) => p,
            _ => return Err(RemoteError::Unsupported(kind)),
        };

        let llm_request = LlmRequest {
            messages: vec![Message::system(prompts::SYSTEM_PROMPT), Message::user(prompt)],
            model: None,
            max_tokens: Some(prompts::max_tokens(kind)),
            temperature: Some(prompts::temperature(kind)),
        };

        let response = self
            .backend
            .complete(llm_request)
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        debug!(
            kind = %kind,
            model = %response.model,
            prompt_tokens = response.prompt_tokens,
            completion_tokens = response.completion_tokens,
            "LLM reply received"
        );

        parse_reply(&request, &response.content, self.min_sentence_chars)
    }
}

// ── Reply parsing ─────────────────────────────────────────────────────────────

/// A number as models actually emit it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Num(f64),
    Text(String),
    List(Vec<serde_json::Value>),
}

impl RawNumber {
    fn value(&self) -> Option<f64> {
        match self {
            RawNumber::Num(n)  => Some(*n),
            RawNumber::Text(s) => leading_number(s),
            RawNumber::List(_) => None,
        }
    }

    /// Counts may come back as the list of offending phrases.
    fn count(&self) -> usize {
        match self {
            RawNumber::List(items) => items.len(),
            other => other.value().map(|v| v.max(0.0).round() as usize).unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawIssue {
    Detailed {
        #[serde(default)]
        severity: Option<String>,
        message: String,
    },
    Plain(String),
}

#[derive(Debug, Deserialize)]
struct RawReply {
    score: Option<RawNumber>,
    #[serde(default)]
    issues: Vec<RawIssue>,
    #[serde(default)]
    suggestions: Vec<String>,

    // structure
    #[serde(default)]
    missing_sections: Vec<String>,
    #[serde(default)]
    present_sections: Vec<String>,

    // methodology
    #[serde(default)]
    missing_elements: Vec<String>,

    // clarity
    avg_sentence_length: Option<RawNumber>,
    avg_word_length: Option<RawNumber>,
    complex_word_ratio: Option<RawNumber>,

    // academic_tone
    is_formal: Option<bool>,
    first_person_usage: Option<RawNumber>,
    contractions: Option<RawNumber>,
    informal_language: Option<RawNumber>,

    // writing_quality
    passive_voice_ratio: Option<RawNumber>,
    long_sentence_ratio: Option<RawNumber>,
    wordy_phrases: Option<RawNumber>,
    repeated_words: Option<RawNumber>,
}

/// Drop markdown fences and any prose around the outermost JSON object.
pub fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let unfenced = match trimmed.strip_prefix("```") {
        Some(rest) => {
            let body = match rest.split_once('\n') {
                Some((_lang, body)) => body,
                None                => rest.trim_start_matches("json"),
            };
            let body = body.trim_end();
            body.strip_suffix("```").unwrap_or(body).trim()
        }
        None => trimmed,
    };

    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => unfenced,
    }
}

fn parse_reply(request: &RemoteRequest, content: &str, min_sentence_chars: usize) -> Result<SubReport, RemoteError> {
    let json = strip_code_fences(content);
    if json.is_empty() {
        return Err(RemoteError::Malformed("empty reply".to_string()));
    }

    let reply: RawReply = serde_json::from_str(json).map_err(|e| RemoteError::Malformed(e.to_string()))?;
    let score = reply
        .score
        .as_ref()
        .and_then(RawNumber::value)
        .filter(|s| s.is_finite())
        .ok_or_else(|| RemoteError::Malformed("missing numeric 'score'".to_string()))?;

    let details = match request.kind {
        AnalyzerKind::Structure      => structure_details(&reply, request),
        AnalyzerKind::Methodology    => methodology_details(&reply),
        AnalyzerKind::Clarity        => clarity_details(&reply, score, &request.text, min_sentence_chars),
        AnalyzerKind::AcademicTone   => tone_details(&reply),
        AnalyzerKind::WritingQuality => writing_details(&reply, &request.text, min_sentence_chars),
        other => return Err(RemoteError::Unsupported(other)),
    };

    let mut sub = SubReport::new(score, details);
    for issue in reply.issues {
        let (severity, message) = match issue {
            RawIssue::Detailed { severity, message } => {
                let severity = severity
                    .and_then(|s| s.parse::<Severity>().ok())
                    .unwrap_or(Severity::Warning);
                (severity, message)
            }
            RawIssue::Plain(message) => (Severity::Warning, message),
        };
        if !message.trim().is_empty() {
            sub.push_issue(severity, message);
        }
    }
    for suggestion in reply.suggestions.into_iter().filter(|s| !s.trim().is_empty()) {
        sub.push_suggestion(suggestion);
    }
    Ok(sub)
}

fn structure_details(reply: &RawReply, request: &RemoteRequest) -> SubReportDetails {
    let missing: Vec<SectionType> = dedup(reply.missing_sections.iter().filter_map(|s| s.parse().ok()));
    let present: Vec<SectionType> = if reply.present_sections.is_empty() {
        dedup(request.sections.iter().map(|s| s.section_type).filter(|t| *t != SectionType::Other))
    } else {
        dedup(reply.present_sections.iter().filter_map(|s| s.parse().ok()))
    };

    SubReportDetails::Structure(StructureDetails {
        has_all_sections: missing.is_empty(),
        present_sections: present,
        missing_sections: missing,
    })
}

fn methodology_details(reply: &RawReply) -> SubReportDetails {
    let missing: Vec<MethodologyElement> = dedup(reply.missing_elements.iter().filter_map(|s| parse_element(s)));
    let present: Vec<MethodologyElement> = MethodologyElement::ALL
        .into_iter()
        .filter(|e| !missing.contains(e))
        .collect();

    SubReportDetails::Methodology(MethodologyDetails {
        section_found: true,
        completeness: format!("{}/{} key elements", present.len(), MethodologyElement::ALL.len()),
        has_all_elements: missing.is_empty(),
        present_elements: present,
        missing_elements: missing,
    })
}

fn clarity_details(reply: &RawReply, score: f64, text: &str, min_sentence_chars: usize) -> SubReportDetails {
    let sentence_count = split_sentences(text, min_sentence_chars).len();
    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len();

    let local_avg_sentence = if sentence_count == 0 { 0.0 } else { word_count as f64 / sentence_count as f64 };
    let local_avg_word = if word_count == 0 {
        0.0
    } else {
        words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / word_count as f64
    };

    let readability_score = draftlens_common::report::clamp_score(score);
    SubReportDetails::Clarity(ClarityDetails {
        readability_score,
        readability_grade: ReadabilityGrade::from_score(readability_score),
        avg_sentence_length: number_or(&reply.avg_sentence_length, local_avg_sentence),
        avg_word_length: number_or(&reply.avg_word_length, local_avg_word),
        complex_word_ratio: reply.complex_word_ratio.as_ref().and_then(RawNumber::value).map(ratio).unwrap_or(0.0),
        sentence_count,
        word_count,
    })
}

fn tone_details(reply: &RawReply) -> SubReportDetails {
    let first_person_usage = count(&reply.first_person_usage);
    let contractions = count(&reply.contractions);
    let informal_language = count(&reply.informal_language);
    SubReportDetails::AcademicTone(ToneDetails {
        is_formal: reply
            .is_formal
            .unwrap_or(contractions == 0 && informal_language == 0),
        first_person_usage,
        contractions,
        informal_language,
    })
}

fn writing_details(reply: &RawReply, text: &str, min_sentence_chars: usize) -> SubReportDetails {
    let ratio_of = |raw: &Option<RawNumber>| raw.as_ref().and_then(RawNumber::value).map(ratio).unwrap_or(0.0);
    SubReportDetails::WritingQuality(WritingQualityDetails {
        sentence_count: split_sentences(text, min_sentence_chars).len(),
        passive_voice_ratio: ratio_of(&reply.passive_voice_ratio),
        long_sentence_ratio: ratio_of(&reply.long_sentence_ratio),
        wordy_phrases: count(&reply.wordy_phrases),
        repeated_words: count(&reply.repeated_words),
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let end = trimmed
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && *c == '-')))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

/// Accept 0–1 fractions and 0–100 percentages.
fn ratio(value: f64) -> f64 {
    let v = if value > 1.0 { value / 100.0 } else { value };
    v.clamp(0.0, 1.0)
}

fn number_or(raw: &Option<RawNumber>, default: f64) -> f64 {
    raw.as_ref()
        .and_then(RawNumber::value)
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(default)
}

fn count(raw: &Option<RawNumber>) -> usize {
    raw.as_ref().map(RawNumber::count).unwrap_or(0)
}

fn parse_element(name: &str) -> Option<MethodologyElement> {
    let key = name.trim().to_lowercase().replace([' ', '-', '/'], "_").replace("_and_", "_");
    MethodologyElement::ALL
        .into_iter()
        .find(|e| e.as_str() == key || e.display_name() == name.trim().to_lowercase())
}

fn dedup<T: PartialEq>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
