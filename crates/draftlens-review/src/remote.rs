//! Contract for an optional higher-fidelity remote analyzer.
//!
//! The reviewer consults the remote analyzer for every kind it supports and
//! falls back to the local heuristic on timeout, transport failure or a
//! malformed response.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use draftlens_common::{AnalyzerKind, Document, SectionType, SubReport};

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote analyzer timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("analyzer kind {0} is not supported remotely")]
    Unsupported(AnalyzerKind),
}

/// Section metadata sent alongside the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMeta {
    #[serde(rename = "type")]
    pub section_type: SectionType,
    /// Content length in characters.
    pub length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteRequest {
    pub kind: AnalyzerKind,
    pub text: String,
    pub sections: Vec<SectionMeta>,
}

impl RemoteRequest {
    /// Build the request for one kind, truncating the text to `max_chars`
    /// characters. Returns `None` when the kind needs text the document does
    /// not have (e.g. methodology without a methodology section).
    pub fn for_document(kind: AnalyzerKind, document: &Document, max_chars: usize) -> Option<Self> {
        let mut sections: Vec<SectionMeta> = document
            .sections
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| SectionMeta {
                section_type: s.section_type,
                length: s.content.chars().count(),
            })
            .collect();
        if !document.abstract_text.trim().is_empty() {
            sections.insert(0, SectionMeta {
                section_type: SectionType::Abstract,
                length: document.abstract_text.chars().count(),
            });
        }

        let text = match kind {
            AnalyzerKind::Structure   => String::new(),
            AnalyzerKind::Methodology => document.section_text(SectionType::Methodology)?,
            _                         => document.body_text(),
        };
        if kind != AnalyzerKind::Structure && text.trim().is_empty() {
            return None;
        }

        Some(Self {
            kind,
            text: truncate_chars(&text, max_chars).to_string(),
            sections,
        })
    }
}

/// Longest prefix of at most `max` characters.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None           => text,
    }
}

#[async_trait]
pub trait RemoteAnalyzer: Send + Sync {
    /// Model identifier recorded in the report's provenance tag.
    fn model(&self) -> &str;

    fn supports(&self, kind: AnalyzerKind) -> bool;

    async fn analyze(&self, request: RemoteRequest) -> Result<SubReport, RemoteError>;
}
