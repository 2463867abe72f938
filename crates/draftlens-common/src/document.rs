//! Draft document model: a titled paper broken into typed sections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::DraftlensError;

/// Section vocabulary for research papers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Abstract,
    Introduction,
    LiteratureReview,
    Methodology,
    Results,
    Discussion,
    Conclusion,
    References,
    Other,
}

/// Heading phrases mapped to section types. Exact matches are tried first,
/// then prefix matches in table order.
const HEADING_PATTERNS: &[(&str, SectionType)] = &[
    ("abstract",                      SectionType::Abstract),
    ("summary",                       SectionType::Abstract),
    ("executive summary",             SectionType::Abstract),
    ("literature review",             SectionType::LiteratureReview),
    ("review of literature",          SectionType::LiteratureReview),
    ("review of the literature",      SectionType::LiteratureReview),
    ("related work",                  SectionType::LiteratureReview),
    ("related works",                 SectionType::LiteratureReview),
    ("background and related work",   SectionType::LiteratureReview),
    ("prior work",                    SectionType::LiteratureReview),
    ("introduction",                  SectionType::Introduction),
    ("background",                    SectionType::Introduction),
    ("materials and methods",         SectionType::Methodology),
    ("methods and materials",         SectionType::Methodology),
    ("methodology",                   SectionType::Methodology),
    ("methods",                       SectionType::Methodology),
    ("method",                        SectionType::Methodology),
    ("research design",               SectionType::Methodology),
    ("experimental setup",            SectionType::Methodology),
    ("experimental design",           SectionType::Methodology),
    ("results and discussion",        SectionType::Results),
    ("results",                       SectionType::Results),
    ("findings",                      SectionType::Results),
    ("evaluation",                    SectionType::Results),
    ("discussion",                    SectionType::Discussion),
    ("conclusions and future work",   SectionType::Conclusion),
    ("conclusion and future work",    SectionType::Conclusion),
    ("concluding remarks",            SectionType::Conclusion),
    ("conclusions",                   SectionType::Conclusion),
    ("conclusion",                    SectionType::Conclusion),
    ("references",                    SectionType::References),
    ("bibliography",                  SectionType::References),
    ("works cited",                   SectionType::References),
    ("literature cited",              SectionType::References),
    ("reference list",                SectionType::References),
];

/// Headings longer than this many words are treated as prose.
const MAX_HEADING_WORDS: usize = 8;

impl SectionType {
    /// Sections every complete research paper is expected to carry, in
    /// canonical order.
    pub const REQUIRED: [SectionType; 7] = [
        SectionType::Abstract,
        SectionType::Introduction,
        SectionType::Methodology,
        SectionType::Results,
        SectionType::Discussion,
        SectionType::Conclusion,
        SectionType::References,
    ];

    pub const ALL: [SectionType; 9] = [
        SectionType::Abstract,
        SectionType::Introduction,
        SectionType::LiteratureReview,
        SectionType::Methodology,
        SectionType::Results,
        SectionType::Discussion,
        SectionType::Conclusion,
        SectionType::References,
        SectionType::Other,
    ];

    /// Infer a section type from a heading line.
    ///
    /// Leading numbering and bullets ("2.", "IV.", "•") are stripped and the
    /// remainder compared case-insensitively against the heading vocabulary.
    /// Returns `None` for anything that reads like a sentence rather than a
    /// heading, so "Results show that the model converged." is not a header.
    pub fn from_heading(heading: &str) -> Option<Self> {
        let h = normalise_heading(heading);
        if h.is_empty() {
            return None;
        }

        let bare = h.trim_end_matches('.');
        if let Some((_, ty)) = HEADING_PATTERNS.iter().find(|(p, _)| *p == bare) {
            return Some(*ty);
        }

        if h.ends_with(['.', '!', '?']) || h.split_whitespace().count() > MAX_HEADING_WORDS {
            return None;
        }

        HEADING_PATTERNS
            .iter()
            .find(|(p, _)| {
                h.strip_prefix(p)
                    .is_some_and(|rest| rest.starts_with(|c: char| !c.is_alphanumeric()))
            })
            .map(|(_, ty)| *ty)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Abstract         => "abstract",
            SectionType::Introduction     => "introduction",
            SectionType::LiteratureReview => "literature_review",
            SectionType::Methodology      => "methodology",
            SectionType::Results          => "results",
            SectionType::Discussion       => "discussion",
            SectionType::Conclusion       => "conclusion",
            SectionType::References       => "references",
            SectionType::Other            => "other",
        }
    }

    /// Human-readable name used in issue and suggestion text.
    pub fn display_name(&self) -> &'static str {
        match self {
            SectionType::Abstract         => "Abstract",
            SectionType::Introduction     => "Introduction",
            SectionType::LiteratureReview => "Literature Review",
            SectionType::Methodology      => "Methodology",
            SectionType::Results          => "Results",
            SectionType::Discussion       => "Discussion",
            SectionType::Conclusion       => "Conclusion",
            SectionType::References       => "References",
            SectionType::Other            => "Other",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = DraftlensError;

    /// Parses the snake_case vocabulary name, plus a few common aliases
    /// ("methods", "related_work").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        let ty = match key.as_str() {
            "abstract"                            => SectionType::Abstract,
            "introduction"                        => SectionType::Introduction,
            "literature_review" | "related_work"  => SectionType::LiteratureReview,
            "methodology" | "methods"             => SectionType::Methodology,
            "results"                             => SectionType::Results,
            "discussion"                          => SectionType::Discussion,
            "conclusion" | "conclusions"          => SectionType::Conclusion,
            "references"                          => SectionType::References,
            "other"                               => SectionType::Other,
            _ => return Err(DraftlensError::UnknownSectionType(s.to_string())),
        };
        Ok(ty)
    }
}

/// Strip numbering/bullets, lowercase, collapse whitespace and drop a
/// trailing colon.
fn normalise_heading(heading: &str) -> String {
    let stripped = strip_numbering(heading.trim());
    let collapsed = stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    collapsed.trim_end_matches(':').trim_end().to_string()
}

fn strip_numbering(line: &str) -> &str {
    let mut rest = line.trim_start_matches(|c: char| {
        c.is_ascii_digit()
            || c.is_whitespace()
            || matches!(c, '.' | ')' | '(' | '-' | '*' | '#' | '\u{2022}' | '\u{2013}' | '\u{00a7}')
    });

    // Roman numeral or single-letter prefixes: "IV. Results", "b) Methods"
    if let Some(idx) = rest.find(['.', ')']) {
        let head = &rest[..idx];
        let is_roman = !head.is_empty()
            && head.chars().all(|c| matches!(c.to_ascii_lowercase(), 'i' | 'v' | 'x' | 'l' | 'c'));
        let is_letter = head.len() == 1 && head.chars().all(|c| c.is_ascii_alphabetic());
        if is_roman || is_letter {
            rest = rest[idx + 1..].trim_start();
        }
    }
    rest
}

/// A typed section of a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "type")]
    pub section_type: SectionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub content: String,
}

impl Section {
    pub fn new(section_type: SectionType, content: impl Into<String>) -> Self {
        Self { section_type, heading: None, content: content.into() }
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// A submitted draft. Immutable once handed to the analysis pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Default::default() }
    }

    pub fn with_abstract(mut self, abstract_text: impl Into<String>) -> Self {
        self.abstract_text = abstract_text.into();
        self
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Title, abstract and every section body joined by blank lines.
    /// Empty parts are skipped.
    pub fn full_text(&self) -> String {
        let parts = std::iter::once(self.title.as_str())
            .chain(std::iter::once(self.abstract_text.as_str()))
            .chain(self.sections.iter().map(|s| s.content.as_str()))
            .map(str::trim)
            .filter(|p| !p.is_empty());
        parts.collect::<Vec<_>>().join("\n\n")
    }

    /// Prose used by the statistical analyzers: abstract plus every section
    /// except the reference list.
    pub fn body_text(&self) -> String {
        let parts = std::iter::once(self.abstract_text.as_str())
            .chain(
                self.sections
                    .iter()
                    .filter(|s| s.section_type != SectionType::References)
                    .map(|s| s.content.as_str()),
            )
            .map(str::trim)
            .filter(|p| !p.is_empty());
        parts.collect::<Vec<_>>().join("\n\n")
    }

    /// SHA-256 of `full_text`, hex encoded.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.full_text().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn sections_of(&self, ty: SectionType) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(move |s| s.section_type == ty)
    }

    /// Joined content of every non-empty section of the given type.
    pub fn section_text(&self, ty: SectionType) -> Option<String> {
        let parts: Vec<&str> = self
            .sections_of(ty)
            .filter(|s| !s.is_empty())
            .map(|s| s.content.trim())
            .collect();
        (!parts.is_empty()).then(|| parts.join("\n\n"))
    }

    /// Whether the draft carries a non-empty section of this type. A filled
    /// `abstract` field counts as an abstract section.
    pub fn has_section(&self, ty: SectionType) -> bool {
        if ty == SectionType::Abstract && !self.abstract_text.trim().is_empty() {
            return true;
        }
        self.sections_of(ty).any(|s| !s.is_empty())
    }

    pub fn word_count(&self) -> usize {
        self.sections.iter().map(Section::word_count).sum::<usize>()
            + self.abstract_text.split_whitespace().count()
    }
}

/// One entry of a reference corpus, already filtered by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDocument {
    pub id: String,
    pub title: String,
    pub text: String,
}

impl ReferenceDocument {
    pub fn new(id: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), text: text.into() }
    }

    pub fn from_document(id: impl Into<String>, document: &Document) -> Self {
        Self::new(id, document.title.clone(), document.full_text())
    }
}
