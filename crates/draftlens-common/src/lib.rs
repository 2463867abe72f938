//! draftlens-common — Shared document/report models, configuration and errors
//! used across all Draftlens crates.

pub mod config;
pub mod document;
pub mod error;
pub mod report;
pub mod weights;

// Re-export commonly used types
pub use config::AnalysisConfig;
pub use document::{Document, ReferenceDocument, Section, SectionType};
pub use error::{DraftlensError, Result};
pub use report::{AnalysisReport, AnalyzerKind, Issue, Severity, SubReport, SubReportDetails};
pub use weights::ScoreWeights;
