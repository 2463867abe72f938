//! draftlens-review — heuristic analyzers, scoring and the review pipeline.
//!
//! Entry point is [`Reviewer`]: build it from an `AnalysisConfig`, optionally
//! attach a [`RemoteAnalyzer`], then call `analyze` or `compare`.

pub mod aggregate;
pub mod analyzers;
pub mod remote;
pub mod reviewer;
pub mod suggestions;

pub use analyzers::{AnalysisInput, Analyzer};
pub use remote::{RemoteAnalyzer, RemoteError, RemoteRequest, SectionMeta};
pub use reviewer::Reviewer;
