use thiserror::Error;

#[derive(Debug, Error)]
pub enum DraftlensError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown section type: {0}")]
    UnknownSectionType(String),

    #[error("Unknown analyzer kind: {0}")]
    UnknownAnalyzerKind(String),

    #[error("Analyzer {kind} failed: {message}")]
    Analyzer { kind: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DraftlensError>;
