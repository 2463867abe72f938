//! draftlens-llm — LLM backend abstraction and the LLM-backed remote
//! analyzer plugged into the review pipeline.

pub mod analyzer;
pub mod backend;
pub mod prompts;
pub mod router;

pub use analyzer::LlmRemoteAnalyzer;
pub use backend::{AnthropicBackend, LlmBackend, LlmError, OllamaBackend, OpenAiCompatibleBackend};
pub use router::{LlmRouter, RetryPolicy};
