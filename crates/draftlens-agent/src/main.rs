//! Draftlens — academic draft review.
//! Entry point for the `draftlens` binary.

mod config;
mod input;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use draftlens_common::{AnalyzerKind, Document};
use draftlens_llm::{
    AnthropicBackend, LlmBackend, LlmRemoteAnalyzer, LlmRouter, OllamaBackend, OpenAiCompatibleBackend, RetryPolicy,
};
use draftlens_review::Reviewer;

#[derive(Debug, Parser)]
#[command(name = "draftlens", version, about = "Review academic paper drafts")]
struct Cli {
    /// Config file (defaults to ./draftlens.toml)
    #[arg(long, global = true, env = "DRAFTLENS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a draft and print the report as JSON
    Analyze {
        /// Draft to analyze (.json document or plain text)
        #[arg(long)]
        document: PathBuf,
        /// Title for plain-text drafts
        #[arg(long)]
        title: Option<String>,
        /// Directory of reference documents to check originality against
        #[arg(long)]
        corpus_dir: Option<PathBuf>,
        /// Comma-separated analyzer kinds (default: all)
        #[arg(long, value_delimiter = ',')]
        kinds: Vec<String>,
        /// Skip the LLM analyzer even when enabled in config
        #[arg(long)]
        offline: bool,
    },
    /// Compare two drafts and print their similarity
    Compare {
        first: PathBuf,
        second: PathBuf,
    },
    /// Segment a plain-text draft and print the resulting document
    Segment {
        document: PathBuf,
        #[arg(long)]
        title: Option<String>,
    },
}

fn build_llm_router(config: &config::LlmConfig) -> LlmRouter {
    let retry = RetryPolicy {
        max_attempts:    config.retry.max_attempts,
        initial_backoff: Duration::from_millis(config.retry.initial_backoff_ms),
    };
    let mut router = LlmRouter::new(retry);
    let env = |name: &str| std::env::var(name).ok();

    for provider in &config.providers {
        let section = config.section(provider);
        let model = section
            .and_then(|s| s.model.clone())
            .or_else(|| config::default_model(provider).map(str::to_string));
        let Some(model) = model else {
            tracing::warn!(provider = %provider, "no model configured, skipping provider");
            continue;
        };
        let key = config::resolve_api_key(provider, section, env);

        let backend: Arc<dyn LlmBackend> = match (provider.as_str(), key) {
            ("groq", Some(key))      => Arc::new(OpenAiCompatibleBackend::groq(key, model)),
            ("openai", Some(key))    => Arc::new(OpenAiCompatibleBackend::openai(key, model)),
            ("anthropic", Some(key)) => Arc::new(AnthropicBackend::new(key, model)),
            ("ollama", _) => {
                let base_url = section
                    .and_then(|s| s.base_url.clone())
                    .unwrap_or_else(|| "http://localhost:11434".to_string());
                Arc::new(OllamaBackend::new(base_url, model))
            }
            ("openai_compatible", key) => {
                let Some(base_url) = section.and_then(|s| s.base_url.clone()) else {
                    tracing::warn!("openai_compatible provider needs llm.openai_compatible.base_url");
                    continue;
                };
                Arc::new(OpenAiCompatibleBackend::new(base_url, model, key))
            }
            ("groq" | "openai" | "anthropic", None) => {
                tracing::warn!(
                    provider = %provider,
                    "no API key found (set llm.{}.api_key or {})",
                    provider,
                    config::api_key_env_var(provider)
                );
                continue;
            }
            (other, _) => {
                tracing::warn!(provider = other, "unknown LLM provider, skipping");
                continue;
            }
        };
        router.register_backend(provider.clone(), backend);
    }

    router
}

fn parse_kinds(raw: &[String]) -> anyhow::Result<Option<Vec<AnalyzerKind>>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let kinds = raw
        .iter()
        .map(|k| k.parse::<AnalyzerKind>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(kinds))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draftlens=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::Config::load_from(path)?,
        None       => config::Config::load()?,
    };
    let segmentation = &config.analysis.segmentation;

    match cli.command {
        Command::Analyze { document, title, corpus_dir, kinds, offline } => {
            let kinds = parse_kinds(&kinds)?;
            let draft = input::load_document(&document, title.as_deref(), segmentation)?;
            let corpus = match &corpus_dir {
                Some(dir) => input::load_corpus(dir, segmentation)?,
                None      => Vec::new(),
            };

            let mut reviewer = Reviewer::new(config.analysis.clone())?;
            if config.analysis.remote.enabled && !offline {
                let router = build_llm_router(&config.llm);
                if router.is_empty() {
                    tracing::warn!("remote analysis enabled but no LLM backend is usable; heuristics only");
                } else {
                    info!(backends = ?router.backend_names(), "LLM analyzer attached");
                    let remote = LlmRemoteAnalyzer::new(Arc::new(router))
                        .with_min_sentence_chars(segmentation.min_sentence_chars);
                    reviewer = reviewer.with_remote(Arc::new(remote));
                }
            }

            let report = reviewer.analyze(&draft, &corpus, kinds.as_deref()).await?;
            print_json(&report)?;
        }

        Command::Compare { first, second } => {
            let a: Document = input::load_document(&first, None, segmentation)?;
            let b: Document = input::load_document(&second, None, segmentation)?;
            let reviewer = Reviewer::new(config.analysis.clone())?;
            print_json(&reviewer.compare(&a, &b))?;
        }

        Command::Segment { document, title } => {
            let doc = input::load_document(&document, title.as_deref(), segmentation)?;
            print_json(&doc)?;
        }
    }

    Ok(())
}
