//! The review pipeline: runs the requested analyzers concurrently over one
//! immutable snapshot, applies the remote fallback policy and aggregates
//! the result.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, instrument, warn};

use draftlens_common::config::MatchingConfig;
use draftlens_common::report::{clamp_score, Comparison, ReportSource, SimilarityVerdict};
use draftlens_common::{
    AnalysisConfig, AnalysisReport, AnalyzerKind, Document, DraftlensError, ReferenceDocument, Result, SubReport,
};
use draftlens_ingestion::CorpusMatcher;

use crate::aggregate::overall_score;
use crate::analyzers::{default_analyzers, AnalysisInput, Analyzer};
use crate::remote::{RemoteAnalyzer, RemoteError, RemoteRequest};
use crate::suggestions::build_suggestions;

type KindOutcome = std::result::Result<(ReportSource, SubReport), String>;

pub struct Reviewer {
    config: Arc<AnalysisConfig>,
    analyzers: BTreeMap<AnalyzerKind, Arc<dyn Analyzer>>,
    remote: Option<Arc<dyn RemoteAnalyzer>>,
    matcher: CorpusMatcher,
}

impl Reviewer {
    /// Validate `config` and build a reviewer with the built-in heuristic
    /// analyzers and no remote analyzer.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let analyzers = default_analyzers(&config)
            .into_iter()
            .map(|a| (a.kind(), a))
            .collect();
        let matcher = CorpusMatcher::new(config.matching.clone(), config.segmentation.min_sentence_chars);
        Ok(Self {
            config: Arc::new(config),
            analyzers,
            remote: None,
            matcher,
        })
    }

    pub fn with_remote(mut self, remote: Arc<dyn RemoteAnalyzer>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Replace the local analyzer for `analyzer.kind()`.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzers.insert(analyzer.kind(), analyzer);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze `document` against `corpus`. `requested` defaults to every
    /// kind; an explicitly empty list is rejected.
    #[instrument(skip_all, fields(title = %document.title, references = corpus.len()))]
    pub async fn analyze(
        &self,
        document: &Document,
        corpus: &[ReferenceDocument],
        requested: Option<&[AnalyzerKind]>,
    ) -> Result<AnalysisReport> {
        let kinds = resolve_kinds(requested)?;
        let input = Arc::new(AnalysisInput::new(document.clone(), corpus.to_vec()));
        let mut report = AnalysisReport::new(document.content_hash());

        let outcomes = join_all(kinds.iter().map(|kind| self.run_kind(*kind, Arc::clone(&input)))).await;

        for (kind, outcome) in kinds.iter().zip(outcomes) {
            match outcome {
                Ok((source, sub)) => report.record(source, sub),
                Err(message) => {
                    tracing::error!(kind = %kind, error = %message, "analyzer failed");
                    report.record_failure(*kind, message);
                }
            }
        }

        let overall = overall_score(&report, &self.config.weights, self.config.normalization);
        let suggestions = build_suggestions(&report, &self.config.suggestions);
        report.finalize(overall, suggestions);

        info!(
            id = %report.id,
            overall = report.overall_score,
            produced = report.reports.len(),
            failed = report.failures.len(),
            "analysis complete"
        );
        Ok(report)
    }

    /// Pairwise similarity of two documents with a verdict.
    pub fn compare(&self, a: &Document, b: &Document) -> Comparison {
        let (similarity, matched_segments) = self.matcher.compare_texts(&a.full_text(), &b.full_text());
        let similarity = clamp_score(similarity * 100.0);
        Comparison {
            similarity,
            matched_segments,
            verdict: verdict_for(similarity, &self.config.matching),
        }
    }

    async fn run_kind(&self, kind: AnalyzerKind, input: Arc<AnalysisInput>) -> KindOutcome {
        let mut fallback_reason = None;

        if let Some(remote) = self.remote.as_ref().filter(|r| r.supports(kind)) {
            match self.call_remote(remote.as_ref(), kind, &input.document).await {
                Ok(Some(sub)) => {
                    let model = remote.model().to_string();
                    return Ok((ReportSource::Remote { model }, sub));
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(kind = %kind, error = %e, "remote analyzer failed, using heuristic");
                    fallback_reason = Some(e.to_string());
                }
            }
        }

        let sub = self.run_local(kind, input).await?;
        let source = match fallback_reason {
            Some(reason) => ReportSource::HeuristicFallback { reason },
            None         => ReportSource::Heuristic,
        };
        Ok((source, sub))
    }

    /// `Ok(None)` when the document has nothing to send for this kind.
    async fn call_remote(
        &self,
        remote: &dyn RemoteAnalyzer,
        kind: AnalyzerKind,
        document: &Document,
    ) -> std::result::Result<Option<SubReport>, RemoteError> {
        let Some(request) = RemoteRequest::for_document(kind, document, self.config.remote.max_input_chars) else {
            return Ok(None);
        };
        let budget = self.config.remote.timeouts.timeout_for(kind);
        let mut sub = tokio::time::timeout(budget, remote.analyze(request))
            .await
            .map_err(|_| RemoteError::Timeout(budget))??;

        if sub.kind() != kind {
            return Err(RemoteError::Malformed(format!(
                "expected a {kind} report, got {}",
                sub.kind()
            )));
        }
        if !sub.score.is_finite() {
            return Err(RemoteError::Malformed(format!("non-finite {kind} score")));
        }
        sub.score = clamp_score(sub.score);
        Ok(Some(sub))
    }

    async fn run_local(&self, kind: AnalyzerKind, input: Arc<AnalysisInput>) -> std::result::Result<SubReport, String> {
        let analyzer = self
            .analyzers
            .get(&kind)
            .cloned()
            .ok_or_else(|| format!("no analyzer registered for {kind}"))?;

        match tokio::task::spawn_blocking(move || analyzer.analyze(&input)).await {
            Ok(Ok(sub)) if sub.kind() == kind => Ok(sub),
            Ok(Ok(sub))                       => Err(format!("analyzer returned a {} report", sub.kind())),
            Ok(Err(e))                        => Err(e.to_string()),
            Err(e) if e.is_panic()            => Err(format!("analyzer panicked: {}", panic_message(e.into_panic()))),
            Err(e)                            => Err(e.to_string()),
        }
    }
}

fn resolve_kinds(requested: Option<&[AnalyzerKind]>) -> Result<Vec<AnalyzerKind>> {
    let Some(requested) = requested else {
        return Ok(AnalyzerKind::ALL.to_vec());
    };
    if requested.is_empty() {
        return Err(DraftlensError::InvalidRequest(
            "at least one analyzer kind must be requested".to_string(),
        ));
    }
    let mut kinds = Vec::with_capacity(requested.len());
    for kind in requested {
        if !kinds.contains(kind) {
            kinds.push(*kind);
        }
    }
    Ok(kinds)
}

fn verdict_for(similarity: f64, config: &MatchingConfig) -> SimilarityVerdict {
    match similarity {
        s if s > config.duplicate_above      => SimilarityVerdict::PossibleDuplicate,
        s if s > config.highly_similar_above => SimilarityVerdict::HighlySimilar,
        s if s > config.same_topic_above     => SimilarityVerdict::SameTopic,
        _                                    => SimilarityVerdict::LowSimilarity,
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
