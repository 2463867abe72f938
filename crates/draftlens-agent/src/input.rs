//! Reading drafts and reference corpora from disk.
//!
//! `.json` files hold a serialized `Document`; anything else is plain text
//! and goes through the segmenter.

use std::path::{Path, PathBuf};

use anyhow::Context;

use draftlens_common::config::SegmentationConfig;
use draftlens_common::{Document, ReferenceDocument};
use draftlens_ingestion::parse_document;

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .to_string()
}

/// Load one draft. `title` overrides the file stem for plain-text input.
pub fn load_document(path: &Path, title: Option<&str>, segmentation: &SegmentationConfig) -> anyhow::Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    if is_json(path) {
        let mut document: Document = serde_json::from_str(&content)
            .with_context(|| format!("parsing {} as a document", path.display()))?;
        if let Some(title) = title {
            document.title = title.to_string();
        }
        return Ok(document);
    }

    let title = title.map(str::to_string).unwrap_or_else(|| file_stem(path));
    let document = parse_document(&title, &content, segmentation);
    tracing::debug!(
        path = %path.display(),
        sections = document.sections.len(),
        words = document.word_count(),
        "document parsed"
    );
    Ok(document)
}

/// Every regular file in `dir`, in file-name order, as a reference keyed by
/// its file stem. Unreadable files are skipped with a warning.
pub fn load_corpus(dir: &Path, segmentation: &SegmentationConfig) -> anyhow::Result<Vec<ReferenceDocument>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading corpus directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let mut corpus = Vec::with_capacity(paths.len());
    for path in paths {
        match load_document(&path, None, segmentation) {
            Ok(doc) => corpus.push(ReferenceDocument::from_document(file_stem(&path), &doc)),
            Err(e)  => tracing::warn!(path = %path.display(), error = %e, "skipping corpus file"),
        }
    }
    tracing::info!(dir = %dir.display(), references = corpus.len(), "corpus loaded");
    Ok(corpus)
}
