//! Segmentation and corpus matching over realistic paper text.

use draftlens_common::config::{MatchingConfig, SegmentationConfig, SimilarityMetric};
use draftlens_common::SectionType;
use draftlens_ingestion::{parse_document, CorpusMatcher};
use draftlens_test_utils::{complete_paper, complete_paper_raw, reference, ARCTIC_TERN, METHODOLOGY, RESULTS};
use pretty_assertions::assert_eq;

#[test]
fn test_raw_text_recovers_paper_structure() {
    let doc = parse_document("Structured Peer Feedback", &complete_paper_raw(), &SegmentationConfig::default());

    let types: Vec<SectionType> = doc.sections.iter().map(|s| s.section_type).collect();
    assert_eq!(
        types,
        vec![
            SectionType::Introduction,
            SectionType::Methodology,
            SectionType::Results,
            SectionType::Discussion,
            SectionType::Conclusion,
            SectionType::References,
        ]
    );
    assert!(doc.has_section(SectionType::Abstract));
    assert_eq!(doc.section_text(SectionType::Methodology).as_deref(), Some(METHODOLOGY));
}

#[test]
fn test_partial_overlap_is_found_with_segments() {
    let doc = complete_paper();
    let full = doc.full_text();
    let corpus = vec![
        reference("unrelated", "Quantum chromodynamics describes the strong interaction between quarks."),
        reference("overlap", &format!("An earlier report. {RESULTS} Nothing else was studied.")),
    ];

    let matcher = CorpusMatcher::new(MatchingConfig::default(), 10);
    let matches = matcher.find_matches(&full, &corpus);

    let hit = matches.iter().find(|m| m.source_id == "overlap").expect("overlap reference matched");
    assert!(!hit.matched_segments.is_empty());
    assert!(hit.matched_segments.len() <= 3);
    for seg in &hit.matched_segments {
        assert!(seg.similarity > 70.0 && seg.similarity <= 100.0);
        assert_eq!(&full[seg.start_index..seg.end_index], seg.original_span);
    }
    for pair in matches.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
}

#[test]
fn test_paper_against_unrelated_prose_has_no_match() {
    let doc = complete_paper();
    let corpus = vec![reference("tern", ARCTIC_TERN)];

    let matcher = CorpusMatcher::new(MatchingConfig::default(), 10);
    assert!(matcher.find_matches(&doc.full_text(), &corpus).is_empty());

    let (similarity, segments) = matcher.compare_texts(&doc.full_text(), ARCTIC_TERN);
    assert!(similarity < 0.05);
    assert!(segments.is_empty());
}

#[test]
fn test_word_shingle_segments_match_verbatim_copy() {
    let config = MatchingConfig {
        segment_metric: SimilarityMetric::WordShingle { n: 3 },
        ..MatchingConfig::default()
    };
    let matcher = CorpusMatcher::new(config, 10);
    let corpus = vec![reference("copy", METHODOLOGY)];

    let matches = matcher.find_matches(METHODOLOGY, &corpus);
    assert_eq!(matches.len(), 1);
    assert!((matches[0].similarity - 100.0).abs() < 1e-9);
    assert_eq!(matches[0].matched_segments.len(), 3);
}
