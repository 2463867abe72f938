//! draftlens-ingestion — text preparation and corpus matching.
//! - Sentence and section segmentation of raw extracted text
//! - Comparison normalisation
//! - Dice similarity (character bigrams or word shingles)
//! - Corpus matching with matched-segment extraction

pub mod matcher;
pub mod normalise;
pub mod segmenter;
pub mod similarity;

pub use matcher::CorpusMatcher;
pub use normalise::normalise;
pub use segmenter::{parse_document, segment, split_sentences, Sentence};
pub use similarity::SimilarityScorer;
