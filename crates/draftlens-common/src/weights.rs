//! Weight vector for the overall quality score.

use serde::{Deserialize, Serialize};

use crate::report::AnalyzerKind;

/// The 7-component weight vector W, one weight per analyzer kind.
/// Weights sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Required section coverage
    pub structure: f64,
    /// Style heuristics (passive voice, long sentences, wordiness)
    pub writing_quality: f64,
    /// In-text citation vs reference list consistency
    pub citations: f64,
    /// 100 − plagiarism score
    pub originality: f64,
    /// Methodology element completeness
    pub methodology: f64,
    /// Readability formula
    pub clarity: f64,
    /// Formality of register
    pub academic_tone: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            structure:       0.20,
            writing_quality: 0.20,
            citations:       0.15,
            originality:     0.15,
            methodology:     0.10,
            clarity:         0.10,
            academic_tone:   0.10,
        }
    }
}

impl ScoreWeights {
    pub fn weight(&self, kind: AnalyzerKind) -> f64 {
        match kind {
            AnalyzerKind::Structure      => self.structure,
            AnalyzerKind::WritingQuality => self.writing_quality,
            AnalyzerKind::Citations      => self.citations,
            AnalyzerKind::Originality    => self.originality,
            AnalyzerKind::Methodology    => self.methodology,
            AnalyzerKind::Clarity        => self.clarity,
            AnalyzerKind::AcademicTone   => self.academic_tone,
        }
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Validate that all weights are non-negative and sum to ~1.0
    pub fn validate(&self) -> bool {
        self.as_array().iter().all(|w| *w >= 0.0) && (self.sum() - 1.0).abs() < 1e-6
    }

    /// Renormalise weights so they sum to 1.0
    pub fn normalise(&mut self) {
        let sum = self.sum();
        if sum > 0.0 {
            self.structure       /= sum;
            self.writing_quality /= sum;
            self.citations       /= sum;
            self.originality     /= sum;
            self.methodology     /= sum;
            self.clarity         /= sum;
            self.academic_tone   /= sum;
        }
    }

    /// Weights in `AnalyzerKind::ALL` order.
    pub fn as_array(&self) -> [f64; 7] {
        AnalyzerKind::ALL.map(|k| self.weight(k))
    }
}
