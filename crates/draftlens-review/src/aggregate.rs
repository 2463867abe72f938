//! Overall score: weighted combination of the produced sub-report scores.
//!
//! Renormalized:  S = Σ(wᵢ × sᵢ) / Σwᵢ   over produced kinds
//! PartialSum:    S = Σ(wᵢ × sᵢ)         over produced kinds
//!
//! Kinds that were not requested or crashed contribute nothing.

use draftlens_common::config::ScoreNormalization;
use draftlens_common::report::clamp_score;
use draftlens_common::{AnalysisReport, ScoreWeights};

pub fn overall_score(report: &AnalysisReport, weights: &ScoreWeights, normalization: ScoreNormalization) -> f64 {
    let (weighted, weight_sum) = report
        .sub_reports()
        .map(|r| {
            let w = weights.weight(r.kind());
            (w * r.score, w)
        })
        .fold((0.0, 0.0), |(acc_s, acc_w), (s, w)| (acc_s + s, acc_w + w));

    let score = match normalization {
        ScoreNormalization::Renormalized if weight_sum > 0.0 => weighted / weight_sum,
        ScoreNormalization::Renormalized                     => 0.0,
        ScoreNormalization::PartialSum                       => weighted,
    };
    clamp_score(score)
}
