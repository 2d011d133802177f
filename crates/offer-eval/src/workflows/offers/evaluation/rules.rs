use super::super::domain::{Ratings, Weights, RATING_MAX, RATING_MIN};
use super::config::SCORE_EPSILON;

/// Map a 1-5 rating onto 0-100.
pub(crate) fn rescale_rating(rating: u8) -> f64 {
    let clamped = rating.clamp(RATING_MIN, RATING_MAX);
    f64::from(clamped - RATING_MIN) / f64::from(RATING_MAX - RATING_MIN) * 100.0
}

/// Weighted average of the rescaled ratings. Weights are validated non-negative with a
/// positive sum before this runs.
pub(crate) fn non_financial_score(ratings: &Ratings, weights: &Weights) -> f64 {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;

    for ((_, rating), (_, weight)) in ratings.entries().iter().zip(weights.sub_weights()) {
        weighted += weight * rescale_rating(*rating);
        total_weight += weight;
    }

    if total_weight <= 0.0 {
        return 0.0;
    }

    (weighted / total_weight).clamp(0.0, 100.0)
}

/// Relative financial scores: the highest adjusted total scores exactly 100.
///
/// When every adjusted total is zero all offers share the top spot and score 100.
pub(crate) fn financial_scores(col_adjusted_totals: &[f64]) -> Vec<f64> {
    let best = col_adjusted_totals.iter().copied().fold(0.0_f64, f64::max);

    col_adjusted_totals
        .iter()
        .map(|total| {
            if best <= 0.0 {
                100.0
            } else {
                (100.0 * (total / best)).clamp(0.0, 100.0)
            }
        })
        .collect()
}

pub(crate) fn overall_score(financial_weight: f64, financial: f64, non_financial: f64) -> f64 {
    let weight = financial_weight.clamp(0.0, 1.0);
    (weight * financial + (1.0 - weight) * non_financial).clamp(0.0, 100.0)
}

/// Indices ordered by descending score. Scores within [`SCORE_EPSILON`] keep input order.
pub(crate) fn rank_by_score(scores: &[f64]) -> Vec<usize> {
    let mut ranking: Vec<usize> = Vec::with_capacity(scores.len());

    for (index, score) in scores.iter().enumerate() {
        let position = ranking
            .iter()
            .position(|&ranked| scores[ranked] < score - SCORE_EPSILON)
            .unwrap_or(ranking.len());
        ranking.insert(position, index);
    }

    ranking
}
