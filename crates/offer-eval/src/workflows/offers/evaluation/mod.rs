mod config;
mod policy;
mod rules;

pub use config::{NegotiationThresholds, SCORE_EPSILON};
pub use policy::NegotiationSignal;

use super::compensation::{adjust_for_cost_of_living, NormalizedCompensation};
use super::domain::{OfferId, Ratings, Weights};
use super::guard::{ensure_finite, validate_weights, InvalidInput};
use serde::{Deserialize, Serialize};

/// One offer's inputs to the multi-criteria scorer.
#[derive(Debug, Clone)]
pub struct ScoringInput {
    pub offer_id: OfferId,
    pub company: String,
    pub compensation: NormalizedCompensation,
    pub col_index: Option<f64>,
    pub ratings: Ratings,
}

/// Scorer output for a single offer, every score on 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredOffer {
    pub offer_id: OfferId,
    pub company: String,
    pub compensation: NormalizedCompensation,
    pub col_index: f64,
    pub col_adjusted_total: f64,
    pub financial_score: f64,
    pub non_financial_score: f64,
    pub overall_score: f64,
}

/// Stateless scorer that applies one set of weights across a comparison set.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: Weights,
    thresholds: NegotiationThresholds,
}

impl ScoringEngine {
    pub fn new(weights: Weights) -> Result<Self, InvalidInput> {
        validate_weights(&weights)?;
        Ok(Self {
            weights,
            thresholds: NegotiationThresholds::default(),
        })
    }

    pub fn with_thresholds(mut self, thresholds: NegotiationThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn score(&self, inputs: &[ScoringInput]) -> Result<Vec<ScoredOffer>, InvalidInput> {
        let mut adjusted = Vec::with_capacity(inputs.len());
        for input in inputs {
            ensure_finite(&input.offer_id, "total_comp", input.compensation.total_comp)?;
            let col_adjusted = adjust_for_cost_of_living(
                &input.offer_id,
                input.compensation.total_comp,
                input.col_index,
            )?;
            ensure_finite(&input.offer_id, "col_adjusted_total", col_adjusted)?;
            adjusted.push(col_adjusted);
        }

        let financial = rules::financial_scores(&adjusted);

        let scored = inputs
            .iter()
            .zip(adjusted)
            .zip(financial)
            .map(|((input, col_adjusted_total), financial_score)| {
                let non_financial_score = rules::non_financial_score(&input.ratings, &self.weights);
                ScoredOffer {
                    offer_id: input.offer_id.clone(),
                    company: input.company.clone(),
                    compensation: input.compensation,
                    col_index: input
                        .col_index
                        .unwrap_or(crate::config::BASELINE_COL_INDEX),
                    col_adjusted_total,
                    financial_score,
                    non_financial_score,
                    overall_score: rules::overall_score(
                        self.weights.financial,
                        financial_score,
                        non_financial_score,
                    ),
                }
            })
            .collect();

        Ok(scored)
    }

    /// Negotiation guidance per scored offer, in input order.
    pub fn recommend(&self, scored: &[ScoredOffer]) -> Vec<Vec<NegotiationSignal>> {
        policy::negotiation_signals(scored, &self.thresholds)
    }

    /// Positions into `scored`, best overall score first.
    pub fn rank(&self, scored: &[ScoredOffer]) -> Vec<usize> {
        let scores: Vec<f64> = scored.iter().map(|offer| offer.overall_score).collect();
        rules::rank_by_score(&scores)
    }
}

/// Rating rescaled from 1-5 onto 0-100.
pub fn rescale_rating(rating: u8) -> f64 {
    rules::rescale_rating(rating)
}
