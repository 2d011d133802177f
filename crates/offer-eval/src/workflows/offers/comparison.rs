use serde::{Deserialize, Serialize};
use tracing::debug;

use super::compensation::CompensationNormalizer;
use super::domain::{
    CareerProjectionInputs, ComparisonOptions, Offer, OfferId, Ratings, WorkMode,
};
use super::evaluation::{NegotiationThresholds, ScoringEngine, ScoringInput};
use super::guard::{InputGuard, InvalidInput};
use super::narrative;
use super::projection::{CareerProjectionResult, CareerProjector};
use crate::config::EngineConfig;

/// Bumped whenever the matrix rows change shape.
pub const MATRIX_VERSION: u32 = 1;

const MATRIX_FIELDS: [(&str, &str); 10] = [
    ("Base salary", "salary"),
    ("Bonus", "bonus"),
    ("Equity (annualized)", "equity"),
    ("Benefits", "benefits"),
    ("Total compensation", "total_comp"),
    ("Cost-of-living index", "col_index"),
    ("Cost-of-living adjusted total", "col_adjusted_total"),
    ("Non-financial score", "non_financial_score"),
    ("Financial score", "financial_score"),
    ("Overall score", "overall_score"),
];

/// Label/key pair used to render the side-by-side table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub label: String,
    pub key: String,
}

pub fn matrix_rows() -> Vec<MatrixRow> {
    MATRIX_FIELDS
        .iter()
        .map(|(label, key)| MatrixRow {
            label: (*label).to_string(),
            key: (*key).to_string(),
        })
        .collect()
}

/// Computed values for one offer in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferComparisonRow {
    pub offer_id: OfferId,
    pub company: String,
    pub title: String,
    pub work_mode: Option<WorkMode>,
    pub salary: f64,
    pub bonus: f64,
    pub equity: f64,
    pub benefits: f64,
    pub total_comp: f64,
    pub col_index: f64,
    pub col_adjusted_total: f64,
    pub non_financial_score: f64,
    pub financial_score: f64,
    pub overall_score: f64,
    pub negotiation_recommendations: Vec<String>,
}

impl OfferComparisonRow {
    /// Resolve a matrix key to its value on this row.
    pub fn value(&self, key: &str) -> Option<f64> {
        let value = match key {
            "salary" => self.salary,
            "bonus" => self.bonus,
            "equity" => self.equity,
            "benefits" => self.benefits,
            "total_comp" => self.total_comp,
            "col_index" => self.col_index,
            "col_adjusted_total" => self.col_adjusted_total,
            "non_financial_score" => self.non_financial_score,
            "financial_score" => self.financial_score,
            "overall_score" => self.overall_score,
            _ => return None,
        };
        Some(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub matrix_version: u32,
    pub offers: Vec<OfferComparisonRow>,
    pub matrix_rows: Vec<MatrixRow>,
    /// Offer IDs by descending overall score; ties keep input order.
    pub ranking: Vec<OfferId>,
    pub analysis_summary: String,
}

impl ComparisonResult {
    pub fn row(&self, offer_id: &OfferId) -> Option<&OfferComparisonRow> {
        self.offers.iter().find(|row| &row.offer_id == offer_id)
    }

    pub fn top_ranked(&self) -> Option<&OfferComparisonRow> {
        self.ranking.first().and_then(|offer_id| self.row(offer_id))
    }
}

/// Entry point composing normalization, cost-of-living adjustment, scoring, negotiation
/// guidance and career projection. Holds no mutable state.
#[derive(Debug, Clone, Default)]
pub struct OfferEvaluationEngine {
    guard: InputGuard,
    normalizer: CompensationNormalizer,
    projector: CareerProjector,
    thresholds: NegotiationThresholds,
}

impl OfferEvaluationEngine {
    pub fn new(config: EngineConfig) -> Self {
        let normalizer = CompensationNormalizer::from_config(&config);
        Self {
            thresholds: config.negotiation,
            guard: InputGuard::new(config),
            projector: CareerProjector::new(normalizer.clone()),
            normalizer,
        }
    }

    pub fn compare(
        &self,
        offers: &[Offer],
        options: &ComparisonOptions,
    ) -> Result<ComparisonResult, InvalidInput> {
        let weights = self.guard.check_comparison(offers, options)?;
        let engine = ScoringEngine::new(weights)?.with_thresholds(self.thresholds);

        let inputs: Vec<ScoringInput> = offers
            .iter()
            .map(|offer| ScoringInput {
                offer_id: offer.id.clone(),
                company: offer.company.clone(),
                compensation: self
                    .normalizer
                    .normalize(offer, options.scenario_by_offer.get(&offer.id)),
                col_index: options.col_index_by_offer.get(&offer.id).copied(),
                ratings: options
                    .ratings_by_offer
                    .get(&offer.id)
                    .copied()
                    .unwrap_or_else(Ratings::default),
            })
            .collect();

        let scored = engine.score(&inputs)?;
        let recommendations = engine.recommend(&scored);
        let ranking = engine
            .rank(&scored)
            .into_iter()
            .map(|index| scored[index].offer_id.clone())
            .collect();

        let rows = offers
            .iter()
            .zip(scored)
            .zip(recommendations)
            .map(|((offer, scored), signals)| OfferComparisonRow {
                offer_id: scored.offer_id,
                company: scored.company,
                title: offer.title.clone(),
                work_mode: offer.work_mode,
                salary: scored.compensation.salary,
                bonus: scored.compensation.bonus,
                equity: scored.compensation.equity,
                benefits: scored.compensation.benefits,
                total_comp: scored.compensation.total_comp,
                col_index: scored.col_index,
                col_adjusted_total: scored.col_adjusted_total,
                non_financial_score: scored.non_financial_score,
                financial_score: scored.financial_score,
                overall_score: scored.overall_score,
                negotiation_recommendations: signals
                    .iter()
                    .map(|signal| signal.message())
                    .collect(),
            })
            .collect();

        let mut result = ComparisonResult {
            matrix_version: MATRIX_VERSION,
            offers: rows,
            matrix_rows: matrix_rows(),
            ranking,
            analysis_summary: String::new(),
        };
        result.analysis_summary = narrative::comparison_summary(&result);

        debug!(
            offers = result.offers.len(),
            top = result.ranking.first().map(OfferId::as_str),
            "offer comparison computed"
        );

        Ok(result)
    }

    pub fn project_career(
        &self,
        offers: &[Offer],
        inputs: &CareerProjectionInputs,
    ) -> Result<CareerProjectionResult, InvalidInput> {
        self.guard.check_projection(offers, inputs)?;

        let mut result = self.projector.project(offers, inputs)?;
        result.analysis_summary = Some(narrative::projection_summary(&result));
        result.recommendation = Some(narrative::projection_recommendation(&result));

        debug!(offers = result.offers.len(), "career projection computed");

        Ok(result)
    }
}

/// Compare offers with the default engine configuration.
pub fn compare(
    offers: &[Offer],
    options: &ComparisonOptions,
) -> Result<ComparisonResult, InvalidInput> {
    OfferEvaluationEngine::default().compare(offers, options)
}

/// Project careers with the default engine configuration.
pub fn project_career(
    offers: &[Offer],
    inputs: &CareerProjectionInputs,
) -> Result<CareerProjectionResult, InvalidInput> {
    OfferEvaluationEngine::default().project_career(offers, inputs)
}
