use std::collections::{BTreeMap, BTreeSet};

use super::domain::{
    CareerMilestone, CareerProjectionInputs, ComparisonOptions, Offer, OfferId, Weights,
    RATING_MAX, RATING_MIN,
};
use crate::config::EngineConfig;

pub const MIN_COMPARISON_OFFERS: usize = 2;
pub const MAX_PROJECTION_YEAR: u8 = 10;

/// Rejections raised before any computation runs. Each variant names the offending
/// offer and field where one exists so callers can point at the exact input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("a comparison needs at least 2 offers, got {found}")]
    TooFewOffers { found: usize },
    #[error("a career projection needs at least one offer")]
    NoOffers,
    #[error("offer {offer_id} appears more than once")]
    DuplicateOffer { offer_id: OfferId },
    #[error("{field} references offer {offer_id}, which is not part of this request")]
    UnknownOffer { offer_id: OfferId, field: &'static str },
    #[error("offer {offer_id} has a non-finite {field}")]
    NonFiniteValue { offer_id: OfferId, field: &'static str },
    #[error("offer {offer_id} has cost-of-living index {value}; the index must be greater than 0")]
    InvalidColIndex { offer_id: OfferId, value: f64 },
    #[error("financial weight {value} is outside [0, 1]")]
    FinancialWeightOutOfRange { value: f64 },
    #[error("weight {field} must be a finite, non-negative number (got {value})")]
    InvalidWeight { field: &'static str, value: f64 },
    #[error("non-financial weights sum to zero; at least one must be positive")]
    ZeroWeightSum,
    #[error("offer {offer_id} has {field} rating {value}; ratings run from 1 to 5")]
    RatingOutOfRange {
        offer_id: OfferId,
        field: &'static str,
        value: u8,
    },
    #[error("{field} must be a finite percentage")]
    InvalidPercentage { field: &'static str },
    #[error("milestone year {year} is outside 1..=10")]
    MilestoneYearOutOfRange { year: u8 },
    #[error("pass either inline offers or job_ids, not both")]
    ConflictingOfferSelection,
}

impl InvalidInput {
    pub fn offer_id(&self) -> Option<&OfferId> {
        match self {
            InvalidInput::DuplicateOffer { offer_id }
            | InvalidInput::UnknownOffer { offer_id, .. }
            | InvalidInput::NonFiniteValue { offer_id, .. }
            | InvalidInput::InvalidColIndex { offer_id, .. }
            | InvalidInput::RatingOutOfRange { offer_id, .. } => Some(offer_id),
            _ => None,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            InvalidInput::UnknownOffer { field, .. }
            | InvalidInput::NonFiniteValue { field, .. }
            | InvalidInput::InvalidWeight { field, .. }
            | InvalidInput::RatingOutOfRange { field, .. }
            | InvalidInput::InvalidPercentage { field } => Some(*field),
            InvalidInput::InvalidColIndex { .. } => Some("col_index"),
            InvalidInput::FinancialWeightOutOfRange { .. } => Some("weights.financial"),
            InvalidInput::ZeroWeightSum => Some("weights"),
            InvalidInput::MilestoneYearOutOfRange { .. } => Some("milestones.year"),
            InvalidInput::ConflictingOfferSelection => Some("job_ids"),
            InvalidInput::TooFewOffers { .. }
            | InvalidInput::NoOffers
            | InvalidInput::DuplicateOffer { .. } => None,
        }
    }
}

/// Validates comparison and projection requests once, at the boundary.
#[derive(Debug, Clone, Default)]
pub struct InputGuard {
    config: EngineConfig,
}

impl InputGuard {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Resolve the weights for a comparison, falling back to the configured financial weight.
    pub fn resolve_weights(&self, options: &ComparisonOptions) -> Result<Weights, InvalidInput> {
        let weights = options
            .weights
            .unwrap_or_else(|| Weights::with_financial(self.config.default_financial_weight));
        validate_weights(&weights)?;
        Ok(weights)
    }

    pub fn check_comparison(
        &self,
        offers: &[Offer],
        options: &ComparisonOptions,
    ) -> Result<Weights, InvalidInput> {
        if offers.len() < MIN_COMPARISON_OFFERS {
            return Err(InvalidInput::TooFewOffers {
                found: offers.len(),
            });
        }

        let known = known_ids(offers)?;
        for offer in offers {
            check_compensation(offer)?;
        }

        ensure_known(&known, &options.col_index_by_offer, "col_index_by_offer")?;
        ensure_known(&known, &options.scenario_by_offer, "scenario_by_offer")?;
        ensure_known(&known, &options.ratings_by_offer, "ratings_by_offer")?;

        for (offer_id, value) in &options.col_index_by_offer {
            if !value.is_finite() || *value <= 0.0 {
                return Err(InvalidInput::InvalidColIndex {
                    offer_id: offer_id.clone(),
                    value: *value,
                });
            }
        }

        for (offer_id, scenario) in &options.scenario_by_offer {
            for (field, pct) in [
                ("scenario.salary_pct", scenario.salary_pct),
                ("scenario.bonus_pct", scenario.bonus_pct),
                ("scenario.equity_pct", scenario.equity_pct),
                ("scenario.benefits_pct", scenario.benefits_pct),
            ] {
                if !pct.is_finite() {
                    return Err(InvalidInput::NonFiniteValue {
                        offer_id: offer_id.clone(),
                        field,
                    });
                }
            }
        }

        for (offer_id, ratings) in &options.ratings_by_offer {
            for (field, value) in ratings.entries() {
                if !(RATING_MIN..=RATING_MAX).contains(&value) {
                    return Err(InvalidInput::RatingOutOfRange {
                        offer_id: offer_id.clone(),
                        field,
                        value,
                    });
                }
            }
        }

        self.resolve_weights(options)
    }

    pub fn check_projection(
        &self,
        offers: &[Offer],
        inputs: &CareerProjectionInputs,
    ) -> Result<(), InvalidInput> {
        if offers.is_empty() {
            return Err(InvalidInput::NoOffers);
        }

        let known = known_ids(offers)?;
        for offer in offers {
            check_compensation(offer)?;
        }

        ensure_known(&known, &inputs.starting_by_offer, "starting_by_offer")?;
        ensure_known(&known, &inputs.milestones_by_offer, "milestones_by_offer")?;

        for (offer_id, starting) in &inputs.starting_by_offer {
            for (field, value) in [
                ("starting.salary", starting.salary),
                ("starting.bonus", starting.bonus),
                ("starting.equity", starting.equity),
                ("starting.benefits", starting.benefits),
            ] {
                if value.is_some_and(|value| !value.is_finite()) {
                    return Err(InvalidInput::NonFiniteValue {
                        offer_id: offer_id.clone(),
                        field,
                    });
                }
            }
        }

        for (field, pct) in [
            ("raise_scenarios.conservative_pct", inputs.raise_scenarios.conservative_pct),
            ("raise_scenarios.expected_pct", inputs.raise_scenarios.expected_pct),
            ("raise_scenarios.optimistic_pct", inputs.raise_scenarios.optimistic_pct),
            ("growth.bonus_pct", inputs.growth.bonus_pct),
            ("growth.equity_pct", inputs.growth.equity_pct),
            ("growth.benefits_pct", inputs.growth.benefits_pct),
        ] {
            if !pct.is_finite() {
                return Err(InvalidInput::InvalidPercentage { field });
            }
        }

        check_milestones(&inputs.milestones)?;
        for milestones in inputs.milestones_by_offer.values() {
            check_milestones(milestones)?;
        }

        Ok(())
    }
}

/// Sums of finite amounts can still overflow; scores and projections need finite totals.
pub(crate) fn ensure_finite(
    offer_id: &OfferId,
    field: &'static str,
    value: f64,
) -> Result<(), InvalidInput> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InvalidInput::NonFiniteValue {
            offer_id: offer_id.clone(),
            field,
        })
    }
}

pub(crate) fn validate_weights(weights: &Weights) -> Result<(), InvalidInput> {
    if !weights.financial.is_finite() || !(0.0..=1.0).contains(&weights.financial) {
        return Err(InvalidInput::FinancialWeightOutOfRange {
            value: weights.financial,
        });
    }

    let mut total = 0.0;
    for (field, value) in weights.sub_weights() {
        if !value.is_finite() || value < 0.0 {
            return Err(InvalidInput::InvalidWeight { field, value });
        }
        total += value;
    }

    if total <= 0.0 {
        return Err(InvalidInput::ZeroWeightSum);
    }

    Ok(())
}

fn known_ids(offers: &[Offer]) -> Result<BTreeSet<&OfferId>, InvalidInput> {
    let mut known = BTreeSet::new();
    for offer in offers {
        if !known.insert(&offer.id) {
            return Err(InvalidInput::DuplicateOffer {
                offer_id: offer.id.clone(),
            });
        }
    }
    Ok(known)
}

fn ensure_known<V>(
    known: &BTreeSet<&OfferId>,
    overrides: &BTreeMap<OfferId, V>,
    field: &'static str,
) -> Result<(), InvalidInput> {
    match overrides.keys().find(|offer_id| !known.contains(offer_id)) {
        Some(offer_id) => Err(InvalidInput::UnknownOffer {
            offer_id: offer_id.clone(),
            field,
        }),
        None => Ok(()),
    }
}

// Negative amounts are clamped later; only values no clamp can repair are rejected here.
fn check_compensation(offer: &Offer) -> Result<(), InvalidInput> {
    let fields = [
        ("base_salary", Some(offer.base_salary)),
        ("bonus", Some(offer.bonus)),
        ("equity", Some(offer.equity)),
        ("benefits", offer.benefits),
    ];

    for (field, value) in fields {
        if value.is_some_and(|value| !value.is_finite()) {
            return Err(InvalidInput::NonFiniteValue {
                offer_id: offer.id.clone(),
                field,
            });
        }
    }

    Ok(())
}

fn check_milestones(milestones: &[CareerMilestone]) -> Result<(), InvalidInput> {
    for milestone in milestones {
        if milestone.year == 0 || milestone.year > MAX_PROJECTION_YEAR {
            return Err(InvalidInput::MilestoneYearOutOfRange {
                year: milestone.year,
            });
        }

        for (field, pct) in [
            ("milestones.salary_bump_pct", milestone.salary_bump_pct),
            ("milestones.bonus_bump_pct", milestone.bonus_bump_pct),
            ("milestones.equity_bump_pct", milestone.equity_bump_pct),
            ("milestones.benefits_bump_pct", milestone.benefits_bump_pct),
        ] {
            if !pct.is_finite() {
                return Err(InvalidInput::InvalidPercentage { field });
            }
        }
    }

    Ok(())
}
