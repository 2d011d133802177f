use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{Offer, OfferId, ScenarioOverrides};
use super::guard::InvalidInput;
use crate::config::{EngineConfig, BASELINE_COL_INDEX};

/// Canonical four-part compensation for one offer in one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCompensation {
    pub salary: f64,
    pub bonus: f64,
    pub equity: f64,
    pub benefits: f64,
    pub total_comp: f64,
}

impl NormalizedCompensation {
    pub fn from_parts(salary: f64, bonus: f64, equity: f64, benefits: f64) -> Self {
        Self {
            salary,
            bonus,
            equity,
            benefits,
            total_comp: salary + bonus + equity + benefits,
        }
    }
}

/// Converts offer records into [`NormalizedCompensation`].
///
/// Negative amounts are clamped to 0 and logged; a missing benefits value is replaced by
/// the configured default. Scenario percentages multiply each component by
/// `1 + pct / 100` before the total is summed.
#[derive(Debug, Clone)]
pub struct CompensationNormalizer {
    default_benefits_value: f64,
}

impl Default for CompensationNormalizer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl CompensationNormalizer {
    pub fn new(default_benefits_value: f64) -> Self {
        Self {
            default_benefits_value: default_benefits_value.max(0.0),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.default_benefits_value)
    }

    pub fn default_benefits_value(&self) -> f64 {
        self.default_benefits_value
    }

    pub fn normalize(
        &self,
        offer: &Offer,
        overrides: Option<&ScenarioOverrides>,
    ) -> NormalizedCompensation {
        let overrides = overrides.copied().unwrap_or_default();
        let benefits = offer.benefits.unwrap_or(self.default_benefits_value);

        let salary = adjusted(&offer.id, "base_salary", offer.base_salary, overrides.salary_pct);
        let bonus = adjusted(&offer.id, "bonus", offer.bonus, overrides.bonus_pct);
        let equity = adjusted(&offer.id, "equity", offer.equity, overrides.equity_pct);
        let benefits = adjusted(&offer.id, "benefits", benefits, overrides.benefits_pct);

        NormalizedCompensation::from_parts(salary, bonus, equity, benefits)
    }
}

fn adjusted(offer_id: &OfferId, field: &'static str, raw: f64, pct: f64) -> f64 {
    let base = clamp_non_negative(offer_id, field, raw);
    clamp_non_negative(offer_id, field, apply_pct(base, pct))
}

pub(crate) fn apply_pct(value: f64, pct: f64) -> f64 {
    value * (1.0 + pct / 100.0)
}

pub(crate) fn clamp_non_negative(offer_id: &OfferId, field: &'static str, value: f64) -> f64 {
    if value < 0.0 {
        warn!(offer_id = %offer_id, field, value, "negative compensation clamped to 0");
        0.0
    } else {
        value
    }
}

/// Rescale a total by `baseline / col_index`. A missing index means the baseline.
pub fn adjust_for_cost_of_living(
    offer_id: &OfferId,
    total_comp: f64,
    col_index: Option<f64>,
) -> Result<f64, InvalidInput> {
    let index = col_index.unwrap_or(BASELINE_COL_INDEX);
    if !index.is_finite() || index <= 0.0 {
        return Err(InvalidInput::InvalidColIndex {
            offer_id: offer_id.clone(),
            value: index,
        });
    }

    if index == BASELINE_COL_INDEX {
        return Ok(total_comp);
    }

    Ok(total_comp * (BASELINE_COL_INDEX / index))
}

/// Whole-dollar rendering with thousands separators, e.g. `$155,556`.
pub fn format_currency(value: f64) -> String {
    let rounded = value.abs().round() as u64;
    let grouped = rounded.to_formatted_string(&Locale::en);

    if value < 0.0 && rounded > 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
