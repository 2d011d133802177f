use serde::{Deserialize, Serialize};

use super::compensation::{
    apply_pct, clamp_non_negative, CompensationNormalizer, NormalizedCompensation,
};
use super::domain::{
    CareerMilestone, CareerProjectionInputs, GrowthRates, Offer, OfferId, RaiseScenarios,
    ScenarioKey,
};
use super::guard::{ensure_finite, InvalidInput};

pub const FIVE_YEAR_HORIZON: usize = 5;
pub const TEN_YEAR_HORIZON: usize = 10;

/// Title shown for year 0 when no starting title is supplied.
pub const DEFAULT_TITLE: &str = "—";

/// Parallel year-indexed arrays; index `y` holds year `y`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSeries {
    pub years: Vec<u8>,
    pub salary: Vec<f64>,
    pub bonus: Vec<f64>,
    pub equity: Vec<f64>,
    pub benefits: Vec<f64>,
    pub total_comp: Vec<f64>,
    pub title: Vec<String>,
}

impl ProjectionSeries {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            years: Vec::with_capacity(capacity),
            salary: Vec::with_capacity(capacity),
            bonus: Vec::with_capacity(capacity),
            equity: Vec::with_capacity(capacity),
            benefits: Vec::with_capacity(capacity),
            total_comp: Vec::with_capacity(capacity),
            title: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, year: u8, values: &NormalizedCompensation, title: &str) {
        self.years.push(year);
        self.salary.push(values.salary);
        self.bonus.push(values.bonus);
        self.equity.push(values.equity);
        self.benefits.push(values.benefits);
        self.total_comp.push(values.total_comp);
        self.title.push(title.to_string());
    }

    /// Years `0..=horizon`.
    pub fn through_year(&self, horizon: usize) -> Self {
        let end = (horizon + 1).min(self.years.len());
        Self {
            years: self.years[..end].to_vec(),
            salary: self.salary[..end].to_vec(),
            bonus: self.bonus[..end].to_vec(),
            equity: self.equity[..end].to_vec(),
            benefits: self.benefits[..end].to_vec(),
            total_comp: self.total_comp[..end].to_vec(),
            title: self.title[..end].to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn final_salary(&self) -> f64 {
        self.salary.last().copied().unwrap_or_default()
    }

    pub fn final_total_comp(&self) -> f64 {
        self.total_comp.last().copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProjection {
    pub scenario: ScenarioKey,
    pub raise_pct: f64,
    pub five_year: ProjectionSeries,
    pub ten_year: ProjectionSeries,
    pub five_year_ending_salary: f64,
    pub five_year_ending_total_comp: f64,
    pub ten_year_ending_salary: f64,
    pub ten_year_ending_total_comp: f64,
    /// Years at which at least one milestone fired.
    pub milestone_years: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferProjection {
    pub offer_id: OfferId,
    pub company: String,
    pub title: String,
    pub starting: NormalizedCompensation,
    pub scenarios: Vec<ScenarioProjection>,
}

impl OfferProjection {
    pub fn scenario(&self, key: ScenarioKey) -> Option<&ScenarioProjection> {
        self.scenarios
            .iter()
            .find(|projection| projection.scenario == key)
    }
}

/// Everything a reader needs to reproduce the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionAssumptions {
    pub raise_scenarios: RaiseScenarios,
    pub growth: GrowthRates,
    pub milestones: Vec<CareerMilestone>,
    pub offers_with_specific_milestones: Vec<OfferId>,
    pub horizons: Vec<u8>,
    pub default_benefits_value: f64,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerProjectionResult {
    pub offers: Vec<OfferProjection>,
    pub assumptions: ProjectionAssumptions,
    #[serde(default)]
    pub analysis_summary: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
}

impl CareerProjectionResult {
    pub fn offer(&self, offer_id: &OfferId) -> Option<&OfferProjection> {
        self.offers
            .iter()
            .find(|projection| &projection.offer_id == offer_id)
    }
}

/// Year-by-year compounding simulation under each raise scenario.
#[derive(Debug, Clone, Default)]
pub struct CareerProjector {
    normalizer: CompensationNormalizer,
}

impl CareerProjector {
    pub fn new(normalizer: CompensationNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn project(
        &self,
        offers: &[Offer],
        inputs: &CareerProjectionInputs,
    ) -> Result<CareerProjectionResult, InvalidInput> {
        let projections = offers
            .iter()
            .map(|offer| self.project_offer(offer, inputs))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CareerProjectionResult {
            offers: projections,
            assumptions: self.assumptions(inputs),
            analysis_summary: None,
            recommendation: None,
        })
    }

    /// Fails when compounding pushes any projected total past the range of `f64`.
    pub fn project_offer(
        &self,
        offer: &Offer,
        inputs: &CareerProjectionInputs,
    ) -> Result<OfferProjection, InvalidInput> {
        let normalized = self.normalizer.normalize(offer, None);
        let override_values = inputs.starting_by_offer.get(&offer.id);
        let id = &offer.id;

        let starting = match override_values {
            Some(values) => NormalizedCompensation::from_parts(
                clamp_non_negative(
                    id,
                    "starting.salary",
                    values.salary.unwrap_or(normalized.salary),
                ),
                clamp_non_negative(
                    id,
                    "starting.bonus",
                    values.bonus.unwrap_or(normalized.bonus),
                ),
                clamp_non_negative(
                    id,
                    "starting.equity",
                    values.equity.unwrap_or(normalized.equity),
                ),
                clamp_non_negative(
                    id,
                    "starting.benefits",
                    values.benefits.unwrap_or(normalized.benefits),
                ),
            ),
            None => normalized,
        };
        ensure_finite(id, "total_comp", starting.total_comp)?;
        let starting_title = override_values
            .and_then(|values| values.title.as_deref())
            .unwrap_or(DEFAULT_TITLE);

        let milestones = inputs.milestones_for(&offer.id);

        let scenarios = ScenarioKey::ordered()
            .into_iter()
            .map(|scenario| -> Result<ScenarioProjection, InvalidInput> {
                let raise_pct = inputs.raise_scenarios.pct_for(scenario);
                let full = simulate(
                    &starting,
                    starting_title,
                    raise_pct,
                    &inputs.growth,
                    milestones,
                );
                for total in &full.total_comp {
                    ensure_finite(id, "projected_total_comp", *total)?;
                }
                let five_year = full.through_year(FIVE_YEAR_HORIZON);
                let ten_year = full.through_year(TEN_YEAR_HORIZON);

                let mut milestone_years: Vec<u8> =
                    milestones.iter().map(|milestone| milestone.year).collect();
                milestone_years.sort_unstable();
                milestone_years.dedup();

                Ok(ScenarioProjection {
                    scenario,
                    raise_pct,
                    five_year_ending_salary: five_year.final_salary(),
                    five_year_ending_total_comp: five_year.final_total_comp(),
                    ten_year_ending_salary: ten_year.final_salary(),
                    ten_year_ending_total_comp: ten_year.final_total_comp(),
                    five_year,
                    ten_year,
                    milestone_years,
                })
            })
            .collect::<Result<Vec<_>, InvalidInput>>()?;

        Ok(OfferProjection {
            offer_id: offer.id.clone(),
            company: offer.company.clone(),
            title: offer.title.clone(),
            starting,
            scenarios,
        })
    }

    fn assumptions(&self, inputs: &CareerProjectionInputs) -> ProjectionAssumptions {
        ProjectionAssumptions {
            raise_scenarios: inputs.raise_scenarios,
            growth: inputs.growth,
            milestones: inputs.milestones.clone(),
            offers_with_specific_milestones: inputs.milestones_by_offer.keys().cloned().collect(),
            horizons: vec![FIVE_YEAR_HORIZON as u8, TEN_YEAR_HORIZON as u8],
            default_benefits_value: self.normalizer.default_benefits_value(),
            notes: vec![
                "Raise scenarios apply to base salary only.".to_string(),
                "Bonus, equity and benefits grow at their own flat annual rates.".to_string(),
                "Milestone bumps compound on top of the scenario raise in their year.".to_string(),
                "No value is projected below zero.".to_string(),
            ],
        }
    }
}

/// Full ten-year trajectory for one scenario, year 0 included.
pub fn simulate(
    starting: &NormalizedCompensation,
    starting_title: &str,
    raise_pct: f64,
    growth: &GrowthRates,
    milestones: &[CareerMilestone],
) -> ProjectionSeries {
    let mut series = ProjectionSeries::with_capacity(TEN_YEAR_HORIZON + 1);
    let mut current = *starting;
    let mut title = starting_title.to_string();
    series.push(0, &current, &title);

    for year in 1..=TEN_YEAR_HORIZON as u8 {
        let mut salary = grow(current.salary, raise_pct);
        let mut bonus = grow(current.bonus, growth.bonus_pct);
        let mut equity = grow(current.equity, growth.equity_pct);
        let mut benefits = grow(current.benefits, growth.benefits_pct);

        for milestone in milestones.iter().filter(|milestone| milestone.year == year) {
            salary = grow(salary, milestone.salary_bump_pct);
            bonus = grow(bonus, milestone.bonus_bump_pct);
            equity = grow(equity, milestone.equity_bump_pct);
            benefits = grow(benefits, milestone.benefits_bump_pct);
            if let Some(next_title) = &milestone.title {
                title = next_title.clone();
            }
        }

        current = NormalizedCompensation::from_parts(salary, bonus, equity, benefits);
        series.push(year, &current, &title);
    }

    series
}

fn grow(value: f64, pct: f64) -> f64 {
    apply_pct(value, pct).max(0.0)
}
