use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for offers owned by the job-tracking collaborator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OfferId(pub String);

impl OfferId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the work happens, normalized from free-text listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum WorkMode {
    Remote,
    Hybrid,
    Onsite,
}

impl WorkMode {
    /// Map free text such as "WFH" or "in office" onto a work mode.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned = raw
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        match cleaned.as_str() {
            "remote" | "fully remote" | "remote first" | "wfh" | "work from home"
            | "distributed" | "anywhere" => Some(Self::Remote),
            "hybrid" | "flex" | "flexible" | "partially remote" | "partly remote"
            | "remote friendly" => Some(Self::Hybrid),
            "onsite" | "on site" | "in office" | "office" | "in person" => Some(Self::Onsite),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            WorkMode::Remote => "remote",
            WorkMode::Hybrid => "hybrid",
            WorkMode::Onsite => "onsite",
        }
    }
}

impl TryFrom<String> for WorkMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        WorkMode::parse(&value).ok_or_else(|| format!("unrecognized work mode '{value}'"))
    }
}

/// A job opportunity under evaluation. The engine reads offers and never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub work_mode: Option<WorkMode>,
    pub base_salary: f64,
    #[serde(default)]
    pub bonus: f64,
    #[serde(default)]
    pub equity: f64,
    /// Annual estimate; `None` means the configured default is assumed.
    #[serde(default)]
    pub benefits: Option<f64>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub archive_reason: Option<String>,
}

impl Offer {
    pub fn display_name(&self) -> String {
        if self.title.trim().is_empty() {
            self.company.clone()
        } else {
            format!("{} ({})", self.company, self.title)
        }
    }

    pub fn apply_patch(&mut self, patch: &CompensationPatch) {
        if let Some(salary) = patch.base_salary {
            self.base_salary = salary;
        }
        if let Some(bonus) = patch.bonus {
            self.bonus = bonus;
        }
        if let Some(equity) = patch.equity {
            self.equity = equity;
        }
        if let Some(benefits) = patch.benefits {
            self.benefits = Some(benefits);
        }
    }
}

/// Partial compensation update routed to the offer source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompensationPatch {
    #[serde(default)]
    pub base_salary: Option<f64>,
    #[serde(default)]
    pub bonus: Option<f64>,
    #[serde(default)]
    pub equity: Option<f64>,
    #[serde(default)]
    pub benefits: Option<f64>,
}

/// "What if I negotiate" percentage deltas applied before scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOverrides {
    #[serde(default)]
    pub salary_pct: f64,
    #[serde(default)]
    pub bonus_pct: f64,
    #[serde(default)]
    pub equity_pct: f64,
    #[serde(default)]
    pub benefits_pct: f64,
}

pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;
pub const NEUTRAL_RATING: u8 = 3;

fn neutral_rating() -> u8 {
    NEUTRAL_RATING
}

/// User supplied qualitative ratings on a 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    #[serde(default = "neutral_rating")]
    pub culture_fit: u8,
    #[serde(default = "neutral_rating")]
    pub growth: u8,
    #[serde(default = "neutral_rating")]
    pub work_life_balance: u8,
    #[serde(default = "neutral_rating")]
    pub remote_policy: u8,
}

impl Default for Ratings {
    fn default() -> Self {
        Self {
            culture_fit: NEUTRAL_RATING,
            growth: NEUTRAL_RATING,
            work_life_balance: NEUTRAL_RATING,
            remote_policy: NEUTRAL_RATING,
        }
    }
}

impl Ratings {
    pub fn new(culture_fit: u8, growth: u8, work_life_balance: u8, remote_policy: u8) -> Self {
        Self {
            culture_fit,
            growth,
            work_life_balance,
            remote_policy,
        }
    }

    pub(crate) fn entries(&self) -> [(&'static str, u8); 4] {
        [
            ("culture_fit", self.culture_fit),
            ("growth", self.growth),
            ("work_life_balance", self.work_life_balance),
            ("remote_policy", self.remote_policy),
        ]
    }
}

fn unit_weight() -> f64 {
    1.0
}

/// Weighting shared by every offer in one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// Share of the overall score taken by the financial score; the rest goes to the
    /// non-financial composite.
    pub financial: f64,
    #[serde(default = "unit_weight")]
    pub culture_fit: f64,
    #[serde(default = "unit_weight")]
    pub growth: f64,
    #[serde(default = "unit_weight")]
    pub work_life_balance: f64,
    #[serde(default = "unit_weight")]
    pub remote_policy: f64,
}

impl Weights {
    pub fn with_financial(financial: f64) -> Self {
        Self {
            financial,
            culture_fit: 1.0,
            growth: 1.0,
            work_life_balance: 1.0,
            remote_policy: 1.0,
        }
    }

    pub(crate) fn sub_weights(&self) -> [(&'static str, f64); 4] {
        [
            ("culture_fit", self.culture_fit),
            ("growth", self.growth),
            ("work_life_balance", self.work_life_balance),
            ("remote_policy", self.remote_policy),
        ]
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::with_financial(crate::config::DEFAULT_FINANCIAL_WEIGHT)
    }
}

/// Per-comparison overrides keyed by offer. Exactly the inputs needed to replay a result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOptions {
    #[serde(default)]
    pub col_index_by_offer: BTreeMap<OfferId, f64>,
    #[serde(default)]
    pub scenario_by_offer: BTreeMap<OfferId, ScenarioOverrides>,
    #[serde(default)]
    pub ratings_by_offer: BTreeMap<OfferId, Ratings>,
    #[serde(default)]
    pub weights: Option<Weights>,
}

/// A declared promotion or raise event in a career projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerMilestone {
    pub year: u8,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub salary_bump_pct: f64,
    #[serde(default)]
    pub bonus_bump_pct: f64,
    #[serde(default)]
    pub equity_bump_pct: f64,
    #[serde(default)]
    pub benefits_bump_pct: f64,
    #[serde(default)]
    pub note: String,
}

/// Named annual salary raise assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaiseScenarios {
    pub conservative_pct: f64,
    pub expected_pct: f64,
    pub optimistic_pct: f64,
}

impl Default for RaiseScenarios {
    fn default() -> Self {
        Self {
            conservative_pct: 2.0,
            expected_pct: 3.0,
            optimistic_pct: 5.0,
        }
    }
}

impl RaiseScenarios {
    pub fn pct_for(&self, scenario: ScenarioKey) -> f64 {
        match scenario {
            ScenarioKey::Conservative => self.conservative_pct,
            ScenarioKey::Expected => self.expected_pct,
            ScenarioKey::Optimistic => self.optimistic_pct,
        }
    }
}

/// Flat annual growth for the non-salary components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthRates {
    #[serde(default)]
    pub bonus_pct: f64,
    #[serde(default)]
    pub equity_pct: f64,
    #[serde(default)]
    pub benefits_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKey {
    Conservative,
    Expected,
    Optimistic,
}

impl ScenarioKey {
    pub const fn ordered() -> [ScenarioKey; 3] {
        [
            ScenarioKey::Conservative,
            ScenarioKey::Expected,
            ScenarioKey::Optimistic,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScenarioKey::Conservative => "conservative",
            ScenarioKey::Expected => "expected",
            ScenarioKey::Optimistic => "optimistic",
        }
    }
}

impl std::str::FromStr for ScenarioKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ScenarioKey::ordered()
            .into_iter()
            .find(|key| key.label().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                format!("unknown scenario '{value}' (expected conservative, expected or optimistic)")
            })
    }
}

/// Explicit year-0 values replacing the offer's normalized compensation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartingCompensation {
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub bonus: Option<f64>,
    #[serde(default)]
    pub equity: Option<f64>,
    #[serde(default)]
    pub benefits: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Inputs for a career projection over a set of offers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerProjectionInputs {
    #[serde(default)]
    pub starting_by_offer: BTreeMap<OfferId, StartingCompensation>,
    #[serde(default)]
    pub raise_scenarios: RaiseScenarios,
    #[serde(default)]
    pub growth: GrowthRates,
    #[serde(default)]
    pub milestones: Vec<CareerMilestone>,
    /// Replaces the shared milestone list for the named offers.
    #[serde(default)]
    pub milestones_by_offer: BTreeMap<OfferId, Vec<CareerMilestone>>,
}

impl CareerProjectionInputs {
    pub(crate) fn milestones_for(&self, offer_id: &OfferId) -> &[CareerMilestone] {
        self.milestones_by_offer
            .get(offer_id)
            .map(Vec::as_slice)
            .unwrap_or(&self.milestones)
    }
}
