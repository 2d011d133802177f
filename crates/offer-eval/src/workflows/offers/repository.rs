use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::comparison::ComparisonResult;
use super::domain::{CompensationPatch, ComparisonOptions, Offer, OfferId};

/// Identifier assigned by the saved-comparison store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComparisonId(pub String);

impl fmt::Display for ComparisonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted snapshot; `inputs` alone reproduce `result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedComparison {
    pub id: ComparisonId,
    pub name: String,
    pub job_ids: Vec<OfferId>,
    pub inputs: ComparisonOptions,
    pub result: ComparisonResult,
    pub created_at: DateTime<Utc>,
}

impl SavedComparison {
    pub fn summary_view(&self) -> SavedComparisonView {
        SavedComparisonView {
            id: self.id.clone(),
            name: self.name.clone(),
            job_ids: self.job_ids.clone(),
            top_ranked: self.result.ranking.first().cloned(),
            created_at: self.created_at,
        }
    }
}

/// Listing entry without the full result payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedComparisonView {
    pub id: ComparisonId,
    pub name: String,
    pub job_ids: Vec<OfferId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_ranked: Option<OfferId>,
    pub created_at: DateTime<Utc>,
}

/// Offers owned by the job-tracking collaborator.
pub trait OfferSource: Send + Sync {
    fn list_offers(&self, archived: bool) -> Result<Vec<Offer>, OfferSourceError>;
    fn update_offer_comp(
        &self,
        id: &OfferId,
        patch: &CompensationPatch,
    ) -> Result<Offer, OfferSourceError>;
    fn archive_offer(&self, id: &OfferId, reason: Option<String>)
        -> Result<Offer, OfferSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OfferSourceError {
    #[error("offer {0} not found")]
    NotFound(OfferId),
    #[error("offer source unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for saved comparisons. The engine never calls this itself.
pub trait SavedComparisonStore: Send + Sync {
    fn save(
        &self,
        name: String,
        job_ids: Vec<OfferId>,
        inputs: ComparisonOptions,
        result: ComparisonResult,
    ) -> Result<SavedComparison, StoreError>;
    fn list(&self) -> Result<Vec<SavedComparison>, StoreError>;
    fn get(&self, id: &ComparisonId) -> Result<SavedComparison, StoreError>;
    fn delete(&self, id: &ComparisonId) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("saved comparison {0} not found")]
    NotFound(ComparisonId),
    #[error("saved comparison store unavailable: {0}")]
    Unavailable(String),
}
