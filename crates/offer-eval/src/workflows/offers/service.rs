use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use super::comparison::{ComparisonResult, OfferEvaluationEngine};
use super::domain::{CareerProjectionInputs, CompensationPatch, ComparisonOptions, Offer, OfferId};
use super::guard::InvalidInput;
use super::narrative::{
    narrate, NarrativeGenerator, NarrativeKind, NarrativeRequest, NarrativeSource,
};
use super::projection::CareerProjectionResult;
use super::repository::{
    ComparisonId, OfferSource, OfferSourceError, SavedComparison, SavedComparisonStore,
    StoreError,
};
use crate::config::EngineConfig;

/// Comparison plus where its summary text came from.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    #[serde(flatten)]
    pub result: ComparisonResult,
    pub narrative_source: NarrativeSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectionReport {
    #[serde(flatten)]
    pub result: CareerProjectionResult,
    pub narrative_source: NarrativeSource,
}

/// Outcome of recomputing a saved comparison from its stored inputs.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutcome {
    pub saved: SavedComparison,
    pub recomputed: ComparisonResult,
    pub matches: bool,
}

/// Service composing the engine with the offer source, the saved-comparison store and the
/// optional narrative generator.
pub struct OfferEvaluationService<O, S, N> {
    engine: Arc<OfferEvaluationEngine>,
    offers: Arc<O>,
    store: Arc<S>,
    narrator: Arc<N>,
    narrative_timeout: Duration,
}

impl<O, S, N> OfferEvaluationService<O, S, N>
where
    O: OfferSource + 'static,
    S: SavedComparisonStore + 'static,
    N: NarrativeGenerator + 'static,
{
    pub fn new(offers: Arc<O>, store: Arc<S>, narrator: Arc<N>, config: EngineConfig) -> Self {
        let narrative_timeout = config.narrative_timeout;
        Self {
            engine: Arc::new(OfferEvaluationEngine::new(config)),
            offers,
            store,
            narrator,
            narrative_timeout,
        }
    }

    /// Look up active offers by ID, preserving the requested order.
    pub fn resolve_offers(&self, job_ids: &[OfferId]) -> Result<Vec<Offer>, ServiceError> {
        let active = self.offers.list_offers(false)?;
        job_ids
            .iter()
            .map(|job_id| {
                active
                    .iter()
                    .find(|offer| &offer.id == job_id)
                    .cloned()
                    .ok_or_else(|| {
                        ServiceError::InvalidInput(InvalidInput::UnknownOffer {
                            offer_id: job_id.clone(),
                            field: "job_ids",
                        })
                    })
            })
            .collect()
    }

    /// Offers for a request that names them either inline or by job ID.
    pub fn select_offers(
        &self,
        offers: Vec<Offer>,
        job_ids: &[OfferId],
    ) -> Result<Vec<Offer>, ServiceError> {
        match (offers.is_empty(), job_ids.is_empty()) {
            (false, false) => Err(InvalidInput::ConflictingOfferSelection.into()),
            (_, true) => Ok(offers),
            (true, false) => self.resolve_offers(job_ids),
        }
    }

    pub async fn compare(
        &self,
        offers: &[Offer],
        options: &ComparisonOptions,
    ) -> Result<ComparisonReport, ServiceError> {
        let mut result = self.engine.compare(offers, options)?;

        let request = NarrativeRequest {
            kind: NarrativeKind::ComparisonSummary,
            payload: serde_json::to_value(&result).unwrap_or_default(),
            template: result.analysis_summary.clone(),
        };
        let narrative = narrate(self.narrator.as_ref(), &request, self.narrative_timeout).await;
        result.analysis_summary = narrative.text;

        info!(
            offers = result.offers.len(),
            narrative = ?narrative.source,
            "comparison served"
        );

        Ok(ComparisonReport {
            result,
            narrative_source: narrative.source,
        })
    }

    pub async fn compare_by_ids(
        &self,
        job_ids: &[OfferId],
        options: &ComparisonOptions,
    ) -> Result<ComparisonReport, ServiceError> {
        let offers = self.resolve_offers(job_ids)?;
        self.compare(&offers, options).await
    }

    pub async fn project(
        &self,
        offers: &[Offer],
        inputs: &CareerProjectionInputs,
    ) -> Result<ProjectionReport, ServiceError> {
        let mut result = self.engine.project_career(offers, inputs)?;
        let payload = serde_json::to_value(&result).unwrap_or_default();

        let summary_request = NarrativeRequest {
            kind: NarrativeKind::ProjectionSummary,
            payload: payload.clone(),
            template: result.analysis_summary.clone().unwrap_or_default(),
        };
        let recommendation_request = NarrativeRequest {
            kind: NarrativeKind::ProjectionRecommendation,
            payload,
            template: result.recommendation.clone().unwrap_or_default(),
        };

        let summary = narrate(self.narrator.as_ref(), &summary_request, self.narrative_timeout).await;
        let recommendation = narrate(
            self.narrator.as_ref(),
            &recommendation_request,
            self.narrative_timeout,
        )
        .await;

        let narrative_source = if summary.source == NarrativeSource::Generated
            && recommendation.source == NarrativeSource::Generated
        {
            NarrativeSource::Generated
        } else {
            NarrativeSource::Template
        };

        result.analysis_summary = Some(summary.text);
        result.recommendation = Some(recommendation.text);

        info!(offers = result.offers.len(), narrative = ?narrative_source, "projection served");

        Ok(ProjectionReport {
            result,
            narrative_source,
        })
    }

    pub async fn project_by_ids(
        &self,
        job_ids: &[OfferId],
        inputs: &CareerProjectionInputs,
    ) -> Result<ProjectionReport, ServiceError> {
        let offers = self.resolve_offers(job_ids)?;
        self.project(&offers, inputs).await
    }

    /// Compute and persist a comparison. The stored result carries only template text so it
    /// can be replayed byte for byte.
    pub fn save_comparison(
        &self,
        name: String,
        job_ids: Vec<OfferId>,
        inputs: ComparisonOptions,
    ) -> Result<SavedComparison, ServiceError> {
        let offers = self.resolve_offers(&job_ids)?;
        let result = self.engine.compare(&offers, &inputs)?;
        let saved = self.store.save(name, job_ids, inputs, result)?;
        info!(comparison_id = %saved.id, "comparison saved");
        Ok(saved)
    }

    pub fn list_saved(&self) -> Result<Vec<SavedComparison>, ServiceError> {
        Ok(self.store.list()?)
    }

    pub fn get_saved(&self, id: &ComparisonId) -> Result<SavedComparison, ServiceError> {
        Ok(self.store.get(id)?)
    }

    pub fn delete_saved(&self, id: &ComparisonId) -> Result<(), ServiceError> {
        self.store.delete(id)?;
        info!(comparison_id = %id, "saved comparison deleted");
        Ok(())
    }

    /// Recompute a saved comparison from its inputs against the current offers.
    /// `matches` is false when offers changed since the save.
    pub fn replay_saved(&self, id: &ComparisonId) -> Result<ReplayOutcome, ServiceError> {
        let saved = self.store.get(id)?;
        let offers = self.resolve_offers(&saved.job_ids)?;
        let recomputed = self.engine.compare(&offers, &saved.inputs)?;
        let matches = recomputed == saved.result;

        Ok(ReplayOutcome {
            saved,
            recomputed,
            matches,
        })
    }

    pub fn list_offers(&self, archived: bool) -> Result<Vec<Offer>, ServiceError> {
        Ok(self.offers.list_offers(archived)?)
    }

    pub fn update_offer_comp(
        &self,
        id: &OfferId,
        patch: &CompensationPatch,
    ) -> Result<Offer, ServiceError> {
        Ok(self.offers.update_offer_comp(id, patch)?)
    }

    pub fn archive_offer(&self, id: &OfferId, reason: Option<String>) -> Result<Offer, ServiceError> {
        Ok(self.offers.archive_offer(id, reason)?)
    }
}

/// Error raised by the offer evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    OfferSource(#[from] OfferSourceError),
}
