use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::config::EngineConfig;
use crate::workflows::offers::comparison::ComparisonResult;
use crate::workflows::offers::domain::{
    CompensationPatch, ComparisonOptions, Offer, OfferId, WorkMode,
};
use crate::workflows::offers::narrative::{NarrativeError, NarrativeGenerator, NarrativeRequest};
use crate::workflows::offers::repository::{
    ComparisonId, OfferSource, OfferSourceError, SavedComparison, SavedComparisonStore,
    StoreError,
};
use crate::workflows::offers::{offer_router, OfferEvaluationService, TemplateNarrator};

pub(super) fn offer(id: &str, company: &str, base_salary: f64) -> Offer {
    Offer {
        id: OfferId::new(id),
        company: company.to_string(),
        title: "Software Engineer".to_string(),
        location: "Remote".to_string(),
        work_mode: Some(WorkMode::Remote),
        base_salary,
        bonus: 0.0,
        equity: 0.0,
        benefits: Some(0.0),
        archived: false,
        archive_reason: None,
    }
}

/// Offer A: 150,000 total at index 100. Offer B: 140,000 total at index 90.
pub(super) fn cost_of_living_pair() -> (Vec<Offer>, ComparisonOptions) {
    let offers = vec![offer("a", "Acme", 150_000.0), offer("b", "Globex", 140_000.0)];
    let mut options = ComparisonOptions::default();
    options.col_index_by_offer.insert(OfferId::new("a"), 100.0);
    options.col_index_by_offer.insert(OfferId::new("b"), 90.0);
    (offers, options)
}

pub(super) fn mixed_offers() -> Vec<Offer> {
    let mut acme = offer("a", "Acme", 150_000.0);
    acme.bonus = 15_000.0;
    acme.equity = 20_000.0;
    acme.benefits = Some(12_000.0);

    let mut globex = offer("b", "Globex", 135_000.0);
    globex.bonus = 10_000.0;
    globex.benefits = None;
    globex.work_mode = Some(WorkMode::Hybrid);

    let mut initech = offer("c", "Initech", 120_000.0);
    initech.bonus = 5_000.0;
    initech.benefits = Some(9_000.0);
    initech.work_mode = Some(WorkMode::Onsite);

    vec![acme, globex, initech]
}

pub(super) fn engine_config() -> EngineConfig {
    EngineConfig {
        narrative_timeout: Duration::from_millis(50),
        ..EngineConfig::default()
    }
}

pub(super) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} within {tolerance}, got {actual}"
    );
}

pub(super) type TestService<N> = OfferEvaluationService<MemoryOfferSource, MemoryStore, N>;

pub(super) fn build_service_with<N: NarrativeGenerator + 'static>(
    narrator: N,
) -> (TestService<N>, Arc<MemoryOfferSource>, Arc<MemoryStore>) {
    let offers = Arc::new(MemoryOfferSource::with_offers(mixed_offers()));
    let store = Arc::new(MemoryStore::default());
    let service = OfferEvaluationService::new(
        offers.clone(),
        store.clone(),
        Arc::new(narrator),
        engine_config(),
    );
    (service, offers, store)
}

pub(super) fn build_service() -> (
    TestService<TemplateNarrator>,
    Arc<MemoryOfferSource>,
    Arc<MemoryStore>,
) {
    build_service_with(TemplateNarrator)
}

pub(super) fn router_with_service<N: NarrativeGenerator + 'static>(
    service: TestService<N>,
) -> axum::Router {
    offer_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default)]
pub(super) struct MemoryOfferSource {
    offers: Mutex<Vec<Offer>>,
}

impl MemoryOfferSource {
    pub(super) fn with_offers(offers: Vec<Offer>) -> Self {
        Self {
            offers: Mutex::new(offers),
        }
    }
}

impl OfferSource for MemoryOfferSource {
    fn list_offers(&self, archived: bool) -> Result<Vec<Offer>, OfferSourceError> {
        let guard = self.offers.lock().expect("offer mutex poisoned");
        Ok(guard
            .iter()
            .filter(|offer| offer.archived == archived)
            .cloned()
            .collect())
    }

    fn update_offer_comp(
        &self,
        id: &OfferId,
        patch: &CompensationPatch,
    ) -> Result<Offer, OfferSourceError> {
        let mut guard = self.offers.lock().expect("offer mutex poisoned");
        let offer = guard
            .iter_mut()
            .find(|offer| &offer.id == id)
            .ok_or_else(|| OfferSourceError::NotFound(id.clone()))?;
        offer.apply_patch(patch);
        Ok(offer.clone())
    }

    fn archive_offer(&self, id: &OfferId, reason: Option<String>) -> Result<Offer, OfferSourceError> {
        let mut guard = self.offers.lock().expect("offer mutex poisoned");
        let offer = guard
            .iter_mut()
            .find(|offer| &offer.id == id)
            .ok_or_else(|| OfferSourceError::NotFound(id.clone()))?;
        offer.archived = true;
        offer.archive_reason = reason;
        Ok(offer.clone())
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    next_id: AtomicUsize,
    saved: Mutex<BTreeMap<ComparisonId, SavedComparison>>,
}

impl MemoryStore {
    pub(super) fn saved_count(&self) -> usize {
        self.saved.lock().expect("store mutex poisoned").len()
    }
}

impl SavedComparisonStore for MemoryStore {
    fn save(
        &self,
        name: String,
        job_ids: Vec<OfferId>,
        inputs: ComparisonOptions,
        result: ComparisonResult,
    ) -> Result<SavedComparison, StoreError> {
        let sequence = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let saved = SavedComparison {
            id: ComparisonId(format!("cmp-{sequence}")),
            name,
            job_ids,
            inputs,
            result,
            created_at: Utc::now(),
        };
        self.saved
            .lock()
            .expect("store mutex poisoned")
            .insert(saved.id.clone(), saved.clone());
        Ok(saved)
    }

    fn list(&self) -> Result<Vec<SavedComparison>, StoreError> {
        Ok(self
            .saved
            .lock()
            .expect("store mutex poisoned")
            .values()
            .cloned()
            .collect())
    }

    fn get(&self, id: &ComparisonId) -> Result<SavedComparison, StoreError> {
        self.saved
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn delete(&self, id: &ComparisonId) -> Result<(), StoreError> {
        self.saved
            .lock()
            .expect("store mutex poisoned")
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}

pub(super) struct UnavailableStore;

impl SavedComparisonStore for UnavailableStore {
    fn save(
        &self,
        _name: String,
        _job_ids: Vec<OfferId>,
        _inputs: ComparisonOptions,
        _result: ComparisonResult,
    ) -> Result<SavedComparison, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<SavedComparison>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn get(&self, _id: &ComparisonId) -> Result<SavedComparison, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &ComparisonId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Answers every request with a fixed sentence.
pub(super) struct CannedNarrator(pub(super) &'static str);

impl NarrativeGenerator for CannedNarrator {
    async fn summarize(&self, _request: &NarrativeRequest) -> Result<String, NarrativeError> {
        Ok(self.0.to_string())
    }
}

pub(super) struct FailingNarrator;

impl NarrativeGenerator for FailingNarrator {
    async fn summarize(&self, _request: &NarrativeRequest) -> Result<String, NarrativeError> {
        Err(NarrativeError::Unavailable("quota exhausted".to_string()))
    }
}

pub(super) struct SlowNarrator;

impl NarrativeGenerator for SlowNarrator {
    async fn summarize(&self, _request: &NarrativeRequest) -> Result<String, NarrativeError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok("too late".to_string())
    }
}
