use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use offer_eval::workflows::offers::{
    CareerMilestone, ComparisonId, ComparisonOptions, ComparisonResult, CompensationPatch, Offer,
    OfferId, OfferSource, OfferSourceError, Ratings, SavedComparison, SavedComparisonStore,
    StoreError, WorkMode,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Stand-in for the job tracker's offer table.
#[derive(Default, Clone)]
pub(crate) struct InMemoryOfferSource {
    offers: Arc<Mutex<Vec<Offer>>>,
}

impl InMemoryOfferSource {
    pub(crate) fn with_offers(offers: Vec<Offer>) -> Self {
        Self {
            offers: Arc::new(Mutex::new(offers)),
        }
    }

    fn modify<F>(&self, id: &OfferId, apply: F) -> Result<Offer, OfferSourceError>
    where
        F: FnOnce(&mut Offer),
    {
        let mut guard = self
            .offers
            .lock()
            .map_err(|_| OfferSourceError::Unavailable("offer table lock poisoned".to_string()))?;
        let offer = guard
            .iter_mut()
            .find(|offer| &offer.id == id)
            .ok_or_else(|| OfferSourceError::NotFound(id.clone()))?;
        apply(offer);
        Ok(offer.clone())
    }
}

impl OfferSource for InMemoryOfferSource {
    fn list_offers(&self, archived: bool) -> Result<Vec<Offer>, OfferSourceError> {
        let guard = self
            .offers
            .lock()
            .map_err(|_| OfferSourceError::Unavailable("offer table lock poisoned".to_string()))?;
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
        self.modify(id, |offer| offer.apply_patch(patch))
    }

    fn archive_offer(&self, id: &OfferId, reason: Option<String>) -> Result<Offer, OfferSourceError> {
        self.modify(id, |offer| {
            offer.archived = true;
            offer.archive_reason = reason;
        })
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryComparisonStore {
    sequence: Arc<AtomicU64>,
    saved: Arc<Mutex<BTreeMap<ComparisonId, SavedComparison>>>,
}

impl InMemoryComparisonStore {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<ComparisonId, SavedComparison>>, StoreError>
    {
        self.saved
            .lock()
            .map_err(|_| StoreError::Unavailable("comparison store lock poisoned".to_string()))
    }
}

impl SavedComparisonStore for InMemoryComparisonStore {
    fn save(
        &self,
        name: String,
        job_ids: Vec<OfferId>,
        inputs: ComparisonOptions,
        result: ComparisonResult,
    ) -> Result<SavedComparison, StoreError> {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let saved = SavedComparison {
            id: ComparisonId(format!("cmp-{sequence:06}")),
            name,
            job_ids,
            inputs,
            result,
            created_at: Utc::now(),
        };
        self.lock()?.insert(saved.id.clone(), saved.clone());
        Ok(saved)
    }

    fn list(&self) -> Result<Vec<SavedComparison>, StoreError> {
        let mut saved: Vec<SavedComparison> = self.lock()?.values().cloned().collect();
        saved.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(saved)
    }

    fn get(&self, id: &ComparisonId) -> Result<SavedComparison, StoreError> {
        self.lock()?
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn delete(&self, id: &ComparisonId) -> Result<(), StoreError> {
        self.lock()?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}

/// Parse `ID=INDEX`, e.g. `acme=135`.
pub(crate) fn parse_col_index(raw: &str) -> Result<(OfferId, f64), String> {
    let (id, value) = split_assignment(raw)?;
    let index = value
        .parse::<f64>()
        .map_err(|err| format!("failed to parse cost-of-living index in '{raw}' ({err})"))?;
    Ok((id, index))
}

/// Parse `ID=CULTURE,GROWTH,BALANCE,REMOTE`, e.g. `acme=4,5,3,2`.
pub(crate) fn parse_ratings(raw: &str) -> Result<(OfferId, Ratings), String> {
    let (id, value) = split_assignment(raw)?;
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|err| format!("failed to parse ratings in '{raw}' ({err})"))?;

    match parts.as_slice() {
        [culture_fit, growth, work_life_balance, remote_policy] => Ok((
            id,
            Ratings::new(*culture_fit, *growth, *work_life_balance, *remote_policy),
        )),
        _ => Err(format!(
            "expected four ratings (culture,growth,balance,remote) in '{raw}'"
        )),
    }
}

/// Parse `YEAR:TITLE:SALARY_PCT`, e.g. `2:Senior Engineer:12`. The title may be empty.
pub(crate) fn parse_milestone(raw: &str) -> Result<CareerMilestone, String> {
    let mut parts = raw.splitn(3, ':');
    let (Some(year), Some(title), Some(pct)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected YEAR:TITLE:SALARY_PCT, got '{raw}'"));
    };

    let year = year
        .trim()
        .parse::<u8>()
        .map_err(|err| format!("failed to parse milestone year in '{raw}' ({err})"))?;
    let salary_bump_pct = pct
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse milestone percentage in '{raw}' ({err})"))?;
    let title = title.trim();

    Ok(CareerMilestone {
        year,
        title: (!title.is_empty()).then(|| title.to_string()),
        salary_bump_pct,
        bonus_bump_pct: 0.0,
        equity_bump_pct: 0.0,
        benefits_bump_pct: 0.0,
        note: String::new(),
    })
}

fn split_assignment(raw: &str) -> Result<(OfferId, &str), String> {
    match raw.split_once('=') {
        Some((id, value)) if !id.trim().is_empty() => Ok((OfferId::new(id.trim()), value.trim())),
        _ => Err(format!("expected ID=VALUE, got '{raw}'")),
    }
}

/// Offers used by the demo and by `serve --sample-data`.
pub(crate) fn sample_offers() -> Vec<Offer> {
    vec![
        Offer {
            id: OfferId::new("northwind"),
            company: "Northwind Analytics".to_string(),
            title: "Senior Software Engineer".to_string(),
            location: "San Francisco, CA".to_string(),
            work_mode: Some(WorkMode::Hybrid),
            base_salary: 195_000.0,
            bonus: 20_000.0,
            equity: 45_000.0,
            benefits: Some(18_000.0),
            archived: false,
            archive_reason: None,
        },
        Offer {
            id: OfferId::new("prairie"),
            company: "Prairie Health".to_string(),
            title: "Software Engineer II".to_string(),
            location: "Des Moines, IA".to_string(),
            work_mode: Some(WorkMode::Remote),
            base_salary: 142_000.0,
            bonus: 12_000.0,
            equity: 0.0,
            benefits: None,
            archived: false,
            archive_reason: None,
        },
        Offer {
            id: OfferId::new("harbor"),
            company: "Harbor Logistics".to_string(),
            title: "Platform Engineer".to_string(),
            location: "Austin, TX".to_string(),
            work_mode: Some(WorkMode::Onsite),
            base_salary: 158_000.0,
            bonus: 8_000.0,
            equity: 15_000.0,
            benefits: Some(14_000.0),
            archived: false,
            archive_reason: None,
        },
    ]
}

pub(crate) fn sample_col_indices() -> BTreeMap<OfferId, f64> {
    BTreeMap::from([
        (OfferId::new("northwind"), 178.0),
        (OfferId::new("prairie"), 88.0),
        (OfferId::new("harbor"), 103.0),
    ])
}
