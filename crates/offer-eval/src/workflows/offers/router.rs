use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    CareerProjectionInputs, CompensationPatch, ComparisonOptions, Offer, OfferId,
};
use super::narrative::NarrativeGenerator;
use super::repository::{
    ComparisonId, OfferSource, OfferSourceError, SavedComparisonStore, StoreError,
};
use super::service::{OfferEvaluationService, ServiceError};

/// Offers are passed inline or referenced by job ID from the active list. A request that
/// carries both is rejected.
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub offers: Vec<Offer>,
    #[serde(default)]
    pub job_ids: Vec<OfferId>,
    #[serde(default)]
    pub options: ComparisonOptions,
}

/// Same offer selection rules as [`CompareRequest`].
#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    #[serde(default)]
    pub offers: Vec<Offer>,
    #[serde(default)]
    pub job_ids: Vec<OfferId>,
    #[serde(default)]
    pub inputs: CareerProjectionInputs,
}

#[derive(Debug, Deserialize)]
pub struct SaveComparisonRequest {
    pub name: String,
    pub job_ids: Vec<OfferId>,
    #[serde(default)]
    pub options: ComparisonOptions,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArchiveRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListOffersQuery {
    #[serde(default)]
    pub archived: bool,
}

/// Router builder exposing comparison, projection and saved-comparison endpoints.
pub fn offer_router<O, S, N>(service: Arc<OfferEvaluationService<O, S, N>>) -> Router
where
    O: OfferSource + 'static,
    S: SavedComparisonStore + 'static,
    N: NarrativeGenerator + 'static,
{
    Router::new()
        .route("/api/v1/offers", get(list_offers_handler::<O, S, N>))
        .route("/api/v1/offers/compare", post(compare_handler::<O, S, N>))
        .route("/api/v1/offers/projection", post(projection_handler::<O, S, N>))
        .route(
            "/api/v1/offers/:offer_id/compensation",
            patch(update_compensation_handler::<O, S, N>),
        )
        .route(
            "/api/v1/offers/:offer_id/archive",
            post(archive_handler::<O, S, N>),
        )
        .route(
            "/api/v1/comparisons",
            post(save_comparison_handler::<O, S, N>).get(list_comparisons_handler::<O, S, N>),
        )
        .route(
            "/api/v1/comparisons/:comparison_id",
            get(get_comparison_handler::<O, S, N>).delete(delete_comparison_handler::<O, S, N>),
        )
        .route(
            "/api/v1/comparisons/:comparison_id/replay",
            post(replay_comparison_handler::<O, S, N>),
        )
        .with_state(service)
}

pub(crate) async fn compare_handler<O, S, N>(
    State(service): State<Arc<OfferEvaluationService<O, S, N>>>,
    axum::Json(request): axum::Json<CompareRequest>,
) -> Response
where
    O: OfferSource + 'static,
    S: SavedComparisonStore + 'static,
    N: NarrativeGenerator + 'static,
{
    let offers = match service.select_offers(request.offers, &request.job_ids) {
        Ok(offers) => offers,
        Err(error) => return error_response(error),
    };

    match service.compare(&offers, &request.options).await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn projection_handler<O, S, N>(
    State(service): State<Arc<OfferEvaluationService<O, S, N>>>,
    axum::Json(request): axum::Json<ProjectionRequest>,
) -> Response
where
    O: OfferSource + 'static,
    S: SavedComparisonStore + 'static,
    N: NarrativeGenerator + 'static,
{
    let offers = match service.select_offers(request.offers, &request.job_ids) {
        Ok(offers) => offers,
        Err(error) => return error_response(error),
    };

    match service.project(&offers, &request.inputs).await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_offers_handler<O, S, N>(
    State(service): State<Arc<OfferEvaluationService<O, S, N>>>,
    Query(query): Query<ListOffersQuery>,
) -> Response
where
    O: OfferSource + 'static,
    S: SavedComparisonStore + 'static,
    N: NarrativeGenerator + 'static,
{
    match service.list_offers(query.archived) {
        Ok(offers) => (StatusCode::OK, axum::Json(offers)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_compensation_handler<O, S, N>(
    State(service): State<Arc<OfferEvaluationService<O, S, N>>>,
    Path(offer_id): Path<String>,
    axum::Json(patch): axum::Json<CompensationPatch>,
) -> Response
where
    O: OfferSource + 'static,
    S: SavedComparisonStore + 'static,
    N: NarrativeGenerator + 'static,
{
    match service.update_offer_comp(&OfferId(offer_id), &patch) {
        Ok(offer) => (StatusCode::OK, axum::Json(offer)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn archive_handler<O, S, N>(
    State(service): State<Arc<OfferEvaluationService<O, S, N>>>,
    Path(offer_id): Path<String>,
    request: Option<axum::Json<ArchiveRequest>>,
) -> Response
where
    O: OfferSource + 'static,
    S: SavedComparisonStore + 'static,
    N: NarrativeGenerator + 'static,
{
    let reason = request.and_then(|axum::Json(body)| body.reason);
    match service.archive_offer(&OfferId(offer_id), reason) {
        Ok(offer) => (StatusCode::OK, axum::Json(offer)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn save_comparison_handler<O, S, N>(
    State(service): State<Arc<OfferEvaluationService<O, S, N>>>,
    axum::Json(request): axum::Json<SaveComparisonRequest>,
) -> Response
where
    O: OfferSource + 'static,
    S: SavedComparisonStore + 'static,
    N: NarrativeGenerator + 'static,
{
    match service.save_comparison(request.name, request.job_ids, request.options) {
        Ok(saved) => (StatusCode::CREATED, axum::Json(saved)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_comparisons_handler<O, S, N>(
    State(service): State<Arc<OfferEvaluationService<O, S, N>>>,
) -> Response
where
    O: OfferSource + 'static,
    S: SavedComparisonStore + 'static,
    N: NarrativeGenerator + 'static,
{
    match service.list_saved() {
        Ok(saved) => {
            let views: Vec<_> = saved.iter().map(|entry| entry.summary_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_comparison_handler<O, S, N>(
    State(service): State<Arc<OfferEvaluationService<O, S, N>>>,
    Path(comparison_id): Path<String>,
) -> Response
where
    O: OfferSource + 'static,
    S: SavedComparisonStore + 'static,
    N: NarrativeGenerator + 'static,
{
    match service.get_saved(&ComparisonId(comparison_id)) {
        Ok(saved) => (StatusCode::OK, axum::Json(saved)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_comparison_handler<O, S, N>(
    State(service): State<Arc<OfferEvaluationService<O, S, N>>>,
    Path(comparison_id): Path<String>,
) -> Response
where
    O: OfferSource + 'static,
    S: SavedComparisonStore + 'static,
    N: NarrativeGenerator + 'static,
{
    match service.delete_saved(&ComparisonId(comparison_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn replay_comparison_handler<O, S, N>(
    State(service): State<Arc<OfferEvaluationService<O, S, N>>>,
    Path(comparison_id): Path<String>,
) -> Response
where
    O: OfferSource + 'static,
    S: SavedComparisonStore + 'static,
    N: NarrativeGenerator + 'static,
{
    match service.replay_saved(&ComparisonId(comparison_id)) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_response(error: ServiceError) -> Response {
    match error {
        ServiceError::InvalidInput(invalid) => {
            let payload = json!({
                "error": invalid.to_string(),
                "offer_id": invalid.offer_id(),
                "field": invalid.field(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        ServiceError::Store(StoreError::NotFound(id)) => {
            let payload = json!({
                "error": format!("saved comparison {id} not found"),
                "comparison_id": id,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ServiceError::OfferSource(OfferSourceError::NotFound(id)) => {
            let payload = json!({
                "error": format!("offer {id} not found"),
                "offer_id": id,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        other => {
            tracing::error!(error = %other, "offer evaluation request failed");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
