use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use offer_eval::error::AppError;
use offer_eval::workflows::offers::{
    offer_router, NarrativeGenerator, Offer, OfferEvaluationService, OfferImporter, OfferSource,
    SavedComparisonStore,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

/// Spreadsheet export posted as text.
#[derive(Debug, Deserialize)]
pub(crate) struct ImportPreviewRequest {
    pub(crate) csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImportPreviewResponse {
    pub(crate) count: usize,
    pub(crate) archived: usize,
    pub(crate) offers: Vec<Offer>,
}

pub(crate) fn with_offer_routes<O, S, N>(
    service: Arc<OfferEvaluationService<O, S, N>>,
) -> axum::Router
where
    O: OfferSource + 'static,
    S: SavedComparisonStore + 'static,
    N: NarrativeGenerator + 'static,
{
    offer_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/offers/import/preview",
            axum::routing::post(import_preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Parse an offer export without touching the offer list, so the caller can inspect
/// the rows before comparing them inline.
pub(crate) async fn import_preview_endpoint(
    Json(payload): Json<ImportPreviewRequest>,
) -> Result<Json<ImportPreviewResponse>, AppError> {
    let offers = OfferImporter::from_reader(Cursor::new(payload.csv.into_bytes()))?;
    let archived = offers.iter().filter(|offer| offer.archived).count();

    Ok(Json(ImportPreviewResponse {
        count: offers.len(),
        archived,
        offers,
    }))
}
