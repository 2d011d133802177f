use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::offers::domain::{ComparisonOptions, OfferId};
use crate::workflows::offers::repository::OfferSource;
use crate::workflows::offers::router::{compare_handler, CompareRequest};
use crate::workflows::offers::{offer_router, OfferEvaluationService, TemplateNarrator};

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn compare_route_scores_inline_offers() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);
    let (offers, options) = cost_of_living_pair();

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/offers/compare",
            json!({ "offers": offers, "options": options }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["ranking"][0], "b");
    assert_eq!(payload["matrix_version"], 1);
    assert_eq!(payload["offers"][1]["financial_score"], 100.0);
    assert_eq!(payload["narrative_source"], "template");
}

#[tokio::test]
async fn compare_route_accepts_job_ids() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/offers/compare",
            json!({ "job_ids": ["a", "b"] }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["offers"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn compare_route_rejects_inline_offers_mixed_with_job_ids() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);
    let (offers, _) = cost_of_living_pair();

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/offers/compare",
            json!({ "offers": offers, "job_ids": ["a", "b"] }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["field"], "job_ids");
}

#[tokio::test]
async fn projection_route_rejects_inline_offers_mixed_with_job_ids() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);
    let (offers, _) = cost_of_living_pair();

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/offers/projection",
            json!({ "offers": offers, "job_ids": ["a"] }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn compare_handler_reports_offending_offer_and_field() {
    let (service, _, _) = build_service();
    let (offers, mut options) = cost_of_living_pair();
    options
        .col_index_by_offer
        .insert(OfferId::new("b"), 0.0);

    let response = compare_handler::<MemoryOfferSource, MemoryStore, TemplateNarrator>(
        State(Arc::new(service)),
        axum::Json(CompareRequest {
            offers,
            job_ids: Vec::new(),
            options,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["offer_id"], "b");
    assert_eq!(payload["field"], "col_index");
}

#[tokio::test]
async fn compare_handler_rejects_single_offer() {
    let (service, _, _) = build_service();

    let response = compare_handler::<MemoryOfferSource, MemoryStore, TemplateNarrator>(
        State(Arc::new(service)),
        axum::Json(CompareRequest {
            offers: vec![offer("a", "Acme", 100_000.0)],
            job_ids: Vec::new(),
            options: ComparisonOptions::default(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("at least 2 offers"));
}

#[tokio::test]
async fn projection_route_returns_all_scenarios() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/offers/projection",
            json!({
                "offers": [offer("a", "Acme", 100_000.0)],
                "inputs": { "raise_scenarios": { "conservative_pct": 1.0, "expected_pct": 3.0, "optimistic_pct": 6.0 } }
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let scenarios = payload["offers"][0]["scenarios"].as_array().expect("scenarios");
    let keys: Vec<&str> = scenarios
        .iter()
        .filter_map(|scenario| scenario["scenario"].as_str())
        .collect();
    assert_eq!(keys, vec!["conservative", "expected", "optimistic"]);
    let year_one = scenarios[1]["ten_year"]["salary"][1].as_f64().expect("salary");
    assert_close(year_one, 103_000.0, 1e-6);
}

#[tokio::test]
async fn offers_route_filters_by_archived_flag() {
    let (service, offers, _) = build_service();
    offers
        .archive_offer(&OfferId::new("a"), None)
        .expect("archive succeeds");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/offers?archived=true"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(1));

    let response = router
        .oneshot(empty_request("GET", "/api/v1/offers"))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn compensation_patch_and_archive_routes_update_offers() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/v1/offers/b/compensation",
            json!({ "bonus": 25000.0 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["bonus"], 25_000.0);
    assert_eq!(payload["base_salary"], 135_000.0);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/offers/b/archive",
            json!({ "reason": "declined" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["archived"], true);
    assert_eq!(payload["archive_reason"], "declined");

    let response = router
        .oneshot(empty_request("POST", "/api/v1/offers/ghost/archive"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn saved_comparison_routes_cover_lifecycle() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/comparisons",
            json!({ "name": "finalists", "job_ids": ["a", "c"] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let saved = read_json_body(response).await;
    let id = saved["id"].as_str().expect("id").to_string();

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/comparisons"))
        .await
        .expect("route executes");
    let listing = read_json_body(response).await;
    assert_eq!(listing[0]["name"], "finalists");
    assert_eq!(listing[0]["top_ranked"], "a");
    assert!(listing[0].get("result").is_none());

    let response = router
        .clone()
        .oneshot(empty_request("POST", &format!("/api/v1/comparisons/{id}/replay")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let replay = read_json_body(response).await;
    assert_eq!(replay["matches"], true);

    let response = router
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/v1/comparisons/{id}")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .oneshot(empty_request("GET", &format!("/api/v1/comparisons/{id}")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["comparison_id"], id.as_str());
}

#[tokio::test]
async fn store_outage_returns_internal_error() {
    let service = OfferEvaluationService::new(
        Arc::new(MemoryOfferSource::with_offers(mixed_offers())),
        Arc::new(UnavailableStore),
        Arc::new(TemplateNarrator),
        engine_config(),
    );
    let router = offer_router(Arc::new(service));

    let response = router
        .oneshot(empty_request("GET", "/api/v1/comparisons"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
