use std::time::Duration;

use super::common::*;
use crate::workflows::offers::comparison::compare;
use crate::workflows::offers::domain::ComparisonOptions;
use crate::workflows::offers::narrative::{
    narrate, NarrativeKind, NarrativeRequest, NarrativeSource, TemplateNarrator,
};

fn request() -> NarrativeRequest {
    NarrativeRequest {
        kind: NarrativeKind::ComparisonSummary,
        payload: serde_json::json!({ "offers": [] }),
        template: "Template summary.".to_string(),
    }
}

const TIMEOUT: Duration = Duration::from_millis(50);

#[tokio::test]
async fn generated_text_is_used_when_available() {
    let narrative = narrate(&CannedNarrator("Acme wins."), &request(), TIMEOUT).await;

    assert_eq!(narrative.text, "Acme wins.");
    assert_eq!(narrative.source, NarrativeSource::Generated);
}

#[tokio::test]
async fn failing_generator_falls_back_to_template() {
    let narrative = narrate(&FailingNarrator, &request(), TIMEOUT).await;

    assert_eq!(narrative.text, "Template summary.");
    assert_eq!(narrative.source, NarrativeSource::Template);
}

#[tokio::test]
async fn slow_generator_times_out_to_template() {
    let narrative = narrate(&SlowNarrator, &request(), TIMEOUT).await;

    assert_eq!(narrative.text, "Template summary.");
    assert_eq!(narrative.source, NarrativeSource::Template);
}

#[tokio::test]
async fn blank_generator_output_is_ignored() {
    let narrative = narrate(&CannedNarrator("   "), &request(), TIMEOUT).await;

    assert_eq!(narrative.source, NarrativeSource::Template);
}

#[tokio::test]
async fn template_narrator_echoes_template_text() {
    let narrative = narrate(&TemplateNarrator, &request(), TIMEOUT).await;
    assert_eq!(narrative.text, "Template summary.");
    assert_eq!(narrative.source, NarrativeSource::Template);
}

#[tokio::test]
async fn narrative_failure_leaves_numbers_untouched() {
    let (service, _, _) = build_service_with(FailingNarrator);
    let offers = mixed_offers();
    let options = ComparisonOptions::default();

    let report = service.compare(&offers, &options).await.expect("compare");
    let direct = compare(&offers, &options).expect("direct");

    assert_eq!(report.narrative_source, NarrativeSource::Template);
    assert_eq!(report.result, direct);
}

#[tokio::test]
async fn generated_summary_replaces_template_text_only() {
    let (service, _, _) = build_service_with(CannedNarrator("Acme is the pick."));
    let offers = mixed_offers();
    let options = ComparisonOptions::default();

    let report = service.compare(&offers, &options).await.expect("compare");
    let direct = compare(&offers, &options).expect("direct");

    assert_eq!(report.narrative_source, NarrativeSource::Generated);
    assert_eq!(report.result.analysis_summary, "Acme is the pick.");
    assert_eq!(report.result.offers, direct.offers);
    assert_eq!(report.result.ranking, direct.ranking);
}
