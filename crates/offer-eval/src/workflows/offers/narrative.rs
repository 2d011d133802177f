use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::comparison::ComparisonResult;
use super::compensation::format_currency;
use super::domain::ScenarioKey;
use super::projection::CareerProjectionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeKind {
    ComparisonSummary,
    ProjectionSummary,
    ProjectionRecommendation,
}

/// Structured input handed to a narrative generator. `template` is the deterministic text
/// used whenever the generator cannot answer.
#[derive(Debug, Clone, Serialize)]
pub struct NarrativeRequest {
    pub kind: NarrativeKind,
    pub payload: serde_json::Value,
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NarrativeError {
    #[error("narrative generator unavailable: {0}")]
    Unavailable(String),
    #[error("narrative generator timed out after {0:?}")]
    TimedOut(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeSource {
    Generated,
    Template,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub text: String,
    pub source: NarrativeSource,
}

/// Optional text-generation collaborator that rephrases structured results.
pub trait NarrativeGenerator: Send + Sync {
    fn summarize(
        &self,
        request: &NarrativeRequest,
    ) -> impl Future<Output = Result<String, NarrativeError>> + Send;
}

/// Generator that always answers with the deterministic template.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateNarrator;

impl NarrativeGenerator for TemplateNarrator {
    fn summarize(
        &self,
        request: &NarrativeRequest,
    ) -> impl Future<Output = Result<String, NarrativeError>> + Send {
        let text = request.template.clone();
        async move { Ok(text) }
    }
}

/// Ask the generator for text, bounded by `timeout`; fall back to the template on any failure.
pub async fn narrate<N>(generator: &N, request: &NarrativeRequest, timeout: Duration) -> Narrative
where
    N: NarrativeGenerator,
{
    let outcome = match tokio::time::timeout(timeout, generator.summarize(request)).await {
        Ok(result) => result,
        Err(_) => Err(NarrativeError::TimedOut(timeout)),
    };

    match outcome {
        Ok(text) if text == request.template => template_narrative(request),
        Ok(text) if !text.trim().is_empty() => Narrative {
            text,
            source: NarrativeSource::Generated,
        },
        Ok(_) => {
            warn!(kind = ?request.kind, "narrative generator returned empty text; using template");
            template_narrative(request)
        }
        Err(err) => {
            warn!(kind = ?request.kind, error = %err, "narrative generator failed; using template");
            template_narrative(request)
        }
    }
}

fn template_narrative(request: &NarrativeRequest) -> Narrative {
    Narrative {
        text: request.template.clone(),
        source: NarrativeSource::Template,
    }
}

pub fn comparison_summary(result: &ComparisonResult) -> String {
    let Some(top) = result.top_ranked() else {
        return "No offers were compared.".to_string();
    };

    let mut summary = format!(
        "{} ranks first with an overall score of {:.1} (financial {:.1}, non-financial {:.1}).",
        top.company, top.overall_score, top.financial_score, top.non_financial_score
    );

    if let Some(runner_up) = result.ranking.get(1).and_then(|id| result.row(id)) {
        summary.push_str(&format!(
            " {} follows at {:.1}.",
            runner_up.company, runner_up.overall_score
        ));
    }

    let adjusted = result.offers.iter().map(|row| row.col_adjusted_total);
    let low = adjusted.clone().fold(f64::INFINITY, f64::min);
    let high = adjusted.fold(f64::NEG_INFINITY, f64::max);
    summary.push_str(&format!(
        " Cost-of-living adjusted totals range from {} to {}.",
        format_currency(low),
        format_currency(high)
    ));

    summary
}

pub fn projection_summary(result: &CareerProjectionResult) -> String {
    let expected_pct = result.assumptions.raise_scenarios.expected_pct;
    let lines: Vec<String> = result
        .offers
        .iter()
        .filter_map(|offer| {
            offer.scenario(ScenarioKey::Expected).map(|expected| {
                format!(
                    "{} reaches {} total compensation after 5 years and {} after 10 years.",
                    offer.company,
                    format_currency(expected.five_year_ending_total_comp),
                    format_currency(expected.ten_year_ending_total_comp)
                )
            })
        })
        .collect();

    format!(
        "Under the expected scenario ({:.1}% annual raises): {}",
        expected_pct,
        lines.join(" ")
    )
}

pub fn projection_recommendation(result: &CareerProjectionResult) -> String {
    let mut ranked: Vec<(&str, f64)> = result
        .offers
        .iter()
        .filter_map(|offer| {
            offer
                .scenario(ScenarioKey::Expected)
                .map(|expected| (offer.company.as_str(), expected.ten_year_ending_total_comp))
        })
        .collect();
    // Stable sort keeps input order for equal totals.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    match ranked.as_slice() {
        [] => "No projection available.".to_string(),
        [(company, total)] => format!(
            "{} projects to {} total compensation after 10 years under the expected scenario.",
            company,
            format_currency(*total)
        ),
        [(leader, leader_total), (runner_up, runner_up_total), ..] => format!(
            "{} leads the 10-year expected trajectory at {}, {} ahead of {}.",
            leader,
            format_currency(*leader_total),
            format_currency(leader_total - runner_up_total),
            runner_up
        ),
    }
}
