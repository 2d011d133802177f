use crate::infra::{
    parse_col_index, parse_milestone, parse_ratings, sample_col_indices, sample_offers,
};
use clap::Args;
use offer_eval::config::AppConfig;
use offer_eval::error::AppError;
use offer_eval::workflows::offers::{
    format_currency, CareerMilestone, CareerProjectionInputs, CareerProjectionResult,
    ComparisonOptions, ComparisonResult, Offer, OfferEvaluationEngine, OfferId, OfferImporter,
    RaiseScenarios, Ratings, ScenarioKey, Weights, WorkMode,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct CompareArgs {
    /// CSV export with one offer per row
    #[arg(long)]
    pub(crate) offers: PathBuf,
    /// Cost-of-living index per offer, e.g. --col acme=135 (100 = baseline)
    #[arg(long = "col", value_parser = parse_col_index)]
    pub(crate) col: Vec<(OfferId, f64)>,
    /// Ratings per offer as culture,growth,balance,remote on a 1-5 scale, e.g. --rating acme=4,5,3,2
    #[arg(long = "rating", value_parser = parse_ratings)]
    pub(crate) rating: Vec<(OfferId, Ratings)>,
    /// Share of the overall score taken by compensation (0.0-1.0)
    #[arg(long)]
    pub(crate) financial_weight: Option<f64>,
    /// Include rows marked archived in the export
    #[arg(long)]
    pub(crate) include_archived: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ProjectArgs {
    /// CSV export with one offer per row
    #[arg(long)]
    pub(crate) offers: PathBuf,
    /// Conservative annual raise in percent
    #[arg(long)]
    pub(crate) conservative: Option<f64>,
    /// Expected annual raise in percent
    #[arg(long)]
    pub(crate) expected: Option<f64>,
    /// Optimistic annual raise in percent
    #[arg(long)]
    pub(crate) optimistic: Option<f64>,
    /// Promotion applied to every offer, e.g. --milestone "2:Senior Engineer:12"
    #[arg(long = "milestone", value_parser = parse_milestone)]
    pub(crate) milestone: Vec<CareerMilestone>,
    /// Scenario whose year-by-year trajectory is printed
    #[arg(long, default_value = "expected")]
    pub(crate) scenario: ScenarioKey,
    /// Include rows marked archived in the export
    #[arg(long)]
    pub(crate) include_archived: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the career projection portion of the demo
    #[arg(long)]
    pub(crate) skip_projection: bool,
}

pub(crate) fn run_compare(args: CompareArgs) -> Result<(), AppError> {
    let CompareArgs {
        offers,
        col,
        rating,
        financial_weight,
        include_archived,
    } = args;

    let engine = OfferEvaluationEngine::new(AppConfig::load()?.engine);
    let offers = load_offers(&offers, include_archived)?;
    let options = ComparisonOptions {
        col_index_by_offer: col.into_iter().collect(),
        ratings_by_offer: rating.into_iter().collect(),
        weights: financial_weight.map(Weights::with_financial),
        ..ComparisonOptions::default()
    };

    let result = engine.compare(&offers, &options)?;
    render_comparison(&result);
    Ok(())
}

pub(crate) fn run_project(args: ProjectArgs) -> Result<(), AppError> {
    let ProjectArgs {
        offers,
        conservative,
        expected,
        optimistic,
        milestone,
        scenario,
        include_archived,
    } = args;

    let engine = OfferEvaluationEngine::new(AppConfig::load()?.engine);
    let offers = load_offers(&offers, include_archived)?;

    let defaults = RaiseScenarios::default();
    let inputs = CareerProjectionInputs {
        raise_scenarios: RaiseScenarios {
            conservative_pct: conservative.unwrap_or(defaults.conservative_pct),
            expected_pct: expected.unwrap_or(defaults.expected_pct),
            optimistic_pct: optimistic.unwrap_or(defaults.optimistic_pct),
        },
        milestones: milestone,
        ..CareerProjectionInputs::default()
    };

    let result = engine.project_career(&offers, &inputs)?;
    render_projection(&result, scenario);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = OfferEvaluationEngine::new(AppConfig::load()?.engine);
    let offers = sample_offers();

    println!("Offer evaluation demo");
    println!("Offers:");
    for offer in &offers {
        println!(
            "  - {} [{}] {} | base {}",
            offer.display_name(),
            offer.id,
            offer.location,
            format_currency(offer.base_salary)
        );
    }

    let ratings = BTreeMap::from([
        (OfferId::new("northwind"), Ratings::new(3, 5, 2, 3)),
        (OfferId::new("prairie"), Ratings::new(4, 3, 5, 5)),
        (OfferId::new("harbor"), Ratings::new(4, 4, 4, 1)),
    ]);

    println!("\nNominal comparison (no cost-of-living adjustment)");
    let nominal = engine.compare(&offers, &ComparisonOptions::default())?;
    render_comparison(&nominal);

    println!("\nAdjusted for cost of living with personal ratings");
    let adjusted = engine.compare(
        &offers,
        &ComparisonOptions {
            col_index_by_offer: sample_col_indices(),
            ratings_by_offer: ratings,
            ..ComparisonOptions::default()
        },
    )?;
    render_comparison(&adjusted);

    if args.skip_projection {
        return Ok(());
    }

    let promotion = CareerMilestone {
        year: 2,
        title: Some("Senior Engineer".to_string()),
        salary_bump_pct: 12.0,
        bonus_bump_pct: 10.0,
        equity_bump_pct: 0.0,
        benefits_bump_pct: 0.0,
        note: "Typical two-year promotion".to_string(),
    };
    let inputs = CareerProjectionInputs {
        milestones_by_offer: BTreeMap::from([(OfferId::new("prairie"), vec![promotion])]),
        ..CareerProjectionInputs::default()
    };

    println!("\nCareer projection (promotion declared for Prairie Health only)");
    let projection = engine.project_career(&offers, &inputs)?;
    render_projection(&projection, ScenarioKey::Expected);

    Ok(())
}

fn load_offers(path: &Path, include_archived: bool) -> Result<Vec<Offer>, AppError> {
    let offers = OfferImporter::from_path(path)?;
    Ok(offers
        .into_iter()
        .filter(|offer| include_archived || !offer.archived)
        .collect())
}

fn render_comparison(result: &ComparisonResult) {
    print!("{:<24}", "");
    for row in &result.offers {
        print!("{:>18}", truncate(&row.company, 17));
    }
    println!();
    print!("{:<24}", "Work mode");
    for row in &result.offers {
        print!("{:>18}", work_mode_label(row.work_mode));
    }
    println!();

    for matrix_row in &result.matrix_rows {
        print!("{:<24}", matrix_row.label);
        for row in &result.offers {
            let value = row.value(&matrix_row.key).unwrap_or_default();
            print!("{:>18}", render_cell(&matrix_row.key, value));
        }
        println!();
    }

    println!("Ranking:");
    for (position, offer_id) in result.ranking.iter().enumerate() {
        if let Some(row) = result.row(offer_id) {
            println!(
                "  {}. {} ({:.1})",
                position + 1,
                row.company,
                row.overall_score
            );
        }
    }

    println!("Negotiation guidance:");
    for row in &result.offers {
        for recommendation in &row.negotiation_recommendations {
            println!("  - {}: {}", row.company, recommendation);
        }
    }

    println!("Summary: {}", result.analysis_summary);
}

fn render_projection(result: &CareerProjectionResult, scenario: ScenarioKey) {
    for offer in &result.offers {
        println!("{} ({})", offer.company, offer.title);
        for projection in &offer.scenarios {
            println!(
                "  {:<13} {:>4.1}% | 5y salary {} total {} | 10y salary {} total {}",
                projection.scenario.label(),
                projection.raise_pct,
                format_currency(projection.five_year_ending_salary),
                format_currency(projection.five_year_ending_total_comp),
                format_currency(projection.ten_year_ending_salary),
                format_currency(projection.ten_year_ending_total_comp),
            );
        }

        if let Some(trajectory) = offer.scenario(scenario) {
            println!("  {} trajectory:", scenario.label());
            let series = &trajectory.ten_year;
            for year in 0..series.len() {
                println!(
                    "    year {:>2}: {:>12} salary | {:>12} total | {}",
                    year,
                    format_currency(series.salary[year]),
                    format_currency(series.total_comp[year]),
                    series.title[year]
                );
            }
        }
    }

    for note in &result.assumptions.notes {
        println!("Note: {note}");
    }
    if let Some(summary) = &result.analysis_summary {
        println!("Summary: {summary}");
    }
    if let Some(recommendation) = &result.recommendation {
        println!("Recommendation: {recommendation}");
    }
}

fn render_cell(key: &str, value: f64) -> String {
    match key {
        "col_index" => format!("{value:.0}"),
        key if key.ends_with("_score") => format!("{value:.1}"),
        _ => format_currency(value),
    }
}

fn work_mode_label(mode: Option<WorkMode>) -> &'static str {
    mode.map(WorkMode::label).unwrap_or("unspecified")
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let mut shortened: String = value.chars().take(max.saturating_sub(1)).collect();
        shortened.push('…');
        shortened
    }
}
