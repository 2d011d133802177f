use super::common::*;
use crate::workflows::offers::comparison::{compare, matrix_rows, MATRIX_VERSION};
use crate::workflows::offers::domain::{ComparisonOptions, OfferId, Ratings, ScenarioOverrides};
use crate::workflows::offers::guard::InvalidInput;

#[test]
fn repeated_runs_serialize_identically() {
    let offers = mixed_offers();
    let mut options = ComparisonOptions::default();
    options.col_index_by_offer.insert(OfferId::new("a"), 128.5);
    options
        .ratings_by_offer
        .insert(OfferId::new("b"), Ratings::new(4, 5, 3, 2));

    let first = serde_json::to_string(&compare(&offers, &options).expect("first run"))
        .expect("serializes");
    let second = serde_json::to_string(&compare(&offers, &options).expect("second run"))
        .expect("serializes");

    assert_eq!(first, second);
}

#[test]
fn every_row_carries_every_matrix_key() {
    let result = compare(&mixed_offers(), &ComparisonOptions::default()).expect("comparison");
    let payload = serde_json::to_value(&result).expect("serializes");

    assert_eq!(result.matrix_version, MATRIX_VERSION);
    assert_eq!(result.matrix_rows, matrix_rows());
    let rows = payload["offers"].as_array().expect("offers array");
    for row in rows {
        for matrix_row in &result.matrix_rows {
            assert!(
                row.get(&matrix_row.key).is_some_and(|value| value.is_number()),
                "row missing {}",
                matrix_row.key
            );
        }
    }
    for row in &result.offers {
        for matrix_row in &result.matrix_rows {
            assert!(row.value(&matrix_row.key).is_some());
        }
    }
}

#[test]
fn rows_follow_input_order_and_ranking_is_complete() {
    let offers = mixed_offers();
    let result = compare(&offers, &ComparisonOptions::default()).expect("comparison");

    let row_ids: Vec<&OfferId> = result.offers.iter().map(|row| &row.offer_id).collect();
    let input_ids: Vec<&OfferId> = offers.iter().map(|offer| &offer.id).collect();
    assert_eq!(row_ids, input_ids);

    let mut ranked = result.ranking.clone();
    ranked.sort();
    assert_eq!(ranked, vec![OfferId::new("a"), OfferId::new("b"), OfferId::new("c")]);
    assert_eq!(result.ranking[0], OfferId::new("a"));
    assert!(result
        .offers
        .iter()
        .all(|row| !row.negotiation_recommendations.is_empty()));
}

#[test]
fn identical_offers_rank_in_input_order() {
    let offers = vec![
        offer("z", "Zeta", 100_000.0),
        offer("m", "Mu", 100_000.0),
        offer("a", "Alpha", 100_000.0),
    ];
    let result = compare(&offers, &ComparisonOptions::default()).expect("comparison");

    assert_eq!(
        result.ranking,
        vec![OfferId::new("z"), OfferId::new("m"), OfferId::new("a")]
    );
}

#[test]
fn scenario_overrides_change_only_the_targeted_offer() {
    let offers = mixed_offers();
    let baseline = compare(&offers, &ComparisonOptions::default()).expect("baseline");

    let mut options = ComparisonOptions::default();
    options.scenario_by_offer.insert(
        OfferId::new("b"),
        ScenarioOverrides {
            salary_pct: 10.0,
            ..ScenarioOverrides::default()
        },
    );
    let negotiated = compare(&offers, &options).expect("negotiated");

    let before = baseline.row(&OfferId::new("b")).expect("row");
    let after = negotiated.row(&OfferId::new("b")).expect("row");
    assert_close(after.salary, before.salary * 1.1, 1e-6);
    assert_eq!(
        negotiated.row(&OfferId::new("a")).expect("row").total_comp,
        baseline.row(&OfferId::new("a")).expect("row").total_comp
    );
}

#[test]
fn summary_names_the_top_offer() {
    let (offers, options) = cost_of_living_pair();
    let result = compare(&offers, &options).expect("comparison");

    assert!(result.analysis_summary.starts_with("Globex ranks first"));
    assert!(result.analysis_summary.contains("Acme follows"));
    assert!(result.analysis_summary.contains("$150,000 to $155,556"));
}

#[test]
fn comparison_leaves_input_offers_untouched() {
    let offers = mixed_offers();
    let snapshot = offers.clone();
    let _ = compare(&offers, &ComparisonOptions::default()).expect("comparison");
    assert_eq!(offers, snapshot);
}

#[test]
fn overflowing_total_is_rejected_before_scoring() {
    let mut huge = offer("a", "Acme", 1e308);
    huge.bonus = 1e308;
    let offers = vec![huge, offer("b", "Globex", 100_000.0)];

    assert_eq!(
        compare(&offers, &ComparisonOptions::default()),
        Err(InvalidInput::NonFiniteValue {
            offer_id: OfferId::new("a"),
            field: "total_comp",
        })
    );
}
