//! Career projection scenarios exercised through the public engine API.

use offer_eval::workflows::offers::{
    project_career, CareerMilestone, CareerProjectionInputs, Offer, OfferId, ScenarioKey, WorkMode,
};

fn offer(id: &str, company: &str, base_salary: f64, equity: f64) -> Offer {
    Offer {
        id: OfferId::new(id),
        company: company.to_string(),
        title: "Engineer".to_string(),
        location: "Remote".to_string(),
        work_mode: Some(WorkMode::Remote),
        base_salary,
        bonus: 0.0,
        equity,
        benefits: Some(10_000.0),
        archived: false,
        archive_reason: None,
    }
}

#[test]
fn promotion_track_overtakes_higher_starting_salary() {
    let offers = vec![
        offer("steady", "Steady Co", 130_000.0, 0.0),
        offer("rocket", "Rocket Inc", 115_000.0, 0.0),
    ];
    let mut inputs = CareerProjectionInputs::default();
    inputs.milestones_by_offer.insert(
        OfferId::new("rocket"),
        vec![
            CareerMilestone {
                year: 2,
                title: Some("Senior Engineer".to_string()),
                salary_bump_pct: 15.0,
                bonus_bump_pct: 0.0,
                equity_bump_pct: 0.0,
                benefits_bump_pct: 0.0,
                note: "Promotion cycle".to_string(),
            },
            CareerMilestone {
                year: 4,
                title: Some("Staff Engineer".to_string()),
                salary_bump_pct: 15.0,
                bonus_bump_pct: 0.0,
                equity_bump_pct: 0.0,
                benefits_bump_pct: 0.0,
                note: String::new(),
            },
        ],
    );

    let result = project_career(&offers, &inputs).expect("projection succeeds");

    let steady = result
        .offer(&OfferId::new("steady"))
        .and_then(|projection| projection.scenario(ScenarioKey::Expected))
        .expect("steady expected");
    let rocket = result
        .offer(&OfferId::new("rocket"))
        .and_then(|projection| projection.scenario(ScenarioKey::Expected))
        .expect("rocket expected");

    assert!(rocket.ten_year.salary[0] < steady.ten_year.salary[0]);
    assert!(rocket.five_year_ending_salary > steady.five_year_ending_salary);
    assert_eq!(rocket.ten_year.title[10], "Staff Engineer");
    assert!(result
        .recommendation
        .as_deref()
        .is_some_and(|text| text.starts_with("Rocket Inc leads")));
}

#[test]
fn five_year_series_is_a_prefix_of_ten_year_series() {
    let offers = vec![offer("a", "Acme", 100_000.0, 20_000.0)];
    let mut inputs = CareerProjectionInputs::default();
    inputs.growth.equity_pct = 10.0;

    let result = project_career(&offers, &inputs).expect("projection succeeds");

    for scenario in &result.offers[0].scenarios {
        assert_eq!(scenario.five_year.len(), 6);
        assert_eq!(scenario.ten_year.len(), 11);
        assert_eq!(scenario.five_year.salary[..], scenario.ten_year.salary[..6]);
        assert_eq!(scenario.five_year.equity[..], scenario.ten_year.equity[..6]);
        assert_eq!(
            scenario.ten_year_ending_total_comp,
            *scenario.ten_year.total_comp.last().expect("year ten")
        );
    }
}

#[test]
fn assumptions_record_the_inputs_used() {
    let offers = vec![offer("a", "Acme", 100_000.0, 0.0)];
    let result =
        project_career(&offers, &CareerProjectionInputs::default()).expect("projection succeeds");

    assert_eq!(result.assumptions.raise_scenarios.expected_pct, 3.0);
    assert_eq!(result.assumptions.horizons, vec![5, 10]);
    assert!(!result.assumptions.notes.is_empty());
}
