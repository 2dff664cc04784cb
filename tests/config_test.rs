use indoc::indoc;

use roimap::config::parse_and_validate_config;
use roimap::{compute, normalize, AssumptionDefaults, RawFields};
use serde_json::json;

#[test]
fn site_config_overrides_flow_through_the_engine() {
    let contents = indoc! {r#"
        [assumptions]
        cost_per_tb = 800.0
        reuse_orphaned_pct = 4.0
        outage_avoidance_savings = 100000.0

        [safe_range]
        lower = 25.0
        upper = 2000.0

        [store]
        directory = "var/submissions"
    "#};

    let config = parse_and_validate_config(contents).unwrap();
    let assumptions = config.assumptions.unwrap();
    assert_eq!(assumptions.cost_per_tb, 800.0);
    assert_eq!(assumptions.reuse_orphaned_pct, 4.0);
    // Unspecified keys keep their built-in values.
    assert_eq!(assumptions.employee_yearly_cost, 150_000.0);
    assert_eq!(assumptions.buying_accuracy_pct, 1.0);

    let bounds = config.safe_range.unwrap();
    assert_eq!(bounds.lower, 25.0);
    assert_eq!(bounds.upper, 2000.0);

    let store = config.store.unwrap();
    assert_eq!(store.directory, std::path::PathBuf::from("var/submissions"));

    // The overridden defaults change what a blank submission computes.
    let raw: RawFields = [("total_tb".to_string(), json!(1_000))].into_iter().collect();
    let breakdown = compute(&normalize(&raw, &assumptions));
    // 4% of 1,000 TB at $800/TB.
    assert_eq!(breakdown.cost_avoidance.reuse_orphaned.annual_savings, 32_000.0);
    assert_eq!(
        breakdown.operational_savings.outage_avoidance_savings,
        100_000.0
    );
}

#[test]
fn out_of_range_assumptions_fall_back_to_defaults() {
    let contents = indoc! {r#"
        [assumptions]
        reuse_orphaned_pct = 90.0
    "#};

    let config = parse_and_validate_config(contents).unwrap();
    let assumptions = config.assumptions.unwrap();
    assert_eq!(
        assumptions.reuse_orphaned_pct,
        AssumptionDefaults::default().reuse_orphaned_pct
    );
}

#[test]
fn inverted_safe_range_falls_back_to_defaults() {
    let contents = indoc! {r#"
        [safe_range]
        lower = 500.0
        upper = 100.0
    "#};

    let config = parse_and_validate_config(contents).unwrap();
    let bounds = config.safe_range.unwrap();
    assert_eq!(bounds.lower, 50.0);
    assert_eq!(bounds.upper, 1000.0);
}

#[test]
fn malformed_toml_is_rejected_with_context() {
    let err = parse_and_validate_config("assumptions = not-a-table").unwrap_err();
    assert!(err.contains("Failed to parse .roimap.toml"));
}

#[test]
fn custom_weekly_hours_change_personnel_savings() {
    let contents = indoc! {r#"
        [assumptions.weekly_hours]
        building_reports = 0.0
        planning = 0.0
        modeling_trends = 0.0
        problem_resolution = 0.0
        capacity_reporting = 0.0
        service_improvement = 0.0
        automation_tasks = 10.0
    "#};

    let config = parse_and_validate_config(contents).unwrap();
    let assumptions = config.assumptions.unwrap();

    let raw = RawFields::new();
    let breakdown = compute(&normalize(&raw, &assumptions));
    // 10 h/week over 52 weeks at $150,000 / 1,880 h.
    let expected = 10.0 * 52.0 * (150_000.0 / 1_880.0);
    assert!((breakdown.personnel_savings.total - expected).abs() < 1e-9);
}
