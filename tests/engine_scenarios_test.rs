use pretty_assertions::assert_eq;
use roimap::{
    classify, compute, normalize, AssumptionDefaults, CanonicalParameters, RawFields,
    SafeRangeBounds, PAYBACK_SENTINEL_MONTHS,
};
use serde_json::{json, Value};

fn raw(pairs: &[(&str, Value)]) -> RawFields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn simple_mode_is_advanced_mode_with_defaults() {
    // The quick calculator only asks for environment size; everything
    // else must come from the configured assumptions.
    let defaults = AssumptionDefaults::default();
    let simple = normalize(
        &raw(&[("total_tb", json!(1_000)), ("total_vms", json!(500))]),
        &defaults,
    );

    let advanced = normalize(
        &raw(&[
            ("total_tb", json!(1_000)),
            ("total_vms", json!(500)),
            ("cost_per_tb", json!(500)),
            ("employee_yearly_cost", json!(150_000)),
            ("work_hours_yearly", json!(1_880)),
            ("reuse_orphaned_pct", json!(2.0)),
            ("improved_processes_pct", json!(2.0)),
            ("buying_accuracy_pct", json!(1.0)),
            ("outage_avoidance_savings", json!(250_000)),
            ("product_annual_cost", json!(150_000)),
        ]),
        &defaults,
    );

    assert_eq!(simple, advanced);
    assert_eq!(compute(&simple), compute(&advanced));
}

#[test]
fn worksheet_reference_scenario_end_to_end() {
    let params = normalize(
        &raw(&[("total_tb", json!(1_000)), ("total_vms", json!(500))]),
        &AssumptionDefaults::default(),
    );
    let breakdown = compute(&params);

    assert!((breakdown.hourly_rate - 79.787_234_042_553_19).abs() < 1e-12);
    assert_eq!(breakdown.cost_avoidance.reuse_orphaned.space_savings_tb, 20.0);
    assert_eq!(breakdown.cost_avoidance.reuse_orphaned.annual_savings, 10_000.0);
    assert_eq!(breakdown.cost_avoidance.buying_accuracy.annual_savings, 5_000.0);
    assert_eq!(breakdown.cost_avoidance.total, 25_000.0);
    assert!((breakdown.summary.annual_roi - 155.248).abs() < 1e-3);

    let classification = classify(&breakdown, SafeRangeBounds::default());
    assert!(classification.is_safe);
}

#[test]
fn normalize_then_compute_is_deterministic() {
    let payload = raw(&[
        ("total_tb", json!("12,345.6")),
        ("reuse_orphaned_pct", json!(7.3)),
        ("service_improvement", json!(11.5)),
    ]);
    let defaults = AssumptionDefaults::default();

    let first = compute(&normalize(&payload, &defaults));
    let second = compute(&normalize(&payload, &defaults));
    assert_eq!(first, second);
}

#[test]
fn hostile_payload_never_panics_and_stays_finite() {
    let payload = raw(&[
        ("total_tb", json!("not a number")),
        ("total_vms", json!(-40)),
        ("cost_per_tb", json!("NaN")),
        ("work_hours_yearly", json!(0)),
        ("product_annual_cost", json!(-1)),
        ("reuse_orphaned_pct", json!(1e9)),
        ("buying_accuracy_pct", json!(-1e9)),
        ("automation_tasks", json!("999")),
    ]);
    let breakdown = compute(&normalize(&payload, &AssumptionDefaults::default()));

    assert!(breakdown.hourly_rate.is_finite());
    assert!(breakdown.summary.annual_roi.is_finite());
    assert!(breakdown.summary.payback_months.is_finite());
    assert!(breakdown.summary.total_annual_savings >= 0.0);
}

#[test]
fn all_zero_scenario_uses_sentinel_payback() {
    let params = CanonicalParameters {
        outage_avoidance_savings: 0.0,
        weekly_hours: roimap::WeeklyHours {
            building_reports: 0.0,
            planning: 0.0,
            modeling_trends: 0.0,
            problem_resolution: 0.0,
            capacity_reporting: 0.0,
            service_improvement: 0.0,
            automation_tasks: 0.0,
        },
        ..CanonicalParameters::default()
    };
    let breakdown = compute(&params);
    assert_eq!(breakdown.summary.payback_months, PAYBACK_SENTINEL_MONTHS);

    let classification = classify(&breakdown, SafeRangeBounds::default());
    assert!(!classification.is_safe);
    assert_eq!(classification.urgency, roimap::ReviewUrgency::High);
}

#[test]
fn raising_assumption_defaults_raises_savings() {
    let base = AssumptionDefaults::default();
    let richer = AssumptionDefaults {
        cost_per_tb: 800.0,
        ..AssumptionDefaults::default()
    };
    let payload = raw(&[("total_tb", json!(2_000))]);

    let base_total = compute(&normalize(&payload, &base))
        .summary
        .total_annual_savings;
    let richer_total = compute(&normalize(&payload, &richer))
        .summary
        .total_annual_savings;
    assert!(richer_total > base_total);
}
