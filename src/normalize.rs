//! Lenient input normalization.
//!
//! Raw submissions arrive as loosely typed form/API payloads. The policy,
//! kept deliberately frictionless for a lead-capture funnel, is to coerce
//! rather than reject: unparseable or negative numerics clamp to zero,
//! percentages clamp into their documented band, and missing fields fall
//! back to the configured assumption defaults. The only hard failures are
//! missing or malformed contact fields, which belong to the submission
//! layer and are checked by [`validate_contact`] before the engine runs.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::config::AssumptionDefaults;
use crate::core::{Activity, CanonicalParameters, ContactInfo, WeeklyHours};
use crate::errors::RoimapError;

/// Raw key/value payload from a form post or API call.
pub type RawFields = Map<String, Value>;

/// Alternate payload keys accepted for a canonical field.
static FIELD_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("total_storage_tb", "total_tb"),
        ("reuse_orphaned_percent", "reuse_orphaned_pct"),
        ("improved_processes_percent", "improved_processes_pct"),
        ("buying_accuracy_percent", "buying_accuracy_pct"),
        ("voi_annual_cost", "product_annual_cost"),
    ])
});

const MAX_WEEKLY_ACTIVITY_HOURS: f64 = 40.0;

/// Look a field up by canonical name, falling back to its aliases.
fn lookup<'a>(raw: &'a RawFields, key: &str) -> Option<&'a Value> {
    raw.get(key).or_else(|| {
        FIELD_ALIASES
            .iter()
            .find(|&(_, canonical)| *canonical == key)
            .and_then(|(alias, _)| raw.get(*alias))
    })
}

/// Coerce a raw value to f64. Unparseable or non-finite input becomes
/// 0.0, never an error; `None` means the field was absent entirely.
fn raw_f64(raw: &RawFields, key: &str) -> Option<f64> {
    lookup(raw, key).map(|value| {
        let parsed = match value {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s.trim().replace(',', "").parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        };
        if parsed.is_finite() {
            parsed
        } else {
            0.0
        }
    })
}

fn raw_string(raw: &RawFields, key: &str) -> Option<String> {
    lookup(raw, key).and_then(|value| match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// `max(lower, min(upper, value))`, the same shape the form layer uses.
fn clamp(value: f64, lower: f64, upper: f64) -> f64 {
    value.min(upper).max(lower)
}

fn non_negative(raw: &RawFields, key: &str, default: f64) -> f64 {
    raw_f64(raw, key).unwrap_or(default).max(0.0)
}

/// Denominator fields are floored at 1 so the engine never divides by zero.
fn positive_floor(raw: &RawFields, key: &str, default: f64) -> f64 {
    raw_f64(raw, key).unwrap_or(default).max(1.0)
}

fn percentage(raw: &RawFields, key: &str, default: f64, upper: f64) -> f64 {
    clamp(raw_f64(raw, key).unwrap_or(default), 0.0, upper)
}

/// Normalize a raw payload into the canonical parameter set.
///
/// Referentially transparent: the same payload and defaults always produce
/// the same parameters. Fields absent from the payload take the configured
/// defaults; present fields are coerced and clamped per the field's
/// documented range.
pub fn normalize(raw: &RawFields, defaults: &AssumptionDefaults) -> CanonicalParameters {
    let mut weekly_hours = WeeklyHours::default();
    for activity in Activity::ALL {
        let default = defaults.weekly_hours.get(activity);
        let hours = clamp(
            raw_f64(raw, activity.field_key()).unwrap_or(default),
            0.0,
            MAX_WEEKLY_ACTIVITY_HOURS,
        );
        weekly_hours.set(activity, hours);
    }

    CanonicalParameters {
        total_tb: non_negative(raw, "total_tb", 0.0),
        cost_per_tb: non_negative(raw, "cost_per_tb", defaults.cost_per_tb),
        total_vms: non_negative(raw, "total_vms", 0.0).floor() as u64,
        employee_yearly_cost: positive_floor(
            raw,
            "employee_yearly_cost",
            defaults.employee_yearly_cost,
        ),
        work_hours_yearly: positive_floor(raw, "work_hours_yearly", defaults.work_hours_yearly),
        reuse_orphaned_pct: percentage(raw, "reuse_orphaned_pct", defaults.reuse_orphaned_pct, 50.0),
        improved_processes_pct: percentage(
            raw,
            "improved_processes_pct",
            defaults.improved_processes_pct,
            50.0,
        ),
        buying_accuracy_pct: percentage(
            raw,
            "buying_accuracy_pct",
            defaults.buying_accuracy_pct,
            25.0,
        ),
        weekly_hours,
        outage_avoidance_savings: non_negative(
            raw,
            "outage_avoidance_savings",
            defaults.outage_avoidance_savings,
        ),
        product_annual_cost: positive_floor(
            raw,
            "product_annual_cost",
            defaults.product_annual_cost,
        ),
    }
}

fn required_field(raw: &RawFields, field: &'static str) -> Result<String, RoimapError> {
    raw_string(raw, field)
        .filter(|s| !s.is_empty())
        .ok_or(RoimapError::MissingRequiredField { field })
}

/// Accept either a single `full_name` or a first/last name pair.
fn contact_full_name(raw: &RawFields) -> Result<String, RoimapError> {
    if let Some(name) = raw_string(raw, "full_name").filter(|s| !s.is_empty()) {
        return Ok(name);
    }
    let first = raw_string(raw, "first_name").filter(|s| !s.is_empty());
    let last = raw_string(raw, "last_name").filter(|s| !s.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => Ok(format!("{} {}", first, last)),
        (Some(first), None) => Ok(first),
        _ => Err(RoimapError::MissingRequiredField { field: "full_name" }),
    }
}

/// Ensure a URL carries a scheme; bare domains get `https://` prepended.
fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Validate the required contact fields of a submission.
///
/// Unlike numeric normalization this is strict: a lead record without a
/// name, email, or company is useless downstream.
pub fn validate_contact(raw: &RawFields) -> Result<ContactInfo, RoimapError> {
    let full_name = contact_full_name(raw)?;
    let email = required_field(raw, "email")?;
    let company_name = required_field(raw, "company_name")?;

    if !email.contains('@') {
        return Err(RoimapError::InvalidContactField {
            field: "email",
            reason: format!("'{}' is not an email address", email),
        });
    }

    let company_url = raw_string(raw, "company_url")
        .filter(|s| !s.is_empty())
        .map(|url| normalize_url(&url));

    Ok(ContactInfo {
        full_name,
        email,
        company_name,
        company_url,
    })
}

/// Merge partial wizard steps into one payload; later steps win.
///
/// The multi-step calculator recomputes a preview on every step, so the
/// merge must be idempotent and order-stable.
pub fn merge_steps(steps: &[RawFields]) -> RawFields {
    let mut merged = RawFields::new();
    for step in steps {
        for (key, value) in step {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(pairs: &[(&str, Value)]) -> RawFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn missing_fields_take_defaults() {
        let params = normalize(&RawFields::new(), &AssumptionDefaults::default());
        assert_eq!(params, CanonicalParameters::default());
    }

    #[test]
    fn percentage_clamps_to_documented_band() {
        let defaults = AssumptionDefaults::default();
        let params = normalize(
            &raw(&[
                ("reuse_orphaned_pct", json!(999)),
                ("improved_processes_pct", json!(-5)),
                ("buying_accuracy_pct", json!(25.0)),
            ]),
            &defaults,
        );
        assert_eq!(params.reuse_orphaned_pct, 50.0);
        assert_eq!(params.improved_processes_pct, 0.0);
        assert_eq!(params.buying_accuracy_pct, 25.0);
    }

    #[test]
    fn unparseable_numeric_coerces_to_zero() {
        let params = normalize(
            &raw(&[("total_tb", json!("lots"))]),
            &AssumptionDefaults::default(),
        );
        assert_eq!(params.total_tb, 0.0);
    }

    #[test]
    fn string_numerics_with_separators_parse() {
        let params = normalize(
            &raw(&[("total_tb", json!("1,500")), ("total_vms", json!("250"))]),
            &AssumptionDefaults::default(),
        );
        assert_eq!(params.total_tb, 1_500.0);
        assert_eq!(params.total_vms, 250);
    }

    #[test]
    fn negative_environment_fields_floor_at_zero() {
        let params = normalize(
            &raw(&[("total_tb", json!(-400)), ("total_vms", json!(-3))]),
            &AssumptionDefaults::default(),
        );
        assert_eq!(params.total_tb, 0.0);
        assert_eq!(params.total_vms, 0);
    }

    #[test]
    fn zero_work_hours_floors_at_one() {
        let params = normalize(
            &raw(&[("work_hours_yearly", json!(0))]),
            &AssumptionDefaults::default(),
        );
        assert_eq!(params.work_hours_yearly, 1.0);
    }

    #[test]
    fn storage_alias_is_accepted() {
        let params = normalize(
            &raw(&[("total_storage_tb", json!(800))]),
            &AssumptionDefaults::default(),
        );
        assert_eq!(params.total_tb, 800.0);

        let legacy = normalize(
            &raw(&[("voi_annual_cost", json!(90_000))]),
            &AssumptionDefaults::default(),
        );
        assert_eq!(legacy.product_annual_cost, 90_000.0);
    }

    #[test]
    fn weekly_hours_clamp_to_forty() {
        let params = normalize(
            &raw(&[("service_improvement", json!(120))]),
            &AssumptionDefaults::default(),
        );
        assert_eq!(params.weekly_hours.service_improvement, 40.0);
    }

    #[test]
    fn contact_validation_requires_name_email_company() {
        let err = validate_contact(&raw(&[("email", json!("a@b.co"))])).unwrap_err();
        assert!(matches!(
            err,
            RoimapError::MissingRequiredField { field: "full_name" }
        ));

        let err = validate_contact(&raw(&[
            ("full_name", json!("Jo Smith")),
            ("email", json!("not-an-email")),
            ("company_name", json!("Acme")),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            RoimapError::InvalidContactField { field: "email", .. }
        ));
    }

    #[test]
    fn first_last_name_pair_substitutes_for_full_name() {
        let contact = validate_contact(&raw(&[
            ("first_name", json!("Jo")),
            ("last_name", json!("Smith")),
            ("email", json!("jo@acme.com")),
            ("company_name", json!("Acme")),
        ]))
        .unwrap();
        assert_eq!(contact.full_name, "Jo Smith");
        assert_eq!(contact.name_parts(), ("Jo", "Smith"));
    }

    #[test]
    fn bare_company_url_gains_scheme() {
        let contact = validate_contact(&raw(&[
            ("full_name", json!("Jo Smith")),
            ("email", json!("jo@acme.com")),
            ("company_name", json!("Acme")),
            ("company_url", json!("acme.com")),
        ]))
        .unwrap();
        assert_eq!(contact.company_url.as_deref(), Some("https://acme.com"));
    }

    #[test]
    fn merge_steps_later_values_win() {
        let merged = merge_steps(&[
            raw(&[("total_tb", json!(100)), ("cost_per_tb", json!(400))]),
            raw(&[("total_tb", json!(900))]),
        ]);
        let params = normalize(&merged, &AssumptionDefaults::default());
        assert_eq!(params.total_tb, 900.0);
        assert_eq!(params.cost_per_tb, 400.0);
    }
}
