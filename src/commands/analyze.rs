//! The `analyze` command: compute one scenario and render it.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{json, Value};

use crate::classify::classify;
use crate::config;
use crate::core::SavingsBreakdown;
use crate::engine::compute;
use crate::io::output::{create_writer, OutputFormat};
use crate::normalize::{normalize, validate_contact, RawFields};
use crate::report::{project, ReportModel};
use crate::store::{JsonFileStore, ScenarioStore, SubmissionDraft};

#[derive(Debug, Default)]
pub struct AnalyzeConfig {
    pub input: Option<PathBuf>,
    pub total_tb: Option<f64>,
    pub total_vms: Option<u64>,
    pub cost_per_tb: Option<f64>,
    pub employee_yearly_cost: Option<f64>,
    pub work_hours_yearly: Option<f64>,
    pub reuse_orphaned_pct: Option<f64>,
    pub improved_processes_pct: Option<f64>,
    pub buying_accuracy_pct: Option<f64>,
    pub outage_avoidance_savings: Option<f64>,
    pub product_annual_cost: Option<f64>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub save: bool,
}

fn read_input_file(path: &PathBuf) -> Result<RawFields> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario file {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {} as JSON", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("{} must contain a JSON object", path.display()),
    }
}

/// Merge the input file (if any) with flag overrides; flags win.
fn assemble_raw_fields(config: &AnalyzeConfig) -> Result<RawFields> {
    let mut raw = match &config.input {
        Some(path) => read_input_file(path)?,
        None => RawFields::new(),
    };

    let overrides: [(&str, Option<Value>); 10] = [
        ("total_tb", config.total_tb.map(|v| json!(v))),
        ("total_vms", config.total_vms.map(|v| json!(v))),
        ("cost_per_tb", config.cost_per_tb.map(|v| json!(v))),
        (
            "employee_yearly_cost",
            config.employee_yearly_cost.map(|v| json!(v)),
        ),
        (
            "work_hours_yearly",
            config.work_hours_yearly.map(|v| json!(v)),
        ),
        (
            "reuse_orphaned_pct",
            config.reuse_orphaned_pct.map(|v| json!(v)),
        ),
        (
            "improved_processes_pct",
            config.improved_processes_pct.map(|v| json!(v)),
        ),
        (
            "buying_accuracy_pct",
            config.buying_accuracy_pct.map(|v| json!(v)),
        ),
        (
            "outage_avoidance_savings",
            config.outage_avoidance_savings.map(|v| json!(v)),
        ),
        (
            "product_annual_cost",
            config.product_annual_cost.map(|v| json!(v)),
        ),
    ];
    for (key, value) in overrides {
        if let Some(value) = value {
            raw.insert(key.to_string(), value);
        }
    }
    Ok(raw)
}

/// Pure portion of analyze: raw fields in, report model out.
pub fn build_report(raw: &RawFields) -> ReportModel {
    let defaults = config::get_assumption_defaults();
    let bounds = config::get_safe_range_bounds();

    let params = normalize(raw, &defaults);
    let breakdown = compute(&params);
    let classification = classify(&breakdown, bounds);
    let contact = validate_contact(raw).ok();

    project(&params, &breakdown, &classification, contact.as_ref(), Utc::now())
}

fn persist(raw: &RawFields, breakdown: &SavingsBreakdown, model: &ReportModel) -> Result<u64> {
    let contact = validate_contact(raw)
        .context("--save requires full_name, email, and company_name in the scenario")?;
    let store_config = config::get_config().store.clone().unwrap_or_default();
    let store = JsonFileStore::new(store_config.directory)?;
    let record = store.save(SubmissionDraft {
        contact,
        parameters: model.parameters.clone(),
        breakdown: breakdown.clone(),
        classification: model.classification.clone(),
    })?;
    Ok(record.id)
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<()> {
    let raw = assemble_raw_fields(&config)?;
    let model = build_report(&raw);

    if !model.classification.is_safe {
        log::warn!(
            "annual ROI {:.1}% outside safe range [{}%, {}%]",
            model.classification.annual_roi,
            model.classification.lower_bound,
            model.classification.upper_bound
        );
    }

    match &config.output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            create_writer(config.format, file).write_report(&model)?;
        }
        None => {
            create_writer(config.format, std::io::stdout()).write_report(&model)?;
        }
    }

    // Persist after rendering: a store failure still exits non-zero, but
    // the computed report has already been shown.
    if config.save {
        let id = persist(&raw, &model.breakdown, &model)?;
        eprintln!("Saved submission {}", id);
    }
    Ok(())
}
