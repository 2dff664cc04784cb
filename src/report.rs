//! Projection of engine output into the shapes collaborators consume.
//!
//! No computation happens here: the projector reshapes a breakdown plus
//! its classification into (a) an ordered worksheet model that every
//! renderer walks declaratively, (b) the CRM contact payload, and (c) the
//! email placeholder map. Currency figures stay unrounded in the model;
//! only rendered strings (placeholders, worksheet cells at write time)
//! are formatted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{
    CanonicalParameters, Classification, ContactInfo, SavingsBreakdown,
};
use crate::formatting;

/// One typed worksheet cell. The renderer decides how each kind is
/// formatted; the model carries raw numbers.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Cell {
    Count(f64),
    Currency(f64),
    CurrencyWhole(f64),
    Percent(f64),
    Hours(f64),
    Months(f64),
    Text(String),
    Blank,
}

impl Cell {
    /// Human rendering used by markdown, terminal, and email surfaces.
    pub fn render(&self) -> String {
        match self {
            Cell::Count(v) => formatting::count(*v),
            Cell::Currency(v) => formatting::currency(*v),
            Cell::CurrencyWhole(v) => formatting::currency_whole(*v),
            Cell::Percent(v) => formatting::percent(*v),
            Cell::Hours(v) => formatting::hours(*v),
            Cell::Months(v) => formatting::months(*v),
            Cell::Text(s) => s.clone(),
            Cell::Blank => String::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReportRow {
    pub label: String,
    pub cells: Vec<Cell>,
    /// Summary rows get visual emphasis in every renderer.
    pub emphasis: bool,
}

impl ReportRow {
    fn new(label: &str, cells: Vec<Cell>) -> Self {
        Self {
            label: label.to_string(),
            cells,
            emphasis: false,
        }
    }

    fn emphasized(label: &str, cells: Vec<Cell>) -> Self {
        Self {
            label: label.to_string(),
            cells,
            emphasis: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReportSection {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vector<ReportRow>,
}

/// The complete presentation-ready model for one submission.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReportModel {
    pub generated_at: DateTime<Utc>,
    pub contact: Option<ContactInfo>,
    pub parameters: CanonicalParameters,
    pub breakdown: SavingsBreakdown,
    pub classification: Classification,
    pub sections: Vector<ReportSection>,
}

/// Contact + metrics payload for the CRM adapter.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CrmContact {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub website: Option<String>,
    pub lifecycle_stage: String,
    pub total_tb: f64,
    pub total_vms: u64,
    pub total_annual_savings: f64,
    pub annual_roi: f64,
    pub payback_months: f64,
    pub safe_range: bool,
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn assumptions_section(
    params: &CanonicalParameters,
    breakdown: &SavingsBreakdown,
) -> ReportSection {
    let rows: Vector<ReportRow> = [
        ReportRow::new("Total space (TB)", vec![Cell::Count(params.total_tb)]),
        ReportRow::new("Total VMs", vec![Cell::Count(params.total_vms as f64)]),
        ReportRow::new("Cost per TB", vec![Cell::CurrencyWhole(params.cost_per_tb)]),
        ReportRow::new(
            "Fully burdened yearly cost",
            vec![Cell::CurrencyWhole(params.employee_yearly_cost)],
        ),
        ReportRow::new(
            "Work hours yearly",
            vec![Cell::Count(params.work_hours_yearly)],
        ),
        ReportRow::new("Hourly rate", vec![Cell::Currency(breakdown.hourly_rate)]),
    ]
    .into_iter()
    .collect();

    ReportSection {
        title: "Assumptions".to_string(),
        columns: columns(&["Value"]),
        rows,
    }
}

fn cost_avoidance_section(breakdown: &SavingsBreakdown) -> ReportSection {
    let ca = &breakdown.cost_avoidance;
    let line_rows = [
        ("Reuse of orphaned space", &ca.reuse_orphaned),
        ("Improved processes", &ca.improved_processes),
        ("Improve buying accuracy", &ca.buying_accuracy),
    ];

    let mut rows: Vector<ReportRow> = line_rows
        .iter()
        .map(|(label, line)| {
            ReportRow::new(
                label,
                vec![
                    Cell::Percent(line.percent),
                    Cell::Count(line.space_savings_tb),
                    Cell::Currency(line.annual_savings),
                ],
            )
        })
        .collect();
    rows.push_back(ReportRow::emphasized(
        "Total cost avoidance",
        vec![Cell::Blank, Cell::Blank, Cell::Currency(ca.total)],
    ));

    ReportSection {
        title: "Cost Avoidance".to_string(),
        columns: columns(&["% of Total Space", "Space Savings (TB)", "Annual Savings"]),
        rows,
    }
}

fn personnel_section(breakdown: &SavingsBreakdown) -> ReportSection {
    let ps = &breakdown.personnel_savings;
    let mut rows: Vector<ReportRow> = ps
        .lines
        .iter()
        .map(|line| {
            ReportRow::new(
                line.activity.label(),
                vec![
                    Cell::Hours(line.weekly_hours),
                    Cell::Hours(line.yearly_hours),
                    Cell::Currency(line.annual_savings),
                ],
            )
        })
        .collect();
    rows.push_back(ReportRow::emphasized(
        "Total personnel savings",
        vec![
            Cell::Hours(ps.total_weekly_hours),
            Cell::Hours(ps.total_yearly_hours),
            Cell::Currency(ps.total),
        ],
    ));

    ReportSection {
        title: "Personnel Savings".to_string(),
        columns: columns(&["Hrs/Weekly", "Hrs/Yearly", "Annual Savings"]),
        rows,
    }
}

fn operational_section(breakdown: &SavingsBreakdown) -> ReportSection {
    let os = &breakdown.operational_savings;
    let rows: Vector<ReportRow> = [
        ReportRow::new(
            "Outage avoidance",
            vec![Cell::Currency(os.outage_avoidance_savings)],
        ),
        // Display-only placeholders carried over from the worksheet; they
        // have no numeric value and never enter the totals.
        ReportRow::new(
            "Accuracy of data modeling/forecasting",
            vec![Cell::Text("Not quantified".to_string())],
        ),
        ReportRow::new(
            "Visibility by business unit",
            vec![Cell::Text("Not quantified".to_string())],
        ),
        ReportRow::new(
            "Proactive capacity planning/trending",
            vec![Cell::Text("Improved discounting".to_string())],
        ),
        ReportRow::emphasized("Total operational savings", vec![Cell::Currency(os.total)]),
    ]
    .into_iter()
    .collect();

    ReportSection {
        title: "Operational Efficiencies".to_string(),
        columns: columns(&["Annual Savings"]),
        rows,
    }
}

fn summary_section(breakdown: &SavingsBreakdown) -> ReportSection {
    let s = &breakdown.summary;
    let rows: Vector<ReportRow> = [
        ReportRow::emphasized(
            "Annual savings",
            vec![Cell::Currency(s.total_annual_savings)],
        ),
        ReportRow::emphasized(
            "Product annual cost",
            vec![Cell::Currency(s.product_annual_cost)],
        ),
        ReportRow::emphasized("Net annual benefit", vec![Cell::Currency(s.net_benefit)]),
        ReportRow::emphasized("Payback (months)", vec![Cell::Months(s.payback_months)]),
        ReportRow::emphasized("Annual ROI", vec![Cell::Percent(s.annual_roi)]),
        ReportRow::new(
            "Break-even horizon",
            vec![Cell::Text(breakdown.payback_band.label().to_string())],
        ),
    ]
    .into_iter()
    .collect();

    ReportSection {
        title: "Summary".to_string(),
        columns: columns(&["Value"]),
        rows,
    }
}

/// Project a computed breakdown into the presentation model.
///
/// Section order is fixed (Assumptions, Cost Avoidance, Personnel
/// Savings, Operational Efficiencies, Summary) so renderers can walk the
/// sections without target-specific row logic. Pure reshaping: the caller
/// supplies `generated_at` so a regenerated report carries the timestamp
/// of its stored record.
pub fn project(
    params: &CanonicalParameters,
    breakdown: &SavingsBreakdown,
    classification: &Classification,
    contact: Option<&ContactInfo>,
    generated_at: DateTime<Utc>,
) -> ReportModel {
    let sections: Vector<ReportSection> = [
        assumptions_section(params, breakdown),
        cost_avoidance_section(breakdown),
        personnel_section(breakdown),
        operational_section(breakdown),
        summary_section(breakdown),
    ]
    .into_iter()
    .collect();

    ReportModel {
        generated_at,
        contact: contact.cloned(),
        parameters: params.clone(),
        breakdown: breakdown.clone(),
        classification: classification.clone(),
        sections,
    }
}

/// Shape the CRM payload for a validated submission.
pub fn crm_contact(
    contact: &ContactInfo,
    params: &CanonicalParameters,
    breakdown: &SavingsBreakdown,
    classification: &Classification,
) -> CrmContact {
    let (first_name, last_name) = contact.name_parts();
    CrmContact {
        email: contact.email.clone(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        company: contact.company_name.clone(),
        website: contact.company_url.clone(),
        lifecycle_stage: "lead".to_string(),
        total_tb: params.total_tb,
        total_vms: params.total_vms,
        total_annual_savings: breakdown.summary.total_annual_savings,
        annual_roi: breakdown.summary.annual_roi,
        payback_months: breakdown.summary.payback_months,
        safe_range: classification.is_safe,
    }
}

/// Build the `{placeholder} -> rendered value` map email templates
/// substitute from. Values are already-formatted presentation strings.
pub fn email_placeholders(
    contact: &ContactInfo,
    params: &CanonicalParameters,
    breakdown: &SavingsBreakdown,
    generated_at: DateTime<Utc>,
) -> BTreeMap<String, String> {
    let (first_name, _) = contact.name_parts();
    let s = &breakdown.summary;

    BTreeMap::from([
        ("full_name".to_string(), contact.full_name.clone()),
        ("first_name".to_string(), first_name.to_string()),
        ("company_name".to_string(), contact.company_name.clone()),
        (
            "company_url".to_string(),
            contact.company_url.clone().unwrap_or_default(),
        ),
        ("email".to_string(), contact.email.clone()),
        ("total_tb".to_string(), formatting::count(params.total_tb)),
        (
            "total_vms".to_string(),
            formatting::count(params.total_vms as f64),
        ),
        (
            "total_annual_savings".to_string(),
            formatting::currency(s.total_annual_savings),
        ),
        ("net_benefit".to_string(), formatting::currency(s.net_benefit)),
        ("annual_roi".to_string(), formatting::percent(s.annual_roi)),
        (
            "payback_months".to_string(),
            formatting::months(s.payback_months),
        ),
        (
            "date".to_string(),
            generated_at.format("%B %-d, %Y").to_string(),
        ),
    ])
}

/// Substitute `{key}` placeholders into a template. Keys missing from the
/// map are left untouched so a bad template degrades visibly, not
/// silently.
pub fn render_template(template: &str, placeholders: &BTreeMap<String, String>) -> String {
    let mut rendered = template.to_string();
    for (key, value) in placeholders {
        rendered = rendered.replace(&format!("{{{}}}", key), value);
    }
    rendered
}
