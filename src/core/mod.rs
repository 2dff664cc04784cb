pub mod params;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use params::{CanonicalParameters, WeeklyHours};

/// The seven manual-effort activities a storage team spends recurring
/// weekly hours on. Each one becomes a personnel savings line item.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    BuildingReports,
    Planning,
    ModelingTrends,
    ProblemResolution,
    CapacityReporting,
    ServiceImprovement,
    AutomationTasks,
}

impl Activity {
    pub const ALL: [Activity; 7] = [
        Activity::BuildingReports,
        Activity::Planning,
        Activity::ModelingTrends,
        Activity::ProblemResolution,
        Activity::CapacityReporting,
        Activity::ServiceImprovement,
        Activity::AutomationTasks,
    ];

    /// Raw payload key for this activity's weekly-hours field.
    pub fn field_key(self) -> &'static str {
        match self {
            Activity::BuildingReports => "time_building_reports",
            Activity::Planning => "time_planning",
            Activity::ModelingTrends => "modeling_trends",
            Activity::ProblemResolution => "problem_resolution",
            Activity::CapacityReporting => "capacity_reporting",
            Activity::ServiceImprovement => "service_improvement",
            Activity::AutomationTasks => "automation_tasks",
        }
    }

    /// Human label used by worksheet rows.
    pub fn label(self) -> &'static str {
        match self {
            Activity::BuildingReports => "Time spent building reports",
            Activity::Planning => "Time spent planning",
            Activity::ModelingTrends => "Modeling trends",
            Activity::ProblemResolution => "Improved problem resolution",
            Activity::CapacityReporting => "Capacity report collection",
            Activity::ServiceImprovement => "Service improvement",
            Activity::AutomationTasks => "Automation of manual tasks",
        }
    }

    pub fn default_weekly_hours(self) -> f64 {
        match self {
            Activity::BuildingReports => 4.0,
            Activity::Planning => 2.0,
            Activity::ModelingTrends => 2.0,
            Activity::ProblemResolution => 4.0,
            Activity::CapacityReporting => 4.0,
            Activity::ServiceImprovement => 6.0,
            Activity::AutomationTasks => 4.0,
        }
    }
}

/// One storage cost-avoidance category: a percentage of total capacity
/// reclaimed or never purchased, valued at the per-TB cost.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CostAvoidanceLine {
    pub percent: f64,
    pub space_savings_tb: f64,
    pub annual_savings: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CostAvoidance {
    pub reuse_orphaned: CostAvoidanceLine,
    pub improved_processes: CostAvoidanceLine,
    pub buying_accuracy: CostAvoidanceLine,
    pub total: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PersonnelLine {
    pub activity: Activity,
    pub weekly_hours: f64,
    pub yearly_hours: f64,
    pub annual_savings: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PersonnelSavings {
    pub lines: Vec<PersonnelLine>,
    pub total_weekly_hours: f64,
    pub total_yearly_hours: f64,
    pub total: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OperationalSavings {
    pub outage_avoidance_savings: f64,
    pub total: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SavingsSummary {
    pub total_annual_savings: f64,
    pub product_annual_cost: f64,
    pub net_benefit: f64,
    pub payback_months: f64,
    pub annual_roi: f64,
}

/// Coarse payback horizon shown to prospects alongside the exact figure.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaybackBand {
    UnderOneYear,
    UnderTwoYears,
    UnderThreeYears,
    OverThreeYears,
}

impl PaybackBand {
    pub fn from_months(months: f64) -> Self {
        if months <= 12.0 {
            PaybackBand::UnderOneYear
        } else if months <= 24.0 {
            PaybackBand::UnderTwoYears
        } else if months <= 36.0 {
            PaybackBand::UnderThreeYears
        } else {
            PaybackBand::OverThreeYears
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaybackBand::UnderOneYear => "Less than 1 year",
            PaybackBand::UnderTwoYears => "Less than 2 years",
            PaybackBand::UnderThreeYears => "Less than 3 years",
            PaybackBand::OverThreeYears => "More than 3 years",
        }
    }
}

/// Complete engine output. Figures are unrounded; rounding belongs to
/// the presentation layer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SavingsBreakdown {
    pub hourly_rate: f64,
    pub cost_avoidance: CostAvoidance,
    pub personnel_savings: PersonnelSavings,
    pub operational_savings: OperationalSavings,
    pub summary: SavingsSummary,
    pub payback_band: PaybackBand,
}

/// How urgently a human should look at a submission before it is trusted.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewUrgency {
    Normal,
    High,
}

/// Result of applying the safe-range policy to a breakdown.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub annual_roi: f64,
    pub is_safe: bool,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub urgency: ReviewUrgency,
}

/// Lead contact details captured with a submission. Validation happens in
/// the submission layer, not the engine.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ContactInfo {
    pub full_name: String,
    pub email: String,
    pub company_name: String,
    pub company_url: Option<String>,
}

impl ContactInfo {
    /// Split on the first space, HubSpot-style {firstname, lastname}.
    pub fn name_parts(&self) -> (&str, &str) {
        match self.full_name.trim().split_once(' ') {
            Some((first, last)) => (first, last.trim()),
            None => (self.full_name.trim(), ""),
        }
    }
}

/// Delivery state of a best-effort downstream notification. Failures are
/// recorded here, never surfaced as submission errors.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum NotifyStatus {
    Pending,
    Sent { at: DateTime<Utc> },
    Failed { reason: String },
}

impl NotifyStatus {
    pub fn is_sent(&self) -> bool {
        matches!(self, NotifyStatus::Sent { .. })
    }
}
