use serde::{Deserialize, Serialize};

use super::Activity;

/// Weekly manual-effort hours per activity.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeeklyHours {
    pub building_reports: f64,
    pub planning: f64,
    pub modeling_trends: f64,
    pub problem_resolution: f64,
    pub capacity_reporting: f64,
    pub service_improvement: f64,
    pub automation_tasks: f64,
}

impl Default for WeeklyHours {
    fn default() -> Self {
        Self {
            building_reports: Activity::BuildingReports.default_weekly_hours(),
            planning: Activity::Planning.default_weekly_hours(),
            modeling_trends: Activity::ModelingTrends.default_weekly_hours(),
            problem_resolution: Activity::ProblemResolution.default_weekly_hours(),
            capacity_reporting: Activity::CapacityReporting.default_weekly_hours(),
            service_improvement: Activity::ServiceImprovement.default_weekly_hours(),
            automation_tasks: Activity::AutomationTasks.default_weekly_hours(),
        }
    }
}

impl WeeklyHours {
    pub fn get(&self, activity: Activity) -> f64 {
        match activity {
            Activity::BuildingReports => self.building_reports,
            Activity::Planning => self.planning,
            Activity::ModelingTrends => self.modeling_trends,
            Activity::ProblemResolution => self.problem_resolution,
            Activity::CapacityReporting => self.capacity_reporting,
            Activity::ServiceImprovement => self.service_improvement,
            Activity::AutomationTasks => self.automation_tasks,
        }
    }

    pub fn set(&mut self, activity: Activity, hours: f64) {
        match activity {
            Activity::BuildingReports => self.building_reports = hours,
            Activity::Planning => self.planning = hours,
            Activity::ModelingTrends => self.modeling_trends = hours,
            Activity::ProblemResolution => self.problem_resolution = hours,
            Activity::CapacityReporting => self.capacity_reporting = hours,
            Activity::ServiceImprovement => self.service_improvement = hours,
            Activity::AutomationTasks => self.automation_tasks = hours,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Activity, f64)> + '_ {
        Activity::ALL.iter().map(move |&a| (a, self.get(a)))
    }

    pub fn total(&self) -> f64 {
        Activity::ALL.iter().map(|&a| self.get(a)).sum()
    }
}

/// The fully normalized, validated parameter set the engine consumes.
///
/// Every percentage here is a fraction of total capacity, not absolute TB;
/// conversion to dollars happens inside the engine. Denominator fields
/// (`work_hours_yearly`, `product_annual_cost`) are guaranteed >= 1 by the
/// normalizer, so the engine never divides by zero.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CanonicalParameters {
    pub total_tb: f64,
    pub cost_per_tb: f64,
    pub total_vms: u64,
    pub employee_yearly_cost: f64,
    pub work_hours_yearly: f64,
    pub reuse_orphaned_pct: f64,
    pub improved_processes_pct: f64,
    pub buying_accuracy_pct: f64,
    pub weekly_hours: WeeklyHours,
    pub outage_avoidance_savings: f64,
    pub product_annual_cost: f64,
}

impl Default for CanonicalParameters {
    fn default() -> Self {
        Self {
            total_tb: 0.0,
            cost_per_tb: 500.0,
            total_vms: 0,
            employee_yearly_cost: 150_000.0,
            work_hours_yearly: 1_880.0,
            reuse_orphaned_pct: 2.0,
            improved_processes_pct: 2.0,
            buying_accuracy_pct: 1.0,
            weekly_hours: WeeklyHours::default(),
            outage_avoidance_savings: 250_000.0,
            product_annual_cost: 150_000.0,
        }
    }
}
