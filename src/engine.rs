//! The pure ROI calculation.
//!
//! `compute` is the single calculation path for both the quick calculator
//! (all-default parameters) and the fully parameterized one; the modes
//! differ only in which assumptions the caller overrides.
//!
//! - Annual ROI is `net_benefit / product_annual_cost * 100`, the net
//!   form, not the gross `savings / cost` form.
//! - The hourly rate is computed from employee cost and work hours, never
//!   a rounded flat figure.
//!
//! No rounding happens in this module; every figure flows out at full
//! floating-point precision and is rounded only at the presentation edge.

use crate::core::{
    Activity, CanonicalParameters, CostAvoidance, CostAvoidanceLine, OperationalSavings,
    PaybackBand, PersonnelLine, PersonnelSavings, SavingsBreakdown, SavingsSummary,
};

pub const WEEKS_PER_YEAR: f64 = 52.0;

/// Finite stand-in for "effectively never pays back" when total savings
/// are zero. Large enough to sort last, small enough to format.
pub const PAYBACK_SENTINEL_MONTHS: f64 = 999.0;

fn cost_avoidance_line(pct: f64, total_tb: f64, cost_per_tb: f64) -> CostAvoidanceLine {
    let space_fraction = pct / 100.0;
    let space_savings_tb = space_fraction * total_tb;
    CostAvoidanceLine {
        percent: pct,
        space_savings_tb,
        annual_savings: space_savings_tb * cost_per_tb,
    }
}

fn personnel_line(activity: Activity, weekly_hours: f64, hourly_rate: f64) -> PersonnelLine {
    let yearly_hours = weekly_hours * WEEKS_PER_YEAR;
    PersonnelLine {
        activity,
        weekly_hours,
        yearly_hours,
        annual_savings: yearly_hours * hourly_rate,
    }
}

fn payback_months(product_annual_cost: f64, total_annual_savings: f64) -> f64 {
    if product_annual_cost > 0.0 && total_annual_savings > 0.0 {
        (product_annual_cost / total_annual_savings) * 12.0
    } else {
        PAYBACK_SENTINEL_MONTHS
    }
}

fn annual_roi(net_benefit: f64, product_annual_cost: f64) -> f64 {
    if product_annual_cost > 0.0 {
        (net_benefit / product_annual_cost) * 100.0
    } else {
        0.0
    }
}

/// Transform canonical parameters into the full savings breakdown.
///
/// Pure and total: any well-formed `CanonicalParameters` yields a complete
/// breakdown with finite figures. The normalizer's >= 1 floor on
/// denominator fields is what makes the divisions here safe.
pub fn compute(params: &CanonicalParameters) -> SavingsBreakdown {
    let hourly_rate = params.employee_yearly_cost / params.work_hours_yearly;

    let reuse_orphaned =
        cost_avoidance_line(params.reuse_orphaned_pct, params.total_tb, params.cost_per_tb);
    let improved_processes = cost_avoidance_line(
        params.improved_processes_pct,
        params.total_tb,
        params.cost_per_tb,
    );
    let buying_accuracy =
        cost_avoidance_line(params.buying_accuracy_pct, params.total_tb, params.cost_per_tb);
    let cost_avoidance_total = reuse_orphaned.annual_savings
        + improved_processes.annual_savings
        + buying_accuracy.annual_savings;

    let lines: Vec<PersonnelLine> = Activity::ALL
        .iter()
        .map(|&activity| {
            personnel_line(activity, params.weekly_hours.get(activity), hourly_rate)
        })
        .collect();
    let total_weekly_hours: f64 = lines.iter().map(|l| l.weekly_hours).sum();
    let total_yearly_hours: f64 = lines.iter().map(|l| l.yearly_hours).sum();
    let personnel_total: f64 = lines.iter().map(|l| l.annual_savings).sum();

    // Outage avoidance is the only operational line with a numeric value;
    // the remaining worksheet rows are display-only placeholders.
    let operational_total = params.outage_avoidance_savings;

    let total_annual_savings = cost_avoidance_total + personnel_total + operational_total;
    let net_benefit = total_annual_savings - params.product_annual_cost;
    let payback = payback_months(params.product_annual_cost, total_annual_savings);

    SavingsBreakdown {
        hourly_rate,
        cost_avoidance: CostAvoidance {
            reuse_orphaned,
            improved_processes,
            buying_accuracy,
            total: cost_avoidance_total,
        },
        personnel_savings: PersonnelSavings {
            lines,
            total_weekly_hours,
            total_yearly_hours,
            total: personnel_total,
        },
        operational_savings: OperationalSavings {
            outage_avoidance_savings: params.outage_avoidance_savings,
            total: operational_total,
        },
        summary: SavingsSummary {
            total_annual_savings,
            product_annual_cost: params.product_annual_cost,
            net_benefit,
            payback_months: payback,
            annual_roi: annual_roi(net_benefit, params.product_annual_cost),
        },
        payback_band: PaybackBand::from_months(payback),
    }
}
