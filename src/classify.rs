//! Safe-range classification policy.
//!
//! A computed ROI far outside the believable band usually means the
//! prospect mistyped an input (or has a genuinely unusual environment);
//! either way the submission should be eyeballed by a human before the
//! numbers are trusted. The classifier only returns the decision; acting
//! on it (review notifications, task urgency) is the pipeline's job.

use crate::config::SafeRangeBounds;
use crate::core::{Classification, ReviewUrgency, SavingsBreakdown};

/// Apply the configured safe-range policy to a breakdown.
///
/// Both bounds are inclusive: an ROI exactly at the lower or upper bound
/// classifies as safe.
pub fn classify(breakdown: &SavingsBreakdown, bounds: SafeRangeBounds) -> Classification {
    let annual_roi = breakdown.summary.annual_roi;
    let is_safe = annual_roi >= bounds.lower && annual_roi <= bounds.upper;

    Classification {
        annual_roi,
        is_safe,
        lower_bound: bounds.lower,
        upper_bound: bounds.upper,
        urgency: if is_safe {
            ReviewUrgency::Normal
        } else {
            ReviewUrgency::High
        },
    }
}
