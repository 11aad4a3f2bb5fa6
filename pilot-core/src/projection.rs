//! Runway projector: month-by-month cash depletion curve.

use crate::finance::non_negative;
use crate::time::{Locale, add_months, month_start};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Upper bound on projected months
pub const MAX_PROJECTION_MONTHS: usize = 12;

/// Minimum points returned so charts always have some width
pub const MIN_PROJECTION_POINTS: usize = 3;

/// Approximate days per month used to turn runway into a calendar date
pub const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub month_label: String,
    /// First day of the projected month
    pub month: NaiveDate,
    /// Clamped to >= 0
    pub projected_cash: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunwayProjector {
    locale: Locale,
}

impl RunwayProjector {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Project cash forward from `start_month` (any day in it).
    ///
    /// Produces up to 12 points. When burning, it stops right after the first
    /// zero-cash month, but never returns fewer than 3 points. Zero burn never
    /// depletes, so the curve runs the full 12 months flat.
    pub fn project(
        &self,
        starting_cash: f64,
        monthly_burn: f64,
        start_month: NaiveDate,
    ) -> Vec<ProjectionPoint> {
        let starting_cash = non_negative(starting_cash);
        let monthly_burn = non_negative(monthly_burn);
        let first = month_start(start_month);

        let mut points = Vec::with_capacity(MAX_PROJECTION_MONTHS);
        for i in 0..MAX_PROJECTION_MONTHS {
            let projected_cash = (starting_cash - monthly_burn * i as f64).max(0.0);
            let month = add_months(first, i as u32);
            points.push(ProjectionPoint {
                month_label: self.locale.label(month).to_string(),
                month,
                projected_cash,
            });

            if monthly_burn > 0.0 && projected_cash == 0.0 && points.len() >= MIN_PROJECTION_POINTS {
                break;
            }
        }

        tracing::debug!(
            points = points.len(),
            starting_cash,
            monthly_burn,
            "projected runway"
        );

        points
    }
}

/// Date cash runs out at the current burn, or `None` when not burning.
pub fn depletion_date(cash_on_hand: f64, monthly_burn: f64, today: NaiveDate) -> Option<NaiveDate> {
    let burn = non_negative(monthly_burn);
    if burn > 0.0 {
        Some(runout_date(today, non_negative(cash_on_hand) / burn))
    } else {
        None
    }
}

/// `today + floor(runway_months * 30)` days, saturating at the calendar's end.
pub fn runout_date(today: NaiveDate, runway_months: f64) -> NaiveDate {
    let days = (non_negative(runway_months) * DAYS_PER_MONTH).floor();
    let days = if days >= u64::MAX as f64 { u64::MAX } else { days as u64 };
    today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}
