//! What-if simulator: hypothetical revenue, cost and funding adjustments.
//!
//! Works on a copy of the baseline numbers; the real snapshot is never touched.

use crate::finance::{FinancialSnapshot, non_negative};
use crate::projection::{ProjectionPoint, RunwayProjector, runout_date};
use crate::time::month_start;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Runway reported when the hypothetical burn reaches zero.
/// Dashboards branch on this exact value.
pub const UNBOUNDED_RUNWAY_MONTHS: f64 = 99.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioBaseline {
    pub cash_on_hand: f64,
    pub monthly_burn: f64,
}

impl From<&FinancialSnapshot> for ScenarioBaseline {
    fn from(snap: &FinancialSnapshot) -> Self {
        Self {
            cash_on_hand: snap.cash_on_hand,
            monthly_burn: snap.monthly_burn,
        }
    }
}

/// User-entered adjustments. Percentages are clamped to 0-100 and funding to >= 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioAdjustments {
    pub revenue_increase_percent: f64,
    pub cost_reduction_percent: f64,
    pub additional_funding: f64,
}

impl ScenarioAdjustments {
    pub fn new(revenue_increase_percent: f64, cost_reduction_percent: f64, additional_funding: f64) -> Self {
        Self {
            revenue_increase_percent,
            cost_reduction_percent,
            additional_funding,
        }
    }

    fn clamped(&self) -> Self {
        Self {
            revenue_increase_percent: non_negative(self.revenue_increase_percent).min(100.0),
            cost_reduction_percent: non_negative(self.cost_reduction_percent).min(100.0),
            additional_funding: non_negative(self.additional_funding),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub baseline: ScenarioBaseline,
    /// Adjustments after clamping
    pub adjustments: ScenarioAdjustments,
    pub cost_reduction_amount: f64,
    pub revenue_increase_amount: f64,
    pub new_burn: f64,
    pub new_cash: f64,
    pub new_runway_months: f64,
    pub estimated_runout_date: NaiveDate,
    pub projection: Vec<ProjectionPoint>,
}

impl SimulationResult {
    pub fn is_unbounded(&self) -> bool {
        self.new_burn <= 0.0
    }

    /// Runway gained (or lost) relative to the baseline
    pub fn runway_delta_months(&self) -> f64 {
        let base = crate::finance::runway_months(self.baseline.cash_on_hand, self.baseline.monthly_burn);
        self.new_runway_months - base
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioSimulator {
    projector: RunwayProjector,
}

impl ScenarioSimulator {
    pub fn new(projector: RunwayProjector) -> Self {
        Self { projector }
    }

    /// Run one scenario.
    ///
    /// Revenue increase is scaled against the baseline burn, not revenue: a
    /// 20% increase offsets 20% of the monthly burn.
    pub fn simulate(
        &self,
        baseline: ScenarioBaseline,
        adjustments: ScenarioAdjustments,
        today: NaiveDate,
    ) -> SimulationResult {
        let adjustments = adjustments.clamped();
        let base_burn = non_negative(baseline.monthly_burn);
        let base_cash = non_negative(baseline.cash_on_hand);

        let cost_reduction_amount = adjustments.cost_reduction_percent / 100.0 * base_burn;
        let revenue_increase_amount = adjustments.revenue_increase_percent / 100.0 * base_burn;

        let new_burn = (base_burn - cost_reduction_amount - revenue_increase_amount).max(0.0);
        let new_cash = base_cash + adjustments.additional_funding;
        let new_runway_months = if new_burn > 0.0 {
            new_cash / new_burn
        } else {
            UNBOUNDED_RUNWAY_MONTHS
        };

        let projection = self.projector.project(new_cash, new_burn, month_start(today));

        tracing::debug!(new_burn, new_cash, new_runway_months, "simulated scenario");

        SimulationResult {
            baseline,
            adjustments,
            cost_reduction_amount,
            revenue_increase_amount,
            new_burn,
            new_cash,
            new_runway_months,
            estimated_runout_date: runout_date(today, new_runway_months),
            projection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn baseline() -> ScenarioBaseline {
        ScenarioBaseline {
            cash_on_hand: 10_000.0,
            monthly_burn: 5_000.0,
        }
    }

    #[test]
    fn test_combined_adjustments() {
        let result = ScenarioSimulator::default().simulate(
            baseline(),
            ScenarioAdjustments::new(20.0, 10.0, 5_000.0),
            today(),
        );
        assert_relative_eq!(result.cost_reduction_amount, 500.0);
        assert_relative_eq!(result.revenue_increase_amount, 1_000.0);
        assert_relative_eq!(result.new_burn, 3_500.0);
        assert_relative_eq!(result.new_cash, 15_000.0);
        assert_relative_eq!(result.new_runway_months, 15_000.0 / 3_500.0);
        // floor(4.2857 * 30) = 128 days
        assert_eq!(
            result.estimated_runout_date,
            today() + chrono::Days::new(128)
        );
        assert!(!result.is_unbounded());
    }

    #[test]
    fn test_zero_burn_uses_sentinel() {
        let result = ScenarioSimulator::default().simulate(
            baseline(),
            ScenarioAdjustments::new(50.0, 50.0, 0.0),
            today(),
        );
        assert_eq!(result.new_burn, 0.0);
        assert_eq!(result.new_runway_months, UNBOUNDED_RUNWAY_MONTHS);
        assert_eq!(result.estimated_runout_date, today() + chrono::Days::new(2_970));
        assert_eq!(result.projection.len(), 12);
        assert!(result.is_unbounded());
    }

    #[test]
    fn test_no_adjustments_matches_baseline() {
        let result =
            ScenarioSimulator::default().simulate(baseline(), ScenarioAdjustments::default(), today());
        assert_relative_eq!(result.new_runway_months, 2.0);
        assert_relative_eq!(result.runway_delta_months(), 0.0);
        assert_eq!(result.projection.len(), 3);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let result = ScenarioSimulator::default().simulate(
            baseline(),
            ScenarioAdjustments::new(-10.0, 250.0, -1_000.0),
            today(),
        );
        assert_eq!(result.adjustments, ScenarioAdjustments::new(0.0, 100.0, 0.0));
        assert_eq!(result.new_burn, 0.0);
        assert_eq!(result.new_cash, 10_000.0);
    }

    #[test]
    fn test_baseline_is_not_mutated() {
        let snap = FinancialSnapshot::from_parts(10_000.0, 2_000.0, 5_000.0);
        let base = ScenarioBaseline::from(&snap);
        let result = ScenarioSimulator::default().simulate(
            base,
            ScenarioAdjustments::new(0.0, 50.0, 0.0),
            today(),
        );
        assert_eq!(result.baseline, base);
        assert_eq!(snap.monthly_burn, 5_000.0);
        assert_relative_eq!(result.runway_delta_months(), 2.0);
    }
}
