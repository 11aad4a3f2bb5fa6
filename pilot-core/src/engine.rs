//! FinancialProjectionEngine: transactions -> snapshot -> (insights, projection).
//!
//! Pure and stateless between calls; persistence is the caller's job.

use crate::finance::{FinancialSnapshot, Transaction};
use crate::insight::Insight;
use crate::metrics::{DEFAULT_WINDOW_MONTHS, MetricDeriver};
use crate::projection::{ProjectionPoint, RunwayProjector, depletion_date};
use crate::rules::InsightRuleEngine;
use crate::scenario::{ScenarioAdjustments, ScenarioBaseline, ScenarioSimulator, SimulationResult};
use crate::time::{Locale, month_start};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub window_months: u32,
    pub locale: Locale,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_months: DEFAULT_WINDOW_MONTHS,
            locale: Locale::default(),
        }
    }
}

/// Everything one analysis pass produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub snapshot: FinancialSnapshot,
    /// Replaces the company's previous batch
    pub insights: Vec<Insight>,
    pub projection: Vec<ProjectionPoint>,
    pub zero_cash_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FinancialProjectionEngine {
    deriver: MetricDeriver,
    projector: RunwayProjector,
}

impl FinancialProjectionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            deriver: MetricDeriver::new(config.window_months),
            projector: RunwayProjector::new(config.locale),
        }
    }

    pub fn deriver(&self) -> &MetricDeriver {
        &self.deriver
    }

    pub fn projector(&self) -> &RunwayProjector {
        &self.projector
    }

    /// Run all three stages for one company.
    ///
    /// `today` anchors the projection's first month and the zero-cash date.
    pub fn analyze(
        &self,
        company_id: &str,
        transactions: &[Transaction],
        prior: Option<&FinancialSnapshot>,
        mrr_growth_percent: Option<f64>,
        today: NaiveDate,
    ) -> Analysis {
        let snapshot = self.deriver.derive(transactions, prior);
        let insights = InsightRuleEngine::evaluate(company_id, &snapshot, mrr_growth_percent);
        let projection =
            self.projector
                .project(snapshot.cash_on_hand, snapshot.monthly_burn, month_start(today));
        let zero_cash_date = depletion_date(snapshot.cash_on_hand, snapshot.monthly_burn, today);

        tracing::debug!(
            company_id,
            insights = insights.len(),
            projection_points = projection.len(),
            "analysis complete"
        );

        Analysis {
            snapshot,
            insights,
            projection,
            zero_cash_date,
        }
    }

    pub fn simulate(
        &self,
        baseline: ScenarioBaseline,
        adjustments: ScenarioAdjustments,
        today: NaiveDate,
    ) -> SimulationResult {
        ScenarioSimulator::new(self.projector).simulate(baseline, adjustments, today)
    }
}
