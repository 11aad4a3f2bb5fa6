//! pilot-core: financial projection engine for startup dashboards.
//!
//! Three one-way stages: ledger -> [`FinancialSnapshot`] -> ([`Insight`] batch,
//! [`ProjectionPoint`] curve), plus a what-if [`ScenarioSimulator`]. No I/O.

pub mod engine;
pub mod finance;
pub mod insight;
pub mod metrics;
pub mod projection;
pub mod rules;
pub mod scenario;
pub mod time;

pub use engine::{Analysis, EngineConfig, FinancialProjectionEngine};
pub use finance::{FinancialSnapshot, Transaction, TransactionKind, runway_months};
pub use insight::{Insight, InsightKind, InsightStatus, Priority};
pub use metrics::{
    CategoryTotal, DEFAULT_WINDOW_MONTHS, MetricDeriver, expense_breakdown, mrr_growth_percent,
};
pub use projection::{ProjectionPoint, RunwayProjector, depletion_date};
pub use rules::{InsightRuleEngine, Rule};
pub use scenario::{
    ScenarioAdjustments, ScenarioBaseline, ScenarioSimulator, SimulationResult,
    UNBOUNDED_RUNWAY_MONTHS,
};
pub use time::Locale;
