//! Threshold rules: [`FinancialSnapshot`] -> prioritized [`Insight`] batch.
//!
//! Every rule is evaluated independently, so several can fire for one snapshot.
//! The batch is never empty: when nothing fires the "connect your data" insight
//! is returned instead.

use crate::finance::FinancialSnapshot;
use crate::insight::{Insight, InsightKind, Priority};

pub const RUNWAY_CRITICAL_MONTHS: f64 = 1.0;
pub const RUNWAY_ATTENTION_MONTHS: f64 = 3.0;
pub const RUNWAY_MODERATE_MONTHS: f64 = 6.0;
pub const BURN_SEVERE_RATIO: f64 = 1.5;
pub const CASH_CRITICAL: f64 = 1_000.0;
pub const CASH_LOW: f64 = 5_000.0;
pub const GROWTH_POSITIVE_PERCENT: f64 = 10.0;

/// Rules in table order. Declaration order is the tie-break within a priority tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    RunwayCritical,
    RunwayAttention,
    RunwayModerate,
    BurnSevere,
    BurnExceedsRevenue,
    CashCritical,
    CashLow,
    GrowthPositive,
    NoData,
}

impl Rule {
    /// Threshold rules, excluding the fallback
    pub const THRESHOLDS: [Rule; 8] = [
        Rule::RunwayCritical,
        Rule::RunwayAttention,
        Rule::RunwayModerate,
        Rule::BurnSevere,
        Rule::BurnExceedsRevenue,
        Rule::CashCritical,
        Rule::CashLow,
        Rule::GrowthPositive,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Rule::RunwayCritical => "runway_critical",
            Rule::RunwayAttention => "runway_attention",
            Rule::RunwayModerate => "runway_moderate",
            Rule::BurnSevere => "burn_severe",
            Rule::BurnExceedsRevenue => "burn_exceeds_revenue",
            Rule::CashCritical => "cash_critical",
            Rule::CashLow => "cash_low",
            Rule::GrowthPositive => "growth_positive",
            Rule::NoData => "no_data",
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            Rule::RunwayCritical
            | Rule::RunwayAttention
            | Rule::BurnSevere
            | Rule::CashCritical => Priority::High,
            Rule::RunwayModerate | Rule::BurnExceedsRevenue | Rule::CashLow | Rule::NoData => {
                Priority::Medium
            }
            Rule::GrowthPositive => Priority::Low,
        }
    }

    pub fn kind(&self) -> InsightKind {
        match self {
            Rule::RunwayCritical | Rule::RunwayAttention | Rule::BurnSevere | Rule::CashCritical => {
                InsightKind::Alert
            }
            Rule::RunwayModerate => InsightKind::Projection,
            Rule::BurnExceedsRevenue | Rule::CashLow | Rule::GrowthPositive | Rule::NoData => {
                InsightKind::Suggestion
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Rule::RunwayCritical => "Runway Crítico",
            Rule::RunwayAttention => "Runway em Atenção",
            Rule::RunwayModerate => "Runway Moderado",
            Rule::BurnSevere => "Burn Rate Muito Acima da Receita",
            Rule::BurnExceedsRevenue => "Burn Rate Acima da Receita",
            Rule::CashCritical => "Caixa Criticamente Baixo",
            Rule::CashLow => "Caixa Baixo",
            Rule::GrowthPositive => "Crescimento Positivo",
            Rule::NoData => "Conecte seus dados financeiros",
        }
    }

    /// NaN and negative values compare false everywhere, so garbage never fires.
    pub fn fires(&self, snap: &FinancialSnapshot, mrr_growth_percent: Option<f64>) -> bool {
        let runway = snap.runway_months;
        let burn = snap.monthly_burn;
        let revenue = snap.monthly_revenue;
        let cash = snap.cash_on_hand;

        match self {
            Rule::RunwayCritical => runway > 0.0 && runway < RUNWAY_CRITICAL_MONTHS,
            Rule::RunwayAttention => {
                runway >= RUNWAY_CRITICAL_MONTHS && runway < RUNWAY_ATTENTION_MONTHS
            }
            Rule::RunwayModerate => {
                runway >= RUNWAY_ATTENTION_MONTHS && runway < RUNWAY_MODERATE_MONTHS
            }
            Rule::BurnSevere => revenue > 0.0 && burn > revenue * BURN_SEVERE_RATIO,
            Rule::BurnExceedsRevenue => burn > revenue && burn <= revenue * BURN_SEVERE_RATIO,
            Rule::CashCritical => cash > 0.0 && cash < CASH_CRITICAL,
            Rule::CashLow => cash >= CASH_CRITICAL && cash < CASH_LOW,
            Rule::GrowthPositive => {
                mrr_growth_percent.is_some_and(|g| g > GROWTH_POSITIVE_PERCENT)
            }
            Rule::NoData => false,
        }
    }

    fn describe(&self, snap: &FinancialSnapshot, mrr_growth_percent: Option<f64>) -> String {
        match self {
            Rule::RunwayCritical => format!(
                "Seu caixa cobre menos de 1 mês de operação ({:.1} meses). Priorize captação ou corte de custos imediatamente.",
                snap.runway_months
            ),
            Rule::RunwayAttention => format!(
                "Seu runway é de {:.1} meses. Comece a planejar a próxima captação ou reduza o burn rate.",
                snap.runway_months
            ),
            Rule::RunwayModerate => format!(
                "Seu runway é de {:.1} meses. Acompanhe o burn rate de perto e prepare um plano de captação.",
                snap.runway_months
            ),
            Rule::BurnSevere => format!(
                "Suas despesas mensais (R$ {:.2}) superam a receita (R$ {:.2}) em mais de 50%. Revise os maiores centros de custo.",
                snap.monthly_burn, snap.monthly_revenue
            ),
            Rule::BurnExceedsRevenue => format!(
                "Suas despesas mensais (R$ {:.2}) estão acima da receita (R$ {:.2}). Avalie onde reduzir custos.",
                snap.monthly_burn, snap.monthly_revenue
            ),
            Rule::CashCritical => format!(
                "Restam apenas R$ {:.2} em caixa. Garanta recursos para as obrigações imediatas.",
                snap.cash_on_hand
            ),
            Rule::CashLow => format!(
                "Seu caixa está em R$ {:.2}. Considere reforçar a reserva de emergência.",
                snap.cash_on_hand
            ),
            Rule::GrowthPositive => format!(
                "Seu MRR cresceu {:.1}% no último mês. Bom momento para investir em aquisição.",
                mrr_growth_percent.unwrap_or_default()
            ),
            Rule::NoData => "Conecte suas contas bancárias para receber insights personalizados sobre runway, burn rate e fluxo de caixa.".to_string(),
        }
    }

    fn to_insight(
        self,
        company_id: &str,
        snap: &FinancialSnapshot,
        mrr_growth_percent: Option<f64>,
    ) -> Insight {
        Insight::new(
            company_id,
            self.key(),
            self.kind(),
            self.priority(),
            self.title(),
            self.describe(snap, mrr_growth_percent),
        )
    }
}

/// Evaluates the rule table against a snapshot
pub struct InsightRuleEngine;

impl InsightRuleEngine {
    /// Matching rules only, sorted by priority then table order. May be empty.
    pub fn matching_rules(snap: &FinancialSnapshot, mrr_growth_percent: Option<f64>) -> Vec<Rule> {
        let mut fired: Vec<Rule> = Rule::THRESHOLDS
            .into_iter()
            .filter(|r| r.fires(snap, mrr_growth_percent))
            .collect();
        // sort_by_key is stable, table order survives within a tier
        fired.sort_by_key(Rule::priority);
        fired
    }

    /// Build the insight batch for one company. Always returns at least one insight.
    pub fn evaluate(
        company_id: &str,
        snap: &FinancialSnapshot,
        mrr_growth_percent: Option<f64>,
    ) -> Vec<Insight> {
        let mut rules = Self::matching_rules(snap, mrr_growth_percent);
        if rules.is_empty() {
            rules.push(Rule::NoData);
        }

        tracing::debug!(
            company_id,
            fired = ?rules.iter().map(Rule::key).collect::<Vec<_>>(),
            "evaluated insight rules"
        );

        rules
            .into_iter()
            .map(|r| r.to_insight(company_id, snap, mrr_growth_percent))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(insights: &[Insight]) -> Vec<String> {
        insights
            .iter()
            .map(|i| i.id.trim_start_matches("acme:").to_string())
            .collect()
    }

    #[test]
    fn test_moderate_runway_only() {
        let snap = FinancialSnapshot {
            cash_on_hand: 150_000.0,
            monthly_revenue: 100_000.0,
            monthly_burn: 50_000.0,
            runway_months: 3.0,
        };
        let insights = InsightRuleEngine::evaluate("acme", &snap, None);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Runway Moderado");
        assert_eq!(insights[0].priority, Priority::Medium);
    }

    #[test]
    fn test_zero_snapshot_gets_default_insight() {
        let insights = InsightRuleEngine::evaluate("acme", &FinancialSnapshot::zero(), None);
        assert_eq!(keys(&insights), vec!["no_data"]);
        assert_eq!(insights[0].title, "Conecte seus dados financeiros");
    }

    #[test]
    fn test_garbage_snapshot_falls_back_to_default() {
        let snap = FinancialSnapshot {
            cash_on_hand: f64::NAN,
            monthly_revenue: -10.0,
            monthly_burn: f64::NAN,
            runway_months: -4.0,
        };
        let insights = InsightRuleEngine::evaluate("acme", &snap, Some(f64::NAN));
        assert_eq!(keys(&insights), vec!["no_data"]);
    }

    #[test]
    fn test_runway_bands() {
        let at = |runway: f64| {
            let snap = FinancialSnapshot {
                cash_on_hand: 50_000.0,
                monthly_revenue: 0.0,
                monthly_burn: 0.0,
                runway_months: runway,
            };
            keys(&InsightRuleEngine::evaluate("acme", &snap, None))
        };
        assert_eq!(at(0.5), vec!["runway_critical"]);
        assert_eq!(at(1.0), vec!["runway_attention"]);
        assert_eq!(at(2.99), vec!["runway_attention"]);
        assert_eq!(at(5.99), vec!["runway_moderate"]);
        assert_eq!(at(6.0), vec!["no_data"]);
    }

    #[test]
    fn test_burn_bands() {
        let at = |revenue: f64, burn: f64| {
            let snap = FinancialSnapshot {
                cash_on_hand: 1_000_000.0,
                monthly_revenue: revenue,
                monthly_burn: burn,
                runway_months: 12.0,
            };
            keys(&InsightRuleEngine::evaluate("acme", &snap, None))
        };
        assert_eq!(at(10_000.0, 15_001.0), vec!["burn_severe"]);
        assert_eq!(at(10_000.0, 15_000.0), vec!["burn_exceeds_revenue"]);
        assert_eq!(at(10_000.0, 10_000.0), vec!["no_data"]);
        // no revenue: neither burn rule applies
        assert_eq!(at(0.0, 5_000.0), vec!["no_data"]);
    }

    #[test]
    fn test_sorted_by_priority_then_table_order() {
        // runway attention (high), burn severe (high), cash low (medium), growth (low)
        let snap = FinancialSnapshot {
            cash_on_hand: 4_000.0,
            monthly_revenue: 1_000.0,
            monthly_burn: 2_000.0,
            runway_months: 2.0,
        };
        let insights = InsightRuleEngine::evaluate("acme", &snap, Some(15.0));
        assert_eq!(
            keys(&insights),
            vec!["runway_attention", "burn_severe", "cash_low", "growth_positive"]
        );
        for w in insights.windows(2) {
            assert!(w[0].priority <= w[1].priority, "insights not sorted by priority");
        }
    }

    #[test]
    fn test_medium_burn_sorts_after_high_cash() {
        let snap = FinancialSnapshot {
            cash_on_hand: 500.0,
            monthly_revenue: 1_000.0,
            monthly_burn: 1_200.0,
            runway_months: 500.0 / 1_200.0,
        };
        let insights = InsightRuleEngine::evaluate("acme", &snap, None);
        assert_eq!(
            keys(&insights),
            vec!["runway_critical", "cash_critical", "burn_exceeds_revenue"]
        );
    }

    #[test]
    fn test_growth_alone_suppresses_default() {
        let snap = FinancialSnapshot::from_parts(100_000.0, 10_000.0, 0.0);
        let insights = InsightRuleEngine::evaluate("acme", &snap, Some(12.5));
        assert_eq!(keys(&insights), vec!["growth_positive"]);
        assert_eq!(insights[0].priority, Priority::Low);
        assert!(insights[0].description.contains("12.5%"));
    }

    #[test]
    fn test_growth_at_threshold_does_not_fire() {
        let snap = FinancialSnapshot::from_parts(100_000.0, 10_000.0, 0.0);
        let insights = InsightRuleEngine::evaluate("acme", &snap, Some(10.0));
        assert_eq!(keys(&insights), vec!["no_data"]);
    }

    #[test]
    fn test_never_empty_over_grid() {
        for cash in [0.0, 500.0, 1_000.0, 4_999.0, 5_000.0, 1e7] {
            for revenue in [0.0, 1_000.0, 50_000.0] {
                for burn in [0.0, 800.0, 1_400.0, 60_000.0] {
                    let snap = FinancialSnapshot::from_parts(cash, revenue, burn);
                    assert!(!InsightRuleEngine::evaluate("acme", &snap, None).is_empty());
                }
            }
        }
    }

    #[test]
    fn test_batch_is_deterministic() {
        let snap = FinancialSnapshot::from_parts(3_000.0, 1_000.0, 2_000.0);
        let a = InsightRuleEngine::evaluate("acme", &snap, None);
        let b = InsightRuleEngine::evaluate("acme", &snap, None);
        assert_eq!(a, b);
    }
}
