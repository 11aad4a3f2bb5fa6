//! Metric derivation: raw ledger transactions -> [`FinancialSnapshot`].

use crate::finance::{FinancialSnapshot, Transaction};
use crate::time::{month_start, sub_months};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Trailing window the dashboard averages over when the caller has no opinion
pub const DEFAULT_WINDOW_MONTHS: u32 = 3;

/// Turns a trailing window of transactions into a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct MetricDeriver {
    window_months: u32,
}

impl Default for MetricDeriver {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_MONTHS)
    }
}

impl MetricDeriver {
    /// A zero window is treated as one month so averaging never divides by zero.
    pub fn new(window_months: u32) -> Self {
        Self {
            window_months: window_months.max(1),
        }
    }

    pub fn window_months(&self) -> u32 {
        self.window_months
    }

    /// Derive a snapshot from `transactions`.
    ///
    /// Revenue is the positive `revenue` rows, burn the negative `expense` rows
    /// (as magnitudes). Cash comes from `prior` when it reports a positive balance.
    /// Otherwise it is the sum of all source amounts as reported, and a negative
    /// sum is taken as its absolute value.
    pub fn derive(
        &self,
        transactions: &[Transaction],
        prior: Option<&FinancialSnapshot>,
    ) -> FinancialSnapshot {
        let window = self.window_months as f64;

        let total_revenue: f64 = transactions
            .iter()
            .filter(|t| t.is_inflow())
            .map(Transaction::normalized_amount)
            .sum();
        let total_expenses: f64 = transactions
            .iter()
            .filter(|t| t.is_outflow())
            .map(Transaction::normalized_amount)
            .sum();

        let cash_on_hand = match prior {
            Some(p) if p.cash_on_hand > 0.0 => p.cash_on_hand,
            _ => estimate_cash(transactions),
        };

        let snapshot =
            FinancialSnapshot::from_parts(cash_on_hand, total_revenue / window, total_expenses / window);

        tracing::debug!(
            transactions = transactions.len(),
            window_months = self.window_months,
            cash_on_hand = snapshot.cash_on_hand,
            monthly_burn = snapshot.monthly_burn,
            runway_months = snapshot.runway_months,
            "derived financial snapshot"
        );

        snapshot
    }
}

fn estimate_cash(transactions: &[Transaction]) -> f64 {
    let net: f64 = transactions.iter().map(Transaction::finite_amount).sum();
    net.abs()
}

/// Month-over-month growth of recurring revenue, in percent.
///
/// Compares the last complete calendar month before `as_of` with the month before
/// it. Returns `None` when the earlier month has no recurring revenue.
pub fn mrr_growth_percent(transactions: &[Transaction], as_of: NaiveDate) -> Option<f64> {
    let current_start = month_start(as_of);
    let last_start = sub_months(current_start, 1);
    let prev_start = sub_months(current_start, 2);

    let recurring_in = |from: NaiveDate, to: NaiveDate| -> f64 {
        transactions
            .iter()
            .filter(|t| t.is_revenue() && t.recurring && t.date >= from && t.date < to)
            .map(Transaction::normalized_amount)
            .sum()
    };

    let last = recurring_in(last_start, current_start);
    let prev = recurring_in(prev_start, last_start);
    if prev <= 0.0 {
        return None;
    }

    Some((last - prev) / prev * 100.0)
}

/// Expense total for one free-text category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub transaction_count: usize,
}

/// Group expenses by category, largest total first.
///
/// Labels are grouped case-insensitively; the first spelling seen wins.
pub fn expense_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut groups: HashMap<String, CategoryTotal> = HashMap::new();

    for txn in transactions.iter().filter(|t| t.is_expense()) {
        let label = match txn.category.trim() {
            "" => "Uncategorized",
            other => other,
        };
        let entry = groups
            .entry(label.to_lowercase())
            .or_insert_with(|| CategoryTotal {
                category: label.to_string(),
                total: 0.0,
                transaction_count: 0,
            });
        entry.total += txn.normalized_amount();
        entry.transaction_count += 1;
    }

    let mut totals: Vec<CategoryTotal> = groups.into_values().collect();
    totals.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    totals
}
