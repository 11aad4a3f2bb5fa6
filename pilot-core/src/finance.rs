//! Ledger and snapshot types shared by every stage of the projection engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Semantic direction of a ledger entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    #[serde(rename = "revenue")]
    Revenue,
    #[serde(rename = "expense")]
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Revenue => "revenue",
            TransactionKind::Expense => "expense",
        }
    }
}

/// A validated ledger entry as supplied by the ingestion layer.
///
/// `amount` keeps the sign the source reported. A revenue row counts only when
/// positive and an expense row only when negative; `kind` decides the direction
/// and [`Transaction::normalized_amount`] the magnitude.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub kind: TransactionKind,
    /// Free-text label from the source, uncontrolled vocabulary
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    pub fn new(id: impl Into<String>, date: NaiveDate, amount: f64, kind: TransactionKind) -> Self {
        Self {
            id: id.into(),
            date,
            amount,
            kind,
            category: String::new(),
            recurring: false,
            description: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_revenue(&self) -> bool {
        self.kind == TransactionKind::Revenue
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Magnitude of the entry, always >= 0. Non-finite amounts count as zero.
    pub fn normalized_amount(&self) -> f64 {
        if self.amount.is_finite() {
            self.amount.abs()
        } else {
            0.0
        }
    }

    /// Source amount with NaN and infinities read as 0
    pub fn finite_amount(&self) -> f64 {
        if self.amount.is_finite() { self.amount } else { 0.0 }
    }

    /// Revenue row with a positive source amount
    pub fn is_inflow(&self) -> bool {
        self.is_revenue() && self.finite_amount() > 0.0
    }

    /// Expense row with a negative source amount
    pub fn is_outflow(&self) -> bool {
        self.is_expense() && self.finite_amount() < 0.0
    }
}

/// Point-in-time aggregate of cash, revenue, burn and runway.
///
/// Every field is >= 0. Values are never mutated after construction; build a new
/// snapshot with [`FinancialSnapshot::from_parts`] instead.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub cash_on_hand: f64,
    pub monthly_revenue: f64,
    pub monthly_burn: f64,
    pub runway_months: f64,
}

impl FinancialSnapshot {
    /// All-zero snapshot, used when there is no data at all
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build a snapshot, clamping inputs to >= 0 and deriving runway.
    pub fn from_parts(cash_on_hand: f64, monthly_revenue: f64, monthly_burn: f64) -> Self {
        let cash_on_hand = non_negative(cash_on_hand);
        let monthly_burn = non_negative(monthly_burn);
        Self {
            cash_on_hand,
            monthly_revenue: non_negative(monthly_revenue),
            monthly_burn,
            runway_months: runway_months(cash_on_hand, monthly_burn),
        }
    }

    /// Net monthly cash flow (revenue minus burn), may be negative
    pub fn net_cash_flow(&self) -> f64 {
        self.monthly_revenue - self.monthly_burn
    }
}

/// Months of runway: `cash / burn` when burning, otherwise 0.
pub fn runway_months(cash_on_hand: f64, monthly_burn: f64) -> f64 {
    if monthly_burn > 0.0 {
        non_negative(cash_on_hand) / monthly_burn
    } else {
        0.0
    }
}

// NaN and infinities become 0.
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
