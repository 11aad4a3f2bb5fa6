//! Field normalizers shared by ledger parsers.
//!
//! Aggregator exports mix locales: `1,234.56`, `R$ 1.234,56`, `(15.00)`,
//! ISO dates and `DD/MM/YYYY`.

use anyhow::Result;
use chrono::{DateTime, NaiveDate};
use pilot_core::TransactionKind;
use regex::Regex;

/// Parses money strings into signed `f64`.
///
/// A bare `5.000` is read with `.` as the decimal point.
pub struct AmountParser {
    currency: Regex,
    dot_decimal: Regex,
    comma_decimal: Regex,
}

impl AmountParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            currency: Regex::new(r"^(?:R\$|US\$|\$|BRL|USD)\s*")?,
            dot_decimal: Regex::new(r"^(?:\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)$")?,
            comma_decimal: Regex::new(r"^(?:\d{1,3}(?:\.\d{3})+(?:,\d+)?|\d+,\d+)$")?,
        })
    }

    pub fn parse(&self, raw: &str) -> Option<f64> {
        let mut s = raw.trim();
        let mut negative = false;

        // Accounting style: (15.00)
        if s.len() >= 2 && s.starts_with('(') && s.ends_with(')') {
            negative = true;
            s = s[1..s.len() - 1].trim();
        }
        // One minus sign, either side of the currency symbol
        let mut signed = false;
        if let Some(rest) = s.strip_prefix('-') {
            negative = !negative;
            signed = true;
            s = rest.trim_start();
        }
        if let Some(m) = self.currency.find(s) {
            s = &s[m.end()..];
        }
        if !signed {
            if let Some(rest) = s.strip_prefix('-') {
                negative = !negative;
                s = rest.trim_start();
            }
        }

        let number = if self.dot_decimal.is_match(s) {
            s.replace(',', "")
        } else if self.comma_decimal.is_match(s) {
            s.replace('.', "").replace(',', ".")
        } else {
            return None;
        };

        let value: f64 = number.parse().ok().filter(|v: &f64| v.is_finite())?;
        Some(if negative { -value } else { value })
    }
}

/// `YYYY-MM-DD`, `DD/MM/YYYY`, or an RFC 3339 timestamp (date part kept).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, "%d/%m/%Y").ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Map a source kind label to [`TransactionKind`]. A blank label is inferred
/// from the amount sign; a blank label on a zero amount is ambiguous.
pub fn parse_kind(raw: &str, amount: f64) -> Option<TransactionKind> {
    match raw.trim().to_lowercase().as_str() {
        "revenue" | "income" | "credit" => Some(TransactionKind::Revenue),
        "expense" | "debit" => Some(TransactionKind::Expense),
        "" if amount < 0.0 => Some(TransactionKind::Expense),
        "" if amount > 0.0 => Some(TransactionKind::Revenue),
        _ => None,
    }
}

pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "sim" | "s" => Some(true),
        "false" | "no" | "n" | "0" | "não" | "nao" | "" => Some(false),
        _ => None,
    }
}
