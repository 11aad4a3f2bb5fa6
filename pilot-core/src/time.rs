//! Calendar helpers: month arithmetic and short month labels.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PT_BR_MONTHS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

const EN_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Language used for month labels on projection charts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en")]
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::PtBr => "pt-BR",
            Locale::En => "en",
        }
    }

    /// Short label for a 1-based month number. Out-of-range months wrap.
    pub fn short_month(&self, month: u32) -> &'static str {
        let idx = (month.max(1) - 1) as usize % 12;
        match self {
            Locale::PtBr => PT_BR_MONTHS[idx],
            Locale::En => EN_MONTHS[idx],
        }
    }

    pub fn label(&self, date: NaiveDate) -> &'static str {
        self.short_month(date.month())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pt-br" | "pt_br" | "pt" => Ok(Locale::PtBr),
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            _ => Err(format!("Unknown locale: {}", s)),
        }
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shift forward by whole months, saturating at the calendar's upper bound.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Shift backward by whole months, saturating at the calendar's lower bound.
pub fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// Number of calendar months touched by the inclusive range `first..=last`.
/// Always at least 1.
pub fn months_spanned(first: NaiveDate, last: NaiveDate) -> u32 {
    let (first, last) = if first <= last { (first, last) } else { (last, first) };
    let diff = (last.year() - first.year()) * 12 + last.month() as i32 - first.month() as i32;
    (diff + 1).max(1) as u32
}
