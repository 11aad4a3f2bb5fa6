use chrono::NaiveDate;
use pilot_core::Transaction;
use pilot_core::time::months_spanned;

use crate::error::RowError;

/// Result of ingesting one ledger export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerImport {
    /// Validated transactions, in file order
    pub transactions: Vec<Transaction>,
    pub rejected: Vec<RowError>,
}

impl LedgerImport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.transactions.iter().map(|t| t.date).min()?;
        let last = self.transactions.iter().map(|t| t.date).max()?;
        Some((first, last))
    }

    /// Calendar months covered by the accepted rows (at least 1)
    pub fn window_months(&self) -> u32 {
        self.date_range()
            .map(|(first, last)| months_spanned(first, last))
            .unwrap_or(1)
    }
}
