pub mod fields;
pub mod ledger_csv;
