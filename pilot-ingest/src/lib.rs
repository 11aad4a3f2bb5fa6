//! pilot-ingest: ledger ingestion for the projection engine.
//!
//! Validates aggregator exports and hands only well-formed transactions to
//! `pilot-core`.

pub mod error;
pub mod parsers;
pub mod types;

pub use error::RowError;
pub use parsers::ledger_csv::{parse_ledger_csv, parse_ledger_reader};
pub use types::LedgerImport;
