//! Parse ledger CSV exports into validated transactions.
//!
//! Header row required. Column names are matched case-insensitively:
//! id,date,description,amount,kind,category,recurring
//! Only `date` and `amount` are mandatory.

use anyhow::{Context, Result, bail};
use pilot_core::Transaction;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::error::RowError;
use crate::parsers::fields::{AmountParser, parse_date, parse_flag, parse_kind};
use crate::types::LedgerImport;

#[derive(Debug)]
struct Columns {
    id: Option<usize>,
    date: usize,
    description: Option<usize>,
    amount: usize,
    kind: Option<usize>,
    category: Option<usize>,
    recurring: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
        };

        let Some(date) = find("date") else {
            bail!("ledger header has no 'date' column");
        };
        let Some(amount) = find("amount") else {
            bail!("ledger header has no 'amount' column");
        };

        Ok(Self {
            id: find("id"),
            date,
            description: find("description"),
            amount,
            kind: find("kind"),
            category: find("category"),
            recurring: find("recurring"),
        })
    }
}

/// Parse a ledger CSV file. Bad rows are collected in `rejected`, not returned as errors.
pub fn parse_ledger_csv(path: impl AsRef<Path>) -> Result<LedgerImport> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    parse_ledger_reader(file).with_context(|| format!("parsing {}", path.as_ref().display()))
}

pub fn parse_ledger_reader<R: Read>(reader: R) -> Result<LedgerImport> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers().context("reading ledger header")?)?;
    let amounts = AmountParser::new()?;

    let mut import = LedgerImport::default();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                import.rejected.push(RowError::Malformed {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        // Skip fully blank lines
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }

        match parse_row(&record, line, &columns, &amounts) {
            Ok(txn) => {
                if !seen_ids.insert(txn.id.clone()) {
                    import.rejected.push(RowError::DuplicateId { line, id: txn.id });
                    continue;
                }
                import.transactions.push(txn);
            }
            Err(e) => import.rejected.push(e),
        }
    }

    for err in &import.rejected {
        tracing::warn!("rejected ledger row: {err}");
    }
    tracing::info!(
        accepted = import.transactions.len(),
        rejected = import.rejected.len(),
        "ledger parsed"
    );

    Ok(import)
}

fn parse_row(
    record: &csv::StringRecord,
    line: u64,
    columns: &Columns,
    amounts: &AmountParser,
) -> std::result::Result<Transaction, RowError> {
    let get = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");

    let date_raw = get(Some(columns.date));
    if date_raw.is_empty() {
        return Err(RowError::MissingField { line, column: "date" });
    }
    let date = parse_date(date_raw).ok_or_else(|| RowError::InvalidDate {
        line,
        value: date_raw.to_string(),
    })?;

    let amount_raw = get(Some(columns.amount));
    if amount_raw.is_empty() {
        return Err(RowError::MissingField { line, column: "amount" });
    }
    let amount = amounts.parse(amount_raw).ok_or_else(|| RowError::InvalidAmount {
        line,
        value: amount_raw.to_string(),
    })?;

    let kind_raw = get(columns.kind);
    let kind = parse_kind(kind_raw, amount).ok_or_else(|| RowError::UnknownKind {
        line,
        value: kind_raw.to_string(),
    })?;

    let recurring_raw = get(columns.recurring);
    let recurring = parse_flag(recurring_raw).ok_or_else(|| RowError::InvalidFlag {
        line,
        value: recurring_raw.to_string(),
    })?;

    let id = match get(columns.id) {
        "" => format!("row-{:04}", line),
        id => id.to_string(),
    };

    Ok(Transaction::new(id, date, amount, kind)
        .with_category(get(columns.category))
        .with_recurring(recurring)
        .with_description(get(columns.description)))
}
