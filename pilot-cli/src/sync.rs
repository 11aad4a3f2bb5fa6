//! `sync`: ingest a ledger, recompute the snapshot and replace the insight batch.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use pilot_core::{Analysis, FinancialProjectionEngine, mrr_growth_percent};
use pilot_ingest::{LedgerImport, parse_ledger_csv};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::state::CompanyStore;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub company: String,
    pub csv: PathBuf,
    /// Overrides the growth computed from recurring revenue
    pub growth: Option<f64>,
    /// Overrides `metrics.window_months`
    pub window: Option<u32>,
    pub strict: bool,
}

pub struct SyncOutcome {
    pub import: LedgerImport,
    pub growth: Option<f64>,
    pub analysis: Analysis,
}

pub fn read_ledger(csv: &Path) -> Result<LedgerImport> {
    if !csv.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", csv.display());
    }
    parse_ledger_csv(csv)
}

/// Nothing is written when the ledger is rejected in strict mode.
pub fn run_sync(
    store: &CompanyStore,
    config: &Config,
    today: NaiveDate,
    opts: &SyncOptions,
) -> Result<SyncOutcome> {
    let company = opts.company.as_str();
    let import = read_ledger(&opts.csv)?;
    if opts.strict {
        if let Some(first) = import.rejected.first() {
            bail!(
                "{} row(s) rejected in {} (first: {})",
                import.rejected.len(),
                opts.csv.display(),
                first
            );
        }
    }

    let mut engine_config = config.engine_config();
    if let Some(w) = opts.window {
        engine_config.window_months = w;
    }
    let engine = FinancialProjectionEngine::new(engine_config);

    let prior = store
        .load_snapshot(company)
        .with_context(|| format!("loading stored snapshot for {company}"))?;
    let growth = opts
        .growth
        .or_else(|| mrr_growth_percent(&import.transactions, today));
    let analysis = engine.analyze(company, &import.transactions, prior.as_ref(), growth, today);

    store.save_snapshot(company, &analysis.snapshot)?;
    store.replace_insights(company, &analysis.insights)?;

    Ok(SyncOutcome {
        import,
        growth,
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture_ledger() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("pilot-ingest/tests/fixtures/ledger.csv")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn opts(csv: PathBuf) -> SyncOptions {
        SyncOptions {
            company: "acme".to_string(),
            csv,
            growth: None,
            window: None,
            strict: false,
        }
    }

    #[test]
    fn test_strict_sync_fails_on_rejected_rows() {
        let home = tempfile::tempdir().unwrap();
        let store = CompanyStore::new(home.path());
        let mut o = opts(fixture_ledger());
        o.strict = true;

        let err = run_sync(&store, &Config::default(), today(), &o).err().unwrap();
        assert!(err.to_string().contains("4 row(s) rejected"));
        assert!(store.load_snapshot("acme").unwrap().is_none());
        assert!(store.load_insights("acme").unwrap().is_empty());
    }

    #[test]
    fn test_first_sync_computes_growth_and_stores_results() {
        let home = tempfile::tempdir().unwrap();
        let store = CompanyStore::new(home.path());

        let out = run_sync(&store, &Config::default(), today(), &opts(fixture_ledger())).unwrap();
        assert_eq!(out.import.rejected.len(), 4);
        assert!((out.growth.unwrap() - 20.0).abs() < 1e-9);
        assert_eq!(out.analysis.snapshot.cash_on_hand, 150_000.0);

        let stored = store.load_insights("acme").unwrap();
        let ids: Vec<&str> = stored.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["acme:runway_moderate", "acme:growth_positive"]);
        assert_eq!(store.load_snapshot("acme").unwrap(), Some(out.analysis.snapshot));
    }

    #[test]
    fn test_explicit_growth_overrides_computed() {
        let home = tempfile::tempdir().unwrap();
        let store = CompanyStore::new(home.path());
        let mut o = opts(fixture_ledger());
        o.growth = Some(5.0);

        let out = run_sync(&store, &Config::default(), today(), &o).unwrap();
        assert_eq!(out.growth, Some(5.0));
        assert!(out.analysis.insights.iter().all(|i| i.id != "acme:growth_positive"));
    }

    #[test]
    fn test_second_sync_uses_stored_cash_and_replaces_batch() {
        let home = tempfile::tempdir().unwrap();
        let store = CompanyStore::new(home.path());
        run_sync(&store, &Config::default(), today(), &opts(fixture_ledger())).unwrap();

        let edited = home.path().join("september.csv");
        fs::write(
            &edited,
            "id,date,amount,kind\ns-1,2026-09-02,10000,revenue\ns-2,2026-09-03,-120000,expense\n",
        )
        .unwrap();
        let mut o = opts(edited);
        o.window = Some(1);
        let out = run_sync(&store, &Config::default(), today(), &o).unwrap();

        // stored cash from the first sync, not |10000 - 120000|
        assert_eq!(out.analysis.snapshot.cash_on_hand, 150_000.0);
        assert_eq!(out.analysis.snapshot.monthly_burn, 120_000.0);

        let stored = store.load_insights("acme").unwrap();
        assert_eq!(stored, out.analysis.insights);
        assert!(stored.iter().all(|i| i.id != "acme:runway_moderate"));
        assert!(stored.iter().all(|i| i.id != "acme:growth_positive"));
    }

    #[test]
    fn test_missing_csv_is_an_error() {
        let home = tempfile::tempdir().unwrap();
        let store = CompanyStore::new(home.path());
        let o = opts(home.path().join("nope.csv"));
        assert!(run_sync(&store, &Config::default(), today(), &o).is_err());
    }
}
