use approx::assert_relative_eq;
use chrono::NaiveDate;
use pilot_core::{
    FinancialProjectionEngine, FinancialSnapshot, InsightStatus, Priority, ScenarioAdjustments,
    ScenarioBaseline, TransactionKind, expense_breakdown, mrr_growth_percent,
};
use pilot_ingest::{RowError, parse_ledger_csv};
use std::path::PathBuf;

fn ledger_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("ledger.csv")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[test]
fn test_fixture_import() {
    let import = parse_ledger_csv(ledger_path()).unwrap();
    assert_eq!(import.transactions.len(), 19);
    assert_eq!(import.rejected.len(), 4);
    assert_eq!(import.window_months(), 3);

    let lines: Vec<u64> = import.rejected.iter().map(RowError::line).collect();
    assert_eq!(lines, vec![20, 21, 22, 23]);

    // DD/MM/YYYY and Brazilian amount formatting
    let rent = import.transactions.iter().find(|t| t.id == "tx-005").unwrap();
    assert_eq!(rent.date, NaiveDate::from_ymd_opt(2026, 7, 5).unwrap());
    assert_eq!(rent.amount, -5000.0);

    // blank kind inferred from sign
    let consulting = import.transactions.iter().find(|t| t.id == "tx-014").unwrap();
    assert_eq!(consulting.kind, TransactionKind::Revenue);

    let fee = import.transactions.last().unwrap();
    assert_eq!(fee.id, "row-0024");
}

/// Three months of 300k revenue and 150k expenses, no stored cash: cash is the raw net sum.
#[test]
fn test_quarter_analysis_from_fixture() {
    let import = parse_ledger_csv(ledger_path()).unwrap();
    let engine = FinancialProjectionEngine::default();

    let growth = mrr_growth_percent(&import.transactions, today());
    assert_relative_eq!(growth.unwrap(), 20.0, epsilon = 1e-9);

    let analysis = engine.analyze("acme", &import.transactions, None, growth, today());
    let snap = analysis.snapshot;
    assert_relative_eq!(snap.monthly_revenue, 100_000.0);
    assert_relative_eq!(snap.monthly_burn, 50_000.0);
    assert_relative_eq!(snap.cash_on_hand, 150_000.0);
    assert_relative_eq!(snap.runway_months, 3.0);

    let titles: Vec<&str> = analysis.insights.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Runway Moderado", "Crescimento Positivo"]);
    assert_eq!(analysis.insights[0].priority, Priority::Medium);
    assert!(analysis.insights.iter().all(|i| i.status == InsightStatus::Pending));

    // 150k / 50k => zero at index 3
    let cash: Vec<f64> = analysis.projection.iter().map(|p| p.projected_cash).collect();
    assert_eq!(cash, vec![150_000.0, 100_000.0, 50_000.0, 0.0]);
    assert_eq!(analysis.projection[0].month_label, "Out");
}

#[test]
fn test_prior_snapshot_cash_wins() {
    let import = parse_ledger_csv(ledger_path()).unwrap();
    let prior = FinancialSnapshot::from_parts(600_000.0, 0.0, 0.0);
    let analysis = FinancialProjectionEngine::default().analyze(
        "acme",
        &import.transactions,
        Some(&prior),
        None,
        today(),
    );
    assert_relative_eq!(analysis.snapshot.runway_months, 12.0);
    assert_eq!(analysis.insights.len(), 1);
    assert_eq!(analysis.insights[0].id, "acme:no_data");
    assert_eq!(analysis.projection.len(), 12);
}

#[test]
fn test_expense_breakdown_from_fixture() {
    let import = parse_ledger_csv(ledger_path()).unwrap();
    let breakdown = expense_breakdown(&import.transactions);
    assert_eq!(breakdown[0].category, "Payroll");
    assert_relative_eq!(breakdown[0].total, 105_000.0);
    assert_eq!(breakdown[1].category, "Cloud");
    assert_relative_eq!(breakdown[1].total, 24_000.0);
    let total: f64 = breakdown.iter().map(|c| c.total).sum();
    assert_relative_eq!(total, 150_000.0);
}

#[test]
fn test_simulation_from_fixture_snapshot() {
    let import = parse_ledger_csv(ledger_path()).unwrap();
    let engine = FinancialProjectionEngine::default();
    let analysis = engine.analyze("acme", &import.transactions, None, None, today());

    let result = engine.simulate(
        ScenarioBaseline::from(&analysis.snapshot),
        ScenarioAdjustments::new(0.0, 50.0, 50_000.0),
        today(),
    );
    assert_relative_eq!(result.new_burn, 25_000.0);
    assert_relative_eq!(result.new_cash, 200_000.0);
    assert_relative_eq!(result.new_runway_months, 8.0);
    assert_eq!(result.projection.len(), 9);
}
