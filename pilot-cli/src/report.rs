//! Human-readable and JSON output for CLI commands.

use anyhow::Result;
use chrono::NaiveDate;
use pilot_core::{
    CategoryTotal, FinancialSnapshot, Insight, Priority, ProjectionPoint, SimulationResult,
};
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_snapshot(snap: &FinancialSnapshot, zero_cash_date: Option<NaiveDate>) {
    println!("Cash on hand:     R$ {:.2}", snap.cash_on_hand);
    println!("Monthly revenue:  R$ {:.2}", snap.monthly_revenue);
    println!("Monthly burn:     R$ {:.2}", snap.monthly_burn);
    if snap.monthly_burn > 0.0 {
        println!("Runway:           {:.1} months", snap.runway_months);
    } else {
        println!("Runway:           not burning cash");
    }
    if let Some(date) = zero_cash_date {
        println!("Cash runs out:    {}", date.format("%Y-%m-%d"));
    }
}

fn priority_marker(p: Priority) -> &'static str {
    match p {
        Priority::High => "!!",
        Priority::Medium => "! ",
        Priority::Low => "  ",
    }
}

pub fn print_insights(insights: &[Insight]) {
    if insights.is_empty() {
        println!("(no insights)");
        return;
    }
    for i in insights {
        println!(
            "{} [{}/{}] {} ({})",
            priority_marker(i.priority),
            i.priority,
            i.kind,
            i.title,
            i.status
        );
        println!("   {}", i.description);
        println!("   id: {}", i.id);
    }
}

pub fn print_projection(points: &[ProjectionPoint]) {
    let peak = points
        .iter()
        .map(|p| p.projected_cash)
        .fold(0.0_f64, f64::max);
    for p in points {
        let width = if peak > 0.0 {
            ((p.projected_cash / peak) * 30.0).round() as usize
        } else {
            0
        };
        println!(
            "{} {}  R$ {:>14.2}  {}",
            p.month_label,
            p.month.format("%Y"),
            p.projected_cash,
            "#".repeat(width)
        );
    }
}

pub fn print_simulation(result: &SimulationResult) {
    let adj = &result.adjustments;
    println!(
        "Scenario: +{:.0}% revenue, -{:.0}% costs, +R$ {:.2} funding\n",
        adj.revenue_increase_percent, adj.cost_reduction_percent, adj.additional_funding
    );
    println!("New monthly burn: R$ {:.2}", result.new_burn);
    println!("New cash:         R$ {:.2}", result.new_cash);
    if result.is_unbounded() {
        println!("New runway:       unbounded ({:.0}+ months)", result.new_runway_months);
    } else {
        println!(
            "New runway:       {:.1} months ({:+.1})",
            result.new_runway_months,
            result.runway_delta_months()
        );
    }
    println!(
        "Estimated runout: {}\n",
        result.estimated_runout_date.format("%Y-%m-%d")
    );
    print_projection(&result.projection);
}

pub fn print_breakdown(categories: &[CategoryTotal]) {
    let total: f64 = categories.iter().map(|c| c.total).sum();
    for c in categories {
        let share = if total > 0.0 { c.total / total * 100.0 } else { 0.0 };
        println!(
            "{:<24} R$ {:>14.2}  {:>5.1}%  ({} txns)",
            c.category, c.total, share, c.transaction_count
        );
    }
    println!("{:<24} R$ {:>14.2}", "Total", total);
}
