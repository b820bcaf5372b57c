//! Report command implementations

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use fintrack_core::db::Database;

use super::{find_user, truncate};

/// Parse an inclusive `--from`/`--to` period
pub fn parse_period(from: &str, to: &str) -> Result<(NaiveDate, NaiveDate)> {
    let from_date = NaiveDate::parse_from_str(from, "%Y-%m-%d")
        .context("Invalid --from date format (use YYYY-MM-DD)")?;
    let to_date = NaiveDate::parse_from_str(to, "%Y-%m-%d")
        .context("Invalid --to date format (use YYYY-MM-DD)")?;
    if to_date < from_date {
        bail!("--to must not be before --from");
    }
    Ok((from_date, to_date))
}

pub fn cmd_report(db: &Database, email: &str, from: &str, to: &str) -> Result<()> {
    let (from, to) = parse_period(from, to)?;
    let user = find_user(db, email)?;

    let summary = db.income_vs_expense(user.id, from, to)?;
    let spending = db.spending_by_category(user.id, from, to, None)?;

    println!();
    println!("📊 Report for {}", user.email);
    println!("   Period: {} to {}", from, to);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Income:   {:>12.2} {}",
        summary.total_income, user.preferred_currency
    );
    println!(
        "   Expenses: {:>12.2} {}",
        summary.total_expenses, user.preferred_currency
    );
    println!(
        "   Net:      {:>12.2} {}",
        summary.total_income - summary.total_expenses,
        user.preferred_currency
    );
    println!();

    if spending.is_empty() {
        println!("   No spending found in this period.");
        return Ok(());
    }

    println!("   {:25} │ {:>10} │ {:>6}", "Category", "Amount", "%");
    println!("   ──────────────────────────┼────────────┼────────");
    for (category, amount) in &spending {
        let share = if summary.total_expenses > 0.0 {
            amount / summary.total_expenses * 100.0
        } else {
            0.0
        };
        println!(
            "   {:25} │ {:>10.2} │ {:>5.1}%",
            truncate(category, 25),
            amount,
            share
        );
    }

    Ok(())
}
