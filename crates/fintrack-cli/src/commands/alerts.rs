//! Alert and goal progress views

use anyhow::Result;
use fintrack_core::alerts::{evaluate_budget_alerts, evaluate_goal_alerts, goal_progress};
use fintrack_core::db::Database;
use fintrack_core::models::TransactionType;
use fintrack_core::AlertResult;

use super::{find_user, truncate};

pub fn cmd_alerts(db: &Database, email: &str) -> Result<()> {
    let user = find_user(db, email)?;

    let budgets = db.list_budgets(user.id)?;
    let expenses = db.list_transactions_by_type(user.id, TransactionType::Expense)?;
    let budget_alerts = evaluate_budget_alerts(&budgets, &expenses);
    let goal_alerts = evaluate_goal_alerts(&db.list_goals(user.id)?);

    println!();
    println!("🔔 Alerts for {}", user.email);
    println!("   ─────────────────────────────────────────────────────────────");

    println!("   Budgets:");
    match &budget_alerts {
        AlertResult::Alerts { items } => {
            for alert in items {
                println!(
                    "   ⚠️  {} ({:.2} of {:.2})",
                    alert.message, alert.total_spent, alert.budget_limit
                );
            }
        }
        AlertResult::Empty { message } => println!("   {}", message),
    }

    println!();
    println!("   Goals:");
    match &goal_alerts {
        AlertResult::Alerts { items } => {
            for alert in items {
                println!("   🎯 {}", alert.message);
            }
        }
        AlertResult::Empty { message } => println!("   {}", message),
    }

    Ok(())
}

pub fn cmd_goals(db: &Database, email: &str) -> Result<()> {
    let user = find_user(db, email)?;
    let goals = db.list_goals(user.id)?;

    println!();
    println!("🎯 Goals for {}", user.email);
    println!("   ─────────────────────────────────────────────────────────────");

    if goals.is_empty() {
        println!("   No goals yet.");
        return Ok(());
    }

    println!(
        "   {:25} │ {:>10} │ {:>10} │ {:>8}",
        "Goal", "Saved", "Target", "Progress"
    );
    println!("   ──────────────────────────┼────────────┼────────────┼─────────");
    for progress in goal_progress(&goals) {
        println!(
            "   {:25} │ {:>10.2} │ {:>10.2} │ {:>8}",
            truncate(&progress.title, 25),
            progress.current_amount,
            progress.target_amount,
            progress.progress
        );
    }

    Ok(())
}
