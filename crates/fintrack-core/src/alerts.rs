//! Budget and goal alert evaluation
//!
//! Alerts are computed per request from the current budgets, goals and
//! expense transactions. Nothing here is persisted, so evaluating the same
//! input twice always yields the same result.

use serde::{Deserialize, Serialize};

use crate::models::{Budget, Goal, Transaction};

/// Share of a limit (or target) at which a "nearing" alert is raised
pub const NEARING_RATIO: f64 = 0.8;

/// Budget category that caps total spending across every category
pub const MONTHLY_CATEGORY: &str = "Monthly";

pub const NO_BUDGET_ALERTS: &str = "No budget alerts.";
pub const NO_BUDGET_DATA: &str = "No budget data available.";
pub const NO_GOAL_ALERTS: &str = "No goal alerts.";
pub const NO_GOALS: &str = "No goals found.";

/// Result of an alert evaluation
///
/// Serializes as `{"kind": "alerts", "items": [...]}` or
/// `{"kind": "empty", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertResult<T> {
    Alerts { items: Vec<T> },
    Empty { message: String },
}

impl<T> AlertResult<T> {
    /// Wrap `items`, falling back to the `empty_message` sentinel when there are none
    pub fn from_items(items: Vec<T>, empty_message: &str) -> Self {
        if items.is_empty() {
            Self::Empty {
                message: empty_message.to_string(),
            }
        } else {
            Self::Alerts { items }
        }
    }

    pub fn empty(message: &str) -> Self {
        Self::Empty {
            message: message.to_string(),
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Self::Alerts { items } => items,
            Self::Empty { .. } => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

/// A budget that reached 80% or more of its limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlert {
    pub category: String,
    pub total_spent: f64,
    pub budget_limit: f64,
    pub message: String,
}

/// A goal that reached 80% or more of its target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalAlert {
    pub goal: String,
    /// Two-decimal percentage, e.g. `"85.00%"`
    pub progress: String,
    pub message: String,
}

/// Progress line for a single goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub title: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub progress: String,
}

/// True once `value` is at least 80% of `limit` (inclusive)
pub fn is_nearing(value: f64, limit: f64) -> bool {
    value >= limit * NEARING_RATIO
}

/// Format a percentage the way alerts report it
pub fn format_percent(percent: f64) -> String {
    format!("{:.2}%", percent)
}

/// Amount spent against `budget`
///
/// Sums every expense whose category matches the budget's. A `"Monthly"`
/// budget counts every expense regardless of category.
pub fn budget_spent(budget: &Budget, expenses: &[Transaction]) -> f64 {
    let is_monthly = budget.category == MONTHLY_CATEGORY;
    expenses
        .iter()
        .filter(|t| is_monthly || t.category == budget.category)
        .map(|t| t.amount)
        .sum()
}

fn budget_message(category: &str, spent: f64, limit: f64) -> String {
    if spent >= limit {
        format!("You have exceeded your budget for {}!", category)
    } else {
        format!("You are nearing your budget for {}.", category)
    }
}

fn monthly_message(spent: f64, limit: f64) -> String {
    if spent >= limit {
        "You have exceeded your total monthly budget!".to_string()
    } else {
        "You are nearing your total monthly budget.".to_string()
    }
}

/// Evaluate every budget against the user's expense transactions
///
/// `expenses` must already be filtered to expense transactions; income passed
/// in here would be counted as spending.
///
/// Category budgets produce an alert as soon as spending reaches 80% of the
/// limit. The `"Monthly"` budget is evaluated last against total spending and
/// adds at most one aggregate alert. When several `"Monthly"` budgets exist
/// the last one wins.
pub fn evaluate_budget_alerts(
    budgets: &[Budget],
    expenses: &[Transaction],
) -> AlertResult<BudgetAlert> {
    let mut alerts = Vec::new();
    let mut total_spent = 0.0;
    let mut monthly_limit = 0.0;

    for budget in budgets {
        let spent = budget_spent(budget, expenses);

        if budget.category == MONTHLY_CATEGORY {
            total_spent = spent;
            monthly_limit = budget.amount;
        } else if is_nearing(spent, budget.amount) {
            alerts.push(BudgetAlert {
                category: budget.category.clone(),
                total_spent: spent,
                budget_limit: budget.amount,
                message: budget_message(&budget.category, spent, budget.amount),
            });
        }
    }

    if monthly_limit > 0.0 && is_nearing(total_spent, monthly_limit) {
        alerts.push(BudgetAlert {
            category: MONTHLY_CATEGORY.to_string(),
            total_spent,
            budget_limit: monthly_limit,
            message: monthly_message(total_spent, monthly_limit),
        });
    }

    AlertResult::from_items(alerts, NO_BUDGET_ALERTS)
}

/// Percentage of the target saved so far
///
/// A target that is zero, negative or not a finite number yields 0% instead
/// of infinity or NaN.
pub fn goal_progress_percent(goal: &Goal) -> f64 {
    if !goal.target_amount.is_finite() || goal.target_amount <= 0.0 {
        return 0.0;
    }
    let percent = (goal.current_amount / goal.target_amount) * 100.0;
    if percent.is_finite() {
        percent
    } else {
        0.0
    }
}

/// Evaluate every goal, alerting at 80% progress and celebrating at 100%
pub fn evaluate_goal_alerts(goals: &[Goal]) -> AlertResult<GoalAlert> {
    let alerts = goals
        .iter()
        .filter_map(|goal| {
            let progress = goal_progress_percent(goal);
            if !is_nearing(progress, 100.0) {
                return None;
            }

            let message = if progress >= 100.0 {
                format!(
                    "Congratulations! You have achieved your goal: {}",
                    goal.title
                )
            } else {
                format!(
                    "You are nearing your goal ({}) with {:.2}% saved.",
                    goal.title, progress
                )
            };

            Some(GoalAlert {
                goal: goal.title.clone(),
                progress: format_percent(progress),
                message,
            })
        })
        .collect();

    AlertResult::from_items(alerts, NO_GOAL_ALERTS)
}

/// Progress for every goal, alerting or not
pub fn goal_progress(goals: &[Goal]) -> Vec<GoalProgress> {
    goals
        .iter()
        .map(|goal| GoalProgress {
            title: goal.title.clone(),
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            progress: format_percent(goal_progress_percent(goal)),
        })
        .collect()
}
