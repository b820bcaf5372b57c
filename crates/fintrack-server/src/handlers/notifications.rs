//! Notification handlers
//!
//! Same evaluators as the budget and goal endpoints, with dedicated messages
//! for users that have nothing configured yet.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use chrono::Utc;

use fintrack_core::alerts::{
    evaluate_budget_alerts, evaluate_goal_alerts, AlertResult, BudgetAlert, GoalAlert,
    NO_BUDGET_DATA, NO_GOALS,
};
use fintrack_core::models::{Transaction, TransactionType};

use crate::{AppError, AppState, AuthUser};

pub const NO_UPCOMING_BILLS: &str = "No upcoming bills.";

/// GET /api/notifications/budget-alerts
pub async fn budget_alert_notifications(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<AlertResult<BudgetAlert>>, AppError> {
    let budgets = state.db.list_budgets(auth.id)?;
    if budgets.is_empty() {
        return Ok(Json(AlertResult::empty(NO_BUDGET_DATA)));
    }

    let expenses = state
        .db
        .list_transactions_by_type(auth.id, TransactionType::Expense)?;
    Ok(Json(evaluate_budget_alerts(&budgets, &expenses)))
}

/// GET /api/notifications/goal-alerts
pub async fn goal_alert_notifications(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<AlertResult<GoalAlert>>, AppError> {
    let goals = state.db.list_goals(auth.id)?;
    if goals.is_empty() {
        return Ok(Json(AlertResult::empty(NO_GOALS)));
    }
    Ok(Json(evaluate_goal_alerts(&goals)))
}

/// GET /api/notifications/upcoming-bills - Expenses dated today or later
pub async fn upcoming_bills(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<AlertResult<Transaction>>, AppError> {
    let today = Utc::now().date_naive();
    let bills = state.db.list_upcoming_expenses(auth.id, today)?;
    Ok(Json(AlertResult::from_items(bills, NO_UPCOMING_BILLS)))
}
