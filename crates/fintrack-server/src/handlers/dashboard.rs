//! Dashboard handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Serialize;

use fintrack_core::alerts::budget_spent;
use fintrack_core::models::{Budget, Goal, SystemTotals, Transaction, TransactionType};

use crate::{AppError, AppState, AuthUser};

/// Number of transactions shown on the user dashboard
const RECENT_TRANSACTIONS: i64 = 5;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsage {
    #[serde(flatten)]
    pub budget: Budget,
    pub spent: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboard {
    pub total_income: f64,
    pub total_expenses: f64,
    pub goals: Vec<Goal>,
    pub recent_transactions: Vec<Transaction>,
    pub budgets: Vec<BudgetUsage>,
}

/// Admins see system-wide figures, everyone else their own finances
#[derive(Serialize)]
#[serde(untagged)]
pub enum DashboardResponse {
    Admin(SystemTotals),
    User(UserDashboard),
}

/// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>, AppError> {
    if auth.is_admin() {
        return Ok(Json(DashboardResponse::Admin(state.db.system_totals()?)));
    }

    let totals = state.db.user_totals(auth.id)?;
    let expenses = state
        .db
        .list_transactions_by_type(auth.id, TransactionType::Expense)?;
    let budgets = state
        .db
        .list_budgets(auth.id)?
        .into_iter()
        .map(|budget| BudgetUsage {
            spent: budget_spent(&budget, &expenses),
            budget,
        })
        .collect();

    Ok(Json(DashboardResponse::User(UserDashboard {
        total_income: totals.total_income,
        total_expenses: totals.total_expenses,
        goals: state.db.list_goals(auth.id)?,
        recent_transactions: state.db.recent_transactions(auth.id, RECENT_TRANSACTIONS)?,
        budgets,
    })))
}
