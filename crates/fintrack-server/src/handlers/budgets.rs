//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use fintrack_core::alerts::{evaluate_budget_alerts, AlertResult, BudgetAlert, MONTHLY_CATEGORY};
use fintrack_core::models::{Budget, BudgetPatch, NewBudget, TransactionType};

use super::{non_empty, parse_date, require_positive};
use crate::{AppError, AppState, AuthUser, MessageResponse};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetRequest {
    /// Defaults to "Monthly", the overall spending cap
    pub category: Option<String>,
    pub amount: f64,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetRequest {
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// POST /api/budgets
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateBudgetRequest>,
) -> Result<(StatusCode, Json<Budget>), AppError> {
    let budget = NewBudget {
        category: non_empty(body.category.as_deref())
            .unwrap_or(MONTHLY_CATEGORY)
            .to_string(),
        amount: require_positive(body.amount, "Amount")?,
        start_date: parse_date(&body.start_date, "startDate")?,
        end_date: parse_date(&body.end_date, "endDate")?,
    };

    let id = state.db.create_budget(auth.id, &budget)?;
    let budget = state
        .db
        .get_budget(auth.id, id)?
        .ok_or_else(|| AppError::internal("Budget vanished after insert"))?;

    Ok((StatusCode::CREATED, Json(budget)))
}

/// GET /api/budgets
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Budget>>, AppError> {
    Ok(Json(state.db.list_budgets(auth.id)?))
}

/// GET /api/budgets/:id
pub async fn get_budget(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Budget>, AppError> {
    state
        .db
        .get_budget(auth.id, id)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Budget not found"))
}

/// PUT /api/budgets/:id
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateBudgetRequest>,
) -> Result<Json<Budget>, AppError> {
    let patch = BudgetPatch {
        category: non_empty(body.category.as_deref()).map(str::to_string),
        amount: body
            .amount
            .map(|a| require_positive(a, "Amount"))
            .transpose()?,
        start_date: body
            .start_date
            .as_deref()
            .map(|d| parse_date(d, "startDate"))
            .transpose()?,
        end_date: body
            .end_date
            .as_deref()
            .map(|d| parse_date(d, "endDate"))
            .transpose()?,
    };

    state
        .db
        .update_budget(auth.id, id, &patch)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Budget not found"))
}

/// DELETE /api/budgets/:id
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.db.delete_budget(auth.id, id)? {
        return Err(AppError::not_found("Budget not found"));
    }
    Ok(MessageResponse::new("Budget deleted"))
}

/// GET /api/budgets/check/alerts - Evaluate budgets against spending
pub async fn check_budget_alerts(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<AlertResult<BudgetAlert>>, AppError> {
    let budgets = state.db.list_budgets(auth.id)?;
    let expenses = state
        .db
        .list_transactions_by_type(auth.id, TransactionType::Expense)?;

    Ok(Json(evaluate_budget_alerts(&budgets, &expenses)))
}
