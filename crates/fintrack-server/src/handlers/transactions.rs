//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info, warn};

use fintrack_core::currency::normalize_code;
use fintrack_core::db::Database;
use fintrack_core::models::{NewTransaction, Transaction, TransactionPatch, TransactionType};

use super::{non_empty, parse_date, require_positive};
use crate::{AppError, AppState, AuthUser, MessageResponse};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub amount: f64,
    /// Currency `amount` is expressed in (defaults to the user's preferred currency)
    pub currency: Option<String>,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    /// Currency a new `amount` is expressed in
    pub currency: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Convert `amount` from `currency` (if given) into the user's preferred currency
fn normalize_amount(
    state: &AppState,
    user_id: i64,
    amount: f64,
    currency: Option<&str>,
) -> Result<(f64, String), AppError> {
    let user = state
        .db
        .get_user(user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let from = non_empty(currency)
        .map(normalize_code)
        .unwrap_or_else(|| user.preferred_currency.clone());

    let converted = state
        .config
        .currency
        .convert(amount, &from, &user.preferred_currency)
        .map_err(AppError::from_core)?;

    Ok((converted, user.preferred_currency))
}

/// Run goal auto-save for an income in the background
///
/// The caller never waits on the outcome; it is reported through the log.
pub(crate) fn spawn_auto_save(db: Database, user_id: i64, income: f64) {
    tokio::spawn(async move {
        let result =
            tokio::task::spawn_blocking(move || db.allocate_auto_savings(user_id, income)).await;

        match result {
            Ok(Ok(report)) if report.is_complete() => {
                info!(
                    user_id,
                    income,
                    goals = report.allocations.len(),
                    allocated = report.total_allocated(),
                    "Auto-save complete"
                );
            }
            Ok(Ok(report)) => {
                warn!(
                    user_id,
                    income,
                    succeeded = report.allocations.len(),
                    failed = report.failures.len(),
                    "Auto-save partially failed"
                );
            }
            Ok(Err(e)) => error!(user_id, error = %e, "Auto-save could not load goals"),
            Err(e) => error!(user_id, error = %e, "Auto-save task failed"),
        }
    });
}

/// POST /api/transactions - Record a transaction
///
/// Income triggers goal auto-save in the background.
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let category = non_empty(Some(body.category.as_str()))
        .ok_or_else(|| AppError::bad_request("Category is required"))?
        .to_string();
    let amount = require_positive(body.amount, "Amount")?;
    let date = match body.date.as_deref() {
        Some(d) => parse_date(d, "date")?,
        None => Utc::now().date_naive(),
    };

    let (amount, currency) = normalize_amount(&state, auth.id, amount, body.currency.as_deref())?;

    let id = state.db.create_transaction(
        auth.id,
        &NewTransaction {
            transaction_type: body.transaction_type,
            category,
            amount,
            currency,
            date,
            description: body.description,
            tags: body.tags,
        },
    )?;

    let transaction = state
        .db
        .get_transaction(auth.id, id)?
        .ok_or_else(|| AppError::internal("Transaction vanished after insert"))?;

    if transaction.transaction_type == TransactionType::Income {
        spawn_auto_save(state.db.clone(), auth.id, transaction.amount);
    }

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// GET /api/transactions - List transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    Ok(Json(state.db.list_transactions(auth.id)?))
}

/// GET /api/transactions/:id
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, AppError> {
    state
        .db
        .get_transaction(auth.id, id)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Transaction not found"))
}

/// PUT /api/transactions/:id - Partial update
///
/// `currency` only qualifies a new `amount`; sending it alone is rejected.
/// Editing an income never re-runs auto-save.
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateTransactionRequest>,
) -> Result<Json<Transaction>, AppError> {
    if body.amount.is_none() && non_empty(body.currency.as_deref()).is_some() {
        return Err(AppError::bad_request(
            "Currency can only be changed together with amount",
        ));
    }

    let mut patch = TransactionPatch {
        transaction_type: body.transaction_type,
        description: body.description,
        tags: body.tags,
        ..Default::default()
    };

    if let Some(category) = body.category.as_deref() {
        let category =
            non_empty(Some(category)).ok_or_else(|| AppError::bad_request("Category is required"))?;
        patch.category = Some(category.to_string());
    }
    if let Some(date) = body.date.as_deref() {
        patch.date = Some(parse_date(date, "date")?);
    }
    if let Some(amount) = body.amount {
        let amount = require_positive(amount, "Amount")?;
        let (amount, currency) =
            normalize_amount(&state, auth.id, amount, body.currency.as_deref())?;
        patch.amount = Some(amount);
        patch.currency = Some(currency);
    }

    state
        .db
        .update_transaction(auth.id, id, &patch)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Transaction not found"))
}

/// DELETE /api/transactions/:id
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.db.delete_transaction(auth.id, id)? {
        return Err(AppError::not_found("Transaction not found"));
    }
    Ok(MessageResponse::new("Transaction deleted"))
}
