//! Currency handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use fintrack_core::currency::normalize_code;

use super::non_empty;
use crate::{AppError, AppState};

/// GET /api/currency/rates - The active rate table
pub async fn list_rates(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, f64>> {
    Json(state.config.currency.rates().clone())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    pub from_currency: Option<String>,
    pub to_currency: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub converted_amount: f64,
    pub from_currency: String,
    pub to_currency: String,
}

/// POST /api/currency/convert - One-off conversion
pub async fn convert_currency(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, AppError> {
    let (Some(from), Some(to), Some(amount)) = (
        non_empty(body.from_currency.as_deref()).map(normalize_code),
        non_empty(body.to_currency.as_deref()).map(normalize_code),
        body.amount.filter(|a| a.is_finite() && *a != 0.0),
    ) else {
        return Err(AppError::bad_request("All fields are required"));
    };

    let converted_amount = state
        .config
        .currency
        .convert(amount, &from, &to)
        .map_err(AppError::from_core)?;

    Ok(Json(ConvertResponse {
        converted_amount,
        from_currency: from,
        to_currency: to,
    }))
}
