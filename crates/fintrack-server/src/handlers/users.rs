//! User settings handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use tracing::info;

use fintrack_core::currency::normalize_code;

use super::non_empty;
use crate::{AppError, AppState, AuthUser, MessageResponse};

#[derive(Debug, Deserialize)]
pub struct UpdateCurrencyRequest {
    pub currency: Option<String>,
}

/// PUT /api/users/update-currency - Change the preferred currency
///
/// Stored transactions, budget limits and goal amounts are converted into
/// the new currency along with it.
pub async fn update_currency(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UpdateCurrencyRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let currency = non_empty(body.currency.as_deref())
        .map(normalize_code)
        .ok_or_else(|| AppError::bad_request("Currency is required"))?;

    if !state.config.currency.is_supported(&currency) {
        return Err(AppError::bad_request(&format!(
            "Unsupported currency: {}",
            currency
        )));
    }

    state
        .db
        .update_preferred_currency(auth.id, &currency, &state.config.currency)
        .map_err(AppError::from_core)?;

    info!(user_id = auth.id, currency = %currency, "Preferred currency updated");
    Ok(MessageResponse::new(format!(
        "Preferred currency updated to {}",
        currency
    )))
}
