//! Authentication-related handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use fintrack_core::currency::normalize_code;
use fintrack_core::models::{NewUser, User, DEFAULT_CURRENCY};
use fintrack_core::password::{hash_password, verify_password};

use super::non_empty;
use crate::{token, AppError, AppState, AuthUser, MessageResponse};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub preferred_currency: Option<String>,
}

/// POST /api/auth/register - Create a user account
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let (Some(username), Some(email), Some(password)) = (
        non_empty(body.username.as_deref()),
        non_empty(body.email.as_deref()),
        body.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::bad_request(
            "Username, email and password are required",
        ));
    };

    if !email.contains('@') {
        return Err(AppError::bad_request("Invalid email address"));
    }

    let currency = non_empty(body.preferred_currency.as_deref())
        .map(normalize_code)
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    if !state.config.currency.is_supported(&currency) {
        return Err(AppError::bad_request(&format!(
            "Unsupported currency: {}",
            currency
        )));
    }

    // CPU-bound, keep it off the async workers
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await?
        .map_err(AppError::from_core)?;

    let id = state
        .db
        .create_user(&NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            preferred_currency: currency,
        })
        .map_err(AppError::from_core)?;

    info!(user_id = id, "User registered");

    Ok((
        StatusCode::CREATED,
        MessageResponse::new("User registered successfully"),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/auth/login - Exchange credentials for a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let Some(user) = state.db.get_user_by_email(&body.email)? else {
        warn!("Login failed: unknown email");
        return Err(AppError::unauthorized("Invalid credentials"));
    };

    let hash = user.password_hash.clone();
    let password = body.password;
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?;
    if !valid {
        warn!(user_id = user.id, "Login failed: wrong password");
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let token = token::issue_token(
        user.id,
        user.role,
        &state.config.jwt_secret,
        state.config.token_ttl,
    )?;

    info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse { token }))
}

/// GET /api/me - The authenticated user's profile
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<User>, AppError> {
    state
        .db
        .get_user(auth.id)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("User not found"))
}
