//! Goal handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use fintrack_core::alerts::{goal_progress, GoalProgress};
use fintrack_core::models::{Goal, NewGoal};

use super::{non_empty, parse_date, require_positive};
use crate::{AppError, AppState, AuthUser, MessageResponse};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub title: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    pub deadline: Option<String>,
    #[serde(default)]
    pub auto_save_percentage: f64,
}

/// POST /api/goals
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    let title = non_empty(Some(body.title.as_str()))
        .ok_or_else(|| AppError::bad_request("Title is required"))?
        .to_string();
    let target_amount = require_positive(body.target_amount, "Target amount")?;

    if !body.current_amount.is_finite() || body.current_amount < 0.0 {
        return Err(AppError::bad_request(
            "Current amount must be zero or more",
        ));
    }
    if !(0.0..=100.0).contains(&body.auto_save_percentage) {
        return Err(AppError::bad_request(
            "Auto-save percentage must be between 0 and 100",
        ));
    }

    let deadline = body
        .deadline
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(|d| parse_date(d, "deadline"))
        .transpose()?;

    let id = state.db.create_goal(
        auth.id,
        &NewGoal {
            title,
            target_amount,
            current_amount: body.current_amount,
            deadline,
            auto_save_percentage: body.auto_save_percentage,
        },
    )?;

    let goal = state
        .db
        .get_goal(auth.id, id)?
        .ok_or_else(|| AppError::internal("Goal vanished after insert"))?;

    Ok((StatusCode::CREATED, Json(goal)))
}

/// GET /api/goals
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Goal>>, AppError> {
    Ok(Json(state.db.list_goals(auth.id)?))
}

/// GET /api/goals/progress - Percentage saved for every goal
pub async fn get_goal_progress(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<GoalProgress>>, AppError> {
    let goals = state.db.list_goals(auth.id)?;
    Ok(Json(goal_progress(&goals)))
}

/// DELETE /api/goals/:id
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.db.delete_goal(auth.id, id)? {
        return Err(AppError::not_found("Goal not found"));
    }
    Ok(MessageResponse::new("Goal deleted"))
}
