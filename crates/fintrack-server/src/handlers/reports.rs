//! Report handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use fintrack_core::models::IncomeExpenseSummary;

use super::{non_empty, parse_date};
use crate::{AppError, AppState, AuthUser};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Restrict the spending report to one category
    pub category: Option<String>,
}

impl ReportQuery {
    /// Both ends of the (inclusive) report window
    fn period(&self) -> Result<(NaiveDate, NaiveDate), AppError> {
        let (Some(start), Some(end)) = (
            non_empty(self.start_date.as_deref()),
            non_empty(self.end_date.as_deref()),
        ) else {
            return Err(AppError::bad_request("startDate and endDate are required"));
        };

        Ok((parse_date(start, "startDate")?, parse_date(end, "endDate")?))
    }
}

/// GET /api/reports/spending - Expense totals per category
pub async fn spending_report(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<BTreeMap<String, f64>>, AppError> {
    let (from, to) = params.period()?;
    let category = non_empty(params.category.as_deref());

    let spending = state
        .db
        .spending_by_category(auth.id, from, to, category)?;
    Ok(Json(spending))
}

/// GET /api/reports/income-expense - Income and expense totals
pub async fn income_expense_report(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<IncomeExpenseSummary>, AppError> {
    let (from, to) = params.period()?;
    Ok(Json(state.db.income_vs_expense(auth.id, from, to)?))
}
