//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

use chrono::NaiveDate;

use crate::AppError;

pub mod auth;
pub mod budgets;
pub mod currency;
pub mod dashboard;
pub mod goals;
pub mod notifications;
pub mod reports;
pub mod transactions;
pub mod users;

// Re-export all handlers for use in router
pub use auth::*;
pub use budgets::*;
pub use currency::*;
pub use dashboard::*;
pub use goals::*;
pub use notifications::*;
pub use reports::*;
pub use transactions::*;
pub use users::*;

/// Parse a `YYYY-MM-DD` request field
pub(crate) fn parse_date(value: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::bad_request(&format!("Invalid {} format (use YYYY-MM-DD)", field))
    })
}

/// Reject amounts that are zero, negative or not finite
pub(crate) fn require_positive(value: f64, field: &str) -> Result<f64, AppError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AppError::bad_request(&format!(
            "{} must be a positive number",
            field
        )))
    }
}

/// Trimmed non-empty string, or `None`
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
