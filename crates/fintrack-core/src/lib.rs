//! Fintrack Core Library
//!
//! Shared functionality for the fintrack personal finance tracker:
//! - Database access and migrations
//! - Budget and goal alert evaluation
//! - Goal auto-save allocation for incoming income
//! - Currency conversion against a static rate table
//! - Password hashing

pub mod alerts;
pub mod currency;
pub mod db;
pub mod error;
pub mod models;
pub mod password;
pub mod savings;

pub use alerts::{
    evaluate_budget_alerts, evaluate_goal_alerts, goal_progress, AlertResult, BudgetAlert,
    GoalAlert, GoalProgress,
};
pub use currency::CurrencyTable;
pub use db::Database;
pub use error::{Error, Result};
pub use savings::{allocation_for, AutoSaveReport};
