//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_db, load_rates, find_user) and init
//! - `alerts` - Budget/goal alerts and goal progress
//! - `currency` - One-off conversions
//! - `reports` - Income vs expense and spending reports
//! - `serve` - Web server command
//! - `users` - User listing and role management

pub mod alerts;
pub mod core;
pub mod currency;
pub mod reports;
pub mod serve;
pub mod users;

// Re-export command functions for main.rs
pub use alerts::*;
pub use core::*;
pub use currency::*;
pub use reports::*;
pub use serve::*;
pub use users::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
