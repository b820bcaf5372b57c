//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_rates` - Currency table from FINTRACK_RATES_FILE or the built-in one
//! - `find_user` - Resolve a user by email
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{bail, Context, Result};
use fintrack_core::db::Database;
use fintrack_core::models::User;
use fintrack_core::CurrencyTable;

/// Environment variable pointing at a JSON rate table
pub const RATES_FILE_ENV: &str = "FINTRACK_RATES_FILE";

/// Open (and migrate) the database
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Rate table used by `convert` and `serve`
pub fn load_rates() -> Result<CurrencyTable> {
    match std::env::var(RATES_FILE_ENV).ok().filter(|s| !s.is_empty()) {
        Some(path) => CurrencyTable::load(Path::new(&path))
            .with_context(|| format!("Failed to load rates from {}", path)),
        None => Ok(CurrencyTable::default()),
    }
}

/// Look up a user by email, failing with a readable message
pub fn find_user(db: &Database, email: &str) -> Result<User> {
    match db.get_user_by_email(email)? {
        Some(user) => Ok(user),
        None => bail!("No user with email {}", email),
    }
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    let users = db.count_users()?;
    println!("   Users: {}", users);

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Export FINTRACK_JWT_SECRET=<random string>");
    println!("  2. Start the API: fintrack serve");
    println!("  3. Register, then grant admin: fintrack users promote --email <you>");

    Ok(())
}
