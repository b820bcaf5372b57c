//! User administration commands

use anyhow::Result;
use fintrack_core::db::Database;
use fintrack_core::models::Role;
use tracing::info;

use super::{find_user, truncate};

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    println!();
    println!("👥 Users");
    println!("   ─────────────────────────────────────────────────────────────");

    if users.is_empty() {
        println!("   No users registered yet.");
        return Ok(());
    }

    println!(
        "   {:>4} │ {:30} │ {:20} │ {:6} │ {:8}",
        "ID", "Email", "Username", "Role", "Currency"
    );
    println!("   ─────┼────────────────────────────────┼──────────────────────┼────────┼─────────");
    for user in &users {
        println!(
            "   {:>4} │ {:30} │ {:20} │ {:6} │ {:8}",
            user.id,
            truncate(&user.email, 30),
            truncate(&user.username, 20),
            user.role,
            user.preferred_currency
        );
    }

    Ok(())
}

fn set_role(db: &Database, email: &str, role: Role) -> Result<()> {
    let user = find_user(db, email)?;
    if user.role == role {
        println!("   {} already has the {} role", user.email, role);
        return Ok(());
    }

    db.set_user_role(user.id, role)?;
    info!(user_id = user.id, role = %role, "Changed user role");
    println!("✅ {} is now {}", user.email, role);
    println!("   Existing tokens keep their old role until they expire");
    Ok(())
}

pub fn cmd_users_promote(db: &Database, email: &str) -> Result<()> {
    set_role(db, email, Role::Admin)
}

pub fn cmd_users_demote(db: &Database, email: &str) -> Result<()> {
    set_role(db, email, Role::User)
}
