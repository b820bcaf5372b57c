//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use chrono::NaiveDate;
use fintrack_core::db::Database;
use fintrack_core::models::{NewBudget, NewGoal, NewTransaction, NewUser, Role, TransactionType};
use fintrack_core::CurrencyTable;
use tempfile::TempDir;

use crate::commands::{self, truncate};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn create_user(db: &Database, email: &str) -> i64 {
    db.create_user(&NewUser {
        username: "tester".to_string(),
        email: email.to_string(),
        password_hash: "unused".to_string(),
        preferred_currency: "USD".to_string(),
    })
    .unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn add_expense(db: &Database, user_id: i64, category: &str, amount: f64, day: &str) {
    db.create_transaction(
        user_id,
        &NewTransaction {
            transaction_type: TransactionType::Expense,
            category: category.to_string(),
            amount,
            currency: "USD".to_string(),
            date: date(day),
            description: None,
            tags: vec![],
        },
    )
    .unwrap();
}

// ========== Core Command Tests ==========

#[test]
fn test_cmd_init_creates_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fintrack.db");

    commands::cmd_init(&path).unwrap();
    assert!(path.exists());

    // Re-running against an existing database is fine
    commands::cmd_init(&path).unwrap();

    let db = commands::open_db(&path).unwrap();
    assert_eq!(db.count_users().unwrap(), 0);
}

#[test]
fn test_open_db_persists_between_opens() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("persist.db");

    {
        let db = commands::open_db(&path).unwrap();
        create_user(&db, "keep@example.com");
    }

    let db = commands::open_db(&path).unwrap();
    assert!(db.get_user_by_email("keep@example.com").unwrap().is_some());
}

#[test]
fn test_find_user_unknown_email() {
    let db = setup_test_db();
    let err = commands::find_user(&db, "nobody@example.com").unwrap_err();
    assert!(err.to_string().contains("nobody@example.com"));
}

// ========== Users Command Tests ==========

#[test]
fn test_cmd_users_promote_and_demote() {
    let db = setup_test_db();
    let id = create_user(&db, "admin@example.com");

    commands::cmd_users_promote(&db, "admin@example.com").unwrap();
    assert_eq!(db.get_user(id).unwrap().unwrap().role, Role::Admin);

    // Promoting twice is a no-op
    commands::cmd_users_promote(&db, "admin@example.com").unwrap();
    assert_eq!(db.get_user(id).unwrap().unwrap().role, Role::Admin);

    commands::cmd_users_demote(&db, "admin@example.com").unwrap();
    assert_eq!(db.get_user(id).unwrap().unwrap().role, Role::User);
}

#[test]
fn test_cmd_users_promote_unknown() {
    let db = setup_test_db();
    assert!(commands::cmd_users_promote(&db, "ghost@example.com").is_err());
}

#[test]
fn test_cmd_users_list() {
    let db = setup_test_db();
    commands::cmd_users_list(&db).unwrap();

    create_user(&db, "a@example.com");
    create_user(&db, "b@example.com");
    commands::cmd_users_list(&db).unwrap();
}

// ========== Alerts / Goals Command Tests ==========

#[test]
fn test_cmd_alerts_and_goals() {
    let db = setup_test_db();
    let user_id = create_user(&db, "g@example.com");

    // Nothing configured yet
    commands::cmd_alerts(&db, "g@example.com").unwrap();
    commands::cmd_goals(&db, "g@example.com").unwrap();

    db.create_budget(
        user_id,
        &NewBudget {
            category: "Food".to_string(),
            amount: 100.0,
            start_date: date("2024-01-01"),
            end_date: date("2024-01-31"),
        },
    )
    .unwrap();
    add_expense(&db, user_id, "Food", 150.0, "2024-01-10");
    db.create_goal(
        user_id,
        &NewGoal {
            title: "Vacation".to_string(),
            target_amount: 1000.0,
            current_amount: 900.0,
            deadline: None,
            auto_save_percentage: 5.0,
        },
    )
    .unwrap();

    commands::cmd_alerts(&db, "g@example.com").unwrap();
    commands::cmd_goals(&db, "g@example.com").unwrap();
    assert!(commands::cmd_alerts(&db, "other@example.com").is_err());
}

// ========== Report Command Tests ==========

#[test]
fn test_parse_period() {
    let (from, to) = commands::parse_period("2024-01-01", "2024-01-31").unwrap();
    assert_eq!(from, date("2024-01-01"));
    assert_eq!(to, date("2024-01-31"));

    assert!(commands::parse_period("2024-01-31", "2024-01-01").is_err());
    assert!(commands::parse_period("01/01/2024", "2024-01-31").is_err());
    assert!(commands::parse_period("2024-01-01", "soon").is_err());
}

#[test]
fn test_cmd_report() {
    let db = setup_test_db();
    let user_id = create_user(&db, "r@example.com");
    add_expense(&db, user_id, "Food", 40.0, "2024-03-02");
    add_expense(&db, user_id, "A very long category name that needs truncating", 10.0, "2024-03-03");

    commands::cmd_report(&db, "r@example.com", "2024-03-01", "2024-03-31").unwrap();
    commands::cmd_report(&db, "r@example.com", "2025-01-01", "2025-01-31").unwrap();
    assert!(commands::cmd_report(&db, "r@example.com", "2024-03-31", "2024-03-01").is_err());
}

// ========== Currency Command Tests ==========

#[test]
fn test_cmd_convert() {
    let table = CurrencyTable::default();

    let converted = commands::cmd_convert(&table, 1000.0, "usd", "eur").unwrap();
    assert!((converted - 920.0).abs() < 1e-9);

    let same = commands::cmd_convert(&table, 12.5, "GBP", "GBP").unwrap();
    assert!((same - 12.5).abs() < 1e-9);

    let err = commands::cmd_convert(&table, 1.0, "USD", "XYZ").unwrap_err();
    assert!(err.to_string().contains("EUR"));
}

// ========== Serve Config Tests ==========

#[test]
fn test_build_server_config() {
    let config = commands::build_server_config(
        Some("a-long-enough-test-secret".to_string()),
        Some("600".to_string()),
        Some("http://localhost:5173, ,https://app.example.com".to_string()),
    )
    .unwrap();

    assert_eq!(config.token_ttl.as_secs(), 600);
    assert_eq!(
        config.allowed_origins,
        vec!["http://localhost:5173", "https://app.example.com"]
    );
}

#[test]
fn test_build_server_config_defaults() {
    let config =
        commands::build_server_config(Some("a-long-enough-test-secret".to_string()), None, None)
            .unwrap();
    assert_eq!(config.token_ttl, fintrack_server::DEFAULT_TOKEN_TTL);
    assert!(config.allowed_origins.is_empty());
}

#[test]
fn test_build_server_config_rejects_bad_values() {
    assert!(commands::build_server_config(None, None, None).is_err());
    assert!(commands::build_server_config(Some("short".to_string()), None, None).is_err());
    assert!(commands::build_server_config(
        Some("a-long-enough-test-secret".to_string()),
        Some("forever".to_string()),
        None
    )
    .is_err());
    assert!(commands::build_server_config(
        Some("a-long-enough-test-secret".to_string()),
        Some("0".to_string()),
        None
    )
    .is_err());
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly10!", 10), "exactly10!");
    assert_eq!(truncate("this is too long", 10), "this is...");
    assert_eq!(truncate("ééééééééééé", 5), "éé...");
}
