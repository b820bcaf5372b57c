//! Database tests

use chrono::NaiveDate;

use super::*;
use crate::currency::CurrencyTable;
use crate::error::Error;
use crate::models::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_user(db: &Database, email: &str) -> i64 {
    db.create_user(&NewUser {
        username: email.split('@').next().unwrap().to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        preferred_currency: DEFAULT_CURRENCY.to_string(),
    })
    .unwrap()
}

fn tx(kind: TransactionType, category: &str, amount: f64, on: NaiveDate) -> NewTransaction {
    NewTransaction {
        transaction_type: kind,
        category: category.to_string(),
        amount,
        currency: "USD".to_string(),
        date: on,
        description: None,
        tags: vec![],
    }
}

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert_eq!(db.count_users().unwrap(), 0);
    assert_eq!(db.count_transactions().unwrap(), 0);
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::in_memory().unwrap();
    new_user(&db, "a@example.com");

    let reopened = Database::new(db.path()).unwrap();
    assert_eq!(reopened.count_users().unwrap(), 1);
}

#[test]
fn test_foreign_keys_enabled_on_every_connection() {
    let db = Database::in_memory().unwrap();
    let conns: Vec<_> = (0..3).map(|_| db.conn().unwrap()).collect();
    for conn in &conns {
        let on: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(on, 1);
    }
}

#[test]
fn test_user_crud() {
    let db = Database::in_memory().unwrap();
    let id = new_user(&db, "Alice@Example.com");

    let user = db.get_user(id).unwrap().unwrap();
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.role, Role::User);
    assert_eq!(user.preferred_currency, "USD");

    let by_email = db.get_user_by_email("ALICE@example.com").unwrap().unwrap();
    assert_eq!(by_email.id, id);

    db.update_preferred_currency(id, "EUR", &CurrencyTable::default())
        .unwrap();
    db.set_user_role(id, Role::Admin).unwrap();
    let user = db.get_user(id).unwrap().unwrap();
    assert_eq!(user.preferred_currency, "EUR");
    assert_eq!(user.role, Role::Admin);

    assert_eq!(db.list_users().unwrap().len(), 1);
    assert!(db.get_user(id + 100).unwrap().is_none());
}

#[test]
fn test_duplicate_email_rejected() {
    let db = Database::in_memory().unwrap();
    new_user(&db, "dup@example.com");

    let err = db
        .create_user(&NewUser {
            username: "again".to_string(),
            email: " DUP@example.com ".to_string(),
            password_hash: "hash".to_string(),
            preferred_currency: "USD".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
}

#[test]
fn test_update_missing_user() {
    let db = Database::in_memory().unwrap();
    assert!(matches!(
        db.update_preferred_currency(42, "EUR", &CurrencyTable::default()),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_currency_switch_converts_owned_amounts() {
    let db = Database::in_memory().unwrap();
    let rates = CurrencyTable::default();
    let user = new_user(&db, "fx@example.com");
    let other = new_user(&db, "other@example.com");

    let usd = db
        .create_transaction(user, &tx(TransactionType::Expense, "Food", 100.0, date(2024, 1, 5)))
        .unwrap();
    // A row recorded in a different currency converts from its own code
    let mut eur_tx = tx(TransactionType::Income, "Salary", 92.0, date(2024, 1, 6));
    eur_tx.currency = "EUR".to_string();
    let eur = db.create_transaction(user, &eur_tx).unwrap();
    let untouched = db
        .create_transaction(other, &tx(TransactionType::Expense, "Food", 100.0, date(2024, 1, 5)))
        .unwrap();

    let budget = db
        .create_budget(
            user,
            &NewBudget {
                category: "Food".to_string(),
                amount: 200.0,
                start_date: date(2024, 1, 1),
                end_date: date(2024, 1, 31),
            },
        )
        .unwrap();
    let goal = db
        .create_goal(
            user,
            &NewGoal {
                title: "Car".to_string(),
                target_amount: 1000.0,
                current_amount: 250.0,
                deadline: None,
                auto_save_percentage: 10.0,
            },
        )
        .unwrap();

    db.update_preferred_currency(user, "jpy", &rates).unwrap();

    assert_eq!(db.get_user(user).unwrap().unwrap().preferred_currency, "JPY");
    let converted = db.get_transaction(user, usd).unwrap().unwrap();
    assert_eq!(converted.currency, "JPY");
    assert!((converted.amount - 15_000.0).abs() < 1e-6);
    let converted = db.get_transaction(user, eur).unwrap().unwrap();
    assert!((converted.amount - 15_000.0).abs() < 1e-6);

    let budget = db.get_budget(user, budget).unwrap().unwrap();
    assert!((budget.amount - 30_000.0).abs() < 1e-6);
    let goal = db.get_goal(user, goal).unwrap().unwrap();
    assert!((goal.target_amount - 150_000.0).abs() < 1e-6);
    assert!((goal.current_amount - 37_500.0).abs() < 1e-6);

    let other_row = db.get_transaction(other, untouched).unwrap().unwrap();
    assert_eq!(other_row.currency, "USD");
    assert_eq!(other_row.amount, 100.0);
}

#[test]
fn test_currency_switch_rolls_back_on_unknown_row_currency() {
    let db = Database::in_memory().unwrap();
    let user = new_user(&db, "rb@example.com");
    let ok = db
        .create_transaction(user, &tx(TransactionType::Expense, "Food", 100.0, date(2024, 1, 5)))
        .unwrap();
    let mut odd = tx(TransactionType::Expense, "Food", 5.0, date(2024, 1, 6));
    odd.currency = "XYZ".to_string();
    db.create_transaction(user, &odd).unwrap();

    let err = db
        .update_preferred_currency(user, "EUR", &CurrencyTable::default())
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedCurrency(_)));

    assert_eq!(db.get_user(user).unwrap().unwrap().preferred_currency, "USD");
    let row = db.get_transaction(user, ok).unwrap().unwrap();
    assert_eq!(row.amount, 100.0);
    assert_eq!(row.currency, "USD");
}

#[test]
fn test_transaction_crud() {
    let db = Database::in_memory().unwrap();
    let user = new_user(&db, "t@example.com");

    let mut new_tx = tx(TransactionType::Expense, "Food", 12.5, date(2024, 3, 1));
    new_tx.tags = vec!["lunch".to_string(), "work".to_string()];
    new_tx.description = Some("Sandwich".to_string());
    let id = db.create_transaction(user, &new_tx).unwrap();

    let stored = db.get_transaction(user, id).unwrap().unwrap();
    assert_eq!(stored.transaction_type, TransactionType::Expense);
    assert_eq!(stored.amount, 12.5);
    assert_eq!(stored.date, date(2024, 3, 1));
    assert_eq!(stored.tags, vec!["lunch", "work"]);
    assert_eq!(stored.description.as_deref(), Some("Sandwich"));

    let updated = db
        .update_transaction(
            user,
            id,
            &TransactionPatch {
                amount: Some(20.0),
                category: Some("Dining".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.amount, 20.0);
    assert_eq!(updated.category, "Dining");
    assert_eq!(updated.tags, vec!["lunch", "work"]);

    assert!(db.delete_transaction(user, id).unwrap());
    assert!(!db.delete_transaction(user, id).unwrap());
    assert!(db.get_transaction(user, id).unwrap().is_none());
}

#[test]
fn test_transactions_scoped_to_owner() {
    let db = Database::in_memory().unwrap();
    let alice = new_user(&db, "alice@example.com");
    let bob = new_user(&db, "bob@example.com");

    let id = db
        .create_transaction(alice, &tx(TransactionType::Income, "Salary", 100.0, date(2024, 1, 1)))
        .unwrap();

    assert!(db.get_transaction(bob, id).unwrap().is_none());
    assert!(db
        .update_transaction(bob, id, &TransactionPatch::default())
        .unwrap()
        .is_none());
    assert!(!db.delete_transaction(bob, id).unwrap());
    assert!(db.list_transactions(bob).unwrap().is_empty());
    assert_eq!(db.list_transactions(alice).unwrap().len(), 1);
}

#[test]
fn test_transaction_ordering_and_filters() {
    let db = Database::in_memory().unwrap();
    let user = new_user(&db, "o@example.com");

    db.create_transaction(user, &tx(TransactionType::Expense, "Rent", 900.0, date(2024, 1, 1)))
        .unwrap();
    db.create_transaction(user, &tx(TransactionType::Income, "Salary", 3000.0, date(2024, 1, 15)))
        .unwrap();
    db.create_transaction(user, &tx(TransactionType::Expense, "Food", 50.0, date(2024, 2, 1)))
        .unwrap();

    let all = db.list_transactions(user).unwrap();
    let dates: Vec<_> = all.iter().map(|t| t.date).collect();
    assert_eq!(dates, vec![date(2024, 2, 1), date(2024, 1, 15), date(2024, 1, 1)]);

    let expenses = db
        .list_transactions_by_type(user, TransactionType::Expense)
        .unwrap();
    assert_eq!(expenses.len(), 2);
    assert!(expenses
        .iter()
        .all(|t| t.transaction_type == TransactionType::Expense));

    let recent = db.recent_transactions(user, 2).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].category, "Food");

    let upcoming = db.list_upcoming_expenses(user, date(2024, 1, 1)).unwrap();
    let categories: Vec<_> = upcoming.iter().map(|t| t.category.as_str()).collect();
    assert_eq!(categories, vec!["Rent", "Food"]);

    assert!(db
        .list_upcoming_expenses(user, date(2024, 2, 2))
        .unwrap()
        .is_empty());
}

#[test]
fn test_budget_crud() {
    let db = Database::in_memory().unwrap();
    let user = new_user(&db, "b@example.com");

    let id = db
        .create_budget(
            user,
            &NewBudget {
                category: "Food".to_string(),
                amount: 500.0,
                start_date: date(2024, 1, 1),
                end_date: date(2024, 1, 31),
            },
        )
        .unwrap();

    let budget = db.get_budget(user, id).unwrap().unwrap();
    assert_eq!(budget.category, "Food");
    assert_eq!(budget.end_date, date(2024, 1, 31));

    let updated = db
        .update_budget(
            user,
            id,
            &BudgetPatch {
                amount: Some(650.0),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.amount, 650.0);
    assert_eq!(updated.category, "Food");

    let other = new_user(&db, "other@example.com");
    assert!(db.get_budget(other, id).unwrap().is_none());
    assert!(!db.delete_budget(other, id).unwrap());

    assert!(db.delete_budget(user, id).unwrap());
    assert!(db.list_budgets(user).unwrap().is_empty());
}

#[test]
fn test_goal_crud_and_increment() {
    let db = Database::in_memory().unwrap();
    let user = new_user(&db, "g@example.com");

    let id = db
        .create_goal(
            user,
            &NewGoal {
                title: "Emergency fund".to_string(),
                target_amount: 1000.0,
                current_amount: 0.0,
                deadline: Some(date(2025, 12, 31)),
                auto_save_percentage: 10.0,
            },
        )
        .unwrap();

    db.increment_goal_amount(id, 150.0).unwrap();
    db.increment_goal_amount(id, 50.0).unwrap();

    let goal = db.get_goal(user, id).unwrap().unwrap();
    assert_eq!(goal.current_amount, 200.0);
    assert_eq!(goal.deadline, Some(date(2025, 12, 31)));

    assert!(matches!(
        db.increment_goal_amount(id + 1, 1.0),
        Err(Error::NotFound(_))
    ));

    assert!(db.delete_goal(user, id).unwrap());
    assert!(db.list_goals(user).unwrap().is_empty());
}

#[test]
fn test_reports() {
    let db = Database::in_memory().unwrap();
    let user = new_user(&db, "r@example.com");
    let other = new_user(&db, "x@example.com");

    for (kind, category, amount, on) in [
        (TransactionType::Income, "Salary", 3000.0, date(2024, 1, 5)),
        (TransactionType::Expense, "Food", 120.0, date(2024, 1, 10)),
        (TransactionType::Expense, "Food", 80.0, date(2024, 1, 20)),
        (TransactionType::Expense, "Rent", 1000.0, date(2024, 1, 31)),
        (TransactionType::Expense, "Food", 999.0, date(2024, 2, 1)),
    ] {
        db.create_transaction(user, &tx(kind, category, amount, on))
            .unwrap();
    }
    db.create_transaction(other, &tx(TransactionType::Expense, "Food", 5.0, date(2024, 1, 10)))
        .unwrap();

    let spending = db
        .spending_by_category(user, date(2024, 1, 1), date(2024, 1, 31), None)
        .unwrap();
    assert_eq!(spending.get("Food"), Some(&200.0));
    assert_eq!(spending.get("Rent"), Some(&1000.0));
    assert!(!spending.contains_key("Salary"));

    let food_only = db
        .spending_by_category(user, date(2024, 1, 1), date(2024, 1, 31), Some("Food"))
        .unwrap();
    assert_eq!(food_only.len(), 1);

    let summary = db
        .income_vs_expense(user, date(2024, 1, 1), date(2024, 1, 31))
        .unwrap();
    assert_eq!(summary.total_income, 3000.0);
    assert_eq!(summary.total_expenses, 1200.0);

    let empty = db
        .income_vs_expense(user, date(2023, 1, 1), date(2023, 1, 31))
        .unwrap();
    assert_eq!(empty, IncomeExpenseSummary::default());

    let totals = db.user_totals(user).unwrap();
    assert_eq!(totals.total_expenses, 2199.0);

    let system = db.system_totals().unwrap();
    assert_eq!(system.total_users, 2);
    assert_eq!(system.total_transactions, 6);
    assert_eq!(system.total_expenses, 2204.0);
}

#[test]
fn test_deleting_user_cascades() {
    let db = Database::in_memory().unwrap();
    let user = new_user(&db, "c@example.com");
    db.create_transaction(user, &tx(TransactionType::Expense, "Food", 1.0, date(2024, 1, 1)))
        .unwrap();

    let conn = db.conn().unwrap();
    conn.execute("DELETE FROM users WHERE id = ?", [user]).unwrap();
    drop(conn);

    assert_eq!(db.count_transactions().unwrap(), 0);
}
