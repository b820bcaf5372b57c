//! Goal auto-save allocation
//!
//! When income is recorded, every goal of the user receives
//! `income * auto_save_percentage / 100`. Each goal is updated independently:
//! one goal failing never rolls back or blocks the others.

use serde::Serialize;
use tracing::{debug, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::Goal;

/// Amount moved into a goal for a given income
///
/// Invalid inputs (NaN, infinities, negative results) allocate nothing so a
/// goal's current amount can only grow.
pub fn allocation_for(income: f64, percentage: f64) -> f64 {
    let amount = income * percentage / 100.0;
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// Sum of auto-save percentages across goals
pub fn total_percentage(goals: &[Goal]) -> f64 {
    goals
        .iter()
        .map(|g| g.auto_save_percentage)
        .filter(|p| p.is_finite())
        .sum()
}

/// One goal that received (or would have received) an allocation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub goal_id: i64,
    pub amount: f64,
}

/// A goal whose increment failed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationFailure {
    pub goal_id: i64,
    pub error: String,
}

/// Outcome of one auto-save run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSaveReport {
    pub income: f64,
    pub allocations: Vec<Allocation>,
    pub failures: Vec<AllocationFailure>,
    /// Sum of the goals' percentages; above 100 means more than the income was set aside
    pub total_percentage: f64,
}

impl AutoSaveReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn is_over_allocated(&self) -> bool {
        self.total_percentage > 100.0
    }

    pub fn total_allocated(&self) -> f64 {
        self.allocations.iter().map(|a| a.amount).sum()
    }
}

impl Database {
    /// Distribute an income amount across all of a user's goals
    ///
    /// Loading the goals is the only step whose failure is returned as an
    /// error. Increments run concurrently, each on its own pooled connection,
    /// and per-goal failures are collected into the report.
    pub fn allocate_auto_savings(&self, user_id: i64, income: f64) -> Result<AutoSaveReport> {
        let goals = self.list_goals(user_id)?;

        let mut report = AutoSaveReport {
            income,
            total_percentage: total_percentage(&goals),
            ..Default::default()
        };

        if report.is_over_allocated() {
            warn!(
                user_id,
                total_percentage = report.total_percentage,
                "Auto-save percentages exceed 100% of income"
            );
        }

        let outcomes: Vec<(i64, f64, Result<()>)> = std::thread::scope(|s| {
            let handles: Vec<_> = goals
                .iter()
                .map(|goal| {
                    let amount = allocation_for(income, goal.auto_save_percentage);
                    let goal_id = goal.id;
                    s.spawn(move || {
                        // Nothing to write for a zero allocation
                        let result = if amount > 0.0 {
                            self.increment_goal_amount(goal_id, amount)
                        } else {
                            Ok(())
                        };
                        (goal_id, amount, result)
                    })
                })
                .collect();

            handles
                .into_iter()
                .zip(goals.iter())
                .map(|(handle, goal)| {
                    handle.join().unwrap_or_else(|_| {
                        (
                            goal.id,
                            0.0,
                            Err(Error::InvalidData("auto-save worker panicked".to_string())),
                        )
                    })
                })
                .collect()
        });

        for (goal_id, amount, result) in outcomes {
            match result {
                Ok(()) => {
                    debug!(user_id, goal_id, amount, "Auto-saved into goal");
                    report.allocations.push(Allocation { goal_id, amount });
                }
                Err(e) => {
                    warn!(user_id, goal_id, error = %e, "Auto-save failed for goal");
                    report.failures.push(AllocationFailure {
                        goal_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewGoal, NewUser};

    fn setup() -> (Database, i64) {
        let db = Database::in_memory().unwrap();
        let user_id = db
            .create_user(&NewUser {
                username: "saver".to_string(),
                email: "saver@example.com".to_string(),
                password_hash: "hash".to_string(),
                preferred_currency: "USD".to_string(),
            })
            .unwrap();
        (db, user_id)
    }

    fn add_goal(db: &Database, user_id: i64, title: &str, current: f64, pct: f64) -> i64 {
        db.create_goal(
            user_id,
            &NewGoal {
                title: title.to_string(),
                target_amount: 1000.0,
                current_amount: current,
                deadline: None,
                auto_save_percentage: pct,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_allocation_for() {
        assert_eq!(allocation_for(2000.0, 10.0), 200.0);
        assert_eq!(allocation_for(2000.0, 0.0), 0.0);
        assert_eq!(allocation_for(f64::NAN, 10.0), 0.0);
        assert_eq!(allocation_for(100.0, f64::NAN), 0.0);
        assert_eq!(allocation_for(100.0, -5.0), 0.0);
        assert_eq!(allocation_for(f64::INFINITY, 5.0), 0.0);
    }

    #[test]
    fn test_allocates_to_every_goal() {
        let (db, user_id) = setup();
        let a = add_goal(&db, user_id, "Car", 100.0, 10.0);
        let b = add_goal(&db, user_id, "Trip", 0.0, 25.0);

        let report = db.allocate_auto_savings(user_id, 2000.0).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.allocations.len(), 2);
        assert_eq!(report.total_allocated(), 700.0);

        assert_eq!(db.get_goal(user_id, a).unwrap().unwrap().current_amount, 300.0);
        assert_eq!(db.get_goal(user_id, b).unwrap().unwrap().current_amount, 500.0);
    }

    #[test]
    fn test_zero_percentage_goal_unchanged() {
        let (db, user_id) = setup();
        let id = add_goal(&db, user_id, "Idle", 50.0, 0.0);

        let report = db.allocate_auto_savings(user_id, 1000.0).unwrap();
        assert_eq!(report.allocations, vec![Allocation { goal_id: id, amount: 0.0 }]);
        assert_eq!(db.get_goal(user_id, id).unwrap().unwrap().current_amount, 50.0);
    }

    #[test]
    fn test_no_goals_is_a_noop() {
        let (db, user_id) = setup();
        let report = db.allocate_auto_savings(user_id, 1000.0).unwrap();
        assert!(report.allocations.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_over_allocation_is_not_capped() {
        let (db, user_id) = setup();
        let a = add_goal(&db, user_id, "A", 0.0, 70.0);
        let b = add_goal(&db, user_id, "B", 0.0, 60.0);

        let report = db.allocate_auto_savings(user_id, 100.0).unwrap();
        assert!(report.is_over_allocated());
        assert_eq!(report.total_percentage, 130.0);
        assert_eq!(db.get_goal(user_id, a).unwrap().unwrap().current_amount, 70.0);
        assert_eq!(db.get_goal(user_id, b).unwrap().unwrap().current_amount, 60.0);
    }

    #[test]
    fn test_failed_goal_does_not_block_others() {
        let (db, user_id) = setup();
        let car = add_goal(&db, user_id, "Car", 100.0, 10.0);
        let locked = add_goal(&db, user_id, "Locked", 0.0, 20.0);
        let trip = add_goal(&db, user_id, "Trip", 0.0, 5.0);

        db.conn()
            .unwrap()
            .execute_batch(&format!(
                "CREATE TRIGGER reject_goal_update BEFORE UPDATE ON goals
                 WHEN NEW.id = {}
                 BEGIN SELECT RAISE(ABORT, 'goal is locked'); END;",
                locked
            ))
            .unwrap();

        let report = db.allocate_auto_savings(user_id, 1000.0).unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].goal_id, locked);
        assert!(report.failures[0].error.contains("goal is locked"));

        let mut allocated: Vec<i64> = report.allocations.iter().map(|a| a.goal_id).collect();
        allocated.sort();
        assert_eq!(allocated, vec![car, trip]);

        assert_eq!(db.get_goal(user_id, car).unwrap().unwrap().current_amount, 200.0);
        assert_eq!(db.get_goal(user_id, trip).unwrap().unwrap().current_amount, 50.0);
        assert_eq!(db.get_goal(user_id, locked).unwrap().unwrap().current_amount, 0.0);
    }

    #[test]
    fn test_repeated_income_accumulates() {
        let (db, user_id) = setup();
        let id = add_goal(&db, user_id, "Fund", 0.0, 10.0);

        for _ in 0..5 {
            db.allocate_auto_savings(user_id, 100.0).unwrap();
        }
        let goal = db.get_goal(user_id, id).unwrap().unwrap();
        assert!((goal.current_amount - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_concurrent_runs_do_not_lose_updates() {
        let (db, user_id) = setup();
        let id = add_goal(&db, user_id, "Fund", 0.0, 10.0);

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| db.allocate_auto_savings(user_id, 100.0).unwrap());
            }
        });

        let goal = db.get_goal(user_id, id).unwrap().unwrap();
        assert!((goal.current_amount - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_only_own_goals_touched() {
        let (db, user_id) = setup();
        let other = db
            .create_user(&NewUser {
                username: "other".to_string(),
                email: "other@example.com".to_string(),
                password_hash: "hash".to_string(),
                preferred_currency: "USD".to_string(),
            })
            .unwrap();
        let theirs = add_goal(&db, other, "Theirs", 0.0, 50.0);
        add_goal(&db, user_id, "Mine", 0.0, 50.0);

        db.allocate_auto_savings(user_id, 100.0).unwrap();
        assert_eq!(db.get_goal(other, theirs).unwrap().unwrap().current_amount, 0.0);
    }
}
