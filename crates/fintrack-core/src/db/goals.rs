//! Goal operations

use rusqlite::{params, OptionalExtension};

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Goal, NewGoal};

const GOAL_COLUMNS: &str =
    "id, user_id, title, target_amount, current_amount, deadline, auto_save_percentage, created_at";

impl Database {
    pub fn create_goal(&self, user_id: i64, goal: &NewGoal) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO goals (user_id, title, target_amount, current_amount, deadline, auto_save_percentage)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                goal.title,
                goal.target_amount,
                goal.current_amount,
                goal.deadline.map(|d| d.to_string()),
                goal.auto_save_percentage,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List a user's goals in creation order
    pub fn list_goals(&self, user_id: i64) -> Result<Vec<Goal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM goals WHERE user_id = ? ORDER BY id",
            GOAL_COLUMNS
        ))?;

        let goals = stmt
            .query_map(params![user_id], Self::row_to_goal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(goals)
    }

    pub fn get_goal(&self, user_id: i64, id: i64) -> Result<Option<Goal>> {
        let conn = self.conn()?;
        let goal = conn
            .query_row(
                &format!(
                    "SELECT {} FROM goals WHERE id = ? AND user_id = ?",
                    GOAL_COLUMNS
                ),
                params![id, user_id],
                Self::row_to_goal,
            )
            .optional()?;
        Ok(goal)
    }

    pub fn delete_goal(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM goals WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    /// Add `delta` to a goal's current amount in a single statement
    ///
    /// Concurrent increments on the same goal never lose updates.
    pub fn increment_goal_amount(&self, id: i64, delta: f64) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE goals SET current_amount = current_amount + ? WHERE id = ?",
            params![delta, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Goal {}", id)));
        }
        Ok(())
    }

    fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
        let deadline_str: Option<String> = row.get(5)?;
        let created_at_str: String = row.get(7)?;

        Ok(Goal {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            target_amount: row.get(3)?,
            current_amount: row.get(4)?,
            deadline: deadline_str.as_deref().map(parse_date),
            auto_save_percentage: row.get(6)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
