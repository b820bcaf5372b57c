//! Budget operations

use rusqlite::{params, OptionalExtension};

use super::{parse_date, parse_datetime, Database};
use crate::error::Result;
use crate::models::{Budget, BudgetPatch, NewBudget};

const BUDGET_COLUMNS: &str = "id, user_id, category, amount, start_date, end_date, created_at";

impl Database {
    pub fn create_budget(&self, user_id: i64, budget: &NewBudget) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO budgets (user_id, category, amount, start_date, end_date) VALUES (?, ?, ?, ?, ?)",
            params![
                user_id,
                budget.category,
                budget.amount,
                budget.start_date.to_string(),
                budget.end_date.to_string(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List a user's budgets in creation order
    ///
    /// Order matters to the alert evaluator: with several "Monthly" budgets
    /// the last one listed wins.
    pub fn list_budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM budgets WHERE user_id = ? ORDER BY id",
            BUDGET_COLUMNS
        ))?;

        let budgets = stmt
            .query_map(params![user_id], Self::row_to_budget)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }

    pub fn get_budget(&self, user_id: i64, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                &format!(
                    "SELECT {} FROM budgets WHERE id = ? AND user_id = ?",
                    BUDGET_COLUMNS
                ),
                params![id, user_id],
                Self::row_to_budget,
            )
            .optional()?;
        Ok(budget)
    }

    /// Apply a partial update; `None` if the budget is not the user's
    pub fn update_budget(
        &self,
        user_id: i64,
        id: i64,
        patch: &BudgetPatch,
    ) -> Result<Option<Budget>> {
        let Some(existing) = self.get_budget(user_id, id)? else {
            return Ok(None);
        };

        let conn = self.conn()?;
        conn.execute(
            "UPDATE budgets SET category = ?, amount = ?, start_date = ?, end_date = ? WHERE id = ? AND user_id = ?",
            params![
                patch.category.as_ref().unwrap_or(&existing.category),
                patch.amount.unwrap_or(existing.amount),
                patch.start_date.unwrap_or(existing.start_date).to_string(),
                patch.end_date.unwrap_or(existing.end_date).to_string(),
                id,
                user_id,
            ],
        )?;
        drop(conn);

        self.get_budget(user_id, id)
    }

    pub fn delete_budget(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM budgets WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    fn row_to_budget(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
        let start_str: String = row.get(4)?;
        let end_str: String = row.get(5)?;
        let created_at_str: String = row.get(6)?;

        Ok(Budget {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category: row.get(2)?,
            amount: row.get(3)?,
            start_date: parse_date(&start_str),
            end_date: parse_date(&end_str),
            created_at: parse_datetime(&created_at_str),
        })
    }
}
