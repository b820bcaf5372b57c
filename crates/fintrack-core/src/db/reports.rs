//! Spending reports and dashboard figures

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rusqlite::params;

use super::Database;
use crate::error::Result;
use crate::models::{IncomeExpenseSummary, SystemTotals};

impl Database {
    /// Expense totals per category for a date range (inclusive)
    ///
    /// With `category` set, only that category is reported.
    pub fn spending_by_category(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
        category: Option<&str>,
    ) -> Result<BTreeMap<String, f64>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category, COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE user_id = ?1
              AND type = 'expense'
              AND date BETWEEN ?2 AND ?3
              AND (?4 IS NULL OR category = ?4)
            GROUP BY category
            ORDER BY category
            "#,
        )?;

        let rows = stmt
            .query_map(
                params![user_id, from.to_string(), to.to_string(), category],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)),
            )?
            .collect::<std::result::Result<BTreeMap<_, _>, _>>()?;

        Ok(rows)
    }

    /// Income and expense totals for a date range (inclusive)
    pub fn income_vs_expense(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<IncomeExpenseSummary> {
        let conn = self.conn()?;
        let summary = conn.query_row(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN type = 'income' THEN amount END), 0),
                COALESCE(SUM(CASE WHEN type = 'expense' THEN amount END), 0)
            FROM transactions
            WHERE user_id = ? AND date BETWEEN ? AND ?
            "#,
            params![user_id, from.to_string(), to.to_string()],
            |row| {
                Ok(IncomeExpenseSummary {
                    total_income: row.get(0)?,
                    total_expenses: row.get(1)?,
                })
            },
        )?;
        Ok(summary)
    }

    /// All-time income and expense totals for one user
    pub fn user_totals(&self, user_id: i64) -> Result<IncomeExpenseSummary> {
        let conn = self.conn()?;
        let summary = conn.query_row(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN type = 'income' THEN amount END), 0),
                COALESCE(SUM(CASE WHEN type = 'expense' THEN amount END), 0)
            FROM transactions
            WHERE user_id = ?
            "#,
            params![user_id],
            |row| {
                Ok(IncomeExpenseSummary {
                    total_income: row.get(0)?,
                    total_expenses: row.get(1)?,
                })
            },
        )?;
        Ok(summary)
    }

    /// Figures across every user, for the admin dashboard
    ///
    /// Amounts are summed as stored, each in its owner's preferred currency.
    pub fn system_totals(&self) -> Result<SystemTotals> {
        let conn = self.conn()?;
        let (total_income, total_expenses) = conn.query_row(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN type = 'income' THEN amount END), 0),
                COALESCE(SUM(CASE WHEN type = 'expense' THEN amount END), 0)
            FROM transactions
            "#,
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        drop(conn);

        Ok(SystemTotals {
            total_users: self.count_users()?,
            total_transactions: self.count_transactions()?,
            total_income,
            total_expenses,
        })
    }
}
