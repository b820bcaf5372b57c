//! Transaction operations
//!
//! Every lookup is scoped by `user_id`: a transaction owned by someone else
//! behaves exactly like one that does not exist.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{parse_date, parse_datetime, Database};
use crate::error::Result;
use crate::models::{NewTransaction, Transaction, TransactionPatch, TransactionType};

const TRANSACTION_COLUMNS: &str =
    "id, user_id, type, category, amount, currency, date, description, tags, created_at";

impl Database {
    /// Store a transaction for a user, returning its ID
    pub fn create_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<i64> {
        let conn = self.conn()?;
        let tags = serde_json::to_string(&tx.tags)?;

        conn.execute(
            r#"
            INSERT INTO transactions (user_id, type, category, amount, currency, date, description, tags)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.transaction_type.as_str(),
                tx.category,
                tx.amount,
                tx.currency,
                tx.date.to_string(),
                tx.description,
                tags,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List a user's transactions, newest first
    pub fn list_transactions(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE user_id = ? ORDER BY date DESC, id DESC",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![user_id], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// List a user's transactions of one type, newest first
    pub fn list_transactions_by_type(
        &self,
        user_id: i64,
        transaction_type: TransactionType,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE user_id = ? AND type = ? ORDER BY date DESC, id DESC",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(
                params![user_id, transaction_type.as_str()],
                Self::row_to_transaction,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// The `limit` most recent transactions of a user
    pub fn recent_transactions(&self, user_id: i64, limit: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE user_id = ? ORDER BY date DESC, id DESC LIMIT ?",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![user_id, limit], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Expenses dated on or after `today`, soonest first
    pub fn list_upcoming_expenses(&self, user_id: i64, today: NaiveDate) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE user_id = ? AND type = 'expense' AND date >= ? ORDER BY date ASC, id ASC",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![user_id, today.to_string()], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Get a single transaction owned by `user_id`
    pub fn get_transaction(&self, user_id: i64, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let transaction = conn
            .query_row(
                &format!(
                    "SELECT {} FROM transactions WHERE id = ? AND user_id = ?",
                    TRANSACTION_COLUMNS
                ),
                params![id, user_id],
                Self::row_to_transaction,
            )
            .optional()?;

        Ok(transaction)
    }

    /// Apply a partial update, returning the updated transaction
    ///
    /// Returns `None` if the transaction does not exist for this user.
    pub fn update_transaction(
        &self,
        user_id: i64,
        id: i64,
        patch: &TransactionPatch,
    ) -> Result<Option<Transaction>> {
        let Some(existing) = self.get_transaction(user_id, id)? else {
            return Ok(None);
        };

        let transaction_type = patch.transaction_type.unwrap_or(existing.transaction_type);
        let category = patch.category.as_ref().unwrap_or(&existing.category);
        let amount = patch.amount.unwrap_or(existing.amount);
        let currency = patch.currency.as_ref().unwrap_or(&existing.currency);
        let date = patch.date.unwrap_or(existing.date);
        let description = patch.description.as_ref().or(existing.description.as_ref());
        let tags = serde_json::to_string(patch.tags.as_ref().unwrap_or(&existing.tags))?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE transactions
            SET type = ?, category = ?, amount = ?, currency = ?, date = ?, description = ?, tags = ?
            WHERE id = ? AND user_id = ?
            "#,
            params![
                transaction_type.as_str(),
                category,
                amount,
                currency,
                date.to_string(),
                description,
                tags,
                id,
                user_id,
            ],
        )?;
        drop(conn);

        self.get_transaction(user_id, id)
    }

    /// Delete a transaction, returning whether anything was removed
    pub fn delete_transaction(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM transactions WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    /// Count all transactions across users
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let type_str: String = row.get(2)?;
        let date_str: String = row.get(6)?;
        let tags_json: String = row.get(8)?;
        let created_at_str: String = row.get(9)?;

        let transaction_type = type_str.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                e.into(),
            )
        })?;

        Ok(Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            transaction_type,
            category: row.get(3)?,
            amount: row.get(4)?,
            currency: row.get(5)?,
            date: parse_date(&date_str),
            description: row.get(7)?,
            tags: serde_json::from_str(&tags_json).unwrap_or_default(),
            created_at: parse_datetime(&created_at_str),
        })
    }
}
