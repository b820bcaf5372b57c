//! User operations

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{parse_datetime, Database};
use crate::currency::{normalize_code, CurrencyTable};
use crate::error::{Error, Result};
use crate::models::{NewUser, Role, User};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, preferred_currency, created_at";

impl Database {
    /// Create a user, returning its ID
    ///
    /// Fails with `Conflict` when the email is already registered.
    pub fn create_user(&self, user: &NewUser) -> Result<i64> {
        let conn = self.conn()?;
        let email = normalize_email(&user.email);

        let taken: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE email = ?",
                params![email],
                |row| row.get(0),
            )
            .optional()?;
        if taken.is_some() {
            return Err(Error::Conflict(format!("Email already registered: {}", email)));
        }

        conn.execute(
            "INSERT INTO users (username, email, password_hash, preferred_currency) VALUES (?, ?, ?, ?)",
            params![
                user.username.trim(),
                email,
                user.password_hash,
                user.preferred_currency
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                params![id],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Look up a user by email (case-insensitive)
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                params![normalize_email(email)],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// List all users, oldest first
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))?;

        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }

    pub fn count_users(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Switch a user's preferred currency
    ///
    /// Every amount the user owns is re-expressed in the new currency so that
    /// alerts and reports keep summing like with like: transaction amounts
    /// are converted from the currency recorded on each row, budget limits
    /// and goal amounts from the previous preferred currency. Runs as a
    /// single transaction; an unconvertible row leaves everything unchanged.
    pub fn update_preferred_currency(
        &self,
        user_id: i64,
        currency: &str,
        rates: &CurrencyTable,
    ) -> Result<()> {
        let currency = normalize_code(currency);
        if !rates.is_supported(&currency) {
            return Err(Error::UnsupportedCurrency(currency));
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let previous: String = tx
            .query_row(
                "SELECT preferred_currency FROM users WHERE id = ?",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))?;

        let rows: Vec<(i64, f64, String)> = {
            let mut stmt =
                tx.prepare("SELECT id, amount, currency FROM transactions WHERE user_id = ?")?;
            let rows = stmt
                .query_map(params![user_id], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                })?
                .collect::<rusqlite::Result<_>>()?;
            rows
        };
        for (id, amount, from) in rows {
            let converted = rates.convert(amount, &from, &currency)?;
            tx.execute(
                "UPDATE transactions SET amount = ?, currency = ? WHERE id = ?",
                params![converted, currency, id],
            )?;
        }

        let factor = rates.convert(1.0, &previous, &currency)?;
        tx.execute(
            "UPDATE budgets SET amount = amount * ?1 WHERE user_id = ?2",
            params![factor, user_id],
        )?;
        tx.execute(
            "UPDATE goals SET target_amount = target_amount * ?1,
                              current_amount = current_amount * ?1
             WHERE user_id = ?2",
            params![factor, user_id],
        )?;
        tx.execute(
            "UPDATE users SET preferred_currency = ? WHERE id = ?",
            params![currency, user_id],
        )?;

        tx.commit()?;
        debug!(user_id, from = %previous, to = %currency, "Re-expressed amounts");
        Ok(())
    }

    pub fn set_user_role(&self, user_id: i64, role: Role) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE users SET role = ? WHERE id = ?",
            params![role.as_str(), user_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("User {}", user_id)));
        }
        Ok(())
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let role_str: String = row.get(4)?;
        let created_at_str: String = row.get(6)?;

        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            role: role_str.parse().unwrap_or_default(),
            preferred_currency: row.get(5)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
