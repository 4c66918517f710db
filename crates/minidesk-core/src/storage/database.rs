//! SQLite-based storage.
//!
//! Provides persistent storage for:
//! - Completed timer sessions and their statistics
//! - Expense tracker entries
//! - Key-value store for application state (the persisted session clock)

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::expenses::{Expense, ExpenseDraft, DATE_FORMAT};
use crate::timer::SessionType;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub total_sessions: u64,
    pub work_sessions: u64,
    pub work_secs: u64,
    pub break_secs: u64,
    pub today_work_sessions: u64,
    pub today_work_secs: u64,
}

/// SQLite database for minidesk.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/minidesk/minidesk.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("minidesk.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "database opened");
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS sessions (
                    id            INTEGER PRIMARY KEY AUTOINCREMENT,
                    session_type  TEXT NOT NULL,
                    duration_secs INTEGER NOT NULL,
                    completed_at  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS expenses (
                    id      INTEGER PRIMARY KEY AUTOINCREMENT,
                    name    TEXT NOT NULL,
                    amount  REAL NOT NULL,
                    date    TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);
                CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Record a finished session.
    pub fn record_session(
        &self,
        session: SessionType,
        duration_secs: u64,
        completed_at: DateTime<Utc>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO sessions (session_type, duration_secs, completed_at)
             VALUES (?1, ?2, ?3)",
            params![session.as_str(), duration_secs, completed_at.to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn session_stats(&self) -> Result<SessionStats> {
        let mut stmt = self.conn.prepare(
            "SELECT session_type, COUNT(*), COALESCE(SUM(duration_secs), 0)
             FROM sessions
             GROUP BY session_type",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;

        let mut stats = SessionStats::default();
        for row in rows {
            let (session_type, count, secs) = row?;
            stats.total_sessions += count;
            match session_type.as_str() {
                "work" => {
                    stats.work_sessions += count;
                    stats.work_secs += secs;
                }
                "break" => stats.break_secs += secs,
                _ => {}
            }
        }

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let (today_sessions, today_secs) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(duration_secs), 0)
             FROM sessions
             WHERE session_type = 'work' AND completed_at >= ?1",
            params![format!("{today}T00:00:00+00:00")],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
        )?;
        stats.today_work_sessions = today_sessions;
        stats.today_work_secs = today_secs;

        Ok(stats)
    }

    // ── Expenses ─────────────────────────────────────────────────────

    pub fn add_expense(&self, draft: ExpenseDraft) -> Result<Expense> {
        self.conn.execute(
            "INSERT INTO expenses (name, amount, date) VALUES (?1, ?2, ?3)",
            params![
                draft.name,
                draft.amount,
                draft.date.format(DATE_FORMAT).to_string()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, "expense added");
        Ok(draft.into_expense(id))
    }

    pub fn get_expense(&self, id: i64) -> Result<Expense> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, amount, date FROM expenses WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;
        match row {
            Some(raw) => expense_from_row(raw),
            None => Err(DatabaseError::NotFound {
                table: "expenses",
                id,
            }
            .into()),
        }
    }

    /// Replace all fields of an existing expense.
    pub fn update_expense(&self, id: i64, draft: ExpenseDraft) -> Result<Expense> {
        let changed = self.conn.execute(
            "UPDATE expenses SET name = ?1, amount = ?2, date = ?3 WHERE id = ?4",
            params![
                draft.name,
                draft.amount,
                draft.date.format(DATE_FORMAT).to_string(),
                id
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                table: "expenses",
                id,
            }
            .into());
        }
        Ok(draft.into_expense(id))
    }

    pub fn delete_expense(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                table: "expenses",
                id,
            }
            .into());
        }
        Ok(())
    }

    /// All expenses, oldest first.
    pub fn list_expenses(&self) -> Result<Vec<Expense>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, amount, date FROM expenses ORDER BY date, id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        let expenses = rows
            .map(|row| expense_from_row(row?))
            .collect::<Result<Vec<_>>>()?;
        Ok(expenses)
    }

    // ── Key-value ────────────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

fn expense_from_row((id, name, amount, date): (i64, String, f64, String)) -> Result<Expense> {
    let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
        .map_err(|e| DatabaseError::QueryFailed(format!("bad date '{date}' in expense {id}: {e}")))?;
    Ok(Expense {
        id,
        name,
        amount,
        date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn draft(name: &str, amount: &str, date: &str) -> ExpenseDraft {
        ExpenseDraft::parse(name, amount, Some(date)).unwrap()
    }

    #[test]
    fn record_and_query() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.record_session(SessionType::Work, 1500, now).unwrap();
        db.record_session(SessionType::Break, 300, now).unwrap();
        let stats = db.session_stats().unwrap();
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.work_sessions, 1);
        assert_eq!(stats.work_secs, 1500);
        assert_eq!(stats.break_secs, 300);
        assert_eq!(stats.today_work_sessions, 1);
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }

    #[test]
    fn expenses_are_listed_by_date() {
        let db = Database::open_memory().unwrap();
        db.add_expense(draft("Rent", "1200", "2024-06-01")).unwrap();
        db.add_expense(draft("Groceries", "250", "2024-05-15")).unwrap();
        let names: Vec<_> = db
            .list_expenses()
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["Groceries", "Rent"]);
    }

    #[test]
    fn update_and_delete_expense() {
        let db = Database::open_memory().unwrap();
        let e = db.add_expense(draft("Utilities", "80", "2024-06-05")).unwrap();
        db.update_expense(e.id, draft("Utilities", "95.5", "2024-06-05"))
            .unwrap();
        assert_eq!(db.get_expense(e.id).unwrap().amount, 95.5);

        db.delete_expense(e.id).unwrap();
        assert!(matches!(
            db.get_expense(e.id),
            Err(CoreError::Database(DatabaseError::NotFound { .. }))
        ));
        assert!(db.delete_expense(e.id).is_err());
    }

    #[test]
    fn update_missing_expense_fails() {
        let db = Database::open_memory().unwrap();
        assert!(db.update_expense(42, draft("Ghost", "1", "2024-01-01")).is_err());
    }
}
