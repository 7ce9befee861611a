//! Database module for the expense bot
//!
//! Durable key-value persistence for user defaults, drafts and expenses.
//! Each record is serialized independently; there is no cross-record
//! transaction and no version check, so concurrent writers race with
//! last-write-wins.

mod schema;

pub use schema::*;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to encode record {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
    #[error("Failed to decode record {key}: {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },
    #[error("Database connection poisoned")]
    Poisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> DbResult<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    fn conn(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }

    // ==================== Raw Key Operations ====================

    /// `None` when the key was never written or has been deleted.
    fn get_raw(&self, key: &str) -> DbResult<Option<Vec<u8>>> {
        let conn = self.conn()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, Vec<u8>>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set_raw(&self, key: &str, value: &[u8]) -> DbResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn delete_raw(&self, key: &str) -> DbResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        let Some(bytes) = self.get_raw(key)? else {
            return Ok(None);
        };
        // Stored-but-empty content is a corrupt record, not an absent one
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| DbError::Decode {
                key: key.to_string(),
                source,
            })
    }

    fn set_json<T: Serialize>(&self, key: &str, record: &T) -> DbResult<()> {
        let bytes = serde_json::to_vec(record).map_err(|source| DbError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set_raw(key, &bytes)
    }

    // ==================== User Defaults ====================

    pub fn get_user_defaults(&self, user_id: &str) -> DbResult<Option<UserDefaults>> {
        self.get_json(&user_key(user_id))
    }

    pub fn save_user_defaults(&self, defaults: &UserDefaults) -> DbResult<()> {
        self.set_json(&user_key(&defaults.user_id), defaults)
    }

    // ==================== Drafts ====================

    pub fn get_draft(&self, user_id: &str) -> DbResult<Option<Draft>> {
        self.get_json(&draft_key(user_id))
    }

    pub fn save_draft(&self, user_id: &str, draft: &Draft) -> DbResult<()> {
        self.set_json(&draft_key(user_id), draft)
    }

    pub fn delete_draft(&self, user_id: &str) -> DbResult<()> {
        self.delete_raw(&draft_key(user_id))
    }

    // ==================== Expenses ====================

    pub fn get_expense(&self, expense_id: &str) -> DbResult<Option<Expense>> {
        self.get_json(&expense_key(expense_id))
    }

    pub fn save_expense(&self, expense: &Expense) -> DbResult<()> {
        self.set_json(&expense_key(&expense.id), expense)
    }
}
