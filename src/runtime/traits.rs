//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the engine with mock implementations.

use crate::db::{Database, DbError, Draft, Expense, UserDefaults};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Durable storage for defaults, drafts and expenses
///
/// Every operation touches a single record; there is no cross-record
/// transaction and no compare-and-swap, so concurrent writers to the same
/// key resolve as last-write-wins.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_user_defaults(&self, user_id: &str) -> Result<Option<UserDefaults>, StoreError>;

    async fn save_user_defaults(&self, defaults: &UserDefaults) -> Result<(), StoreError>;

    async fn get_draft(&self, user_id: &str) -> Result<Option<Draft>, StoreError>;

    async fn save_draft(&self, user_id: &str, draft: &Draft) -> Result<(), StoreError>;

    /// Removing an absent draft is not an error
    async fn delete_draft(&self, user_id: &str) -> Result<(), StoreError>;

    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>, StoreError>;

    async fn save_expense(&self, expense: &Expense) -> Result<(), StoreError>;
}

// ============================================================================
// Arc implementation for trait objects
// ============================================================================

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    async fn get_user_defaults(&self, user_id: &str) -> Result<Option<UserDefaults>, StoreError> {
        (**self).get_user_defaults(user_id).await
    }

    async fn save_user_defaults(&self, defaults: &UserDefaults) -> Result<(), StoreError> {
        (**self).save_user_defaults(defaults).await
    }

    async fn get_draft(&self, user_id: &str) -> Result<Option<Draft>, StoreError> {
        (**self).get_draft(user_id).await
    }

    async fn save_draft(&self, user_id: &str, draft: &Draft) -> Result<(), StoreError> {
        (**self).save_draft(user_id, draft).await
    }

    async fn delete_draft(&self, user_id: &str) -> Result<(), StoreError> {
        (**self).delete_draft(user_id).await
    }

    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>, StoreError> {
        (**self).get_expense(expense_id).await
    }

    async fn save_expense(&self, expense: &Expense) -> Result<(), StoreError> {
        (**self).save_expense(expense).await
    }
}

// ============================================================================
// Production Adapter
// ============================================================================

/// Adapter to use Database as a RecordStore
#[derive(Clone)]
pub struct DatabaseStore {
    db: Database,
}

impl DatabaseStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for DatabaseStore {
    async fn get_user_defaults(&self, user_id: &str) -> Result<Option<UserDefaults>, StoreError> {
        Ok(self.db.get_user_defaults(user_id)?)
    }

    async fn save_user_defaults(&self, defaults: &UserDefaults) -> Result<(), StoreError> {
        Ok(self.db.save_user_defaults(defaults)?)
    }

    async fn get_draft(&self, user_id: &str) -> Result<Option<Draft>, StoreError> {
        Ok(self.db.get_draft(user_id)?)
    }

    async fn save_draft(&self, user_id: &str, draft: &Draft) -> Result<(), StoreError> {
        Ok(self.db.save_draft(user_id, draft)?)
    }

    async fn delete_draft(&self, user_id: &str) -> Result<(), StoreError> {
        Ok(self.db.delete_draft(user_id)?)
    }

    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>, StoreError> {
        Ok(self.db.get_expense(expense_id)?)
    }

    async fn save_expense(&self, expense: &Expense) -> Result<(), StoreError> {
        Ok(self.db.save_expense(expense)?)
    }
}
