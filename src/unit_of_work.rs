//! Transaction boundary for repository operations.

use crate::cache::ReportCache;
use crate::repository::{RepoError, Repositories};
use futures::future::BoxFuture;
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::sync::Arc;

/// Executes repository operations inside a single store transaction.
///
/// Cache operations issued by the repositories are not part of the store
/// transaction; a stale cache entry is bounded by the write-invalidate
/// policy and corrected on the next read-after-miss.
pub struct UnitOfWork {
    db: DatabaseConnection,
    cache: Arc<dyn ReportCache>,
}

impl UnitOfWork {
    pub fn new(db: DatabaseConnection, cache: Arc<dyn ReportCache>) -> Self {
        Self { db, cache }
    }

    /// Connection backing this unit of work.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Run `op` against a repository bundle bound to a fresh transaction.
    /// Commits when `op` returns Ok, rolls back when it returns Err. The
    /// connection is released on every exit path.
    pub async fn perform<T, F>(&self, op: F) -> Result<T, RepoError>
    where
        F: for<'c> FnOnce(Repositories<'c>) -> BoxFuture<'c, Result<T, RepoError>>,
    {
        let txn = self.db.begin().await?;
        let result = op(Repositories::bind(&txn, Arc::clone(&self.cache))).await;
        match result {
            Ok(value) => {
                txn.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    log::error!("rollback failed after {}: {}", err, rollback_err);
                }
                Err(err)
            }
        }
    }
}
