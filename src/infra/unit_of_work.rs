//! Unit of Work pattern implementation.
//!
//! A use case opens one transaction, performs every write through the
//! repositories bound to it, and either commits all of them or none.
//!
//! `transaction` runs a closure and commits on `Ok`, rolls back on `Err`.
//! `begin_with` hands out a [`TransactionContext`] for explicit
//! `commit` / `rollback`. A context dropped without commit (e.g. the
//! request was cancelled) is rolled back by SeaORM.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend,
    IsolationLevel, TransactionTrait,
};

use super::repositories::Repositories;
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Repositories bound to the connection pool, for reads outside a transaction.
    ///
    /// Do not use them while a transaction of the same task is open: the
    /// transaction may hold the only pooled connection.
    fn repos(&self) -> Repositories<'_, DatabaseConnection>;

    /// Start a transaction with the given isolation level.
    async fn begin_with(&self, isolation: IsolationLevel) -> AppResult<TransactionContext>;

    /// Execute a closure within a read-committed transaction.
    ///
    /// The transaction is committed when the closure returns `Ok` and rolled
    /// back when it returns `Err`. A failed commit is reported as the error.
    async fn transaction<F, Fut, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(TransactionContext) -> Fut + Send,
        Fut: Future<Output = AppResult<T>> + Send,
        T: Send,
    {
        let ctx = self.begin_with(IsolationLevel::ReadCommitted).await?;
        match f(ctx.clone()).await {
            Ok(value) => {
                ctx.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = ctx.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Open transaction shared by the repositories of one use case.
///
/// Clones refer to the same transaction. `commit` and `rollback` need the
/// last remaining handle.
#[derive(Clone)]
pub struct TransactionContext {
    txn: Arc<DatabaseTransaction>,
}

impl TransactionContext {
    fn new(txn: DatabaseTransaction) -> Self {
        Self { txn: Arc::new(txn) }
    }

    /// Repositories bound to this transaction
    pub fn repos(&self) -> Repositories<'_, DatabaseTransaction> {
        Repositories::new(self.txn.as_ref())
    }

    /// Statements are sent as they are issued, so pending writes are already
    /// visible to later reads of this transaction.
    pub async fn flush(&self) -> AppResult<()> {
        Ok(())
    }

    pub async fn commit(self) -> AppResult<()> {
        self.into_inner()?.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> AppResult<()> {
        self.into_inner()?.rollback().await?;
        Ok(())
    }

    fn into_inner(self) -> AppResult<DatabaseTransaction> {
        Arc::try_unwrap(self.txn)
            .map_err(|_| AppError::internal("Transaction is still in use"))
    }
}

/// Concrete implementation of UnitOfWork
#[derive(Clone)]
pub struct Persistence {
    db: DatabaseConnection,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn repos(&self) -> Repositories<'_, DatabaseConnection> {
        Repositories::new(&self.db)
    }

    async fn begin_with(&self, isolation: IsolationLevel) -> AppResult<TransactionContext> {
        // SQLite has a single isolation level and no per-transaction access mode
        let txn = if self.db.get_database_backend() == DbBackend::Sqlite {
            self.db.begin().await?
        } else {
            self.db
                .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
                .await?
        };

        Ok(TransactionContext::new(txn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewTag;
    use crate::infra::repositories::TagRepository;
    use crate::interactors::testing;

    fn tag(name: &str) -> NewTag {
        NewTag {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_flushed_writes_are_visible_inside_until_rollback() {
        let uow = testing::persistence().await;
        let tx = uow.begin_with(IsolationLevel::ReadCommitted).await.unwrap();

        tx.repos().tags().add(tag("cardio")).await.unwrap();
        tx.flush().await.unwrap();
        assert!(tx.repos().tags().get_by_name("cardio").await.unwrap().is_some());

        tx.rollback().await.unwrap();
        assert!(uow.repos().tags().get_by_name("cardio").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dropped_context_rolls_back() {
        let uow = testing::persistence().await;
        {
            let tx = uow.begin_with(IsolationLevel::ReadCommitted).await.unwrap();
            tx.repos().tags().add(tag("cardio")).await.unwrap();
        }

        assert!(uow.repos().tags().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transaction_commits_on_ok_only() {
        let uow = testing::persistence().await;

        uow.transaction(|tx| async move { tx.repos().tags().add(tag("kept")).await })
            .await
            .unwrap();
        let failed: AppResult<()> = uow
            .transaction(|tx| async move {
                tx.repos().tags().add(tag("dropped")).await?;
                Err(AppError::internal("later step failed"))
            })
            .await;

        assert!(failed.is_err());
        let names: Vec<String> = uow
            .repos()
            .tags()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["kept".to_string()]);
    }

    #[tokio::test]
    async fn test_commit_refuses_while_shared() {
        let uow = testing::persistence().await;
        let tx = uow.begin_with(IsolationLevel::ReadCommitted).await.unwrap();
        let held = tx.clone();

        assert!(matches!(tx.commit().await, Err(AppError::Internal(_))));
        held.rollback().await.unwrap();
    }
}
