//! Unit of Work pattern implementation.
//!
//! The Unit of Work:
//! - hands out the shared repository for every aggregate
//! - runs closures inside a database transaction (begin, commit, rollback)
//!
//! Writes that must land together, like the relationship demo seed, go
//! through `transaction` and insert via `TransactionContext::insert`.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DatabaseTransaction,
    IntoActiveModel, IsolationLevel, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::repositories::{
    CategoryRepository, CategoryStore, CommentRepository, CommentStore, PostRepository, PostStore,
    ProfileRepository, ProfileStore, RoleRepository, RoleStore, UserRepository, UserStore,
};
use crate::errors::{AppError, AppResult};

/// Boxed future returned by transaction closures.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic transaction methods; tests
/// build a unit of work from repository mocks instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn posts(&self) -> Arc<dyn PostRepository>;

    fn comments(&self) -> Arc<dyn CommentRepository>;

    fn categories(&self) -> Arc<dyn CategoryRepository>;

    fn profiles(&self) -> Arc<dyn ProfileRepository>;

    fn roles(&self) -> Arc<dyn RoleRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Committed on success, rolled back on error. Uses ReadCommitted.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;

    /// Execute a closure within a serializable transaction.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Handle passed to transaction closures.
///
/// Everything written through it belongs to the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Raw transaction for ad-hoc queries
    pub fn connection(&self) -> &'a DatabaseTransaction {
        self.txn
    }

    /// Insert any active model and return the stored row.
    pub async fn insert<A>(&self, model: A) -> AppResult<<A::Entity as sea_orm::EntityTrait>::Model>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        <A::Entity as sea_orm::EntityTrait>::Model: IntoActiveModel<A>,
    {
        model.insert(self.txn).await.map_err(AppError::from)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    post_repo: Arc<PostStore>,
    comment_repo: Arc<CommentStore>,
    category_repo: Arc<CategoryStore>,
    profile_repo: Arc<ProfileStore>,
    role_repo: Arc<RoleStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            post_repo: Arc::new(PostStore::new(db.clone())),
            comment_repo: Arc::new(CommentStore::new(db.clone())),
            category_repo: Arc::new(CategoryStore::new(db.clone())),
            profile_repo: Arc::new(ProfileStore::new(db.clone())),
            role_repo: Arc::new(RoleStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn posts(&self) -> Arc<dyn PostRepository> {
        self.post_repo.clone()
    }

    fn comments(&self) -> Arc<dyn CommentRepository> {
        self.comment_repo.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.category_repo.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileRepository> {
        self.profile_repo.clone()
    }

    fn roles(&self) -> Arc<dyn RoleRepository> {
        self.role_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f).await
    }
}
