//! Test doubles shared by the service tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sea_orm::{DatabaseConnection, MockDatabase, Transaction, TransactionTrait};
use std::sync::{Arc, Mutex};

use crate::errors::{AppError, AppResult};
use crate::infra::repositories::entities::{
    CategoryModel, CommentModel, PostModel, ProfileModel, RoleModel, UserModel,
};
use crate::infra::repositories::{
    CategoryRepository, CommentRepository, MockCategoryRepository, MockCommentRepository,
    MockPostRepository, MockProfileRepository, MockRoleRepository, MockUserRepository,
    PostRepository, ProfileRepository, RoleRepository, UserRepository,
};
use crate::infra::{TransactionContext, TxFuture, UnitOfWork};

/// Unit of work built from repository mocks. Repositories that a test does
/// not configure are empty mocks and panic when called.
///
/// Transactions run against a SeaORM `MockDatabase` when one is attached and
/// are refused otherwise.
#[derive(Default)]
pub(crate) struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    posts: Arc<MockPostRepository>,
    comments: Arc<MockCommentRepository>,
    categories: Arc<MockCategoryRepository>,
    profiles: Arc<MockProfileRepository>,
    roles: Arc<MockRoleRepository>,
    database: Option<DatabaseConnection>,
    isolation: Mutex<Vec<&'static str>>,
}

impl TestUnitOfWork {
    pub(crate) fn with_database(mut self, db: MockDatabase) -> Self {
        self.database = Some(db.into_connection());
        self
    }

    /// Statements executed on the attached mock database so far.
    pub(crate) fn transaction_log(&self) -> Vec<Transaction> {
        self.database
            .clone()
            .map(|db| db.into_transaction_log())
            .unwrap_or_default()
    }

    /// Isolation level of every transaction started, in order.
    pub(crate) fn isolation_levels(&self) -> Vec<&'static str> {
        self.isolation.lock().unwrap().clone()
    }

    async fn run<F, T>(&self, isolation: &'static str, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let Some(db) = &self.database else {
            return Err(AppError::internal("Transactions not supported in test mock"));
        };
        self.isolation.lock().unwrap().push(isolation);

        let txn = db.begin().await?;
        let result = f(TransactionContext::new(&txn)).await?;
        txn.commit().await?;
        Ok(result)
    }
    pub(crate) fn with_users(mut self, repo: MockUserRepository) -> Self {
        self.users = Arc::new(repo);
        self
    }

    pub(crate) fn with_posts(mut self, repo: MockPostRepository) -> Self {
        self.posts = Arc::new(repo);
        self
    }

    pub(crate) fn with_comments(mut self, repo: MockCommentRepository) -> Self {
        self.comments = Arc::new(repo);
        self
    }

    pub(crate) fn with_categories(mut self, repo: MockCategoryRepository) -> Self {
        self.categories = Arc::new(repo);
        self
    }

    pub(crate) fn with_profiles(mut self, repo: MockProfileRepository) -> Self {
        self.profiles = Arc::new(repo);
        self
    }

    pub(crate) fn with_roles(mut self, repo: MockRoleRepository) -> Self {
        self.roles = Arc::new(repo);
        self
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn posts(&self) -> Arc<dyn PostRepository> {
        self.posts.clone()
    }

    fn comments(&self) -> Arc<dyn CommentRepository> {
        self.comments.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileRepository> {
        self.profiles.clone()
    }

    fn roles(&self) -> Arc<dyn RoleRepository> {
        self.roles.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.run("read_committed", f).await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.run("serializable", f).await
    }
}

pub(crate) fn user(id: i32, username: &str) -> UserModel {
    UserModel {
        id,
        email: format!("{}@example.com", username),
        username: username.to_string(),
        hashed_password: "hashed".to_string(),
        is_active: true,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        updated_at: None,
    }
}

pub(crate) fn post(id: i32, user_id: i32) -> PostModel {
    PostModel {
        id,
        title: format!("Post {}", id),
        content: format!("Content of post {}", id),
        user_id,
        is_published: false,
        created_at: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        updated_at: None,
    }
}

pub(crate) fn category(id: i32, name: &str) -> CategoryModel {
    CategoryModel {
        id,
        name: name.to_string(),
        description: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
        updated_at: None,
    }
}

pub(crate) fn comment(id: i32, post_id: i32, parent_id: Option<i32>) -> CommentModel {
    CommentModel {
        id,
        content: format!("Comment {}", id),
        user_id: 1,
        post_id,
        parent_id,
        created_at: Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, id as u32 % 60).unwrap(),
        updated_at: None,
    }
}

pub(crate) fn profile(id: i32, user_id: i32) -> ProfileModel {
    ProfileModel {
        id,
        user_id,
        bio: Some("Bio".to_string()),
        website: None,
        location: Some("Berlin".to_string()),
        avatar_url: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
        updated_at: None,
    }
}

pub(crate) fn role(id: i32, name: &str) -> RoleModel {
    RoleModel {
        id,
        name: name.to_string(),
        description: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).unwrap(),
        updated_at: None,
    }
}
