//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    QueryFilter, QueryOrder, Set,
};

use super::base::{DeleteRepository, ReadRepository};
use super::entities::post::{self, Entity as PostEntity, Model as PostModel};
use super::entities::user::{self, ActiveModel, Entity as UserEntity, Model as UserModel};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Data for a new user row. The password is already hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub hashed_password: String,
    pub is_active: bool,
}

impl NewUser {
    pub fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            email: Set(self.email),
            username: Set(self.username),
            hashed_password: Set(self.hashed_password),
            is_active: Set(self.is_active),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
    }
}

/// Column changes for an update; `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    pub hashed_password: Option<String>,
    pub is_active: Option<bool>,
}

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<UserModel>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserModel>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserModel>>;

    /// User with the lowest id
    async fn first(&self) -> AppResult<Option<UserModel>>;

    /// Page of users ordered by id
    async fn list(&self, page: PaginationParams) -> AppResult<Vec<UserModel>>;

    /// Page of active users, newest first
    async fn list_active(&self, page: PaginationParams) -> AppResult<Vec<UserModel>>;

    /// User joined with all of their posts (one-to-many eager load)
    async fn find_with_posts(&self, id: i32) -> AppResult<Option<(UserModel, Vec<PostModel>)>>;

    async fn create(&self, user: NewUser) -> AppResult<UserModel>;

    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<UserModel>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn exists(&self, id: i32) -> AppResult<bool>;
}

/// SeaORM-backed user repository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReadRepository<UserEntity> for UserStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl DeleteRepository<UserEntity> for UserStore {
    const LABEL: &'static str = "User";
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<UserModel>> {
        self.get_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserModel>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserModel>> {
        UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn first(&self) -> AppResult<Option<UserModel>> {
        UserEntity::find()
            .order_by_asc(user::Column::Id)
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn list(&self, page: PaginationParams) -> AppResult<Vec<UserModel>> {
        self.get_many(Condition::all(), Some((user::Column::Id, Order::Asc)), page)
            .await
    }

    async fn list_active(&self, page: PaginationParams) -> AppResult<Vec<UserModel>> {
        self.get_many(
            Condition::all().add(user::Column::IsActive.eq(true)),
            Some((user::Column::CreatedAt, Order::Desc)),
            page,
        )
        .await
    }

    async fn find_with_posts(&self, id: i32) -> AppResult<Option<(UserModel, Vec<PostModel>)>> {
        let mut rows = UserEntity::find_by_id(id)
            .find_with_related(PostEntity)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.pop())
    }

    async fn create(&self, user: NewUser) -> AppResult<UserModel> {
        user.into_active_model()
            .insert(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<UserModel> {
        let user = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User", id))?;

        let mut active: ActiveModel = user.into();

        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(hashed_password) = changes.hashed_password {
            active.hashed_password = Set(hashed_password);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Some(Utc::now()));

        active.update(&self.db).await.map_err(AppError::from)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.remove_by_id(id).await
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        self.exists_by_id(id).await
    }
}
