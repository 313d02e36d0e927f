//! Role repository implementation.
//!
//! Users and roles meet through `user_roles`; both directions are loaded
//! lazily with `find_related`, which SeaORM routes through the `via` relation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait, Order,
    QueryFilter, QueryOrder, Set,
};

use super::base::{DeleteRepository, ReadRepository};
use super::entities::role::{self, ActiveModel, Entity as RoleEntity, Model as RoleModel};
use super::entities::user::{self, Entity as UserEntity, Model as UserModel};
use super::entities::user_role::{self, Entity as UserRoleEntity};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, PartialEq)]
pub struct NewRole {
    pub name: String,
    pub description: Option<String>,
}

impl NewRole {
    pub fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            name: Set(self.name),
            description: Set(self.description),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Role repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<RoleModel>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<RoleModel>>;

    /// Page ordered by name
    async fn list(&self, page: PaginationParams) -> AppResult<Vec<RoleModel>>;

    async fn create(&self, role: NewRole) -> AppResult<RoleModel>;

    async fn update(&self, id: i32, changes: RoleChanges) -> AppResult<RoleModel>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Users holding a role, by username
    async fn users_with_role(&self, role: &RoleModel) -> AppResult<Vec<UserModel>>;

    /// Roles held by a user, by name
    async fn roles_of_user(&self, user: &UserModel) -> AppResult<Vec<RoleModel>>;

    /// Grant a role; `false` when the user already had it
    async fn assign(&self, user_id: i32, role_id: i32) -> AppResult<bool>;

    /// Revoke a role; `false` when the user did not have it
    async fn revoke(&self, user_id: i32, role_id: i32) -> AppResult<bool>;
}

/// SeaORM-backed role repository
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReadRepository<RoleEntity> for RoleStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl DeleteRepository<RoleEntity> for RoleStore {
    const LABEL: &'static str = "Role";
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<RoleModel>> {
        self.get_by_id(id).await
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<RoleModel>> {
        RoleEntity::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn list(&self, page: PaginationParams) -> AppResult<Vec<RoleModel>> {
        self.get_many(Condition::all(), Some((role::Column::Name, Order::Asc)), page)
            .await
    }

    async fn create(&self, role: NewRole) -> AppResult<RoleModel> {
        role.into_active_model()
            .insert(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, id: i32, changes: RoleChanges) -> AppResult<RoleModel> {
        let role = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Role", id))?;

        let mut active: ActiveModel = role.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        active.updated_at = Set(Some(Utc::now()));

        active.update(&self.db).await.map_err(AppError::from)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.remove_by_id(id).await
    }

    async fn users_with_role(&self, role: &RoleModel) -> AppResult<Vec<UserModel>> {
        role.find_related(UserEntity)
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn roles_of_user(&self, user: &UserModel) -> AppResult<Vec<RoleModel>> {
        user.find_related(RoleEntity)
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn assign(&self, user_id: i32, role_id: i32) -> AppResult<bool> {
        let link = user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
            created_at: Set(Utc::now()),
        };

        let inserted = UserRoleEntity::insert(link)
            .on_conflict(
                OnConflict::columns([user_role::Column::UserId, user_role::Column::RoleId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(inserted > 0)
    }

    async fn revoke(&self, user_id: i32, role_id: i32) -> AppResult<bool> {
        let result = UserRoleEntity::delete_by_id((user_id, role_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
