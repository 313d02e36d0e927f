//! Profile repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait, Order,
    QueryFilter, Set,
};

use super::base::{DeleteRepository, ReadRepository};
use super::entities::profile::{self, ActiveModel, Entity as ProfileEntity, Model as ProfileModel};
use super::entities::user::{self, Entity as UserEntity, Model as UserModel};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProfile {
    pub user_id: i32,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
}

impl NewProfile {
    pub fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            user_id: Set(self.user_id),
            bio: Set(self.bio),
            website: Set(self.website),
            location: Set(self.location),
            avatar_url: Set(self.avatar_url),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub bio: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
}

/// Profile repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<ProfileModel>>;

    async fn find_by_user_id(&self, user_id: i32) -> AppResult<Option<ProfileModel>>;

    /// Profile joined with its owner (one-to-one eager load)
    async fn find_with_user(&self, id: i32) -> AppResult<Option<(ProfileModel, Option<UserModel>)>>;

    /// Profile whose owner has this username, with the owner
    async fn find_by_username(
        &self,
        username: &str,
    ) -> AppResult<Option<(ProfileModel, Option<UserModel>)>>;

    /// Profile of an already loaded user (lazy one-to-one load)
    async fn profile_of(&self, user: &UserModel) -> AppResult<Option<ProfileModel>>;

    /// Page ordered by id, optionally restricted to one location
    async fn list(
        &self,
        location: Option<String>,
        page: PaginationParams,
    ) -> AppResult<Vec<ProfileModel>>;

    async fn create(&self, profile: NewProfile) -> AppResult<ProfileModel>;

    async fn update(&self, id: i32, changes: ProfileChanges) -> AppResult<ProfileModel>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// SeaORM-backed profile repository
pub struct ProfileStore {
    db: DatabaseConnection,
}

impl ProfileStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReadRepository<ProfileEntity> for ProfileStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl DeleteRepository<ProfileEntity> for ProfileStore {
    const LABEL: &'static str = "Profile";
}

#[async_trait]
impl ProfileRepository for ProfileStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<ProfileModel>> {
        self.get_by_id(id).await
    }

    async fn find_by_user_id(&self, user_id: i32) -> AppResult<Option<ProfileModel>> {
        ProfileEntity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn find_with_user(&self, id: i32) -> AppResult<Option<(ProfileModel, Option<UserModel>)>> {
        ProfileEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> AppResult<Option<(ProfileModel, Option<UserModel>)>> {
        ProfileEntity::find()
            .find_also_related(UserEntity)
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn profile_of(&self, user: &UserModel) -> AppResult<Option<ProfileModel>> {
        user.find_related(ProfileEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn list(
        &self,
        location: Option<String>,
        page: PaginationParams,
    ) -> AppResult<Vec<ProfileModel>> {
        let mut filter = Condition::all();
        if let Some(location) = location {
            filter = filter.add(profile::Column::Location.eq(location));
        }

        self.get_many(filter, Some((profile::Column::Id, Order::Asc)), page)
            .await
    }

    async fn create(&self, profile: NewProfile) -> AppResult<ProfileModel> {
        profile
            .into_active_model()
            .insert(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, id: i32, changes: ProfileChanges) -> AppResult<ProfileModel> {
        let profile = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile", id))?;

        let mut active: ActiveModel = profile.into();

        if let Some(bio) = changes.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(website) = changes.website {
            active.website = Set(Some(website));
        }
        if let Some(location) = changes.location {
            active.location = Set(Some(location));
        }
        if let Some(avatar_url) = changes.avatar_url {
            active.avatar_url = Set(Some(avatar_url));
        }
        active.updated_at = Set(Some(Utc::now()));

        active.update(&self.db).await.map_err(AppError::from)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.remove_by_id(id).await
    }
}
