//! Profile service - One profile per user.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{
    ProfileCreate, ProfileDetailResponse, ProfileListQuery, ProfileResponse, ProfileUpdate,
};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::entities::ProfileModel;
use crate::infra::repositories::{NewProfile, ProfileChanges};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Profile service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn create_profile(&self, payload: ProfileCreate) -> AppResult<ProfileResponse>;

    async fn list_profiles(
        &self,
        query: ProfileListQuery,
        page: PaginationParams,
    ) -> AppResult<Vec<ProfileResponse>>;

    /// Profile with its owner
    async fn get_profile(&self, id: i32) -> AppResult<ProfileDetailResponse>;

    async fn get_profile_by_user_id(&self, user_id: i32) -> AppResult<ProfileDetailResponse>;

    async fn get_profile_by_username(&self, username: &str)
        -> AppResult<ProfileDetailResponse>;

    async fn update_profile(&self, id: i32, payload: ProfileUpdate)
        -> AppResult<ProfileResponse>;

    async fn update_profile_by_user_id(
        &self,
        user_id: i32,
        payload: ProfileUpdate,
    ) -> AppResult<ProfileResponse>;

    async fn delete_profile(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of ProfileService using Unit of Work.
pub struct ProfileManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProfileManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn profile_for_user(&self, user_id: i32) -> AppResult<ProfileModel> {
        self.uow
            .profiles()
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile for user {} not found", user_id)))
    }
}

fn changes(payload: ProfileUpdate) -> ProfileChanges {
    ProfileChanges {
        bio: payload.bio,
        website: payload.website,
        location: payload.location,
        avatar_url: payload.avatar_url,
    }
}

#[async_trait]
impl<U: UnitOfWork> ProfileService for ProfileManager<U> {
    async fn create_profile(&self, payload: ProfileCreate) -> AppResult<ProfileResponse> {
        if !self.uow.users().exists(payload.user_id).await? {
            return Err(AppError::not_found("User", payload.user_id));
        }
        if self
            .uow
            .profiles()
            .find_by_user_id(payload.user_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("User already has a profile"));
        }

        let profile = self
            .uow
            .profiles()
            .create(NewProfile {
                user_id: payload.user_id,
                bio: payload.bio,
                website: payload.website,
                location: payload.location,
                avatar_url: payload.avatar_url,
            })
            .await?;

        tracing::info!(profile_id = profile.id, user_id = profile.user_id, "Profile created");
        Ok(ProfileResponse::from(profile))
    }

    async fn list_profiles(
        &self,
        query: ProfileListQuery,
        page: PaginationParams,
    ) -> AppResult<Vec<ProfileResponse>> {
        let profiles = self.uow.profiles().list(query.location, page).await?;
        Ok(profiles.into_iter().map(ProfileResponse::from).collect())
    }

    async fn get_profile(&self, id: i32) -> AppResult<ProfileDetailResponse> {
        let (profile, user) = self
            .uow
            .profiles()
            .find_with_user(id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile", id))?;
        Ok(ProfileDetailResponse::new(profile, user))
    }

    async fn get_profile_by_user_id(&self, user_id: i32) -> AppResult<ProfileDetailResponse> {
        let profile = self.profile_for_user(user_id).await?;
        let user = self.uow.users().find_by_id(user_id).await?;
        Ok(ProfileDetailResponse::new(profile, user))
    }

    async fn get_profile_by_username(
        &self,
        username: &str,
    ) -> AppResult<ProfileDetailResponse> {
        let (profile, user) = self
            .uow
            .profiles()
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile for user {} not found", username)))?;
        Ok(ProfileDetailResponse::new(profile, user))
    }

    async fn update_profile(
        &self,
        id: i32,
        payload: ProfileUpdate,
    ) -> AppResult<ProfileResponse> {
        let profile = self.uow.profiles().update(id, changes(payload)).await?;
        Ok(ProfileResponse::from(profile))
    }

    async fn update_profile_by_user_id(
        &self,
        user_id: i32,
        payload: ProfileUpdate,
    ) -> AppResult<ProfileResponse> {
        let current = self.profile_for_user(user_id).await?;
        let profile = self
            .uow
            .profiles()
            .update(current.id, changes(payload))
            .await?;
        Ok(ProfileResponse::from(profile))
    }

    async fn delete_profile(&self, id: i32) -> AppResult<()> {
        self.uow.profiles().delete(id).await
    }
}
