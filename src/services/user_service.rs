//! User service - Handles user-related business logic.
//!
//! Single-user reads go through a Redis read-through cache keyed
//! `user:{id}`; every write drops the entry. The cache is best effort: a
//! Redis failure is logged and the request falls back to the database.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::CACHE_PREFIX_USER;
use crate::domain::{Password, RoleResponse, UserCreate, UserResponse, UserUpdate};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::cache::{get_json, set_json};
use crate::infra::repositories::entities::UserModel;
use crate::infra::repositories::{NewUser, UserChanges};
use crate::infra::{KeyValueCache, UnitOfWork};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a user; email and username must be unused
    async fn create_user(&self, payload: UserCreate) -> AppResult<UserResponse>;

    async fn list_users(&self, page: PaginationParams) -> AppResult<Vec<UserResponse>>;

    /// Active users, newest first
    async fn list_active_users(&self, page: PaginationParams) -> AppResult<Vec<UserResponse>>;

    async fn get_user(&self, id: i32) -> AppResult<UserResponse>;

    async fn get_user_by_email(&self, email: &str) -> AppResult<UserResponse>;

    async fn get_user_by_username(&self, username: &str) -> AppResult<UserResponse>;

    async fn update_user(&self, id: i32, payload: UserUpdate) -> AppResult<UserResponse>;

    async fn delete_user(&self, id: i32) -> AppResult<()>;

    /// Flip the `is_active` flag
    async fn set_active(&self, id: i32, active: bool) -> AppResult<UserResponse>;

    /// Roles granted to a user
    async fn user_roles(&self, id: i32) -> AppResult<Vec<RoleResponse>>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    cache: Arc<dyn KeyValueCache>,
    cache_ttl: u64,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>, cache: Arc<dyn KeyValueCache>, cache_ttl: u64) -> Self {
        Self {
            uow,
            cache,
            cache_ttl,
        }
    }

    fn cache_key(id: i32) -> String {
        format!("{}{}", CACHE_PREFIX_USER, id)
    }

    async fn cached(&self, id: i32) -> Option<UserResponse> {
        match get_json(self.cache.as_ref(), &Self::cache_key(id)).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(user_id = id, error = %e, "User cache read failed");
                None
            }
        }
    }

    async fn remember(&self, user: &UserResponse) {
        if let Err(e) = set_json(
            self.cache.as_ref(),
            &Self::cache_key(user.id),
            user,
            self.cache_ttl,
        )
        .await
        {
            tracing::warn!(user_id = user.id, error = %e, "User cache write failed");
        }
    }

    async fn forget(&self, id: i32) {
        if let Err(e) = self.cache.delete(&Self::cache_key(id)).await {
            tracing::warn!(user_id = id, error = %e, "User cache invalidation failed");
        }
    }

    async fn load(&self, id: i32) -> AppResult<UserModel> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User", id))
    }

    /// Conflict unless `email` is free or already owned by `owner`.
    async fn ensure_email_free(&self, email: &str, owner: Option<i32>) -> AppResult<()> {
        match self.uow.users().find_by_email(email).await? {
            Some(existing) if Some(existing.id) != owner => {
                Err(AppError::conflict("Email already registered"))
            }
            _ => Ok(()),
        }
    }

    async fn ensure_username_free(&self, username: &str, owner: Option<i32>) -> AppResult<()> {
        match self.uow.users().find_by_username(username).await? {
            Some(existing) if Some(existing.id) != owner => {
                Err(AppError::conflict("Username already taken"))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn create_user(&self, payload: UserCreate) -> AppResult<UserResponse> {
        self.ensure_email_free(&payload.email, None).await?;
        self.ensure_username_free(&payload.username, None).await?;

        let password = Password::new(&payload.password)?;
        let user = self
            .uow
            .users()
            .create(NewUser {
                email: payload.email,
                username: payload.username,
                hashed_password: password.into_string(),
                is_active: payload.is_active,
            })
            .await?;

        tracing::info!(user_id = user.id, "User created");
        Ok(UserResponse::from(user))
    }

    async fn list_users(&self, page: PaginationParams) -> AppResult<Vec<UserResponse>> {
        let users = self.uow.users().list(page).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn list_active_users(&self, page: PaginationParams) -> AppResult<Vec<UserResponse>> {
        let users = self.uow.users().list_active(page).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn get_user(&self, id: i32) -> AppResult<UserResponse> {
        if let Some(hit) = self.cached(id).await {
            tracing::debug!(user_id = id, "User cache hit");
            return Ok(hit);
        }

        let user = UserResponse::from(self.load(id).await?);
        self.remember(&user).await;
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<UserResponse> {
        self.uow
            .users()
            .find_by_email(email)
            .await?
            .map(UserResponse::from)
            .ok_or_not_found(format!("User with email {} not found", email))
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<UserResponse> {
        self.uow
            .users()
            .find_by_username(username)
            .await?
            .map(UserResponse::from)
            .ok_or_not_found(format!("User with username {} not found", username))
    }

    async fn update_user(&self, id: i32, payload: UserUpdate) -> AppResult<UserResponse> {
        let current = self.load(id).await?;

        if let Some(email) = payload.email.as_deref() {
            if email != current.email {
                self.ensure_email_free(email, Some(id)).await?;
            }
        }
        if let Some(username) = payload.username.as_deref() {
            if username != current.username {
                self.ensure_username_free(username, Some(id)).await?;
            }
        }

        let hashed_password = match payload.password.as_deref() {
            Some(plain) => Some(Password::new(plain)?.into_string()),
            None => None,
        };

        let user = self
            .uow
            .users()
            .update(
                id,
                UserChanges {
                    email: payload.email,
                    username: payload.username,
                    hashed_password,
                    is_active: payload.is_active,
                },
            )
            .await?;

        self.forget(id).await;
        Ok(UserResponse::from(user))
    }

    async fn delete_user(&self, id: i32) -> AppResult<()> {
        self.uow.users().delete(id).await?;
        self.forget(id).await;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn set_active(&self, id: i32, active: bool) -> AppResult<UserResponse> {
        let user = self
            .uow
            .users()
            .update(
                id,
                UserChanges {
                    is_active: Some(active),
                    ..Default::default()
                },
            )
            .await?;

        self.forget(id).await;
        Ok(UserResponse::from(user))
    }

    async fn user_roles(&self, id: i32) -> AppResult<Vec<RoleResponse>> {
        let user = self.load(id).await?;
        let roles = self.uow.roles().roles_of_user(&user).await?;
        Ok(roles.into_iter().map(RoleResponse::from).collect())
    }
}
