//! Role service - Roles and user/role membership.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{RoleCreate, RoleDetailResponse, RoleResponse, RoleUpdate};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::entities::RoleModel;
use crate::infra::repositories::{NewRole, RoleChanges};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const DUPLICATE_NAME: &str = "Role with this name already exists";

/// Role service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleService: Send + Sync {
    async fn create_role(&self, payload: RoleCreate) -> AppResult<RoleResponse>;

    async fn list_roles(&self, page: PaginationParams) -> AppResult<Vec<RoleResponse>>;

    /// Role with every user holding it
    async fn get_role(&self, id: i32) -> AppResult<RoleDetailResponse>;

    async fn update_role(&self, id: i32, payload: RoleUpdate) -> AppResult<RoleResponse>;

    async fn delete_role(&self, id: i32) -> AppResult<()>;

    /// Grant a role; granting twice is a no-op
    async fn assign_role(&self, role_id: i32, user_id: i32) -> AppResult<RoleDetailResponse>;

    /// Revoke a role; revoking a role the user lacks is a no-op
    async fn remove_role(&self, role_id: i32, user_id: i32) -> AppResult<RoleDetailResponse>;
}

/// Concrete implementation of RoleService using Unit of Work.
pub struct RoleManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RoleManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn load(&self, id: i32) -> AppResult<RoleModel> {
        self.uow
            .roles()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Role", id))
    }

    async fn ensure_name_free(&self, name: &str, except: Option<i32>) -> AppResult<()> {
        match self.uow.roles().find_by_name(name).await? {
            Some(existing) if Some(existing.id) != except => Err(AppError::conflict(DUPLICATE_NAME)),
            _ => Ok(()),
        }
    }

    async fn detail(&self, role: RoleModel) -> AppResult<RoleDetailResponse> {
        let users = self.uow.roles().users_with_role(&role).await?;
        Ok(RoleDetailResponse::new(role, users))
    }

    async fn membership_pair(&self, role_id: i32, user_id: i32) -> AppResult<RoleModel> {
        let role = self.load(role_id).await?;
        if !self.uow.users().exists(user_id).await? {
            return Err(AppError::not_found("User", user_id));
        }
        Ok(role)
    }
}

#[async_trait]
impl<U: UnitOfWork> RoleService for RoleManager<U> {
    async fn create_role(&self, payload: RoleCreate) -> AppResult<RoleResponse> {
        self.ensure_name_free(&payload.name, None).await?;

        let role = self
            .uow
            .roles()
            .create(NewRole {
                name: payload.name,
                description: payload.description,
            })
            .await?;

        tracing::info!(role_id = role.id, name = %role.name, "Role created");
        Ok(RoleResponse::from(role))
    }

    async fn list_roles(&self, page: PaginationParams) -> AppResult<Vec<RoleResponse>> {
        let roles = self.uow.roles().list(page).await?;
        Ok(roles.into_iter().map(RoleResponse::from).collect())
    }

    async fn get_role(&self, id: i32) -> AppResult<RoleDetailResponse> {
        let role = self.load(id).await?;
        self.detail(role).await
    }

    async fn update_role(&self, id: i32, payload: RoleUpdate) -> AppResult<RoleResponse> {
        if let Some(name) = payload.name.as_deref() {
            self.ensure_name_free(name, Some(id)).await?;
        }

        let role = self
            .uow
            .roles()
            .update(
                id,
                RoleChanges {
                    name: payload.name,
                    description: payload.description,
                },
            )
            .await?;

        Ok(RoleResponse::from(role))
    }

    async fn delete_role(&self, id: i32) -> AppResult<()> {
        self.uow.roles().delete(id).await
    }

    async fn assign_role(&self, role_id: i32, user_id: i32) -> AppResult<RoleDetailResponse> {
        let role = self.membership_pair(role_id, user_id).await?;

        if self.uow.roles().assign(user_id, role_id).await? {
            tracing::info!(role_id, user_id, "Role assigned");
        }

        self.detail(role).await
    }

    async fn remove_role(&self, role_id: i32, user_id: i32) -> AppResult<RoleDetailResponse> {
        let role = self.membership_pair(role_id, user_id).await?;

        if self.uow.roles().revoke(user_id, role_id).await? {
            tracing::info!(role_id, user_id, "Role revoked");
        }

        self.detail(role).await
    }
}
