//! Service Container - Centralized service access.
//!
//! Handlers reach every use case through `ServiceContainer`, so the router
//! can be exercised with `MockServiceContainer` and no database.

use std::sync::Arc;

use super::{
    CategoryManager, CategoryService, CommentManager, CommentService, PostManager, PostService,
    ProfileManager, ProfileService, RelationshipShowcase, RoleManager, RoleService,
    ShowcaseManager, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::{KeyValueCache, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn users(&self) -> Arc<dyn UserService>;

    fn posts(&self) -> Arc<dyn PostService>;

    fn comments(&self) -> Arc<dyn CommentService>;

    fn categories(&self) -> Arc<dyn CategoryService>;

    fn profiles(&self) -> Arc<dyn ProfileService>;

    fn roles(&self) -> Arc<dyn RoleService>;

    /// Relationship-mapping demos
    fn showcase(&self) -> Arc<dyn RelationshipShowcase>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    user_service: Arc<dyn UserService>,
    post_service: Arc<dyn PostService>,
    comment_service: Arc<dyn CommentService>,
    category_service: Arc<dyn CategoryService>,
    profile_service: Arc<dyn ProfileService>,
    role_service: Arc<dyn RoleService>,
    showcase: Arc<dyn RelationshipShowcase>,
}

impl Services {
    /// Wire every service onto one shared unit of work
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        cache: Arc<dyn KeyValueCache>,
        config: &Config,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            user_service: Arc::new(UserManager::new(
                uow.clone(),
                cache.clone(),
                config.cache_ttl_seconds,
            )),
            post_service: Arc::new(PostManager::new(uow.clone())),
            comment_service: Arc::new(CommentManager::new(uow.clone())),
            category_service: Arc::new(CategoryManager::new(uow.clone())),
            profile_service: Arc::new(ProfileManager::new(uow.clone())),
            role_service: Arc::new(RoleManager::new(uow.clone())),
            showcase: Arc::new(ShowcaseManager::new(uow, cache)),
        }
    }
}

impl ServiceContainer for Services {
    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn posts(&self) -> Arc<dyn PostService> {
        self.post_service.clone()
    }

    fn comments(&self) -> Arc<dyn CommentService> {
        self.comment_service.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryService> {
        self.category_service.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileService> {
        self.profile_service.clone()
    }

    fn roles(&self) -> Arc<dyn RoleService> {
        self.role_service.clone()
    }

    fn showcase(&self) -> Arc<dyn RelationshipShowcase> {
        self.showcase.clone()
    }
}
