//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

mod category_service;
mod comment_service;
pub mod container;
mod post_service;
mod profile_service;
mod role_service;
mod showcase_service;
mod user_service;

#[cfg(test)]
mod testing;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use category_service::{CategoryManager, CategoryService};
pub use comment_service::{CommentManager, CommentService};
pub use post_service::{PostManager, PostService};
pub use profile_service::{ProfileManager, ProfileService};
pub use role_service::{RoleManager, RoleService};
pub use showcase_service::{RelationshipShowcase, ShowcaseManager};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use category_service::MockCategoryService;
#[cfg(any(test, feature = "test-utils"))]
pub use comment_service::MockCommentService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use post_service::MockPostService;
#[cfg(any(test, feature = "test-utils"))]
pub use profile_service::MockProfileService;
#[cfg(any(test, feature = "test-utils"))]
pub use role_service::MockRoleService;
#[cfg(any(test, feature = "test-utils"))]
pub use showcase_service::MockRelationshipShowcase;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
