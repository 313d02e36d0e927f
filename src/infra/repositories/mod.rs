//! Repository layer - Data access abstraction
//!
//! One trait per aggregate so services can be tested against mocks; the
//! `*Store` types are the SeaORM implementations.

mod base;
mod category_repository;
mod comment_repository;
pub mod entities;
mod post_repository;
mod profile_repository;
mod role_repository;
mod user_repository;

pub use base::{DeleteRepository, ReadRepository};
pub use category_repository::{CategoryChanges, CategoryRepository, CategoryStore, NewCategory};
pub use comment_repository::{CommentFilter, CommentRepository, CommentStore, NewComment};
pub use post_repository::{
    like_pattern, NewPost, PostChanges, PostFilter, PostRepository, PostStore,
};
pub use profile_repository::{NewProfile, ProfileChanges, ProfileRepository, ProfileStore};
pub use role_repository::{NewRole, RoleChanges, RoleRepository, RoleStore};
pub use user_repository::{NewUser, UserChanges, UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use comment_repository::MockCommentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use post_repository::MockPostRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use profile_repository::MockProfileRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
