//! SeaORM entity definitions
//!
//! These are database-specific entities separate from the API schemas.
//! Relationship declarations live next to each model:
//!
//! - one-to-many / many-to-one: `has_many` + `belongs_to` (user → posts)
//! - one-to-one: `has_one` against a unique foreign key (user → profile)
//! - many-to-many: `Related::via` through an association entity
//!   (post ↔ category, user ↔ role)
//! - self-referential: `Linked` chains (comment → parent / replies)

pub mod category;
pub mod comment;
pub mod post;
pub mod post_category;
pub mod profile;
pub mod role;
pub mod user;
pub mod user_role;

pub use category::{Entity as CategoryEntity, Model as CategoryModel};
pub use comment::{Entity as CommentEntity, Model as CommentModel};
pub use post::{Entity as PostEntity, Model as PostModel};
pub use profile::{Entity as ProfileEntity, Model as ProfileModel};
pub use role::{Entity as RoleEntity, Model as RoleModel};
pub use user::{Entity as UserEntity, Model as UserModel};
