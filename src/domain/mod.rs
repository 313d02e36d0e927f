//! Domain layer - API schemas and value objects
//!
//! Request payloads validate themselves with `validator`; responses are
//! built from SeaORM models and documented with `utoipa`.

pub mod categories;
pub mod comments;
pub mod password;
pub mod posts;
pub mod profiles;
pub mod roles;
pub mod showcase;
pub mod users;

pub use categories::{
    CategoryCreate, CategoryDetailResponse, CategoryResponse, CategoryUpdate,
    CategoryWithPostCount, PostInCategory,
};
pub use comments::{
    CommentCreate, CommentDetailResponse, CommentListQuery, CommentResponse, CommentTreeNode,
    CommentUpdate, ReplyCreate, ReplyResponse,
};
pub use password::Password;
pub use posts::{
    CategoryInPost, PostCreate, PostDetailResponse, PostListQuery, PostResponse,
    PostSearchQuery, PostUpdate,
};
pub use profiles::{
    ProfileCreate, ProfileDetailResponse, ProfileListQuery, ProfileResponse, ProfileUpdate,
    UserInProfile,
};
pub use roles::{RoleCreate, RoleDetailResponse, RoleResponse, RoleUpdate, UserInRole};
pub use showcase::{
    CommentWithReplies, DemoPost, DemoProfile, DemoReply, DemoUser, ManyToManyDemo,
    ManyToOneDemo, OneToManyDemo, OneToOneDemo, PostWithAuthor, PostWithCategories,
    RelationshipKind, SelfReferentialDemo,
};
pub use users::{AuthorSummary, UserCreate, UserResponse, UserUpdate};
