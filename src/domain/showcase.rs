//! Payloads returned by the relationship showcase endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::categories::CategoryWithPostCount;
use super::posts::CategoryInPost;
use super::users::AuthorSummary;
use crate::infra::repositories::entities::{CommentModel, PostModel, ProfileModel, UserModel};

/// Which mapping pattern a payload demonstrates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    OneToMany,
    ManyToOne,
    OneToOne,
    ManyToMany,
    SelfReferential,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DemoUser {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<UserModel> for DemoUser {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DemoPost {
    pub id: i32,
    pub title: String,
    pub content: String,
}

impl From<PostModel> for DemoPost {
    fn from(model: PostModel) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
        }
    }
}

/// A user and every post they wrote
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OneToManyDemo {
    pub user: DemoUser,
    pub posts: Vec<DemoPost>,
    pub relationship_type: RelationshipKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PostWithAuthor {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub author: Option<AuthorSummary>,
}

impl PostWithAuthor {
    pub fn new(post: PostModel, author: Option<UserModel>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            author: author.map(AuthorSummary::from),
        }
    }
}

/// Posts, each resolved back to its author
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ManyToOneDemo {
    pub posts: Vec<PostWithAuthor>,
    pub relationship_type: RelationshipKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DemoProfile {
    pub id: i32,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
}

impl From<ProfileModel> for DemoProfile {
    fn from(model: ProfileModel) -> Self {
        Self {
            id: model.id,
            bio: model.bio,
            website: model.website,
            location: model.location,
        }
    }
}

/// A user and their single profile
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OneToOneDemo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<DemoUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<DemoProfile>,
    pub relationship_type: RelationshipKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PostWithCategories {
    pub id: i32,
    pub title: String,
    pub categories: Vec<CategoryInPost>,
}

/// Posts with categories, and categories with post counts
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ManyToManyDemo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub posts: Vec<PostWithCategories>,
    pub categories: Vec<CategoryWithPostCount>,
    pub relationship_type: RelationshipKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DemoReply {
    pub id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CommentWithReplies {
    pub id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub replies: Vec<DemoReply>,
}

impl CommentWithReplies {
    pub fn new(comment: CommentModel, replies: Vec<CommentModel>) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            created_at: comment.created_at,
            replies: replies
                .into_iter()
                .map(|r| DemoReply {
                    id: r.id,
                    content: r.content,
                    created_at: r.created_at,
                })
                .collect(),
        }
    }
}

/// Top-level comments on a post with their replies
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SelfReferentialDemo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub comments: Vec<CommentWithReplies>,
    pub relationship_type: RelationshipKind,
}
