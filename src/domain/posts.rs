//! Post schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::users::AuthorSummary;
use crate::infra::repositories::entities::{CategoryModel, PostModel};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PostCreate {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    #[schema(example = "Hello, world")]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[schema(example = 1)]
    pub user_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct PostUpdate {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: Option<String>,
}

/// Category reference embedded in a post
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryInPost {
    pub id: i32,
    pub name: String,
}

impl From<CategoryModel> for CategoryInPost {
    fn from(model: CategoryModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub user_id: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub categories: Vec<CategoryInPost>,
}

impl PostResponse {
    pub fn new(model: PostModel, categories: Vec<CategoryModel>) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            user_id: model.user_id,
            is_published: model.is_published,
            created_at: model.created_at,
            updated_at: model.updated_at,
            categories: categories.into_iter().map(CategoryInPost::from).collect(),
        }
    }
}

/// Post with its author and categories
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PostDetailResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub user_id: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author: Option<AuthorSummary>,
    pub categories: Vec<CategoryInPost>,
}

impl PostDetailResponse {
    pub fn new(
        model: PostModel,
        author: Option<AuthorSummary>,
        categories: Vec<CategoryModel>,
    ) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            user_id: model.user_id,
            is_published: model.is_published,
            created_at: model.created_at,
            updated_at: model.updated_at,
            author,
            categories: categories.into_iter().map(CategoryInPost::from).collect(),
        }
    }
}

/// Filters for `GET /posts`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostListQuery {
    /// Only posts written by this user
    pub user_id: Option<i32>,
    /// Only posts tagged with this category
    pub category_id: Option<i32>,
}

/// `GET /posts/search`
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostSearchQuery {
    /// Case-insensitive match against title and content
    pub q: String,
}
