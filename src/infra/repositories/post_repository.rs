//! Post repository implementation.
//!
//! Besides plain CRUD this store shows the two batched loaders: authors are
//! resolved with `load_one` and categories with `load_many_to_many`, one
//! extra query per relation regardless of how many posts are on the page.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType,
    LoaderTrait, Order, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use super::base::{DeleteRepository, ReadRepository};
use super::entities::category::{self, Entity as CategoryEntity, Model as CategoryModel};
use super::entities::post::{self, ActiveModel, Entity as PostEntity, Model as PostModel};
use super::entities::post_category::{self, Entity as PostCategoryEntity};
use super::entities::user::{Entity as UserEntity, Model as UserModel};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub user_id: i32,
    pub is_published: bool,
}

impl NewPost {
    pub fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            title: Set(self.title),
            content: Set(self.content),
            user_id: Set(self.user_id),
            is_published: Set(self.is_published),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_published: Option<bool>,
}

/// Optional filters for post listings. Every set field narrows the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub user_id: Option<i32>,
    pub category_id: Option<i32>,
    pub published: Option<bool>,
}

/// Post repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<PostModel>>;

    /// Filtered page, newest first
    async fn list(&self, filter: PostFilter, page: PaginationParams) -> AppResult<Vec<PostModel>>;

    /// The `limit` posts with the lowest ids
    async fn oldest(&self, limit: u64) -> AppResult<Vec<PostModel>>;

    /// Case-insensitive match on title or content
    async fn search(&self, term: &str, page: PaginationParams) -> AppResult<Vec<PostModel>>;

    /// Post joined with its author (many-to-one eager load)
    async fn find_with_author(&self, id: i32) -> AppResult<Option<(PostModel, Option<UserModel>)>>;

    /// Authors for a batch of posts, index-aligned with the input
    async fn authors_for(&self, posts: &[PostModel]) -> AppResult<Vec<Option<UserModel>>>;

    /// Categories of a single post, by name
    async fn categories_of(&self, post_id: i32) -> AppResult<Vec<CategoryModel>>;

    /// Categories for a batch of posts, index-aligned with the input
    async fn categories_for(&self, posts: &[PostModel]) -> AppResult<Vec<Vec<CategoryModel>>>;

    async fn create(&self, post: NewPost) -> AppResult<PostModel>;

    async fn update(&self, id: i32, changes: PostChanges) -> AppResult<PostModel>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn exists(&self, id: i32) -> AppResult<bool>;

    /// Link a category; `false` when the link already existed
    async fn add_category(&self, post_id: i32, category_id: i32) -> AppResult<bool>;

    /// Unlink a category; `false` when there was no link
    async fn remove_category(&self, post_id: i32, category_id: i32) -> AppResult<bool>;
}

/// SeaORM-backed post repository
pub struct PostStore {
    db: DatabaseConnection,
}

impl PostStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReadRepository<PostEntity> for PostStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl DeleteRepository<PostEntity> for PostStore {
    const LABEL: &'static str = "Post";
}

/// Lower-cased `%term%` pattern with LIKE wildcards escaped.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.trim().to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl PostRepository for PostStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<PostModel>> {
        self.get_by_id(id).await
    }

    async fn list(&self, filter: PostFilter, page: PaginationParams) -> AppResult<Vec<PostModel>> {
        let mut query = PostEntity::find();

        if let Some(user_id) = filter.user_id {
            query = query.filter(post::Column::UserId.eq(user_id));
        }
        if let Some(published) = filter.published {
            query = query.filter(post::Column::IsPublished.eq(published));
        }
        if let Some(category_id) = filter.category_id {
            query = query
                .join(JoinType::InnerJoin, post::Relation::PostCategories.def())
                .filter(post_category::Column::CategoryId.eq(category_id));
        }

        query
            .order_by(post::Column::CreatedAt, Order::Desc)
            .order_by(post::Column::Id, Order::Desc)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn oldest(&self, limit: u64) -> AppResult<Vec<PostModel>> {
        PostEntity::find()
            .order_by_asc(post::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn search(&self, term: &str, page: PaginationParams) -> AppResult<Vec<PostModel>> {
        let pattern = like_pattern(term);
        let lower_like = |column: post::Column| {
            Expr::expr(Func::lower(Expr::col((post::Entity, column))))
                .like(LikeExpr::new(pattern.clone()).escape('\\'))
        };

        self.get_many(
            Condition::any()
                .add(lower_like(post::Column::Title))
                .add(lower_like(post::Column::Content)),
            Some((post::Column::CreatedAt, Order::Desc)),
            page,
        )
        .await
    }

    async fn find_with_author(&self, id: i32) -> AppResult<Option<(PostModel, Option<UserModel>)>> {
        PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn authors_for(&self, posts: &[PostModel]) -> AppResult<Vec<Option<UserModel>>> {
        posts
            .load_one(UserEntity, &self.db)
            .await
            .map_err(AppError::from)
    }

    async fn categories_of(&self, post_id: i32) -> AppResult<Vec<CategoryModel>> {
        CategoryEntity::find()
            .join(JoinType::InnerJoin, category::Relation::PostCategories.def())
            .filter(post_category::Column::PostId.eq(post_id))
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn categories_for(&self, posts: &[PostModel]) -> AppResult<Vec<Vec<CategoryModel>>> {
        posts
            .load_many_to_many(CategoryEntity, PostCategoryEntity, &self.db)
            .await
            .map_err(AppError::from)
    }

    async fn create(&self, post: NewPost) -> AppResult<PostModel> {
        post.into_active_model()
            .insert(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, id: i32, changes: PostChanges) -> AppResult<PostModel> {
        let post = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Post", id))?;

        let mut active: ActiveModel = post.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(is_published) = changes.is_published {
            active.is_published = Set(is_published);
        }
        active.updated_at = Set(Some(Utc::now()));

        active.update(&self.db).await.map_err(AppError::from)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.remove_by_id(id).await
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        self.exists_by_id(id).await
    }

    async fn add_category(&self, post_id: i32, category_id: i32) -> AppResult<bool> {
        let link = post_category::ActiveModel {
            post_id: Set(post_id),
            category_id: Set(category_id),
            created_at: Set(Utc::now()),
        };

        let inserted = PostCategoryEntity::insert(link)
            .on_conflict(
                OnConflict::columns([
                    post_category::Column::PostId,
                    post_category::Column::CategoryId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(inserted > 0)
    }

    async fn remove_category(&self, post_id: i32, category_id: i32) -> AppResult<bool> {
        let result = PostCategoryEntity::delete_by_id((post_id, category_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
