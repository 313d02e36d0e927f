//! Comment repository implementation.
//!
//! Comments reference themselves through `parent_id`. Direct replies are
//! reached with the `RepliesLink` chain; whole threads are collected one
//! level at a time.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait, Order,
    QueryFilter, QueryOrder, Set,
};

use super::base::{DeleteRepository, ReadRepository};
use super::entities::comment::{
    self, ActiveModel, Entity as CommentEntity, Model as CommentModel, RepliesLink,
};
use super::entities::user::{Entity as UserEntity, Model as UserModel};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub content: String,
    pub user_id: i32,
    pub post_id: i32,
    pub parent_id: Option<i32>,
}

impl NewComment {
    pub fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            content: Set(self.content),
            user_id: Set(self.user_id),
            post_id: Set(self.post_id),
            parent_id: Set(self.parent_id),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
    }
}

/// Optional filters for comment listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentFilter {
    pub post_id: Option<i32>,
    pub user_id: Option<i32>,
    pub parent_id: Option<i32>,
    /// Restrict to comments without a parent
    pub top_level_only: bool,
}

impl CommentFilter {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(post_id) = self.post_id {
            condition = condition.add(comment::Column::PostId.eq(post_id));
        }
        if let Some(user_id) = self.user_id {
            condition = condition.add(comment::Column::UserId.eq(user_id));
        }
        if let Some(parent_id) = self.parent_id {
            condition = condition.add(comment::Column::ParentId.eq(parent_id));
        }
        if self.top_level_only {
            condition = condition.add(comment::Column::ParentId.is_null());
        }
        condition
    }
}

/// Comment repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<CommentModel>>;

    /// Filtered page, newest first
    async fn list(
        &self,
        filter: CommentFilter,
        page: PaginationParams,
    ) -> AppResult<Vec<CommentModel>>;

    /// Comment joined with its author
    async fn find_with_author(
        &self,
        id: i32,
    ) -> AppResult<Option<(CommentModel, Option<UserModel>)>>;

    /// Direct replies, oldest first
    async fn replies_to(&self, comment: &CommentModel) -> AppResult<Vec<CommentModel>>;

    /// Every reply below a comment, at any depth
    async fn descendants_of(&self, id: i32) -> AppResult<Vec<CommentModel>>;

    /// Top-level comments, each with its direct replies
    async fn top_level_with_replies(
        &self,
        post_id: Option<i32>,
    ) -> AppResult<Vec<(CommentModel, Vec<CommentModel>)>>;

    async fn count_for_post(&self, post_id: i32) -> AppResult<u64>;

    async fn create(&self, comment: NewComment) -> AppResult<CommentModel>;

    async fn update(&self, id: i32, content: String) -> AppResult<CommentModel>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// SeaORM-backed comment repository
pub struct CommentStore {
    db: DatabaseConnection,
}

impl CommentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReadRepository<CommentEntity> for CommentStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl DeleteRepository<CommentEntity> for CommentStore {
    const LABEL: &'static str = "Comment";
}

#[async_trait]
impl CommentRepository for CommentStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<CommentModel>> {
        self.get_by_id(id).await
    }

    async fn list(
        &self,
        filter: CommentFilter,
        page: PaginationParams,
    ) -> AppResult<Vec<CommentModel>> {
        self.get_many(
            filter.condition(),
            Some((comment::Column::CreatedAt, Order::Desc)),
            page,
        )
        .await
    }

    async fn find_with_author(
        &self,
        id: i32,
    ) -> AppResult<Option<(CommentModel, Option<UserModel>)>> {
        CommentEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn replies_to(&self, comment: &CommentModel) -> AppResult<Vec<CommentModel>> {
        let mut replies = comment
            .find_linked(RepliesLink)
            .all(&self.db)
            .await?;

        replies.sort_by_key(|r| (r.created_at, r.id));
        Ok(replies)
    }

    async fn descendants_of(&self, id: i32) -> AppResult<Vec<CommentModel>> {
        let mut descendants = Vec::new();
        let mut frontier = vec![id];

        while !frontier.is_empty() {
            let level = CommentEntity::find()
                .filter(comment::Column::ParentId.is_in(frontier))
                .order_by_asc(comment::Column::Id)
                .all(&self.db)
                .await?;

            frontier = level.iter().map(|c| c.id).collect();
            descendants.extend(level);
        }

        Ok(descendants)
    }

    async fn top_level_with_replies(
        &self,
        post_id: Option<i32>,
    ) -> AppResult<Vec<(CommentModel, Vec<CommentModel>)>> {
        let filter = CommentFilter {
            post_id,
            top_level_only: true,
            ..Default::default()
        };

        CommentEntity::find()
            .filter(filter.condition())
            .find_with_linked(RepliesLink)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn count_for_post(&self, post_id: i32) -> AppResult<u64> {
        self.count_where(Condition::all().add(comment::Column::PostId.eq(post_id)))
            .await
    }

    async fn create(&self, comment: NewComment) -> AppResult<CommentModel> {
        comment
            .into_active_model()
            .insert(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, id: i32, content: String) -> AppResult<CommentModel> {
        let comment = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment", id))?;

        let mut active: ActiveModel = comment.into();
        active.content = Set(content);
        active.updated_at = Set(Some(Utc::now()));

        active.update(&self.db).await.map_err(AppError::from)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.remove_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::entities::comment::ParentLink;
    use sea_orm::{DbBackend, QueryTrait};

    fn where_clause(filter: CommentFilter) -> String {
        CommentEntity::find()
            .filter(filter.condition())
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_filter_top_level_only() {
        let sql = where_clause(CommentFilter {
            top_level_only: true,
            ..Default::default()
        });
        assert!(sql.contains(r#""comments"."parent_id" IS NULL"#));
    }

    #[test]
    fn test_filter_combines_fields() {
        let sql = where_clause(CommentFilter {
            post_id: Some(3),
            user_id: Some(7),
            ..Default::default()
        });
        assert!(sql.contains(r#""comments"."post_id" = 3"#));
        assert!(sql.contains(r#""comments"."user_id" = 7"#));
        assert!(!sql.contains("IS NULL"));
    }

    #[test]
    fn test_parent_and_replies_links_join_opposite_columns() {
        let parent = CommentEntity::find()
            .find_also_linked(ParentLink)
            .build(DbBackend::Postgres)
            .to_string();
        let replies = CommentEntity::find()
            .find_also_linked(RepliesLink)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(parent.contains(r#"LEFT JOIN "comments" AS "r0""#));
        assert!(parent.contains(r#""comments"."parent_id" = "r0"."id""#));
        assert!(replies.contains(r#"LEFT JOIN "comments" AS "r0""#));
        assert!(replies.contains(r#""comments"."id" = "r0"."parent_id""#));
    }
}
