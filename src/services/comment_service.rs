//! Comment service - Threaded comments on posts.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{
    AuthorSummary, CommentCreate, CommentDetailResponse, CommentListQuery, CommentResponse,
    CommentTreeNode, CommentUpdate, ReplyCreate,
};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::entities::CommentModel;
use crate::infra::repositories::{CommentFilter, NewComment};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Comment service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CommentService: Send + Sync {
    async fn create_comment(&self, payload: CommentCreate) -> AppResult<CommentResponse>;

    /// Newest first. Without any filter only top-level comments are listed.
    async fn list_comments(
        &self,
        query: CommentListQuery,
        page: PaginationParams,
    ) -> AppResult<Vec<CommentResponse>>;

    /// Comment with its author and direct replies
    async fn get_comment(&self, id: i32) -> AppResult<CommentDetailResponse>;

    async fn update_comment(&self, id: i32, payload: CommentUpdate) -> AppResult<CommentResponse>;

    /// Delete a comment; its replies go with it
    async fn delete_comment(&self, id: i32) -> AppResult<()>;

    /// Answer a comment on the same post
    async fn reply(&self, parent_id: i32, payload: ReplyCreate) -> AppResult<CommentResponse>;

    /// Comment with every nested reply
    async fn comment_tree(&self, id: i32) -> AppResult<CommentTreeNode>;
}

/// Concrete implementation of CommentService using Unit of Work.
pub struct CommentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CommentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn load(&self, id: i32) -> AppResult<CommentModel> {
        self.uow
            .comments()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment", id))
    }

    async fn ensure_user(&self, user_id: i32) -> AppResult<()> {
        if self.uow.users().exists(user_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("User", user_id))
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> CommentService for CommentManager<U> {
    async fn create_comment(&self, payload: CommentCreate) -> AppResult<CommentResponse> {
        self.ensure_user(payload.user_id).await?;
        if !self.uow.posts().exists(payload.post_id).await? {
            return Err(AppError::not_found("Post", payload.post_id));
        }

        if let Some(parent_id) = payload.parent_id {
            let parent = self
                .uow
                .comments()
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| AppError::not_found("Parent comment", parent_id))?;
            if parent.post_id != payload.post_id {
                return Err(AppError::validation(
                    "Parent comment belongs to a different post",
                ));
            }
        }

        let comment = self
            .uow
            .comments()
            .create(NewComment {
                content: payload.content,
                user_id: payload.user_id,
                post_id: payload.post_id,
                parent_id: payload.parent_id,
            })
            .await?;

        Ok(CommentResponse::from(comment))
    }

    async fn list_comments(
        &self,
        query: CommentListQuery,
        page: PaginationParams,
    ) -> AppResult<Vec<CommentResponse>> {
        let unfiltered =
            query.post_id.is_none() && query.user_id.is_none() && query.parent_id.is_none();
        let filter = CommentFilter {
            post_id: query.post_id,
            user_id: query.user_id,
            parent_id: query.parent_id,
            top_level_only: unfiltered,
        };

        let comments = self.uow.comments().list(filter, page).await?;
        Ok(comments.into_iter().map(CommentResponse::from).collect())
    }

    async fn get_comment(&self, id: i32) -> AppResult<CommentDetailResponse> {
        let comments = self.uow.comments();
        let (comment, author) = comments
            .find_with_author(id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment", id))?;
        let replies = comments.replies_to(&comment).await?;

        Ok(CommentDetailResponse::new(
            comment,
            author.map(AuthorSummary::from),
            replies,
        ))
    }

    async fn update_comment(&self, id: i32, payload: CommentUpdate) -> AppResult<CommentResponse> {
        let comment = match payload.content {
            Some(content) => self.uow.comments().update(id, content).await?,
            None => self.load(id).await?,
        };
        Ok(CommentResponse::from(comment))
    }

    async fn delete_comment(&self, id: i32) -> AppResult<()> {
        self.uow.comments().delete(id).await
    }

    async fn reply(&self, parent_id: i32, payload: ReplyCreate) -> AppResult<CommentResponse> {
        let parent = self
            .uow
            .comments()
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| AppError::not_found("Parent comment", parent_id))?;
        self.ensure_user(payload.user_id).await?;

        let reply = self
            .uow
            .comments()
            .create(NewComment {
                content: payload.content,
                user_id: payload.user_id,
                post_id: parent.post_id,
                parent_id: Some(parent.id),
            })
            .await?;

        Ok(CommentResponse::from(reply))
    }

    async fn comment_tree(&self, id: i32) -> AppResult<CommentTreeNode> {
        let root = self.load(id).await?;
        let descendants = self.uow.comments().descendants_of(id).await?;
        Ok(CommentTreeNode::build(root, &descendants))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::{
        MockCommentRepository, MockPostRepository, MockUserRepository,
    };
    use crate::services::testing::{comment, user, TestUnitOfWork};
    use mockall::predicate::eq;

    fn existing_user_and_post() -> (MockUserRepository, MockPostRepository) {
        let mut users = MockUserRepository::new();
        users.expect_exists().returning(|_| Ok(true));
        let mut posts = MockPostRepository::new();
        posts.expect_exists().returning(|_| Ok(true));
        (users, posts)
    }

    #[tokio::test]
    async fn test_create_comment_missing_post() {
        let mut users = MockUserRepository::new();
        users.expect_exists().returning(|_| Ok(true));
        let mut posts = MockPostRepository::new();
        posts.expect_exists().with(eq(9)).returning(|_| Ok(false));

        let uow = TestUnitOfWork::default().with_users(users).with_posts(posts);
        let payload = CommentCreate {
            content: "Hi".to_string(),
            user_id: 1,
            post_id: 9,
            parent_id: None,
        };
        let result = CommentManager::new(Arc::new(uow)).create_comment(payload).await;

        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Post with id 9 not found"));
    }

    #[tokio::test]
    async fn test_create_comment_parent_on_other_post() {
        let (users, posts) = existing_user_and_post();
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find_by_id()
            .with(eq(3))
            .returning(|id| Ok(Some(comment(id, 2, None))));
        comments.expect_create().never();

        let uow = TestUnitOfWork::default()
            .with_users(users)
            .with_posts(posts)
            .with_comments(comments);
        let payload = CommentCreate {
            content: "Hi".to_string(),
            user_id: 1,
            post_id: 1,
            parent_id: Some(3),
        };
        let result = CommentManager::new(Arc::new(uow)).create_comment(payload).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_comment_missing_parent() {
        let (users, posts) = existing_user_and_post();
        let mut comments = MockCommentRepository::new();
        comments.expect_find_by_id().returning(|_| Ok(None));

        let uow = TestUnitOfWork::default()
            .with_users(users)
            .with_posts(posts)
            .with_comments(comments);
        let payload = CommentCreate {
            content: "Hi".to_string(),
            user_id: 1,
            post_id: 1,
            parent_id: Some(3),
        };
        let result = CommentManager::new(Arc::new(uow)).create_comment(payload).await;

        assert!(
            matches!(result, Err(AppError::NotFound(msg)) if msg == "Parent comment with id 3 not found")
        );
    }

    #[tokio::test]
    async fn test_list_without_filters_is_top_level_only() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_list()
            .withf(|filter, _| filter.top_level_only && filter.post_id.is_none())
            .returning(|_, _| Ok(vec![comment(1, 1, None)]));

        let uow = TestUnitOfWork::default().with_comments(comments);
        let listed = CommentManager::new(Arc::new(uow))
            .list_comments(CommentListQuery::default(), PaginationParams::default())
            .await
            .unwrap();

        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_list_by_post_includes_replies() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_list()
            .withf(|filter, _| !filter.top_level_only && filter.post_id == Some(4))
            .returning(|_, _| Ok(vec![comment(1, 4, None), comment(2, 4, Some(1))]));

        let uow = TestUnitOfWork::default().with_comments(comments);
        let query = CommentListQuery {
            post_id: Some(4),
            ..Default::default()
        };
        let listed = CommentManager::new(Arc::new(uow))
            .list_comments(query, PaginationParams::default())
            .await
            .unwrap();

        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn test_reply_inherits_post() {
        let mut users = MockUserRepository::new();
        users.expect_exists().returning(|_| Ok(true));
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find_by_id()
            .returning(|id| Ok(Some(comment(id, 7, None))));
        comments
            .expect_create()
            .withf(|new| new.post_id == 7 && new.parent_id == Some(2))
            .returning(|new| Ok(comment(10, new.post_id, new.parent_id)));

        let uow = TestUnitOfWork::default()
            .with_users(users)
            .with_comments(comments);
        let payload = ReplyCreate {
            content: "Agreed".to_string(),
            user_id: 1,
        };
        let reply = CommentManager::new(Arc::new(uow))
            .reply(2, payload)
            .await
            .unwrap();

        assert_eq!(reply.post_id, 7);
        assert_eq!(reply.parent_id, Some(2));
    }

    #[tokio::test]
    async fn test_get_comment_with_replies() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find_with_author()
            .returning(|id| Ok(Some((comment(id, 1, None), Some(user(1, "alice"))))));
        comments
            .expect_replies_to()
            .withf(|parent| parent.id == 1)
            .returning(|_| Ok(vec![comment(2, 1, Some(1)), comment(3, 1, Some(1))]));

        let uow = TestUnitOfWork::default().with_comments(comments);
        let detail = CommentManager::new(Arc::new(uow))
            .get_comment(1)
            .await
            .unwrap();

        assert_eq!(detail.author.unwrap().username, "alice");
        assert_eq!(detail.replies.len(), 2);
    }

    #[tokio::test]
    async fn test_comment_tree() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find_by_id()
            .returning(|id| Ok(Some(comment(id, 1, None))));
        comments.expect_descendants_of().with(eq(1)).returning(|_| {
            Ok(vec![
                comment(2, 1, Some(1)),
                comment(3, 1, Some(2)),
                comment(4, 1, Some(1)),
            ])
        });

        let uow = TestUnitOfWork::default().with_comments(comments);
        let tree = CommentManager::new(Arc::new(uow))
            .comment_tree(1)
            .await
            .unwrap();

        assert_eq!(tree.replies.len(), 2);
        assert_eq!(tree.replies[0].replies[0].id, 3);
    }

    #[tokio::test]
    async fn test_update_without_content_returns_current() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find_by_id()
            .returning(|id| Ok(Some(comment(id, 1, None))));
        comments.expect_update().never();

        let uow = TestUnitOfWork::default().with_comments(comments);
        let unchanged = CommentManager::new(Arc::new(uow))
            .update_comment(5, CommentUpdate { content: None })
            .await
            .unwrap();

        assert_eq!(unchanged.id, 5);
    }
}
