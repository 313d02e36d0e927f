//! Post service - Posts, publishing and post/category links.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{DEFAULT_RECENT_POSTS, MAX_PAGE_SIZE};
use crate::domain::{
    AuthorSummary, PostCreate, PostDetailResponse, PostListQuery, PostResponse, PostUpdate,
};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::entities::PostModel;
use crate::infra::repositories::{NewPost, PostChanges, PostFilter};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Post service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PostService: Send + Sync {
    /// Create an unpublished post for an existing user
    async fn create_post(&self, payload: PostCreate) -> AppResult<PostResponse>;

    /// Newest first, optionally narrowed by author and/or category
    async fn list_posts(
        &self,
        query: PostListQuery,
        page: PaginationParams,
    ) -> AppResult<Vec<PostResponse>>;

    async fn published_posts(&self, page: PaginationParams) -> AppResult<Vec<PostResponse>>;

    /// Latest published posts; `None` means the default count
    async fn recent_posts(&self, limit: Option<u64>) -> AppResult<Vec<PostResponse>>;

    async fn search_posts(&self, term: &str, page: PaginationParams)
        -> AppResult<Vec<PostResponse>>;

    /// Post with author and categories
    async fn get_post(&self, id: i32) -> AppResult<PostDetailResponse>;

    async fn update_post(&self, id: i32, payload: PostUpdate) -> AppResult<PostResponse>;

    async fn delete_post(&self, id: i32) -> AppResult<()>;

    async fn set_published(&self, id: i32, published: bool) -> AppResult<PostResponse>;

    /// Tag a post; tagging twice is a no-op
    async fn add_category(&self, post_id: i32, category_id: i32) -> AppResult<PostResponse>;

    /// Untag a post; untagging a missing link is a no-op
    async fn remove_category(&self, post_id: i32, category_id: i32) -> AppResult<PostResponse>;
}

/// Concrete implementation of PostService using Unit of Work.
pub struct PostManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PostManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn load(&self, id: i32) -> AppResult<PostModel> {
        self.uow
            .posts()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Post", id))
    }

    /// Attach categories to a page of posts with one batched query.
    async fn with_categories(&self, posts: Vec<PostModel>) -> AppResult<Vec<PostResponse>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let categories = self.uow.posts().categories_for(&posts).await?;
        Ok(posts
            .into_iter()
            .zip(categories)
            .map(|(post, categories)| PostResponse::new(post, categories))
            .collect())
    }

    async fn respond(&self, post: PostModel) -> AppResult<PostResponse> {
        let categories = self.uow.posts().categories_of(post.id).await?;
        Ok(PostResponse::new(post, categories))
    }
}

#[async_trait]
impl<U: UnitOfWork> PostService for PostManager<U> {
    async fn create_post(&self, payload: PostCreate) -> AppResult<PostResponse> {
        if !self.uow.users().exists(payload.user_id).await? {
            return Err(AppError::not_found("User", payload.user_id));
        }

        let post = self
            .uow
            .posts()
            .create(NewPost {
                title: payload.title,
                content: payload.content,
                user_id: payload.user_id,
                is_published: false,
            })
            .await?;

        tracing::info!(post_id = post.id, user_id = post.user_id, "Post created");
        Ok(PostResponse::new(post, Vec::new()))
    }

    async fn list_posts(
        &self,
        query: PostListQuery,
        page: PaginationParams,
    ) -> AppResult<Vec<PostResponse>> {
        let filter = PostFilter {
            user_id: query.user_id,
            category_id: query.category_id,
            published: None,
        };
        let posts = self.uow.posts().list(filter, page).await?;
        self.with_categories(posts).await
    }

    async fn published_posts(&self, page: PaginationParams) -> AppResult<Vec<PostResponse>> {
        let filter = PostFilter {
            published: Some(true),
            ..Default::default()
        };
        let posts = self.uow.posts().list(filter, page).await?;
        self.with_categories(posts).await
    }

    async fn recent_posts(&self, limit: Option<u64>) -> AppResult<Vec<PostResponse>> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_POSTS).min(MAX_PAGE_SIZE);
        self.published_posts(PaginationParams::new(0, limit)).await
    }

    async fn search_posts(
        &self,
        term: &str,
        page: PaginationParams,
    ) -> AppResult<Vec<PostResponse>> {
        if term.trim().is_empty() {
            return Err(AppError::validation("Search term must not be empty"));
        }

        let posts = self.uow.posts().search(term, page).await?;
        self.with_categories(posts).await
    }

    async fn get_post(&self, id: i32) -> AppResult<PostDetailResponse> {
        let posts = self.uow.posts();
        let (found, categories) =
            tokio::try_join!(posts.find_with_author(id), posts.categories_of(id))?;

        let (post, author) = found.ok_or_else(|| AppError::not_found("Post", id))?;
        Ok(PostDetailResponse::new(
            post,
            author.map(AuthorSummary::from),
            categories,
        ))
    }

    async fn update_post(&self, id: i32, payload: PostUpdate) -> AppResult<PostResponse> {
        let post = self
            .uow
            .posts()
            .update(
                id,
                PostChanges {
                    title: payload.title,
                    content: payload.content,
                    is_published: None,
                },
            )
            .await?;

        self.respond(post).await
    }

    async fn delete_post(&self, id: i32) -> AppResult<()> {
        self.uow.posts().delete(id).await?;
        tracing::info!(post_id = id, "Post deleted");
        Ok(())
    }

    async fn set_published(&self, id: i32, published: bool) -> AppResult<PostResponse> {
        let post = self
            .uow
            .posts()
            .update(
                id,
                PostChanges {
                    is_published: Some(published),
                    ..Default::default()
                },
            )
            .await?;

        self.respond(post).await
    }

    async fn add_category(&self, post_id: i32, category_id: i32) -> AppResult<PostResponse> {
        let post = self.load(post_id).await?;
        if !self.uow.categories().exists(category_id).await? {
            return Err(AppError::not_found("Category", category_id));
        }

        if self.uow.posts().add_category(post_id, category_id).await? {
            tracing::debug!(post_id, category_id, "Category linked to post");
        }
        self.respond(post).await
    }

    async fn remove_category(&self, post_id: i32, category_id: i32) -> AppResult<PostResponse> {
        let post = self.load(post_id).await?;

        if self.uow.posts().remove_category(post_id, category_id).await? {
            tracing::debug!(post_id, category_id, "Category unlinked from post");
        }
        self.respond(post).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::{
        MockCategoryRepository, MockPostRepository, MockUserRepository,
    };
    use crate::services::testing::{category, post, user, TestUnitOfWork};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_create_post_requires_author() {
        let mut users = MockUserRepository::new();
        users.expect_exists().with(eq(42)).returning(|_| Ok(false));
        let mut posts = MockPostRepository::new();
        posts.expect_create().never();

        let uow = TestUnitOfWork::default().with_users(users).with_posts(posts);
        let payload = PostCreate {
            title: "Hello".to_string(),
            content: "World".to_string(),
            user_id: 42,
        };
        let result = PostManager::new(Arc::new(uow)).create_post(payload).await;

        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg.contains("User")));
    }

    #[tokio::test]
    async fn test_create_post_starts_unpublished() {
        let mut users = MockUserRepository::new();
        users.expect_exists().returning(|_| Ok(true));
        let mut posts = MockPostRepository::new();
        posts
            .expect_create()
            .withf(|new| !new.is_published && new.title == "Hello")
            .returning(|new| {
                let mut model = post(1, new.user_id);
                model.title = new.title;
                Ok(model)
            });

        let uow = TestUnitOfWork::default().with_users(users).with_posts(posts);
        let payload = PostCreate {
            title: "Hello".to_string(),
            content: "World".to_string(),
            user_id: 2,
        };
        let created = PostManager::new(Arc::new(uow))
            .create_post(payload)
            .await
            .unwrap();

        assert!(!created.is_published);
        assert!(created.categories.is_empty());
    }

    #[tokio::test]
    async fn test_list_posts_batches_categories() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_list()
            .withf(|filter, _| filter.category_id == Some(3) && filter.published.is_none())
            .returning(|_, _| Ok(vec![post(1, 1), post(2, 1)]));
        posts
            .expect_categories_for()
            .times(1)
            .returning(|_| Ok(vec![vec![category(3, "Rust")], vec![]]));

        let uow = TestUnitOfWork::default().with_posts(posts);
        let query = PostListQuery {
            user_id: None,
            category_id: Some(3),
        };
        let listed = PostManager::new(Arc::new(uow))
            .list_posts(query, PaginationParams::default())
            .await
            .unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].categories[0].name, "Rust");
        assert!(listed[1].categories.is_empty());
    }

    #[tokio::test]
    async fn test_list_posts_empty_skips_category_query() {
        let mut posts = MockPostRepository::new();
        posts.expect_list().returning(|_, _| Ok(vec![]));
        posts.expect_categories_for().never();

        let uow = TestUnitOfWork::default().with_posts(posts);
        let listed = PostManager::new(Arc::new(uow))
            .list_posts(PostListQuery::default(), PaginationParams::default())
            .await
            .unwrap();

        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_recent_posts_defaults_to_ten_published() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_list()
            .withf(|filter, page| filter.published == Some(true) && page.limit() == 10)
            .returning(|_, _| Ok(vec![]));

        let uow = TestUnitOfWork::default().with_posts(posts);
        let recent = PostManager::new(Arc::new(uow))
            .recent_posts(None)
            .await
            .unwrap();

        assert!(recent.is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_blank_term() {
        let uow = TestUnitOfWork::default();
        let result = PostManager::new(Arc::new(uow))
            .search_posts("   ", PaginationParams::default())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_post_includes_author_and_categories() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_find_with_author()
            .with(eq(5))
            .returning(|id| Ok(Some((post(id, 1), Some(user(1, "alice"))))));
        posts
            .expect_categories_of()
            .with(eq(5))
            .returning(|_| Ok(vec![category(1, "Food")]));

        let uow = TestUnitOfWork::default().with_posts(posts);
        let detail = PostManager::new(Arc::new(uow)).get_post(5).await.unwrap();

        assert_eq!(detail.author.unwrap().username, "alice");
        assert_eq!(detail.categories.len(), 1);
    }

    #[tokio::test]
    async fn test_get_post_not_found() {
        let mut posts = MockPostRepository::new();
        posts.expect_find_with_author().returning(|_| Ok(None));
        posts.expect_categories_of().returning(|_| Ok(vec![]));

        let uow = TestUnitOfWork::default().with_posts(posts);
        let result = PostManager::new(Arc::new(uow)).get_post(5).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_category_is_idempotent() {
        let mut posts = MockPostRepository::new();
        posts.expect_find_by_id().returning(|id| Ok(Some(post(id, 1))));
        posts
            .expect_add_category()
            .with(eq(1), eq(2))
            .times(2)
            .returning(|_, _| Ok(false));
        posts
            .expect_categories_of()
            .returning(|_| Ok(vec![category(2, "Travel")]));
        let mut categories = MockCategoryRepository::new();
        categories.expect_exists().returning(|_| Ok(true));

        let uow = TestUnitOfWork::default()
            .with_posts(posts)
            .with_categories(categories);
        let service = PostManager::new(Arc::new(uow));

        let first = service.add_category(1, 2).await.unwrap();
        let second = service.add_category(1, 2).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(second.categories.len(), 1);
    }

    #[tokio::test]
    async fn test_add_category_missing_category() {
        let mut posts = MockPostRepository::new();
        posts.expect_find_by_id().returning(|id| Ok(Some(post(id, 1))));
        posts.expect_add_category().never();
        let mut categories = MockCategoryRepository::new();
        categories.expect_exists().returning(|_| Ok(false));

        let uow = TestUnitOfWork::default()
            .with_posts(posts)
            .with_categories(categories);
        let result = PostManager::new(Arc::new(uow)).add_category(1, 9).await;

        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg.contains("Category")));
    }

    #[tokio::test]
    async fn test_publish_sets_flag_only() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_update()
            .withf(|_, changes| {
                changes.is_published == Some(true)
                    && changes.title.is_none()
                    && changes.content.is_none()
            })
            .returning(|id, _| {
                let mut model = post(id, 1);
                model.is_published = true;
                Ok(model)
            });
        posts.expect_categories_of().returning(|_| Ok(vec![]));

        let uow = TestUnitOfWork::default().with_posts(posts);
        let published = PostManager::new(Arc::new(uow))
            .set_published(3, true)
            .await
            .unwrap();

        assert!(published.is_published);
    }
}
