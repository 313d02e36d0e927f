//! Category service - Categories and their posts.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{DEFAULT_POPULAR_CATEGORIES, MAX_PAGE_SIZE};
use crate::domain::{
    CategoryCreate, CategoryDetailResponse, CategoryResponse, CategoryUpdate,
    CategoryWithPostCount, PostResponse,
};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::entities::CategoryModel;
use crate::infra::repositories::{CategoryChanges, NewCategory, PostFilter};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const DUPLICATE_NAME: &str = "Category with this name already exists";

/// Category service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryService: Send + Sync {
    async fn create_category(&self, payload: CategoryCreate) -> AppResult<CategoryResponse>;

    async fn list_categories(&self, page: PaginationParams) -> AppResult<Vec<CategoryResponse>>;

    /// Category with the posts filed under it
    async fn get_category(&self, id: i32) -> AppResult<CategoryDetailResponse>;

    async fn update_category(
        &self,
        id: i32,
        payload: CategoryUpdate,
    ) -> AppResult<CategoryResponse>;

    async fn delete_category(&self, id: i32) -> AppResult<()>;

    /// Categories ranked by number of posts
    async fn popular_categories(&self, limit: Option<u64>)
        -> AppResult<Vec<CategoryWithPostCount>>;

    async fn categories_with_post_counts(
        &self,
        page: PaginationParams,
    ) -> AppResult<Vec<CategoryWithPostCount>>;

    async fn posts_in_category(
        &self,
        id: i32,
        page: PaginationParams,
    ) -> AppResult<Vec<PostResponse>>;
}

/// Concrete implementation of CategoryService using Unit of Work.
pub struct CategoryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CategoryManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn load(&self, id: i32) -> AppResult<CategoryModel> {
        self.uow
            .categories()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Category", id))
    }

    /// Reject `name` when another category already uses it.
    async fn ensure_name_free(&self, name: &str, except: Option<i32>) -> AppResult<()> {
        match self.uow.categories().find_by_name(name).await? {
            Some(existing) if Some(existing.id) != except => Err(AppError::conflict(DUPLICATE_NAME)),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> CategoryService for CategoryManager<U> {
    async fn create_category(&self, payload: CategoryCreate) -> AppResult<CategoryResponse> {
        self.ensure_name_free(&payload.name, None).await?;

        let category = self
            .uow
            .categories()
            .create(NewCategory {
                name: payload.name,
                description: payload.description,
            })
            .await?;

        tracing::info!(category_id = category.id, "Category created");
        Ok(CategoryResponse::from(category))
    }

    async fn list_categories(&self, page: PaginationParams) -> AppResult<Vec<CategoryResponse>> {
        let categories = self.uow.categories().list(page).await?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    async fn get_category(&self, id: i32) -> AppResult<CategoryDetailResponse> {
        let category = self.load(id).await?;
        let posts = self.uow.categories().posts_of(&category).await?;
        Ok(CategoryDetailResponse::new(category, posts))
    }

    async fn update_category(
        &self,
        id: i32,
        payload: CategoryUpdate,
    ) -> AppResult<CategoryResponse> {
        if let Some(name) = payload.name.as_deref() {
            self.ensure_name_free(name, Some(id)).await?;
        }

        let category = self
            .uow
            .categories()
            .update(
                id,
                CategoryChanges {
                    name: payload.name,
                    description: payload.description,
                },
            )
            .await?;

        Ok(CategoryResponse::from(category))
    }

    async fn delete_category(&self, id: i32) -> AppResult<()> {
        self.uow.categories().delete(id).await
    }

    async fn popular_categories(
        &self,
        limit: Option<u64>,
    ) -> AppResult<Vec<CategoryWithPostCount>> {
        let limit = limit.unwrap_or(DEFAULT_POPULAR_CATEGORIES).min(MAX_PAGE_SIZE);
        self.uow.categories().popular(limit).await
    }

    async fn categories_with_post_counts(
        &self,
        page: PaginationParams,
    ) -> AppResult<Vec<CategoryWithPostCount>> {
        self.uow.categories().with_post_counts(page).await
    }

    async fn posts_in_category(
        &self,
        id: i32,
        page: PaginationParams,
    ) -> AppResult<Vec<PostResponse>> {
        if !self.uow.categories().exists(id).await? {
            return Err(AppError::not_found("Category", id));
        }

        let filter = PostFilter {
            category_id: Some(id),
            ..Default::default()
        };
        let posts = self.uow.posts().list(filter, page).await?;
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::{MockCategoryRepository, MockPostRepository};
    use crate::services::testing::{category, post, TestUnitOfWork};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_create_category_duplicate_name() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_by_name()
            .with(eq("Travel"))
            .returning(|name| Ok(Some(category(1, name))));
        categories.expect_create().never();

        let uow = TestUnitOfWork::default().with_categories(categories);
        let payload = CategoryCreate {
            name: "Travel".to_string(),
            description: None,
        };
        let result = CategoryManager::new(Arc::new(uow))
            .create_category(payload)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(msg)) if msg == DUPLICATE_NAME));
    }

    #[tokio::test]
    async fn test_update_keeping_own_name() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_by_name()
            .returning(|name| Ok(Some(category(3, name))));
        categories
            .expect_update()
            .with(eq(3), mockall::predicate::always())
            .returning(|id, changes| {
                let mut model = category(id, "Food");
                model.description = changes.description;
                Ok(model)
            });

        let uow = TestUnitOfWork::default().with_categories(categories);
        let payload = CategoryUpdate {
            name: Some("Food".to_string()),
            description: Some("Recipes".to_string()),
        };
        let updated = CategoryManager::new(Arc::new(uow))
            .update_category(3, payload)
            .await
            .unwrap();

        assert_eq!(updated.description.as_deref(), Some("Recipes"));
    }

    #[tokio::test]
    async fn test_update_to_taken_name() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_by_name()
            .returning(|name| Ok(Some(category(1, name))));
        categories.expect_update().never();

        let uow = TestUnitOfWork::default().with_categories(categories);
        let payload = CategoryUpdate {
            name: Some("Technology".to_string()),
            description: None,
        };
        let result = CategoryManager::new(Arc::new(uow))
            .update_category(2, payload)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_category_with_posts() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_by_id()
            .returning(|id| Ok(Some(category(id, "Travel"))));
        categories
            .expect_posts_of()
            .returning(|_| Ok(vec![post(1, 1), post(2, 1)]));

        let uow = TestUnitOfWork::default().with_categories(categories);
        let detail = CategoryManager::new(Arc::new(uow))
            .get_category(4)
            .await
            .unwrap();

        assert_eq!(detail.name, "Travel");
        assert_eq!(detail.posts.len(), 2);
    }

    #[tokio::test]
    async fn test_get_missing_category() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(|_| Ok(None));

        let uow = TestUnitOfWork::default().with_categories(categories);
        let result = CategoryManager::new(Arc::new(uow)).get_category(8).await;

        assert!(
            matches!(result, Err(AppError::NotFound(msg)) if msg == "Category with id 8 not found")
        );
    }

    #[tokio::test]
    async fn test_popular_uses_default_limit() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_popular()
            .with(eq(DEFAULT_POPULAR_CATEGORIES))
            .returning(|_| Ok(Vec::new()));

        let uow = TestUnitOfWork::default().with_categories(categories);
        let popular = CategoryManager::new(Arc::new(uow))
            .popular_categories(None)
            .await
            .unwrap();

        assert!(popular.is_empty());
    }

    #[tokio::test]
    async fn test_posts_in_category_filters_by_category() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_exists().returning(|_| Ok(true));
        let mut posts = MockPostRepository::new();
        posts
            .expect_list()
            .withf(|filter, _| filter.category_id == Some(2) && filter.user_id.is_none())
            .returning(|_, _| Ok(vec![post(5, 1)]));
        posts
            .expect_categories_for()
            .returning(|_| Ok(vec![vec![category(2, "Travel")]]));

        let uow = TestUnitOfWork::default()
            .with_categories(categories)
            .with_posts(posts);
        let listed = CategoryManager::new(Arc::new(uow))
            .posts_in_category(2, PaginationParams::default())
            .await
            .unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].categories[0].name, "Travel");
    }
}
