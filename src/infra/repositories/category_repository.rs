//! Category repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType,
    ModelTrait, Order, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use super::base::{DeleteRepository, ReadRepository};
use super::entities::category::{self, ActiveModel, Entity as CategoryEntity, Model as CategoryModel};
use super::entities::post::{self, Entity as PostEntity, Model as PostModel};
use super::entities::post_category;
use crate::domain::CategoryWithPostCount;
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

impl NewCategory {
    pub fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            name: Set(self.name),
            description: Set(self.description),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Category repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<CategoryModel>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<CategoryModel>>;

    /// Page ordered by name
    async fn list(&self, page: PaginationParams) -> AppResult<Vec<CategoryModel>>;

    /// Posts tagged with a category (lazy many-to-many load)
    async fn posts_of(&self, category: &CategoryModel) -> AppResult<Vec<PostModel>>;

    /// Categories with the number of posts in each, ordered by name
    async fn with_post_counts(&self, page: PaginationParams) -> AppResult<Vec<CategoryWithPostCount>>;

    /// Categories with the most posts first
    async fn popular(&self, limit: u64) -> AppResult<Vec<CategoryWithPostCount>>;

    async fn create(&self, category: NewCategory) -> AppResult<CategoryModel>;

    async fn update(&self, id: i32, changes: CategoryChanges) -> AppResult<CategoryModel>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn exists(&self, id: i32) -> AppResult<bool>;

    async fn count(&self) -> AppResult<u64>;
}

/// SeaORM-backed category repository
pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn counted(
        &self,
        ranked: bool,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<CategoryWithPostCount>> {
        let mut query = CategoryEntity::find()
            .column_as(
                Expr::col((post_category::Entity, post_category::Column::PostId)).count(),
                "post_count",
            )
            .join(JoinType::LeftJoin, category::Relation::PostCategories.def())
            .group_by(category::Column::Id);

        if ranked {
            query = query.order_by(Expr::cust("post_count"), Order::Desc);
        }

        query
            .order_by_asc(category::Column::Name)
            .offset(offset)
            .limit(limit)
            .into_model::<CategoryWithPostCount>()
            .all(&self.db)
            .await
            .map_err(AppError::from)
    }
}

impl ReadRepository<CategoryEntity> for CategoryStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl DeleteRepository<CategoryEntity> for CategoryStore {
    const LABEL: &'static str = "Category";
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<CategoryModel>> {
        self.get_by_id(id).await
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<CategoryModel>> {
        CategoryEntity::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn list(&self, page: PaginationParams) -> AppResult<Vec<CategoryModel>> {
        self.get_many(
            Condition::all(),
            Some((category::Column::Name, Order::Asc)),
            page,
        )
        .await
    }

    async fn posts_of(&self, category: &CategoryModel) -> AppResult<Vec<PostModel>> {
        category
            .find_related(PostEntity)
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn with_post_counts(&self, page: PaginationParams) -> AppResult<Vec<CategoryWithPostCount>> {
        self.counted(false, page.offset(), page.limit()).await
    }

    async fn popular(&self, limit: u64) -> AppResult<Vec<CategoryWithPostCount>> {
        self.counted(true, 0, limit).await
    }

    async fn create(&self, category: NewCategory) -> AppResult<CategoryModel> {
        category
            .into_active_model()
            .insert(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, id: i32, changes: CategoryChanges) -> AppResult<CategoryModel> {
        let category = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Category", id))?;

        let mut active: ActiveModel = category.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
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

    async fn count(&self) -> AppResult<u64> {
        self.count_where(Condition::all()).await
    }
}
