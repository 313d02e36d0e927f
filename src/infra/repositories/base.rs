//! Base repository traits shared by every SeaORM store.
//!
//! Stores implement `ReadRepository` by exposing their connection and get
//! primary-key lookups, filtered pages, counts and deletes for free.

use async_trait::async_trait;
use sea_orm::{
    Condition, DatabaseConnection, EntityTrait, Order, PaginatorTrait, PrimaryKeyTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use std::fmt::Display;

use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Read operations
#[async_trait]
pub trait ReadRepository<E>: Send + Sync
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    /// Get database connection reference
    fn db(&self) -> &DatabaseConnection;

    /// Find entity by primary key
    async fn get_by_id(&self, id: PrimaryKeyOf<E>) -> AppResult<Option<E::Model>>
    where
        PrimaryKeyOf<E>: Clone + Send,
    {
        E::find_by_id(id).one(self.db()).await.map_err(Into::into)
    }

    /// Filtered, ordered page of entities
    async fn get_many(
        &self,
        filter: Condition,
        order: Option<(E::Column, Order)>,
        page: PaginationParams,
    ) -> AppResult<Vec<E::Model>>
    where
        E::Column: Send,
    {
        let mut query = E::find().filter(filter);
        if let Some((column, direction)) = order {
            query = query.order_by(column, direction);
        }

        query
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db())
            .await
            .map_err(Into::into)
    }

    /// Count entities matching a filter
    async fn count_where(&self, filter: Condition) -> AppResult<u64> {
        E::find()
            .filter(filter)
            .count(self.db())
            .await
            .map_err(Into::into)
    }

    /// Whether a row with this primary key exists
    async fn exists_by_id(&self, id: PrimaryKeyOf<E>) -> AppResult<bool>
    where
        PrimaryKeyOf<E>: Clone + Send,
    {
        Ok(self.get_by_id(id).await?.is_some())
    }
}

/// Delete operations
#[async_trait]
pub trait DeleteRepository<E>: ReadRepository<E>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    /// Human-readable entity name used in not-found messages
    const LABEL: &'static str;

    /// Delete by primary key; NotFound when nothing was deleted
    async fn remove_by_id(&self, id: PrimaryKeyOf<E>) -> AppResult<()>
    where
        PrimaryKeyOf<E>: Clone + Send + Display,
    {
        let result = E::delete_by_id(id.clone()).exec(self.db()).await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found(Self::LABEL, id));
        }

        Ok(())
    }
}
