//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories (SeaORM)
//! - Caching and distributed locks (Redis)
//! - Unit of Work for transaction management

pub mod cache;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use cache::{acquire_lock, Cache, KeyValueCache, LockError, LockGuard};
pub use db::{Database, Migrator};
pub use unit_of_work::{Persistence, TransactionContext, TxFuture, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockKeyValueCache;
