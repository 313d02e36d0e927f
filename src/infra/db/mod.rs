//! Database connection and migration management.

use std::collections::HashSet;
use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr,
    EntityTrait, QueryOrder,
};
use sea_orm_migration::{seaql_migrations, MigratorTrait, SchemaManager};

use crate::config::{Config, MIGRATION_BASE_REVISION};
use crate::errors::{AppError, AppResult};

pub mod migrations;
pub mod schema;

pub use migrations::Migrator;

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open a connection pool. Migrations are not applied here.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(config.db_max_connections)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(config.db_sql_logging);

        let connection = SeaDatabase::connect(options).await?;
        tracing::info!(max_connections = config.db_max_connections, "Database pool ready");

        Ok(Self { connection })
    }

    /// Wrap an existing connection.
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Run pending migrations.
    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Roll back the given number of applied migrations (newest first).
    pub async fn rollback(&self, steps: u32) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(steps)).await
    }

    /// Roll back every applied migration newer than `revision`.
    ///
    /// Returns the number of migrations rolled back.
    pub async fn rollback_to(&self, revision: &str) -> AppResult<u32> {
        let known: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        let applied = self.applied_migrations().await?;

        let steps = rollback_steps(&known, &applied, revision)?;
        if steps > 0 {
            self.rollback(steps).await?;
        }
        Ok(steps)
    }

    /// Get migration status (list all migrations with applied status).
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        let applied = self.applied_migrations().await?;

        let migrations: Vec<(String, bool)> = Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect();

        Ok(migrations)
    }

    /// Reset database and run all migrations fresh.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// `CREATE TABLE` statements for entities whose table does not exist yet.
    pub async fn missing_tables(&self) -> Result<Vec<schema::TableDefinition>, DbErr> {
        let manager = SchemaManager::new(&self.connection);
        let backend = self.connection.get_database_backend();

        let mut missing = Vec::new();
        for table in schema::entity_tables(backend) {
            if !manager.has_table(&table.name).await? {
                missing.push(table);
            }
        }
        Ok(missing)
    }

    /// Check database connectivity.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection.ping().await
    }

    async fn applied_migrations(&self) -> Result<HashSet<String>, DbErr> {
        // An empty database has no bookkeeping table yet.
        let manager = SchemaManager::new(&self.connection);
        if !manager.has_table("seaql_migrations").await? {
            return Ok(HashSet::new());
        }

        Ok(seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect())
    }
}

/// Number of applied migrations that sit after `revision` in `known` order.
///
/// `base` targets the state before the first migration. The target itself
/// must be a known, applied migration.
pub fn rollback_steps(
    known: &[String],
    applied: &HashSet<String>,
    revision: &str,
) -> AppResult<u32> {
    let keep_until = if revision == MIGRATION_BASE_REVISION {
        None
    } else {
        let position = known
            .iter()
            .position(|name| name == revision)
            .ok_or_else(|| AppError::bad_request(format!("Unknown revision '{}'", revision)))?;
        if !applied.contains(revision) {
            return Err(AppError::bad_request(format!(
                "Revision '{}' is not applied",
                revision
            )));
        }
        Some(position)
    };

    let steps = known
        .iter()
        .enumerate()
        .filter(|(index, name)| {
            keep_until.map_or(true, |keep| *index > keep) && applied.contains(*name)
        })
        .count();

    Ok(steps as u32)
}
