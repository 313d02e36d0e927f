//! Migrate command - Database migration management.

use std::path::Path;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::{Config, MIGRATIONS_DIR};
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::utils::templates;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Conflicting env flags fail before any connection is made.
    let action = args.resolve()?;
    tracing::info!(?action, "Running migration command...");

    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match action {
        MigrateAction::Up => {
            tracing::info!("Running pending migrations...");
            db.run_migrations().await?;
            tracing::info!("Migrations completed successfully");
        }
        MigrateAction::Down { revision } => {
            tracing::info!(revision = %revision, "Rolling back migrations...");
            let steps = db.rollback_to(&revision).await?;
            tracing::info!(steps, "Rollback completed successfully");
        }
        MigrateAction::Autogenerate { message } => {
            let missing = db.missing_tables().await?;
            if missing.is_empty() {
                tracing::info!("Schema matches the entities, writing an empty migration");
            } else {
                let names: Vec<&str> = missing.iter().map(|t| t.name.as_str()).collect();
                tracing::info!(tables = ?names, "Generating migration for missing tables");
            }

            let file = templates::render_migration(&message, &missing, chrono::Utc::now());
            let path = Path::new(MIGRATIONS_DIR).join(file.file_name());
            templates::write_file(&path, &file.content)?;

            println!("Created migration: {}", path.display());
            println!("Register `{}` in src/infra/db/migrations/mod.rs", file.module);
        }
        MigrateAction::Status => {
            tracing::info!("Checking migration status...");
            for (name, applied) in db.migration_status().await? {
                let status_str = if applied { "applied" } else { "pending" };
                println!("{}: {}", name, status_str);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Resetting database and running all migrations...");
            db.fresh_migrations().await?;
            tracing::info!("Fresh migrations completed successfully");
        }
    }

    Ok(())
}
