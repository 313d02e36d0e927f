//! Migration file templates.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AppError, AppResult};
use crate::infra::db::schema::TableDefinition;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// A rendered migration ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Module name, also the SeaORM migration name
    pub module: String,
    pub content: String,
}

impl MigrationFile {
    pub fn file_name(&self) -> String {
        format!("{}.rs", self.module)
    }
}

/// Lowercase `message` and collapse everything that is not a letter or digit
/// into single underscores.
pub fn slugify(message: &str) -> String {
    let lower = message.to_lowercase();
    let slug = NON_ALPHANUMERIC.replace_all(&lower, "_");
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "migration".to_string()
    } else {
        slug.to_string()
    }
}

/// Render a migration creating `tables` in order and dropping them in reverse.
///
/// With no tables the result is an empty scaffold for hand-written changes.
pub fn render_migration(
    message: &str,
    tables: &[TableDefinition],
    now: DateTime<Utc>,
) -> MigrationFile {
    let module = format!("m{}_{}", now.format("%Y%m%d_%H%M%S"), slugify(message));

    let mut up = String::new();
    for table in tables {
        up.push_str(&format!(
            "        db.execute_unprepared(r#\"{}\"#).await?;\n",
            table.create_sql
        ));
    }

    let mut down = String::new();
    for table in tables.iter().rev() {
        down.push_str(&format!(
            "        manager\n            .drop_table(Table::drop().table(Alias::new(\"{}\")).if_exists().to_owned())\n            .await?;\n",
            table.name
        ));
    }

    let (up_body, down_body) = if tables.is_empty() {
        (
            "        let _ = manager;\n".to_string(),
            "        let _ = manager;\n".to_string(),
        )
    } else {
        (
            format!("        let db = manager.get_connection();\n{}", up),
            down,
        )
    };

    let content = format!(
        r#"//! Migration: {message}
//!
//! Generated {generated}. Register it in `Migrator::migrations`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {{
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {{
{up_body}        Ok(())
    }}

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {{
{down_body}        Ok(())
    }}
}}
"#,
        message = message,
        generated = now.format("%Y-%m-%d %H:%M:%S UTC"),
        up_body = up_body,
        down_body = down_body,
    );

    MigrationFile { module, content }
}

/// Write `content` to `path`, creating parent directories. Existing files are
/// never overwritten.
pub fn write_file(path: &Path, content: &str) -> AppResult<()> {
    if path.exists() {
        return Err(AppError::conflict(format!(
            "{} already exists",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AppError::internal(e.to_string()))?;
    }

    fs::write(path, content).map_err(|e| AppError::internal(e.to_string()))?;

    Ok(())
}
