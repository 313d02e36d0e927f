//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

use crate::config::{
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, ENV_MIGRATE_AUTOGENERATE,
    ENV_MIGRATE_DOWNGRADE_REVISION, ENV_MIGRATE_MESSAGE,
};
use crate::errors::{AppError, AppResult};

/// CRUD starter - Axum + SeaORM + PostgreSQL + Redis
#[derive(Parser, Debug)]
#[command(name = "crud-starter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = DEFAULT_SERVER_HOST, env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_SERVER_PORT, env = "SERVER_PORT")]
    pub port: u16,

    /// Apply pending migrations before serving
    #[arg(long)]
    pub migrate: bool,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Without an action the mode comes from `MIGRATE_*` env flags
    #[command(subcommand)]
    pub action: Option<MigrateAction>,
}

/// Migration actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Roll back every migration newer than a revision ("base" for all)
    Down {
        revision: String,
    },
    /// Write a migration creating tables missing from the database
    Autogenerate {
        message: String,
    },
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

impl MigrateAction {
    /// Resolve the action from env flags when none was given explicitly.
    ///
    /// `MIGRATE_AUTOGENERATE=true` selects autogenerate (message from
    /// `MIGRATE_MESSAGE`), a non-empty `MIGRATE_DOWNGRADE_REVISION` selects a
    /// downgrade. Setting both is rejected.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let autogenerate = lookup(ENV_MIGRATE_AUTOGENERATE)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);
        let downgrade = lookup(ENV_MIGRATE_DOWNGRADE_REVISION)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        match (autogenerate, downgrade) {
            (true, Some(_)) => Err(AppError::bad_request(format!(
                "{} and {} cannot be used together",
                ENV_MIGRATE_AUTOGENERATE, ENV_MIGRATE_DOWNGRADE_REVISION
            ))),
            (true, None) => Ok(Self::Autogenerate {
                message: lookup(ENV_MIGRATE_MESSAGE)
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "auto".to_string()),
            }),
            (false, Some(revision)) => Ok(Self::Down { revision }),
            (false, None) => Ok(Self::Up),
        }
    }
}

impl MigrateArgs {
    /// The explicit subcommand, or the env-selected mode.
    pub fn resolve(self) -> AppResult<MigrateAction> {
        match self.action {
            Some(action) => Ok(action),
            None => MigrateAction::from_lookup(|key| std::env::var(key).ok()),
        }
    }
}
