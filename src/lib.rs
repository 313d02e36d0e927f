//! CRUD starter - Axum, SeaORM, PostgreSQL and Redis wired together
//!
//! A small blog domain (users, profiles, posts, categories, threaded
//! comments, roles) exposed as a REST API, plus read-only endpoints
//! demonstrating each ORM relationship pattern.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Request/response DTOs and password hashing
//! - **services**: Application use cases and business logic
//! - **infra**: Database, migrations, repositories, Redis cache
//! - **api**: HTTP handlers, extractors, routes and OpenAPI document
//! - **types**: Shared types (pagination, responses)
//! - **utils**: Migration templates
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Apply pending migrations
//! cargo run -- migrate up
//!
//! # Roll back to a revision, or everything
//! cargo run -- migrate down base
//!
//! # Write a migration for tables missing from the database
//! cargo run -- migrate autogenerate "add tags"
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::Password;
pub use errors::{AppError, AppResult};
pub use infra::{Cache, Database};
