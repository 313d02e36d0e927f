//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items returned by list endpoints
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Maximum allowed items per request to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 500;

/// Default number of rows skipped
pub const DEFAULT_SKIP: u64 = 0;

/// Default number of posts returned by the "recent" listing
pub const DEFAULT_RECENT_POSTS: u64 = 10;

/// Default number of categories returned by the "popular" listing
pub const DEFAULT_POPULAR_CATEGORIES: u64 = 10;

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Default log level when neither RUST_LOG nor LOG_LEVEL is set
pub const DEFAULT_LOG_LEVEL: &str = "debug";

// =============================================================================
// Database
// =============================================================================

pub const DEFAULT_POSTGRES_USER: &str = "postgres";
pub const DEFAULT_POSTGRES_PASSWORD: &str = "postgres";
pub const DEFAULT_POSTGRES_HOST: &str = "localhost";
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;
pub const DEFAULT_POSTGRES_DB: &str = "app";

/// Default connection pool size
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

// =============================================================================
// Cache (Redis)
// =============================================================================

pub const DEFAULT_REDIS_HOST: &str = "localhost";
pub const DEFAULT_REDIS_PORT: u16 = 6379;

/// Default cache TTL in seconds (5 minutes)
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

/// Cache key prefix for user data
pub const CACHE_PREFIX_USER: &str = "user:";

// =============================================================================
// Distributed Locks
// =============================================================================

/// Cache key prefix for distributed locks
pub const CACHE_PREFIX_LOCK: &str = "lock:";

/// Default lock TTL in seconds (prevents deadlocks)
pub const DEFAULT_LOCK_TTL_SECONDS: u64 = 30;

/// Default lock retry attempts
pub const DEFAULT_LOCK_RETRIES: u32 = 10;

/// Default lock retry delay in milliseconds
pub const DEFAULT_LOCK_RETRY_DELAY_MS: u64 = 100;

/// Lock resource guarding relationship demo seeding
pub const LOCK_DEMO_SEED: &str = "relationships-demo:seed";

// =============================================================================
// Migrations
// =============================================================================

/// Env flag selecting autogenerate mode
pub const ENV_MIGRATE_AUTOGENERATE: &str = "MIGRATE_AUTOGENERATE";

/// Env var carrying the autogenerate message
pub const ENV_MIGRATE_MESSAGE: &str = "MIGRATE_MESSAGE";

/// Env var carrying the downgrade target revision
pub const ENV_MIGRATE_DOWNGRADE_REVISION: &str = "MIGRATE_DOWNGRADE_REVISION";

/// Revision name meaning "before the first migration"
pub const MIGRATION_BASE_REVISION: &str = "base";

/// Directory generated migrations are written to
pub const MIGRATIONS_DIR: &str = "src/infra/db/migrations";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 8;

// =============================================================================
// Relationship demo seed data
// =============================================================================

pub const DEMO_USER_EMAIL: &str = "demo@example.com";
pub const DEMO_USER_USERNAME: &str = "demouser";
pub const DEMO_USER_PASSWORD: &str = "demo-password";
pub const DEMO_POSTS: &[(&str, &str)] = &[
    ("First Post", "Content of first post"),
    ("Second Post", "Content of second post"),
];
pub const DEMO_PROFILE_BIO: &str = "This is a demo profile";
pub const DEMO_PROFILE_WEBSITE: &str = "https://example.com";
pub const DEMO_PROFILE_LOCATION: &str = "Demo City";
pub const DEMO_CATEGORIES: &[(&str, &str)] = &[
    ("Technology", "Tech related posts"),
    ("Travel", "Travel related posts"),
    ("Food", "Food and cooking posts"),
];

/// Posts and categories paired up by the many-to-many demo
pub const DEMO_LINKED_POSTS: u64 = 2;
pub const DEMO_LINKED_CATEGORIES: usize = 2;

/// Rows shown by the list-style demos
pub const DEMO_LIST_SIZE: u64 = 5;

pub const DEMO_PARENT_COMMENT: &str = "This is a parent comment";
pub const DEMO_REPLIES: &[&str] = &[
    "This is a reply to the parent comment",
    "This is another reply to the parent comment",
];
