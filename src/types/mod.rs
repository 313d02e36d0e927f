//! Shared types for list endpoints and responses.

mod pagination;
mod response;

pub use pagination::{LimitQuery, PaginationParams};
pub use response::{Created, MessageResponse, NoContent};
