//! HTTP request handlers.

pub mod category_handler;
pub mod comment_handler;
pub mod post_handler;
pub mod profile_handler;
pub mod relationship_handler;
pub mod role_handler;
pub mod user_handler;

pub use category_handler::category_routes;
pub use comment_handler::comment_routes;
pub use post_handler::post_routes;
pub use profile_handler::profile_routes;
pub use relationship_handler::relationship_routes;
pub use role_handler::role_routes;
pub use user_handler::user_routes;
