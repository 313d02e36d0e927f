//! Relationship showcase handlers.
//!
//! Read-only endpoints, one per relationship pattern. Missing demo rows are
//! seeded on first use.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::AppState;
use crate::domain::{
    ManyToManyDemo, ManyToOneDemo, OneToManyDemo, OneToOneDemo, SelfReferentialDemo,
};
use crate::errors::AppResult;

/// Create relationship showcase routes
pub fn relationship_routes() -> Router<AppState> {
    Router::new()
        .route("/one-to-many", get(one_to_many))
        .route("/many-to-one", get(many_to_one))
        .route("/one-to-one", get(one_to_one))
        .route("/many-to-many", get(many_to_many))
        .route("/self-referential", get(self_referential))
}

/// User -> Posts
#[utoipa::path(
    get,
    path = "/relationships-demo/one-to-many",
    tag = "Relationships Demo",
    responses((status = 200, description = "A user with all of their posts", body = OneToManyDemo))
)]
pub async fn one_to_many(State(state): State<AppState>) -> AppResult<Json<OneToManyDemo>> {
    Ok(Json(state.services.showcase().one_to_many().await?))
}

/// Posts -> User
#[utoipa::path(
    get,
    path = "/relationships-demo/many-to-one",
    tag = "Relationships Demo",
    responses((status = 200, description = "Posts with their authors", body = ManyToOneDemo))
)]
pub async fn many_to_one(State(state): State<AppState>) -> AppResult<Json<ManyToOneDemo>> {
    Ok(Json(state.services.showcase().many_to_one().await?))
}

/// User <-> Profile
#[utoipa::path(
    get,
    path = "/relationships-demo/one-to-one",
    tag = "Relationships Demo",
    responses((status = 200, description = "A user and their profile", body = OneToOneDemo))
)]
pub async fn one_to_one(State(state): State<AppState>) -> AppResult<Json<OneToOneDemo>> {
    Ok(Json(state.services.showcase().one_to_one().await?))
}

/// Posts <-> Categories
#[utoipa::path(
    get,
    path = "/relationships-demo/many-to-many",
    tag = "Relationships Demo",
    responses((status = 200, description = "Posts with categories and category post counts", body = ManyToManyDemo))
)]
pub async fn many_to_many(State(state): State<AppState>) -> AppResult<Json<ManyToManyDemo>> {
    Ok(Json(state.services.showcase().many_to_many().await?))
}

/// Comment -> Comment
#[utoipa::path(
    get,
    path = "/relationships-demo/self-referential",
    tag = "Relationships Demo",
    responses((status = 200, description = "Top-level comments with their replies", body = SelfReferentialDemo))
)]
pub async fn self_referential(
    State(state): State<AppState>,
) -> AppResult<Json<SelfReferentialDemo>> {
    Ok(Json(state.services.showcase().self_referential().await?))
}
