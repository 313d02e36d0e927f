//! Post handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    PostCreate, PostDetailResponse, PostListQuery, PostResponse, PostSearchQuery, PostUpdate,
};
use crate::errors::AppResult;
use crate::types::{Created, LimitQuery, NoContent, PaginationParams};

/// Create post routes
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/published", get(published_posts))
        .route("/recent", get(recent_posts))
        .route("/search", get(search_posts))
        .route("/:id", get(get_post).put(update_post).delete(delete_post))
        .route("/:id/publish", post(publish_post))
        .route("/:id/unpublish", post(unpublish_post))
        .route(
            "/:id/categories/:category_id",
            post(add_category).delete(remove_category),
        )
}

/// Create a post (starts unpublished)
#[utoipa::path(
    post,
    path = "/posts",
    tag = "Posts",
    request_body = PostCreate,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 404, description = "Author not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PostCreate>,
) -> AppResult<Created<PostResponse>> {
    let post = state.services.posts().create_post(payload).await?;
    Ok(Created(post))
}

/// List posts, newest first
#[utoipa::path(
    get,
    path = "/posts",
    tag = "Posts",
    params(PostListQuery, PaginationParams),
    responses((status = 200, description = "Page of posts", body = Vec<PostResponse>))
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Vec<PostResponse>>> {
    let posts = state.services.posts().list_posts(query, page).await?;
    Ok(Json(posts))
}

/// List published posts
#[utoipa::path(
    get,
    path = "/posts/published",
    tag = "Posts",
    params(PaginationParams),
    responses((status = 200, description = "Page of published posts", body = Vec<PostResponse>))
)]
pub async fn published_posts(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Vec<PostResponse>>> {
    let posts = state.services.posts().published_posts(page).await?;
    Ok(Json(posts))
}

/// Latest published posts
#[utoipa::path(
    get,
    path = "/posts/recent",
    tag = "Posts",
    params(LimitQuery),
    responses((status = 200, description = "Recent posts", body = Vec<PostResponse>))
)]
pub async fn recent_posts(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<PostResponse>>> {
    let posts = state.services.posts().recent_posts(query.limit).await?;
    Ok(Json(posts))
}

/// Search posts by title or content
#[utoipa::path(
    get,
    path = "/posts/search",
    tag = "Posts",
    params(PostSearchQuery, PaginationParams),
    responses(
        (status = 200, description = "Matching posts", body = Vec<PostResponse>),
        (status = 422, description = "Blank search term")
    )
)]
pub async fn search_posts(
    State(state): State<AppState>,
    Query(query): Query<PostSearchQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Vec<PostResponse>>> {
    let posts = state.services.posts().search_posts(&query.q, page).await?;
    Ok(Json(posts))
}

/// Get post with author and categories
#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "Posts",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post", body = PostDetailResponse),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<PostDetailResponse>> {
    let post = state.services.posts().get_post(id).await?;
    Ok(Json(post))
}

/// Update post
#[utoipa::path(
    put,
    path = "/posts/{id}",
    tag = "Posts",
    params(("id" = i32, Path, description = "Post ID")),
    request_body = PostUpdate,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 404, description = "Post not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<PostUpdate>,
) -> AppResult<Json<PostResponse>> {
    let post = state.services.posts().update_post(id, payload).await?;
    Ok(Json(post))
}

/// Delete post
#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "Posts",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.services.posts().delete_post(id).await?;
    Ok(NoContent)
}

/// Publish post
#[utoipa::path(
    post,
    path = "/posts/{id}/publish",
    tag = "Posts",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post published", body = PostResponse),
        (status = 404, description = "Post not found")
    )
)]
pub async fn publish_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<PostResponse>> {
    let post = state.services.posts().set_published(id, true).await?;
    Ok(Json(post))
}

/// Unpublish post
#[utoipa::path(
    post,
    path = "/posts/{id}/unpublish",
    tag = "Posts",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post unpublished", body = PostResponse),
        (status = 404, description = "Post not found")
    )
)]
pub async fn unpublish_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<PostResponse>> {
    let post = state.services.posts().set_published(id, false).await?;
    Ok(Json(post))
}

/// Tag post with a category
#[utoipa::path(
    post,
    path = "/posts/{id}/categories/{category_id}",
    tag = "Posts",
    params(
        ("id" = i32, Path, description = "Post ID"),
        ("category_id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Post with its categories", body = PostResponse),
        (status = 404, description = "Post or category not found")
    )
)]
pub async fn add_category(
    State(state): State<AppState>,
    Path((id, category_id)): Path<(i32, i32)>,
) -> AppResult<Json<PostResponse>> {
    let post = state.services.posts().add_category(id, category_id).await?;
    Ok(Json(post))
}

/// Remove a category from a post
#[utoipa::path(
    delete,
    path = "/posts/{id}/categories/{category_id}",
    tag = "Posts",
    params(
        ("id" = i32, Path, description = "Post ID"),
        ("category_id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Post with its categories", body = PostResponse),
        (status = 404, description = "Post not found")
    )
)]
pub async fn remove_category(
    State(state): State<AppState>,
    Path((id, category_id)): Path<(i32, i32)>,
) -> AppResult<Json<PostResponse>> {
    let post = state
        .services
        .posts()
        .remove_category(id, category_id)
        .await?;
    Ok(Json(post))
}
