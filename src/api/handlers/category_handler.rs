//! Category handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    CategoryCreate, CategoryDetailResponse, CategoryResponse, CategoryUpdate,
    CategoryWithPostCount, PostResponse,
};
use crate::errors::AppResult;
use crate::types::{Created, LimitQuery, NoContent, PaginationParams};

/// Create category routes
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/popular", get(popular_categories))
        .route("/with-post-counts", get(categories_with_post_counts))
        .route(
            "/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/:id/posts", get(posts_in_category))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    request_body = CategoryCreate,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 409, description = "Category name already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CategoryCreate>,
) -> AppResult<Created<CategoryResponse>> {
    let category = state.services.categories().create_category(payload).await?;
    Ok(Created(category))
}

/// List categories by name
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    params(PaginationParams),
    responses((status = 200, description = "Page of categories", body = Vec<CategoryResponse>))
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Vec<CategoryResponse>>> {
    let categories = state.services.categories().list_categories(page).await?;
    Ok(Json(categories))
}

/// Categories with the most posts
#[utoipa::path(
    get,
    path = "/categories/popular",
    tag = "Categories",
    params(LimitQuery),
    responses((status = 200, description = "Ranked categories", body = Vec<CategoryWithPostCount>))
)]
pub async fn popular_categories(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<CategoryWithPostCount>>> {
    let categories = state
        .services
        .categories()
        .popular_categories(query.limit)
        .await?;
    Ok(Json(categories))
}

/// Categories with their post counts
#[utoipa::path(
    get,
    path = "/categories/with-post-counts",
    tag = "Categories",
    params(PaginationParams),
    responses((status = 200, description = "Categories with counts", body = Vec<CategoryWithPostCount>))
)]
pub async fn categories_with_post_counts(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Vec<CategoryWithPostCount>>> {
    let categories = state
        .services
        .categories()
        .categories_with_post_counts(page)
        .await?;
    Ok(Json(categories))
}

/// Get category with its posts
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = CategoryDetailResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CategoryDetailResponse>> {
    let category = state.services.categories().get_category(id).await?;
    Ok(Json(category))
}

/// Update category
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryUpdate,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category name already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<CategoryUpdate>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state
        .services
        .categories()
        .update_category(id, payload)
        .await?;
    Ok(Json(category))
}

/// Delete category
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.services.categories().delete_category(id).await?;
    Ok(NoContent)
}

/// Posts filed under a category
#[utoipa::path(
    get,
    path = "/categories/{id}/posts",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category ID"), PaginationParams),
    responses(
        (status = 200, description = "Posts in the category", body = Vec<PostResponse>),
        (status = 404, description = "Category not found")
    )
)]
pub async fn posts_in_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Vec<PostResponse>>> {
    let posts = state
        .services
        .categories()
        .posts_in_category(id, page)
        .await?;
    Ok(Json(posts))
}
