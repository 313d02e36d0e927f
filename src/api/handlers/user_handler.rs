//! User handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{RoleResponse, UserCreate, UserResponse, UserUpdate};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, PaginationParams};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/active", get(list_active_users))
        .route("/email/:email", get(get_user_by_email))
        .route("/username/:username", get(get_user_by_username))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/activate", post(activate_user))
        .route("/:id/deactivate", post(deactivate_user))
        .route("/:id/roles", get(user_roles))
}

/// Register a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = UserCreate,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 409, description = "Email or username already taken"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserCreate>,
) -> AppResult<Created<UserResponse>> {
    let user = state.services.users().create_user(payload).await?;
    Ok(Created(user))
}

/// List users
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(PaginationParams),
    responses((status = 200, description = "Page of users", body = Vec<UserResponse>))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.services.users().list_users(page).await?;
    Ok(Json(users))
}

/// List active users, newest first
#[utoipa::path(
    get,
    path = "/users/active",
    tag = "Users",
    params(PaginationParams),
    responses((status = 200, description = "Page of active users", body = Vec<UserResponse>))
)]
pub async fn list_active_users(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.services.users().list_active_users(page).await?;
    Ok(Json(users))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().get_user(id).await?;
    Ok(Json(user))
}

/// Get user by email address
#[utoipa::path(
    get,
    path = "/users/email/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "Email address")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().get_user_by_email(&email).await?;
    Ok(Json(user))
}

/// Get user by username
#[utoipa::path(
    get,
    path = "/users/username/{username}",
    tag = "Users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .users()
        .get_user_by_username(&username)
        .await?;
    Ok(Json(user))
}

/// Update user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email or username already taken"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UserUpdate>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().update_user(id, payload).await?;
    Ok(Json(user))
}

/// Delete user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.services.users().delete_user(id).await?;
    Ok(NoContent)
}

/// Activate user
#[utoipa::path(
    post,
    path = "/users/{id}/activate",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User activated", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn activate_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().set_active(id, true).await?;
    Ok(Json(user))
}

/// Deactivate user
#[utoipa::path(
    post,
    path = "/users/{id}/deactivate",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deactivated", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().set_active(id, false).await?;
    Ok(Json(user))
}

/// Roles granted to a user
#[utoipa::path(
    get,
    path = "/users/{id}/roles",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Roles of the user", body = Vec<RoleResponse>),
        (status = 404, description = "User not found")
    )
)]
pub async fn user_roles(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<RoleResponse>>> {
    let roles = state.services.users().user_roles(id).await?;
    Ok(Json(roles))
}
