//! Role handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{RoleCreate, RoleDetailResponse, RoleResponse, RoleUpdate};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, PaginationParams};

/// Create role routes
pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:id", get(get_role).put(update_role).delete(delete_role))
        .route("/:id/users/:user_id", post(assign_role).delete(remove_role))
}

/// Create a role
#[utoipa::path(
    post,
    path = "/roles",
    tag = "Roles",
    request_body = RoleCreate,
    responses(
        (status = 201, description = "Role created", body = RoleResponse),
        (status = 409, description = "Role name already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_role(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RoleCreate>,
) -> AppResult<Created<RoleResponse>> {
    let role = state.services.roles().create_role(payload).await?;
    Ok(Created(role))
}

/// List roles by name
#[utoipa::path(
    get,
    path = "/roles",
    tag = "Roles",
    params(PaginationParams),
    responses((status = 200, description = "Page of roles", body = Vec<RoleResponse>))
)]
pub async fn list_roles(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Vec<RoleResponse>>> {
    let roles = state.services.roles().list_roles(page).await?;
    Ok(Json(roles))
}

/// Get role with its users
#[utoipa::path(
    get,
    path = "/roles/{id}",
    tag = "Roles",
    params(("id" = i32, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role", body = RoleDetailResponse),
        (status = 404, description = "Role not found")
    )
)]
pub async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<RoleDetailResponse>> {
    let role = state.services.roles().get_role(id).await?;
    Ok(Json(role))
}

/// Update role
#[utoipa::path(
    put,
    path = "/roles/{id}",
    tag = "Roles",
    params(("id" = i32, Path, description = "Role ID")),
    request_body = RoleUpdate,
    responses(
        (status = 200, description = "Role updated", body = RoleResponse),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Role name already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<RoleUpdate>,
) -> AppResult<Json<RoleResponse>> {
    let role = state.services.roles().update_role(id, payload).await?;
    Ok(Json(role))
}

/// Delete role
#[utoipa::path(
    delete,
    path = "/roles/{id}",
    tag = "Roles",
    params(("id" = i32, Path, description = "Role ID")),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 404, description = "Role not found")
    )
)]
pub async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.services.roles().delete_role(id).await?;
    Ok(NoContent)
}

/// Grant a role to a user
#[utoipa::path(
    post,
    path = "/roles/{id}/users/{user_id}",
    tag = "Roles",
    params(
        ("id" = i32, Path, description = "Role ID"),
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Role with its users", body = RoleDetailResponse),
        (status = 404, description = "Role or user not found")
    )
)]
pub async fn assign_role(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i32, i32)>,
) -> AppResult<Json<RoleDetailResponse>> {
    let role = state.services.roles().assign_role(id, user_id).await?;
    Ok(Json(role))
}

/// Revoke a role from a user
#[utoipa::path(
    delete,
    path = "/roles/{id}/users/{user_id}",
    tag = "Roles",
    params(
        ("id" = i32, Path, description = "Role ID"),
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Role with its users", body = RoleDetailResponse),
        (status = 404, description = "Role or user not found")
    )
)]
pub async fn remove_role(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i32, i32)>,
) -> AppResult<Json<RoleDetailResponse>> {
    let role = state.services.roles().remove_role(id, user_id).await?;
    Ok(Json(role))
}
