//! Profile handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    ProfileCreate, ProfileDetailResponse, ProfileListQuery, ProfileResponse, ProfileUpdate,
};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, PaginationParams};

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_profiles).post(create_profile))
        .route(
            "/users/:user_id",
            get(get_profile_by_user_id).put(update_profile_by_user_id),
        )
        .route("/username/:username", get(get_profile_by_username))
        .route(
            "/:id",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
}

/// Create a profile for a user
#[utoipa::path(
    post,
    path = "/profiles",
    tag = "Profiles",
    request_body = ProfileCreate,
    responses(
        (status = 201, description = "Profile created", body = ProfileResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "User already has a profile"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_profile(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProfileCreate>,
) -> AppResult<Created<ProfileResponse>> {
    let profile = state.services.profiles().create_profile(payload).await?;
    Ok(Created(profile))
}

/// List profiles
#[utoipa::path(
    get,
    path = "/profiles",
    tag = "Profiles",
    params(ProfileListQuery, PaginationParams),
    responses((status = 200, description = "Page of profiles", body = Vec<ProfileResponse>))
)]
pub async fn list_profiles(
    State(state): State<AppState>,
    Query(query): Query<ProfileListQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Vec<ProfileResponse>>> {
    let profiles = state.services.profiles().list_profiles(query, page).await?;
    Ok(Json(profiles))
}

/// Get profile with its user
#[utoipa::path(
    get,
    path = "/profiles/{id}",
    tag = "Profiles",
    params(("id" = i32, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile", body = ProfileDetailResponse),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ProfileDetailResponse>> {
    let profile = state.services.profiles().get_profile(id).await?;
    Ok(Json(profile))
}

/// Get the profile of a user
#[utoipa::path(
    get,
    path = "/profiles/users/{user_id}",
    tag = "Profiles",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile", body = ProfileDetailResponse),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile_by_user_id(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<ProfileDetailResponse>> {
    let profile = state
        .services
        .profiles()
        .get_profile_by_user_id(user_id)
        .await?;
    Ok(Json(profile))
}

/// Get a profile by its owner's username
#[utoipa::path(
    get,
    path = "/profiles/username/{username}",
    tag = "Profiles",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Profile", body = ProfileDetailResponse),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<ProfileDetailResponse>> {
    let profile = state
        .services
        .profiles()
        .get_profile_by_username(&username)
        .await?;
    Ok(Json(profile))
}

/// Update profile
#[utoipa::path(
    put,
    path = "/profiles/{id}",
    tag = "Profiles",
    params(("id" = i32, Path, description = "Profile ID")),
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 404, description = "Profile not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ProfileUpdate>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state
        .services
        .profiles()
        .update_profile(id, payload)
        .await?;
    Ok(Json(profile))
}

/// Update the profile of a user
#[utoipa::path(
    put,
    path = "/profiles/users/{user_id}",
    tag = "Profiles",
    params(("user_id" = i32, Path, description = "User ID")),
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 404, description = "Profile not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_profile_by_user_id(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ProfileUpdate>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state
        .services
        .profiles()
        .update_profile_by_user_id(user_id, payload)
        .await?;
    Ok(Json(profile))
}

/// Delete profile
#[utoipa::path(
    delete,
    path = "/profiles/{id}",
    tag = "Profiles",
    params(("id" = i32, Path, description = "Profile ID")),
    responses(
        (status = 204, description = "Profile deleted"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn delete_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.services.profiles().delete_profile(id).await?;
    Ok(NoContent)
}
