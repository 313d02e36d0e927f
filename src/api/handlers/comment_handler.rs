//! Comment handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    CommentCreate, CommentDetailResponse, CommentListQuery, CommentResponse, CommentTreeNode,
    CommentUpdate, ReplyCreate,
};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, PaginationParams};

/// Create comment routes
pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_comments).post(create_comment))
        .route(
            "/:id",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
        .route("/:id/replies", post(reply_to_comment))
        .route("/:id/tree", get(comment_tree))
}

/// Comment on a post, optionally as a reply
#[utoipa::path(
    post,
    path = "/comments",
    tag = "Comments",
    request_body = CommentCreate,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 404, description = "User, post or parent comment not found"),
        (status = 422, description = "Validation error or parent on another post")
    )
)]
pub async fn create_comment(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CommentCreate>,
) -> AppResult<Created<CommentResponse>> {
    let comment = state.services.comments().create_comment(payload).await?;
    Ok(Created(comment))
}

/// List comments; top-level only when no filter is given
#[utoipa::path(
    get,
    path = "/comments",
    tag = "Comments",
    params(CommentListQuery, PaginationParams),
    responses((status = 200, description = "Page of comments", body = Vec<CommentResponse>))
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentListQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let comments = state.services.comments().list_comments(query, page).await?;
    Ok(Json(comments))
}

/// Get comment with author and direct replies
#[utoipa::path(
    get,
    path = "/comments/{id}",
    tag = "Comments",
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment", body = CommentDetailResponse),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CommentDetailResponse>> {
    let comment = state.services.comments().get_comment(id).await?;
    Ok(Json(comment))
}

/// Update comment
#[utoipa::path(
    put,
    path = "/comments/{id}",
    tag = "Comments",
    params(("id" = i32, Path, description = "Comment ID")),
    request_body = CommentUpdate,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 404, description = "Comment not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<CommentUpdate>,
) -> AppResult<Json<CommentResponse>> {
    let comment = state
        .services
        .comments()
        .update_comment(id, payload)
        .await?;
    Ok(Json(comment))
}

/// Delete comment and its replies
#[utoipa::path(
    delete,
    path = "/comments/{id}",
    tag = "Comments",
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.services.comments().delete_comment(id).await?;
    Ok(NoContent)
}

/// Reply to a comment
#[utoipa::path(
    post,
    path = "/comments/{id}/replies",
    tag = "Comments",
    params(("id" = i32, Path, description = "Parent comment ID")),
    request_body = ReplyCreate,
    responses(
        (status = 201, description = "Reply created", body = CommentResponse),
        (status = 404, description = "Parent comment or user not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn reply_to_comment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ReplyCreate>,
) -> AppResult<Created<CommentResponse>> {
    let reply = state.services.comments().reply(id, payload).await?;
    Ok(Created(reply))
}

/// Comment with its whole reply tree
#[utoipa::path(
    get,
    path = "/comments/{id}/tree",
    tag = "Comments",
    params(("id" = i32, Path, description = "Root comment ID")),
    responses(
        (status = 200, description = "Reply tree", body = CommentTreeNode),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn comment_tree(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CommentTreeNode>> {
    let tree = state.services.comments().comment_tree(id).await?;
    Ok(Json(tree))
}
