//! Comment schemas, including the recursive reply tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::users::AuthorSummary;
use crate::infra::repositories::entities::CommentModel;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CommentCreate {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub user_id: i32,
    pub post_id: i32,
    /// Answer an existing comment on the same post
    pub parent_id: Option<i32>,
}

/// Reply payload; the post is inherited from the parent comment
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReplyCreate {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub user_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CommentUpdate {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CommentResponse {
    pub id: i32,
    pub content: String,
    pub user_id: i32,
    pub post_id: i32,
    pub parent_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<CommentModel> for CommentResponse {
    fn from(model: CommentModel) -> Self {
        Self {
            id: model.id,
            content: model.content,
            user_id: model.user_id,
            post_id: model.post_id,
            parent_id: model.parent_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReplyResponse {
    pub id: i32,
    pub content: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<CommentModel> for ReplyResponse {
    fn from(model: CommentModel) -> Self {
        Self {
            id: model.id,
            content: model.content,
            user_id: model.user_id,
            created_at: model.created_at,
        }
    }
}

/// Comment with its author and direct replies
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CommentDetailResponse {
    pub id: i32,
    pub content: String,
    pub user_id: i32,
    pub post_id: i32,
    pub parent_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author: Option<AuthorSummary>,
    pub replies: Vec<ReplyResponse>,
}

impl CommentDetailResponse {
    pub fn new(
        model: CommentModel,
        author: Option<AuthorSummary>,
        replies: Vec<CommentModel>,
    ) -> Self {
        Self {
            id: model.id,
            content: model.content,
            user_id: model.user_id,
            post_id: model.post_id,
            parent_id: model.parent_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
            author,
            replies: replies.into_iter().map(ReplyResponse::from).collect(),
        }
    }
}

/// A comment and every descendant reply
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CommentTreeNode {
    pub id: i32,
    pub content: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub replies: Vec<CommentTreeNode>,
}

impl CommentTreeNode {
    /// Assemble the tree rooted at `root` from a flat list of descendants.
    pub fn build(root: CommentModel, descendants: &[CommentModel]) -> Self {
        let mut children: Vec<CommentModel> = descendants
            .iter()
            .filter(|c| c.parent_id == Some(root.id))
            .cloned()
            .collect();
        children.sort_by_key(|c| (c.created_at, c.id));

        Self {
            id: root.id,
            content: root.content,
            user_id: root.user_id,
            created_at: root.created_at,
            replies: children
                .into_iter()
                .map(|child| CommentTreeNode::build(child, descendants))
                .collect(),
        }
    }
}

/// Filters for `GET /comments`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CommentListQuery {
    pub post_id: Option<i32>,
    pub user_id: Option<i32>,
    pub parent_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn comment(id: i32, parent_id: Option<i32>, minute: u32) -> CommentModel {
        CommentModel {
            id,
            content: format!("comment {}", id),
            user_id: 1,
            post_id: 1,
            parent_id,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, minute, 0).unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn test_tree_nests_descendants_in_order() {
        let root = comment(1, None, 0);
        let descendants = vec![
            comment(3, Some(1), 5),
            comment(2, Some(1), 1),
            comment(4, Some(2), 2),
            comment(9, Some(42), 3),
        ];

        let tree = CommentTreeNode::build(root, &descendants);

        assert_eq!(tree.id, 1);
        let child_ids: Vec<i32> = tree.replies.iter().map(|r| r.id).collect();
        assert_eq!(child_ids, vec![2, 3]);
        assert_eq!(tree.replies[0].replies[0].id, 4);
        assert!(tree.replies[1].replies.is_empty());
    }
}
