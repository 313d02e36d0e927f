//! User schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::infra::repositories::entities::UserModel;

fn default_true() -> bool {
    true
}

/// User creation payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UserCreate {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    #[schema(example = "johndoe")]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Partial user update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UserUpdate {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

/// User as returned to clients (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "johndoe")]
    pub username: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<UserModel> for UserResponse {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Compact author reference embedded in posts and comments
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AuthorSummary {
    pub id: i32,
    pub username: String,
}

impl From<UserModel> for AuthorSummary {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            username: model.username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(email: &str, username: &str, password: &str) -> UserCreate {
        UserCreate {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_user_create_validation() {
        assert!(payload("a@b.com", "alice", "password1").validate().is_ok());
        assert!(payload("not-an-email", "alice", "password1").validate().is_err());
        assert!(payload("a@b.com", "", "password1").validate().is_err());
        assert!(payload("a@b.com", "alice", "short").validate().is_err());
    }

    #[test]
    fn test_user_create_defaults_active() {
        let parsed: UserCreate = serde_json::from_str(
            r#"{"email":"a@b.com","username":"alice","password":"password1"}"#,
        )
        .unwrap();
        assert!(parsed.is_active);
    }

    #[test]
    fn test_user_update_skips_absent_fields() {
        let update = UserUpdate {
            username: Some("bob".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }
}
