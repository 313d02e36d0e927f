//! Profile schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::infra::repositories::entities::{ProfileModel, UserModel};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProfileCreate {
    pub user_id: i32,
    pub bio: Option<String>,
    #[validate(url(message = "Website must be a valid URL"))]
    #[schema(example = "https://example.com")]
    pub website: Option<String>,
    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
    #[validate(url(message = "Avatar URL must be a valid URL"))]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ProfileUpdate {
    pub bio: Option<String>,
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
    #[validate(url(message = "Avatar URL must be a valid URL"))]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: i32,
    pub user_id: i32,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<ProfileModel> for ProfileResponse {
    fn from(model: ProfileModel) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            bio: model.bio,
            website: model.website,
            location: model.location,
            avatar_url: model.avatar_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserInProfile {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<UserModel> for UserInProfile {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProfileDetailResponse {
    pub id: i32,
    pub user_id: i32,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub user: Option<UserInProfile>,
}

impl ProfileDetailResponse {
    pub fn new(model: ProfileModel, user: Option<UserModel>) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            bio: model.bio,
            website: model.website,
            location: model.location,
            avatar_url: model.avatar_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
            user: user.map(UserInProfile::from),
        }
    }
}

/// Filters for `GET /profiles`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfileListQuery {
    /// Case-insensitive substring match on location
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_urls_are_validated() {
        let mut payload = ProfileCreate {
            user_id: 1,
            bio: None,
            website: Some("https://example.com".to_string()),
            location: Some("Demo City".to_string()),
            avatar_url: None,
        };
        assert!(payload.validate().is_ok());

        payload.website = Some("example dot com".to_string());
        assert!(payload.validate().is_err());
    }
}
