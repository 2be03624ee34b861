use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{BuddyMatch, UserProfile};

/// Response for the study buddy endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuddyMatchesResponse {
    pub matches: Vec<BuddyMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileResponse {
    pub message: String,
    pub user: UserProfile,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Name and contact of a user, embedded wherever a group or post refers to one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&UserProfile> for Author {
    fn from(user: &UserProfile) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Study group with creator and members resolved.
///
/// `createdBy` is `null` and members are omitted when the user no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub subjects: Vec<String>,
    #[serde(rename = "createdBy")]
    pub created_by: Option<Author>,
    pub members: Vec<Author>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub text: String,
    #[serde(rename = "createdBy")]
    pub created_by: Option<Author>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpPostView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "createdBy")]
    pub created_by: Option<Author>,
    pub comments: Vec<CommentView>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentAddedResponse {
    pub message: String,
    pub post: HelpPostView,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
