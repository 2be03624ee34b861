use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::{ProfileUpdate, Skill, StudyPreference};

/// Rejects values that are empty once surrounding whitespace is removed
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Partial profile update
///
/// An unknown `studyPreference` is rejected while the body is parsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "not_blank", message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub branch: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Year must be between 1 and 5"))]
    pub year: Option<u8>,
    pub subjects: Option<Vec<String>>,
    pub skills: Option<Vec<Skill>>,
    #[serde(rename = "studyPreference")]
    pub study_preference: Option<StudyPreference>,
    pub availability: Option<Vec<String>>,
}

impl UpdateProfileRequest {
    pub fn into_update(self) -> ProfileUpdate {
        ProfileUpdate {
            name: self.name,
            branch: self.branch,
            year: self.year,
            subjects: self.subjects,
            skills: self.skills,
            study_preference: self.study_preference,
            availability: self.availability,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Group name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateHelpPostRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Comment text is required"))]
    pub text: String,
}
