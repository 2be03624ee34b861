use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Deserialize `null` the same way as an absent field.
///
/// Stored profiles are not guaranteed to carry every attribute, and the scorer
/// must see an empty list or zero rather than fail on them.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// How a student prefers to study
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudyPreference {
    #[serde(rename = "Group")]
    Group,
    #[serde(rename = "One-on-One")]
    OneOnOne,
    #[serde(rename = "Doubt Help")]
    DoubtHelp,
}

impl StudyPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyPreference::Group => "Group",
            StudyPreference::OneOnOne => "One-on-One",
            StudyPreference::DoubtHelp => "Doubt Help",
        }
    }
}

impl fmt::Display for StudyPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Group" => Ok(StudyPreference::Group),
            "One-on-One" => Ok(StudyPreference::OneOnOne),
            "Doubt Help" => Ok(StudyPreference::DoubtHelp),
            other => Err(format!("unknown study preference: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// A named skill; only the name takes part in matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub level: Option<SkillLevel>,
}

impl Skill {
    pub fn new(name: impl Into<String>, level: Option<SkillLevel>) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Public academic profile of a user
///
/// Every attribute used by the scorer defaults to empty/zero when it is
/// missing or `null`, so partially filled records still rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub branch: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subjects: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<Skill>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub availability: Vec<String>,
    #[serde(rename = "studyPreference", default)]
    pub study_preference: Option<StudyPreference>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: Role,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Empty profile with only an identity; useful as a builder seed
    pub fn new(id: Uuid, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            branch: String::new(),
            year: 0,
            subjects: Vec::new(),
            skills: Vec::new(),
            availability: Vec::new(),
            study_preference: None,
            points: 0,
            role: Role::Student,
            created_at: Some(Utc::now()),
        }
    }

    /// Study preference label, empty when unset
    pub fn study_preference_label(&self) -> &str {
        self.study_preference.map(|p| p.as_str()).unwrap_or("")
    }

    /// Skill names in declaration order
    pub fn skill_names(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(|s| s.name.as_str())
    }
}

/// Partial profile update; `None` leaves the attribute untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub branch: Option<String>,
    pub year: Option<u8>,
    pub subjects: Option<Vec<String>>,
    pub skills: Option<Vec<Skill>>,
    pub study_preference: Option<StudyPreference>,
    pub availability: Option<Vec<String>>,
}

impl ProfileUpdate {
    pub fn apply(&self, profile: &mut UserProfile) {
        if let Some(name) = &self.name {
            profile.name = name.clone();
        }
        if let Some(branch) = &self.branch {
            profile.branch = branch.clone();
        }
        if let Some(year) = self.year {
            profile.year = year;
        }
        if let Some(subjects) = &self.subjects {
            profile.subjects = subjects.clone();
        }
        if let Some(skills) = &self.skills {
            profile.skills = skills.clone();
        }
        if let Some(preference) = self.study_preference {
            profile.study_preference = Some(preference);
        }
        if let Some(availability) = &self.availability {
            profile.availability = availability.clone();
        }
    }
}

/// Membership rule violations for study groups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("Already a member of this group")]
    AlreadyMember,

    #[error("You are not a member of this group")]
    NotMember,

    #[error("Transfer ownership before leaving or remove all members")]
    CreatorMustTransfer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyGroup {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(rename = "createdBy")]
    pub created_by: Uuid,
    #[serde(default)]
    pub members: Vec<Uuid>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl StudyGroup {
    /// New group with its creator as the only member
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        subjects: Vec<String>,
        creator: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
            subjects: subjects.into_iter().map(|s| s.trim().to_string()).collect(),
            created_by: creator,
            members: vec![creator],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.members.contains(&user_id)
    }

    pub fn join(&mut self, user_id: Uuid) -> Result<(), GroupError> {
        if self.is_member(user_id) {
            return Err(GroupError::AlreadyMember);
        }
        self.members.push(user_id);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Remove a member. The creator may only leave once they are alone.
    pub fn leave(&mut self, user_id: Uuid) -> Result<(), GroupError> {
        if !self.is_member(user_id) {
            return Err(GroupError::NotMember);
        }
        if self.created_by == user_id && self.members.len() > 1 {
            return Err(GroupError::CreatorMustTransfer);
        }
        self.members.retain(|m| *m != user_id);
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    #[serde(rename = "createdBy")]
    pub created_by: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(text: &str, author: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.trim().to_string(),
            created_by: author,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpPost {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "createdBy")]
    pub created_by: Uuid,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl HelpPost {
    pub fn new(title: &str, description: &str, author: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            created_by: author,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_comment(&mut self, comment: Comment) {
        self.updated_at = comment.created_at;
        self.comments.push(comment);
    }
}

/// Explanation of which shared values drove a match score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    #[serde(rename = "commonSubjects")]
    pub common_subjects: Vec<String>,
    #[serde(rename = "commonAvailability")]
    pub common_availability: Vec<String>,
    #[serde(rename = "skillOverlap")]
    pub skill_overlap: Vec<String>,
    #[serde(rename = "branchMatch")]
    pub branch_match: bool,
    #[serde(rename = "yearGap")]
    pub year_gap: u32,
    #[serde(rename = "studyPreferenceMatch")]
    pub study_preference_match: bool,
}

/// Ranked study buddy candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuddyMatch {
    pub user: UserProfile,
    pub score: u8,
    pub breakdown: MatchBreakdown,
}
