use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Comment, GroupError, HelpPost, ProfileUpdate, StudyGroup, UserProfile};

/// Errors that can occur when reading or writing application data
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error(transparent)]
    Membership(#[from] GroupError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Read/write access to user profiles
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<UserProfile, StoreError>;

    /// Every profile except the one with `id`, in storage order
    async fn find_all_except(&self, id: Uuid) -> Result<Vec<UserProfile>, StoreError>;

    /// Profiles for the given ids; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserProfile>, StoreError>;

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<UserProfile, StoreError>;
}

/// Study groups. Membership changes are applied atomically per group so
/// concurrent joins and leaves never overwrite each other.
#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn list_groups(&self) -> Result<Vec<StudyGroup>, StoreError>;

    async fn create_group(&self, group: StudyGroup) -> Result<StudyGroup, StoreError>;

    /// Apply [`StudyGroup::join`] to the stored group
    async fn add_member(&self, group_id: Uuid, user_id: Uuid) -> Result<StudyGroup, StoreError>;

    /// Apply [`StudyGroup::leave`] to the stored group
    async fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> Result<StudyGroup, StoreError>;
}

#[async_trait]
pub trait HelpStore: Send + Sync {
    /// All help posts, newest first
    async fn list_help_posts(&self) -> Result<Vec<HelpPost>, StoreError>;

    async fn create_help_post(&self, post: HelpPost) -> Result<HelpPost, StoreError>;

    /// Append to the post's comments without touching existing ones
    async fn append_comment(&self, post_id: Uuid, comment: Comment) -> Result<HelpPost, StoreError>;
}

/// Full storage backend used by the HTTP layer
#[async_trait]
pub trait Store: UserStore + GroupStore + HelpStore {
    async fn health_check(&self) -> Result<bool, StoreError>;
}
