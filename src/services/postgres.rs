use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;
use uuid::Uuid;

use crate::config::DatabaseSettings;
use crate::models::{
    Comment, GroupError, HelpPost, ProfileUpdate, Role, Skill, StudyGroup, StudyPreference, UserProfile,
};
use crate::services::store::{GroupStore, HelpStore, Store, StoreError, UserStore};

const USER_COLUMNS: &str = "id, name, email, branch, year, subjects, skills, availability, \
                            study_preference, points, role, created_at";

const GROUP_COLUMNS: &str = "id, name, description, subjects, created_by, members, created_at, updated_at";

const HELP_POST_COLUMNS: &str = "id, title, description, created_by, comments, created_at, updated_at";

/// PostgreSQL-backed store
///
/// List attributes are kept in array columns; skills and comments are
/// embedded documents stored as JSONB.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and run the embedded migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        tracing::info!(
            "Connecting to PostgreSQL (max: {}, min: {} connections)",
            settings.max_connections,
            settings.min_connections
        );

        Self::new(
            &settings.url,
            settings.max_connections,
            settings.min_connections,
            Duration::from_secs(settings.acquire_timeout_secs),
            Duration::from_secs(settings.idle_timeout_secs),
        )
        .await
    }

    /// Apply a membership rule to a group under a row lock
    async fn change_members<F>(&self, group_id: Uuid, change: F) -> Result<StudyGroup, StoreError>
    where
        F: FnOnce(&mut StudyGroup) -> Result<(), GroupError> + Send,
    {
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT {} FROM study_groups WHERE id = $1 FOR UPDATE", GROUP_COLUMNS);
        let row = sqlx::query(&select)
            .bind(group_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Group {} not found", group_id)))?;

        let mut group = group_from_row(&row)?;
        change(&mut group)?;

        sqlx::query("UPDATE study_groups SET members = $2, updated_at = $3 WHERE id = $1")
            .bind(group_id)
            .bind(&group.members)
            .bind(group.updated_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(group)
    }
}

fn user_from_row(row: &PgRow) -> Result<UserProfile, StoreError> {
    let id: Uuid = row.try_get("id")?;
    let year: i16 = row.try_get("year")?;
    let preference: Option<String> = row.try_get("study_preference")?;
    let role: String = row.try_get("role")?;
    let Json(skills): Json<Vec<Skill>> = row.try_get("skills")?;

    Ok(UserProfile {
        id,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        branch: row.try_get("branch")?,
        year: u8::try_from(year)
            .map_err(|_| StoreError::CorruptRecord(format!("User {} has year {}", id, year)))?,
        subjects: row.try_get("subjects")?,
        skills,
        availability: row.try_get("availability")?,
        study_preference: parse_study_preference(id, preference)?,
        points: row.try_get("points")?,
        role: role.parse().unwrap_or(Role::Student),
        created_at: row.try_get("created_at")?,
    })
}

/// Unknown labels are rejected rather than read as "no preference", which
/// would make two different labels score as a match.
fn parse_study_preference(id: Uuid, label: Option<String>) -> Result<Option<StudyPreference>, StoreError> {
    label
        .map(|label| {
            label
                .parse()
                .map_err(|e| StoreError::CorruptRecord(format!("User {}: {}", id, e)))
        })
        .transpose()
}

fn group_from_row(row: &PgRow) -> Result<StudyGroup, StoreError> {
    Ok(StudyGroup {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        subjects: row.try_get("subjects")?,
        created_by: row.try_get("created_by")?,
        members: row.try_get("members")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn help_post_from_row(row: &PgRow) -> Result<HelpPost, StoreError> {
    let Json(comments): Json<Vec<Comment>> = row.try_get("comments")?;

    Ok(HelpPost {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        created_by: row.try_get("created_by")?,
        comments,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn find_by_id(&self, id: Uuid) -> Result<UserProfile, StoreError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("User {} not found", id)))?;

        user_from_row(&row)
    }

    async fn find_all_except(&self, id: Uuid) -> Result<Vec<UserProfile>, StoreError> {
        let query = format!(
            "SELECT {} FROM users WHERE id <> $1 ORDER BY created_at, id",
            USER_COLUMNS
        );

        let rows = sqlx::query(&query).bind(id).fetch_all(&self.pool).await?;

        tracing::debug!("Loaded {} candidate profiles excluding {}", rows.len(), id);

        rows.iter().map(user_from_row).collect()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserProfile>, StoreError> {
        let query = format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS);

        let rows = sqlx::query(&query).bind(ids).fetch_all(&self.pool).await?;

        rows.iter().map(user_from_row).collect()
    }

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<UserProfile, StoreError> {
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT {} FROM users WHERE id = $1 FOR UPDATE", USER_COLUMNS);
        let row = sqlx::query(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("User {} not found", id)))?;

        let mut profile = user_from_row(&row)?;
        update.apply(&mut profile);

        let query = r#"
            UPDATE users SET
                name = $2,
                branch = $3,
                year = $4,
                subjects = $5,
                skills = $6,
                availability = $7,
                study_preference = $8
            WHERE id = $1
        "#;

        sqlx::query(query)
            .bind(id)
            .bind(&profile.name)
            .bind(&profile.branch)
            .bind(i16::from(profile.year))
            .bind(&profile.subjects)
            .bind(Json(&profile.skills))
            .bind(&profile.availability)
            .bind(profile.study_preference.map(|p| p.as_str()))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(profile)
    }
}

#[async_trait]
impl GroupStore for PostgresStore {
    async fn list_groups(&self) -> Result<Vec<StudyGroup>, StoreError> {
        let query = format!("SELECT {} FROM study_groups ORDER BY created_at, id", GROUP_COLUMNS);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        rows.iter().map(group_from_row).collect()
    }

    async fn create_group(&self, group: StudyGroup) -> Result<StudyGroup, StoreError> {
        let query = r#"
            INSERT INTO study_groups (id, name, description, subjects, created_by, members, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#;

        sqlx::query(query)
            .bind(group.id)
            .bind(&group.name)
            .bind(&group.description)
            .bind(&group.subjects)
            .bind(group.created_by)
            .bind(&group.members)
            .bind(group.created_at)
            .bind(group.updated_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Created study group {} by {}", group.id, group.created_by);

        Ok(group)
    }

    async fn add_member(&self, group_id: Uuid, user_id: Uuid) -> Result<StudyGroup, StoreError> {
        self.change_members(group_id, |group| group.join(user_id)).await
    }

    async fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> Result<StudyGroup, StoreError> {
        self.change_members(group_id, |group| group.leave(user_id)).await
    }
}

#[async_trait]
impl HelpStore for PostgresStore {
    async fn list_help_posts(&self) -> Result<Vec<HelpPost>, StoreError> {
        let query = format!("SELECT {} FROM help_posts ORDER BY created_at DESC", HELP_POST_COLUMNS);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        rows.iter().map(help_post_from_row).collect()
    }

    async fn create_help_post(&self, post: HelpPost) -> Result<HelpPost, StoreError> {
        let query = r#"
            INSERT INTO help_posts (id, title, description, created_by, comments, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#;

        sqlx::query(query)
            .bind(post.id)
            .bind(&post.title)
            .bind(&post.description)
            .bind(post.created_by)
            .bind(Json(&post.comments))
            .bind(post.created_at)
            .bind(post.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(post)
    }

    /// Concatenates in the database so concurrent comments all land
    async fn append_comment(&self, post_id: Uuid, comment: Comment) -> Result<HelpPost, StoreError> {
        let query = format!(
            r#"
            UPDATE help_posts SET
                comments = comments || $2,
                updated_at = $3
            WHERE id = $1
            RETURNING {}
            "#,
            HELP_POST_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(post_id)
            .bind(Json(vec![&comment]))
            .bind(comment.created_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Help post {} not found", post_id)))?;

        tracing::debug!("Appended comment {} to help post {}", comment.id, post_id);

        help_post_from_row(&row)
    }
}

#[async_trait]
impl Store for PostgresStore {
    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
