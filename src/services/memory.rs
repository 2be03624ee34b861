use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Comment, HelpPost, ProfileUpdate, StudyGroup, UserProfile};
use crate::services::store::{GroupStore, HelpStore, Store, StoreError, UserStore};

/// In-process store for tests and embedding
///
/// Records live in insertion-ordered vectors so that listing and ranking
/// are deterministic; the index maps give O(1) lookup by id. Every mutation
/// happens under the table's write lock. Profiles are seeded with
/// [`MemoryStore::with_users`].
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Table<UserProfile>>,
    groups: RwLock<Table<StudyGroup>>,
    help_posts: RwLock<Table<HelpPost>>,
}

struct Table<T> {
    rows: Vec<T>,
    index: HashMap<Uuid, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn get(&self, id: Uuid) -> Option<&T> {
        self.index.get(&id).map(|&i| &self.rows[i])
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut T> {
        match self.index.get(&id) {
            Some(&i) => Some(&mut self.rows[i]),
            None => None,
        }
    }

    /// Insert or replace
    fn upsert(&mut self, id: Uuid, row: T) {
        match self.index.get(&id) {
            Some(&i) => self.rows[i] = row,
            None => {
                self.index.insert(id, self.rows.len());
                self.rows.push(row);
            }
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given profiles
    pub fn with_users(users: impl IntoIterator<Item = UserProfile>) -> Self {
        let mut table = Table::default();
        for user in users {
            table.upsert(user.id, user);
        }
        Self {
            users: RwLock::new(table),
            ..Default::default()
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<UserProfile, StoreError> {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("User {} not found", id)))
    }

    async fn find_all_except(&self, id: Uuid) -> Result<Vec<UserProfile>, StoreError> {
        let users = self.users.read().await;
        Ok(users.rows.iter().filter(|u| u.id != id).cloned().collect())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserProfile>, StoreError> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(*id).cloned()).collect())
    }

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<UserProfile, StoreError> {
        let mut users = self.users.write().await;
        let profile = users
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("User {} not found", id)))?;
        update.apply(profile);
        Ok(profile.clone())
    }
}

#[async_trait]
impl GroupStore for MemoryStore {
    async fn list_groups(&self) -> Result<Vec<StudyGroup>, StoreError> {
        Ok(self.groups.read().await.rows.clone())
    }

    async fn create_group(&self, group: StudyGroup) -> Result<StudyGroup, StoreError> {
        self.groups.write().await.upsert(group.id, group.clone());
        Ok(group)
    }

    async fn add_member(&self, group_id: Uuid, user_id: Uuid) -> Result<StudyGroup, StoreError> {
        let mut groups = self.groups.write().await;
        let group = groups
            .get_mut(group_id)
            .ok_or_else(|| StoreError::NotFound(format!("Group {} not found", group_id)))?;
        group.join(user_id)?;
        Ok(group.clone())
    }

    async fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> Result<StudyGroup, StoreError> {
        let mut groups = self.groups.write().await;
        let group = groups
            .get_mut(group_id)
            .ok_or_else(|| StoreError::NotFound(format!("Group {} not found", group_id)))?;
        group.leave(user_id)?;
        Ok(group.clone())
    }
}

#[async_trait]
impl HelpStore for MemoryStore {
    async fn list_help_posts(&self) -> Result<Vec<HelpPost>, StoreError> {
        let mut posts = self.help_posts.read().await.rows.clone();
        // equal timestamps: later insertion first
        posts.reverse();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn create_help_post(&self, post: HelpPost) -> Result<HelpPost, StoreError> {
        self.help_posts.write().await.upsert(post.id, post.clone());
        Ok(post)
    }

    async fn append_comment(&self, post_id: Uuid, comment: Comment) -> Result<HelpPost, StoreError> {
        let mut posts = self.help_posts.write().await;
        let post = posts
            .get_mut(post_id)
            .ok_or_else(|| StoreError::NotFound(format!("Help post {} not found", post_id)))?;
        post.add_comment(comment);
        Ok(post.clone())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupError;
    use std::sync::Arc;
    use tokio_test::block_on;

    fn create_user(name: &str) -> UserProfile {
        UserProfile::new(Uuid::new_v4(), name, format!("{}@example.com", name))
    }

    #[test]
    fn test_find_all_except_keeps_insertion_order() {
        let a = create_user("a");
        let b = create_user("b");
        let c = create_user("c");
        let store = MemoryStore::with_users(vec![a.clone(), b.clone(), c.clone()]);

        let others = block_on(store.find_all_except(b.id)).unwrap();

        let names: Vec<&str> = others.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_find_by_id_missing() {
        let store = MemoryStore::new();
        let err = block_on(store.find_by_id(Uuid::new_v4())).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_update_profile() {
        let user = create_user("a");
        let store = MemoryStore::with_users(vec![user.clone()]);

        let update = ProfileUpdate {
            branch: Some("IT".to_string()),
            ..Default::default()
        };
        let updated = block_on(store.update_profile(user.id, &update)).unwrap();

        assert_eq!(updated.branch, "IT");
        assert_eq!(block_on(store.find_by_id(user.id)).unwrap().branch, "IT");
    }

    #[test]
    fn test_find_by_ids_skips_unknown() {
        let a = create_user("a");
        let b = create_user("b");
        let store = MemoryStore::with_users(vec![a.clone(), b.clone()]);

        let found = block_on(store.find_by_ids(&[b.id, Uuid::new_v4(), a.id])).unwrap();

        let names: Vec<&str> = found.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_membership_changes_apply_group_rules() {
        let store = MemoryStore::new();
        let creator = Uuid::new_v4();
        let other = Uuid::new_v4();
        let group = block_on(store.create_group(StudyGroup::new("DBMS", None, vec![], creator))).unwrap();

        let updated = block_on(store.add_member(group.id, other)).unwrap();
        assert_eq!(updated.members, vec![creator, other]);

        let err = block_on(store.add_member(group.id, other)).unwrap_err();
        assert!(matches!(err, StoreError::Membership(GroupError::AlreadyMember)));

        let err = block_on(store.remove_member(group.id, creator)).unwrap_err();
        assert!(matches!(err, StoreError::Membership(GroupError::CreatorMustTransfer)));

        let err = block_on(store.add_member(Uuid::new_v4(), other)).unwrap_err();
        assert!(err.is_not_found());

        let updated = block_on(store.remove_member(group.id, other)).unwrap();
        assert_eq!(updated.members, vec![creator]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_joins_keep_every_member() {
        let store = Arc::new(MemoryStore::new());
        let creator = Uuid::new_v4();
        let group = store
            .create_group(StudyGroup::new("Algorithms", None, vec![], creator))
            .await
            .unwrap();
        let group_id = group.id;

        let joins: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.add_member(group_id, Uuid::new_v4()).await })
            })
            .collect();
        for join in joins {
            join.await.unwrap().unwrap();
        }

        let groups = store.list_groups().await.unwrap();
        assert_eq!(groups[0].members.len(), 17);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_comments_keep_every_comment() {
        let store = Arc::new(MemoryStore::new());
        let post = store
            .create_help_post(HelpPost::new("Recursion", "base cases?", Uuid::new_v4()))
            .await
            .unwrap();
        let post_id = post.id;

        let writers: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                let comment = Comment::new(&format!("hint {}", i), Uuid::new_v4());
                tokio::spawn(async move { store.append_comment(post_id, comment).await })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap().unwrap();
        }

        let posts = store.list_help_posts().await.unwrap();
        assert_eq!(posts[0].comments.len(), 16);

        let err = store
            .append_comment(Uuid::new_v4(), Comment::new("lost", Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_help_posts_newest_first() {
        let store = MemoryStore::new();
        let author = Uuid::new_v4();

        let mut older = HelpPost::new("older", "body", author);
        older.created_at = older.created_at - chrono::Duration::minutes(5);
        block_on(store.create_help_post(older)).unwrap();
        block_on(store.create_help_post(HelpPost::new("newer", "body", author))).unwrap();

        let posts = block_on(store.list_help_posts()).unwrap();
        assert_eq!(posts[0].title, "newer");
        assert_eq!(posts[1].title, "older");
    }
}
