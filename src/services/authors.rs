use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{Author, CommentView, GroupView, HelpPost, HelpPostView, StudyGroup};
use crate::services::store::{StoreError, UserStore};

/// Users referenced by groups and help posts, loaded in one batch
#[derive(Debug, Default)]
pub struct AuthorDirectory {
    authors: HashMap<Uuid, Author>,
}

impl AuthorDirectory {
    pub async fn load<S>(store: &S, ids: impl IntoIterator<Item = Uuid>) -> Result<Self, StoreError>
    where
        S: UserStore + ?Sized,
    {
        let mut ids: Vec<Uuid> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();

        if ids.is_empty() {
            return Ok(Self::default());
        }

        let users = store.find_by_ids(&ids).await?;

        tracing::debug!("Resolved {} of {} referenced users", users.len(), ids.len());

        Ok(Self {
            authors: users.iter().map(|u| (u.id, Author::from(u))).collect(),
        })
    }

    /// Creators and members of every group
    pub async fn for_groups<S>(store: &S, groups: &[StudyGroup]) -> Result<Self, StoreError>
    where
        S: UserStore + ?Sized,
    {
        let ids = groups
            .iter()
            .flat_map(|g| std::iter::once(g.created_by).chain(g.members.iter().copied()));
        Self::load(store, ids).await
    }

    /// Authors of every post and of every comment on them
    pub async fn for_help_posts<S>(store: &S, posts: &[HelpPost]) -> Result<Self, StoreError>
    where
        S: UserStore + ?Sized,
    {
        let ids = posts
            .iter()
            .flat_map(|p| std::iter::once(p.created_by).chain(p.comments.iter().map(|c| c.created_by)));
        Self::load(store, ids).await
    }

    pub fn get(&self, id: Uuid) -> Option<Author> {
        self.authors.get(&id).cloned()
    }

    pub fn group_view(&self, group: &StudyGroup) -> GroupView {
        GroupView {
            id: group.id,
            name: group.name.clone(),
            description: group.description.clone(),
            subjects: group.subjects.clone(),
            created_by: self.get(group.created_by),
            members: group.members.iter().filter_map(|id| self.get(*id)).collect(),
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }

    pub fn help_post_view(&self, post: &HelpPost) -> HelpPostView {
        HelpPostView {
            id: post.id,
            title: post.title.clone(),
            description: post.description.clone(),
            created_by: self.get(post.created_by),
            comments: post
                .comments
                .iter()
                .map(|c| CommentView {
                    id: c.id,
                    text: c.text.clone(),
                    created_by: self.get(c.created_by),
                    created_at: c.created_at,
                })
                .collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
