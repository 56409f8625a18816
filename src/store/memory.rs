use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use error_stack::Report;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

use super::{Error, FollowGraphStore, PostStore, Result, UserDirectory};
use crate::entity::{FollowEdge, NewPost, Post, User};
use crate::types::{PostId, UserId};

/// Storage backend that keeps everything in the process memory.
///
/// Used when `storage = "memory"` and by the test suite. A single
/// lock guards the whole state so cascading deletes and the
/// unique/foreign key checks are atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<UserId, User>,
    edges: BTreeMap<(UserId, UserId), FollowEdge>,
    posts: BTreeMap<PostId, Post>,
    last_user_id: u64,
    last_post_id: u64,
    last_timestamp: Option<NaiveDateTime>,
}

impl State {
    // Timestamps are strictly increasing so that insertion order
    // and creation order never disagree.
    fn next_timestamp(&mut self) -> NaiveDateTime {
        let now = Utc::now().naive_utc();
        let next = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(next);
        next
    }

    fn user_by_name(&self, username: &str) -> Option<&User> {
        self.users.values().find(|user| user.username == username)
    }

    fn users_of(&self, ids: impl Iterator<Item = UserId>) -> Vec<User> {
        let mut users = ids
            .filter_map(|id| self.users.get(&id).cloned())
            .collect::<Vec<_>>();

        users.sort_by_key(|user| user.id);
        users
    }
}

fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl UserDirectory for MemoryStore {
    #[tracing::instrument(skip(self), name = "db.users.find")]
    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    #[tracing::instrument(skip(self), name = "db.users.find_by_name")]
    async fn find_user_by_name(&self, username: &str) -> Result<Option<User>> {
        Ok(self.state.read().await.user_by_name(username).cloned())
    }

    #[tracing::instrument(skip(self), name = "db.users.create")]
    async fn create_user(&self, username: &str) -> Result<UserId> {
        let mut state = self.state.write().await;
        if state.user_by_name(username).is_some() {
            return Err(Report::new(Error::UniqueViolation)
                .attach_printable(format!("username {username:?} is taken")));
        }

        state.last_user_id += 1;
        let id = UserId::new(state.last_user_id);
        let created_at = state.next_timestamp();
        state.users.insert(
            id,
            User {
                id,
                created_at,
                username: username.to_string(),
            },
        );

        Ok(id)
    }

    #[tracing::instrument(skip(self), name = "db.users.rename")]
    async fn rename_user(&self, id: UserId, username: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        if state
            .user_by_name(username)
            .is_some_and(|other| other.id != id)
        {
            return Err(Report::new(Error::UniqueViolation)
                .attach_printable(format!("username {username:?} is taken")));
        }

        let Some(user) = state.users.get_mut(&id) else {
            return Ok(false);
        };
        user.username = username.to_string();

        Ok(true)
    }

    #[tracing::instrument(skip(self), name = "db.users.delete")]
    async fn delete_user(&self, id: UserId) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.users.remove(&id).is_none() {
            return Ok(false);
        }

        state
            .edges
            .retain(|(follower, followed), _| *follower != id && *followed != id);

        state.posts.retain(|_, post| post.author_id != id);
        Ok(true)
    }

    #[tracing::instrument(skip(self), name = "db.users.list")]
    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }
}

#[async_trait]
impl FollowGraphStore for MemoryStore {
    #[tracing::instrument(skip(self), name = "db.follows.find")]
    async fn find_edge(
        &self,
        follower_id: UserId,
        followed_id: UserId,
    ) -> Result<Option<FollowEdge>> {
        let state = self.state.read().await;
        Ok(state.edges.get(&(follower_id, followed_id)).cloned())
    }

    #[tracing::instrument(skip(self), name = "db.follows.insert")]
    async fn insert_edge(&self, follower_id: UserId, followed_id: UserId) -> Result<bool> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&follower_id) || !state.users.contains_key(&followed_id) {
            return Err(Report::new(Error::ForeignKeyViolation)
                .attach_printable("follow edge references a missing user"));
        }

        if state.edges.contains_key(&(follower_id, followed_id)) {
            return Ok(false);
        }

        let created_at = state.next_timestamp();
        state.edges.insert(
            (follower_id, followed_id),
            FollowEdge {
                follower_id,
                followed_id,
                created_at,
            },
        );

        Ok(true)
    }

    #[tracing::instrument(skip(self), name = "db.follows.delete")]
    async fn delete_edge(&self, edge: &FollowEdge) -> Result<bool> {
        let mut state = self.state.write().await;
        let key = (edge.follower_id, edge.followed_id);
        Ok(state.edges.remove(&key).is_some())
    }

    #[tracing::instrument(skip(self), name = "db.follows.followers_of")]
    async fn followers_of(&self, id: UserId) -> Result<Vec<User>> {
        let state = self.state.read().await;
        let ids = state
            .edges
            .keys()
            .filter(|(_, followed)| *followed == id)
            .map(|(follower, _)| *follower);

        Ok(state.users_of(ids))
    }

    #[tracing::instrument(skip(self), name = "db.follows.following_of")]
    async fn following_of(&self, id: UserId) -> Result<Vec<User>> {
        let state = self.state.read().await;
        let ids = state
            .edges
            .keys()
            .filter(|(follower, _)| *follower == id)
            .map(|(_, followed)| *followed);

        Ok(state.users_of(ids))
    }

    #[tracing::instrument(skip(self), name = "db.follows.followee_ids")]
    async fn followee_ids(&self, id: UserId) -> Result<Option<Vec<UserId>>> {
        let state = self.state.read().await;
        if !state.users.contains_key(&id) {
            return Ok(None);
        }

        let ids = state
            .edges
            .keys()
            .filter(|(follower, _)| *follower == id)
            .map(|(_, followed)| *followed)
            .collect();

        Ok(Some(ids))
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    #[tracing::instrument(skip_all, fields(author_id = %post.author_id), name = "db.posts.create")]
    async fn create_post(&self, post: NewPost<'_>) -> Result<Post> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&post.author_id) {
            return Err(Report::new(Error::ForeignKeyViolation)
                .attach_printable("post author does not exist"));
        }

        state.last_post_id += 1;
        let post = Post {
            id: PostId::new(state.last_post_id),
            created_at: state.next_timestamp(),
            author_id: post.author_id,
            content: post.content.to_string(),
            updated_at: None,
        };
        state.posts.insert(post.id, post.clone());

        Ok(post)
    }

    #[tracing::instrument(skip(self), name = "db.posts.find")]
    async fn find_post(&self, id: PostId) -> Result<Option<Post>> {
        Ok(self.state.read().await.posts.get(&id).cloned())
    }

    #[tracing::instrument(skip(self, content), name = "db.posts.update")]
    async fn update_post(&self, id: PostId, content: &str) -> Result<Option<Post>> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&id) {
            return Ok(None);
        }

        let updated_at = state.next_timestamp();
        Ok(state.posts.get_mut(&id).map(|post| {
            post.content = content.to_string();
            post.updated_at = Some(updated_at);
            post.clone()
        }))
    }

    #[tracing::instrument(skip(self), name = "db.posts.delete")]
    async fn delete_post(&self, id: PostId) -> Result<bool> {
        Ok(self.state.write().await.posts.remove(&id).is_some())
    }

    #[tracing::instrument(skip(self), name = "db.posts.by_author")]
    async fn posts_by_author(&self, author_id: UserId) -> Result<Vec<Post>> {
        let state = self.state.read().await;
        let mut posts = state
            .posts
            .values()
            .filter(|post| post.author_id == author_id)
            .cloned()
            .collect::<Vec<_>>();

        sort_newest_first(&mut posts);
        Ok(posts)
    }

    #[tracing::instrument(skip(self), name = "db.posts.by_authors")]
    async fn posts_by_authors(&self, author_ids: &BTreeSet<UserId>) -> Result<Vec<Post>> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let state = self.state.read().await;
        let mut posts = state
            .posts
            .values()
            .filter(|post| author_ids.contains(&post.author_id))
            .cloned()
            .collect::<Vec<_>>();

        sort_newest_first(&mut posts);
        Ok(posts)
    }
}
