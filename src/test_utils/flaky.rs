use async_trait::async_trait;
use error_stack::Report;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::entity::{FollowEdge, NewPost, Post, User};
use crate::store::{Error, FollowGraphStore, MemoryStore, PostStore, Result, UserDirectory};
use crate::types::{PostId, UserId};

pub const FAILURE_CAUSE: &str = "simulated storage outage";

/// [`MemoryStore`] wrapper that fails follow or post operations on
/// demand, counts reads and records every batched author query.
#[derive(Debug, Clone, Default)]
pub struct FlakyStore {
    inner: Arc<State>,
}

#[derive(Debug, Default)]
struct State {
    store: MemoryStore,
    fail_follows: AtomicBool,
    fail_posts: AtomicBool,
    reads: AtomicUsize,
    author_queries: Mutex<Vec<BTreeSet<UserId>>>,
}

impl FlakyStore {
    pub fn fail_follows(&self, fail: bool) {
        self.inner.fail_follows.store(fail, Ordering::SeqCst);
    }

    pub fn fail_posts(&self, fail: bool) {
        self.inner.fail_posts.store(fail, Ordering::SeqCst);
    }

    pub fn author_queries(&self) -> Vec<BTreeSet<UserId>> {
        self.inner.author_queries.lock().unwrap().clone()
    }

    /// Amount of reads since the last call.
    pub fn take_reads(&self) -> usize {
        self.inner.reads.swap(0, Ordering::SeqCst)
    }

    fn read(&self) -> &MemoryStore {
        self.inner.reads.fetch_add(1, Ordering::SeqCst);
        &self.inner.store
    }

    fn check(flag: &AtomicBool) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(Report::new(Error::internal(FAILURE_CAUSE)))
        } else {
            Ok(())
        }
    }

    fn check_follows(&self) -> Result<()> {
        Self::check(&self.inner.fail_follows)
    }

    fn check_posts(&self) -> Result<()> {
        Self::check(&self.inner.fail_posts)
    }
}

#[async_trait]
impl UserDirectory for FlakyStore {
    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        self.read().find_user(id).await
    }

    async fn find_user_by_name(&self, username: &str) -> Result<Option<User>> {
        self.read().find_user_by_name(username).await
    }

    async fn create_user(&self, username: &str) -> Result<UserId> {
        self.inner.store.create_user(username).await
    }

    async fn rename_user(&self, id: UserId, username: &str) -> Result<bool> {
        self.inner.store.rename_user(id, username).await
    }

    async fn delete_user(&self, id: UserId) -> Result<bool> {
        self.inner.store.delete_user(id).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.read().list_users().await
    }
}

#[async_trait]
impl FollowGraphStore for FlakyStore {
    async fn find_edge(
        &self,
        follower_id: UserId,
        followed_id: UserId,
    ) -> Result<Option<FollowEdge>> {
        self.check_follows()?;
        self.read().find_edge(follower_id, followed_id).await
    }

    async fn insert_edge(&self, follower_id: UserId, followed_id: UserId) -> Result<bool> {
        self.check_follows()?;
        self.inner.store.insert_edge(follower_id, followed_id).await
    }

    async fn delete_edge(&self, edge: &FollowEdge) -> Result<bool> {
        self.check_follows()?;
        self.inner.store.delete_edge(edge).await
    }

    async fn followers_of(&self, id: UserId) -> Result<Vec<User>> {
        self.check_follows()?;
        self.read().followers_of(id).await
    }

    async fn following_of(&self, id: UserId) -> Result<Vec<User>> {
        self.check_follows()?;
        self.read().following_of(id).await
    }

    async fn followee_ids(&self, id: UserId) -> Result<Option<Vec<UserId>>> {
        self.check_follows()?;
        self.read().followee_ids(id).await
    }
}

#[async_trait]
impl PostStore for FlakyStore {
    async fn create_post(&self, post: NewPost<'_>) -> Result<Post> {
        self.check_posts()?;
        self.inner.store.create_post(post).await
    }

    async fn find_post(&self, id: PostId) -> Result<Option<Post>> {
        self.check_posts()?;
        self.read().find_post(id).await
    }

    async fn update_post(&self, id: PostId, content: &str) -> Result<Option<Post>> {
        self.check_posts()?;
        self.inner.store.update_post(id, content).await
    }

    async fn delete_post(&self, id: PostId) -> Result<bool> {
        self.check_posts()?;
        self.inner.store.delete_post(id).await
    }

    async fn posts_by_author(&self, author_id: UserId) -> Result<Vec<Post>> {
        self.check_posts()?;
        self.read().posts_by_author(author_id).await
    }

    async fn posts_by_authors(&self, author_ids: &BTreeSet<UserId>) -> Result<Vec<Post>> {
        self.inner
            .author_queries
            .lock()
            .unwrap()
            .push(author_ids.clone());

        self.check_posts()?;
        self.read().posts_by_authors(author_ids).await
    }
}
