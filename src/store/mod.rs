//! Storage collaborators consumed by the services.
//!
//! Every backend implements all three traits: [`UserDirectory`],
//! [`FollowGraphStore`] and [`PostStore`]. Services never talk to a
//! backend directly, they only hold `Arc<dyn Trait>` handles.
use async_trait::async_trait;
use error_stack::Report;
use std::collections::BTreeSet;
use std::fmt::Debug;
use thiserror::Error;

use crate::entity::{FollowEdge, NewPost, Post, User};
use crate::types::{PostId, UserId};

pub mod memory;
pub mod postgres;

pub use self::memory::MemoryStore;
pub use self::postgres::PgStore;

/// Storage related errors
#[derive(Debug, Error)]
pub enum Error {
    /// An error caused by an invalid connection url for either
    /// the primary or the replica pool.
    #[error("invalid connection url")]
    InvalidUrl,
    /// Unexpected failure of the backend, the cause is kept
    /// for diagnostics.
    #[error("storage failure: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    /// The primary pool is currently in read mode (most likely
    /// due to maintenance) and should not perform any writes.
    #[error("storage is currently in read mode")]
    Readonly,
    /// Either the primary or replica pools do not have reliable
    /// connection to transact to the database.
    #[error("unhealthy storage pool")]
    UnhealthyPool,
    /// The write collides with an existing unique record.
    #[error("record already exists")]
    UniqueViolation,
    /// The write references a record that does not exist.
    #[error("referenced record does not exist")]
    ForeignKeyViolation,
}

impl Error {
    #[must_use]
    pub fn internal(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Internal(cause.into())
    }
}

/// Lazily typed [`std::result::Result`] but the error generic
/// is filled up with [a storage error](Error).
pub type Result<T> = error_stack::Result<T, Error>;

pub trait ReportExt {
    fn is_unhealthy(&self) -> bool;
    fn is_readonly(&self) -> bool;
    fn is_unique_violation(&self) -> bool;
    fn is_foreign_key_violation(&self) -> bool;
}

impl ReportExt for Report<Error> {
    fn is_unhealthy(&self) -> bool {
        matches!(self.current_context(), Error::UnhealthyPool)
    }

    fn is_readonly(&self) -> bool {
        matches!(self.current_context(), Error::Readonly)
    }

    fn is_unique_violation(&self) -> bool {
        matches!(self.current_context(), Error::UniqueViolation)
    }

    fn is_foreign_key_violation(&self) -> bool {
        matches!(self.current_context(), Error::ForeignKeyViolation)
    }
}

#[async_trait]
pub trait UserDirectory: Debug + Send + Sync {
    async fn find_user(&self, id: UserId) -> Result<Option<User>>;

    async fn find_user_by_name(&self, username: &str) -> Result<Option<User>>;

    /// Fails with [`Error::UniqueViolation`] if the username is taken.
    async fn create_user(&self, username: &str) -> Result<UserId>;

    /// Returns `false` if there is no user with that id.
    async fn rename_user(&self, id: UserId, username: &str) -> Result<bool>;

    /// Removes the user along with their follow edges (in both
    /// directions) and posts. Returns `false` if there is no
    /// user with that id.
    async fn delete_user(&self, id: UserId) -> Result<bool>;

    /// All users ordered by id.
    async fn list_users(&self) -> Result<Vec<User>>;
}

#[async_trait]
pub trait FollowGraphStore: Debug + Send + Sync {
    async fn find_edge(&self, follower_id: UserId, followed_id: UserId)
        -> Result<Option<FollowEdge>>;

    /// Inserts the edge if it is not there yet. Returns `false` if it
    /// already existed, which makes this the final authority over
    /// concurrent follows of the same pair.
    async fn insert_edge(&self, follower_id: UserId, followed_id: UserId) -> Result<bool>;

    /// Returns `false` if the edge was already gone.
    async fn delete_edge(&self, edge: &FollowEdge) -> Result<bool>;

    /// Users following `id`, ordered by user id.
    async fn followers_of(&self, id: UserId) -> Result<Vec<User>>;

    /// Users followed by `id`, ordered by user id.
    async fn following_of(&self, id: UserId) -> Result<Vec<User>>;

    /// Ids followed by `id` in ascending order, or [`None`] if the
    /// user does not exist. Answered with a single read.
    async fn followee_ids(&self, id: UserId) -> Result<Option<Vec<UserId>>>;
}

/// Every listing returned by a post store is ordered by `created_at`
/// descending, ties broken by insertion order (post id ascending).
#[async_trait]
pub trait PostStore: Debug + Send + Sync {
    /// Fails with [`Error::ForeignKeyViolation`] if the author does not exist.
    async fn create_post(&self, post: NewPost<'_>) -> Result<Post>;

    async fn find_post(&self, id: PostId) -> Result<Option<Post>>;

    /// Replaces the content and stamps `updated_at`. `created_at`
    /// is left untouched. Returns `None` if the post does not exist.
    async fn update_post(&self, id: PostId, content: &str) -> Result<Option<Post>>;

    /// Returns `false` if the post was already gone.
    async fn delete_post(&self, id: PostId) -> Result<bool>;

    async fn posts_by_author(&self, author_id: UserId) -> Result<Vec<Post>>;

    /// Posts of every author in the set, merged into one listing.
    /// An empty set yields an empty listing without touching storage.
    async fn posts_by_authors(&self, author_ids: &BTreeSet<UserId>) -> Result<Vec<Post>>;
}
