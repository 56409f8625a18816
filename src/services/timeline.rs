use std::collections::BTreeSet;
use std::sync::Arc;

use super::FollowGraphService;
use crate::entity::Post;
use crate::store::{PostStore, UserDirectory};
use crate::types::UserId;
use crate::{Error, Result};

/// Builds post listings at read time (fan-out-on-read).
#[derive(Debug, Clone)]
pub struct TimelineAggregator {
    users: Arc<dyn UserDirectory>,
    graph: FollowGraphService,
    posts: Arc<dyn PostStore>,
}

impl TimelineAggregator {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserDirectory>,
        graph: FollowGraphService,
        posts: Arc<dyn PostStore>,
    ) -> Self {
        Self {
            users,
            graph,
            posts,
        }
    }

    /// Posts authored by the user, newest first.
    #[tracing::instrument(skip(self), name = "services.timeline.user")]
    pub async fn user_timeline(&self, id: UserId) -> Result<Vec<Post>> {
        if self.users.find_user(id).await?.is_none() {
            return Err(Error::not_found("User does not exist"));
        }
        Ok(self.posts.posts_by_author(id).await?)
    }

    /// The user's own posts merged with the posts of everyone they
    /// follow, newest first.
    #[tracing::instrument(skip(self), name = "services.timeline.dashboard")]
    pub async fn dashboard_feed(&self, id: UserId) -> Result<Vec<Post>> {
        let mut authors = self
            .graph
            .following_ids(id)
            .await?
            .into_iter()
            .collect::<BTreeSet<_>>();

        authors.insert(id);
        tracing::debug!(authors = authors.len(), "collected dashboard authors");

        Ok(self.posts.posts_by_authors(&authors).await?)
    }
}
