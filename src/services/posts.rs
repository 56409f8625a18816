use std::sync::Arc;

use crate::entity::{NewPost, Post};
use crate::store::{PostStore, ReportExt, UserDirectory};
use crate::types::{PostId, UserId};
use crate::{Error, ErrorCategory, Result};

const POST_NOT_FOUND_MSG: &str = "Post does not exist";

#[derive(Debug, Clone)]
pub struct PostService {
    users: Arc<dyn UserDirectory>,
    posts: Arc<dyn PostStore>,
}

impl PostService {
    #[must_use]
    pub fn new(users: Arc<dyn UserDirectory>, posts: Arc<dyn PostStore>) -> Self {
        Self { users, posts }
    }

    #[tracing::instrument(skip(self, content), name = "services.posts.publish")]
    pub async fn publish(&self, author_id: UserId, content: &str) -> Result<Post> {
        if self.users.find_user(author_id).await?.is_none() {
            return Err(Error::not_found("User does not exist"));
        }

        let new_post = NewPost { author_id, content };
        match self.posts.create_post(new_post).await {
            Ok(post) => {
                tracing::info!(id = %post.id, "published post");
                Ok(post)
            }
            // the author got deleted in the meantime
            Err(report) if report.is_foreign_key_violation() => {
                Err(Error::from_report(ErrorCategory::NotFound, report)
                    .with_message("User does not exist"))
            }
            Err(report) => Err(report.into()),
        }
    }

    #[tracing::instrument(skip(self), name = "services.posts.get")]
    pub async fn get(&self, id: PostId) -> Result<Post> {
        self.posts
            .find_post(id)
            .await?
            .ok_or_else(|| Error::not_found(POST_NOT_FOUND_MSG))
    }

    #[tracing::instrument(skip(self, content), name = "services.posts.edit")]
    pub async fn edit(&self, id: PostId, content: &str) -> Result<Post> {
        self.posts
            .update_post(id, content)
            .await?
            .ok_or_else(|| Error::not_found(POST_NOT_FOUND_MSG))
    }

    #[tracing::instrument(skip(self), name = "services.posts.delete")]
    pub async fn delete(&self, id: PostId) -> Result<()> {
        if self.posts.delete_post(id).await? {
            Ok(())
        } else {
            Err(Error::not_found(POST_NOT_FOUND_MSG))
        }
    }
}
