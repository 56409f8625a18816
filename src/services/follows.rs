use std::sync::Arc;

use crate::entity::User;
use crate::store::{FollowGraphStore, ReportExt, UserDirectory};
use crate::types::UserId;
use crate::{Error, ErrorCategory, Result};

/// Maintains the directed follow relationship between users.
#[derive(Debug, Clone)]
pub struct FollowGraphService {
    users: Arc<dyn UserDirectory>,
    follows: Arc<dyn FollowGraphStore>,
}

impl FollowGraphService {
    #[must_use]
    pub fn new(users: Arc<dyn UserDirectory>, follows: Arc<dyn FollowGraphStore>) -> Self {
        Self { users, follows }
    }

    #[tracing::instrument(skip(self), name = "services.follows.follow")]
    pub async fn follow(&self, follower_id: UserId, followed_id: UserId) -> Result<()> {
        self.ensure_pair(follower_id, followed_id, "User can't follow itself")
            .await?;

        if self.follows.find_edge(follower_id, followed_id).await?.is_some() {
            return Err(Error::conflict("Already following user"));
        }

        // the backend has the final word on concurrent follows
        match self.follows.insert_edge(follower_id, followed_id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::conflict("Already following user")),
            Err(report) if report.is_foreign_key_violation() => {
                Err(Error::from_report(ErrorCategory::NotFound, report)
                    .with_message("User does not exist"))
            }
            Err(report) => Err(report.into()),
        }
    }

    #[tracing::instrument(skip(self), name = "services.follows.unfollow")]
    pub async fn unfollow(&self, follower_id: UserId, followed_id: UserId) -> Result<()> {
        self.ensure_pair(follower_id, followed_id, "User can't unfollow itself")
            .await?;

        let Some(edge) = self.follows.find_edge(follower_id, followed_id).await? else {
            return Err(Error::conflict("Not following user"));
        };

        if self.follows.delete_edge(&edge).await? {
            Ok(())
        } else {
            Err(Error::conflict("Not following user"))
        }
    }

    #[tracing::instrument(skip(self), name = "services.follows.is_following")]
    pub async fn is_following(&self, follower_id: UserId, followed_id: UserId) -> Result<bool> {
        self.ensure_pair(follower_id, followed_id, "User can't follow itself")
            .await?;

        let edge = self.follows.find_edge(follower_id, followed_id).await?;
        Ok(edge.is_some())
    }

    #[tracing::instrument(skip(self), name = "services.follows.followers")]
    pub async fn followers(&self, id: UserId) -> Result<Vec<User>> {
        self.ensure_exists(id).await?;
        Ok(self.follows.followers_of(id).await?)
    }

    #[tracing::instrument(skip(self), name = "services.follows.following")]
    pub async fn following(&self, id: UserId) -> Result<Vec<User>> {
        self.ensure_exists(id).await?;
        Ok(self.follows.following_of(id).await?)
    }

    /// Ids of the users followed by `id`. The existence check is part
    /// of the same graph read.
    #[tracing::instrument(skip(self), name = "services.follows.following_ids")]
    pub async fn following_ids(&self, id: UserId) -> Result<Vec<UserId>> {
        self.follows
            .followee_ids(id)
            .await?
            .ok_or_else(|| Error::not_found("User does not exist"))
    }
}

impl FollowGraphService {
    async fn ensure_exists(&self, id: UserId) -> Result<()> {
        match self.users.find_user(id).await? {
            Some(..) => Ok(()),
            None => Err(Error::not_found("User does not exist")),
        }
    }

    /// Both users must exist and must not be the same user.
    async fn ensure_pair(
        &self,
        follower_id: UserId,
        followed_id: UserId,
        same_user_message: &'static str,
    ) -> Result<()> {
        let (follower, followed) = tokio::try_join!(
            self.users.find_user(follower_id),
            self.users.find_user(followed_id),
        )?;

        if follower.is_none() || followed.is_none() {
            let message = not_found_message(
                (follower_id, follower.is_some()),
                (followed_id, followed.is_some()),
            );
            return Err(Error::not_found(message));
        }

        if follower_id == followed_id {
            return Err(Error::invalid_argument(same_user_message));
        }

        Ok(())
    }
}

fn not_found_message(first: (UserId, bool), second: (UserId, bool)) -> String {
    format!(
        "User with id {} exists: {}, User with id {} exists: {}",
        first.0, first.1, second.0, second.1
    )
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{self, FlakyStore, TestResultExt};
    use crate::types::UserId;
    use crate::ErrorCategory;
    use assert_json_diff::assert_json_include;
    use serde_json::json;

    #[tokio::test]
    async fn should_follow_user() {
        let app = test_utils::build_test_app();
        let ids = test_utils::users::register_all(&app, &["alfonso", "ivan"]).await;

        app.follows.follow(ids[0], ids[1]).await.unwrap();

        assert!(app.follows.is_following(ids[0], ids[1]).await.unwrap());
        assert!(!app.follows.is_following(ids[1], ids[0]).await.unwrap());

        let following = app.follows.following(ids[0]).await.unwrap();
        assert_eq!(following.len(), 1);
        assert_eq!(following[0].id, ids[1]);

        let followers = app.follows.followers(ids[1]).await.unwrap();
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].id, ids[0]);

        assert_eq!(app.follows.following_ids(ids[0]).await.unwrap(), vec![ids[1]]);
        assert!(app.follows.following_ids(ids[1]).await.unwrap().is_empty());

        let error = app
            .follows
            .following_ids(UserId::new(404))
            .await
            .expect_error_json();
        assert_eq!(error["code"], "not_found");
    }

    #[tokio::test]
    async fn should_reject_if_users_not_found() {
        let app = test_utils::build_test_app();
        let ids = test_utils::users::register_all(&app, &["alfonso"]).await;

        let error = app
            .follows
            .follow(ids[0], UserId::new(404))
            .await
            .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "not_found",
                "message": format!("User with id {} exists: true, User with id 404 exists: false", ids[0]),
            }),
        );

        let error = app
            .follows
            .unfollow(UserId::new(404), UserId::new(405))
            .await
            .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "not_found",
                "message": "User with id 404 exists: false, User with id 405 exists: false",
            }),
        );

        let error = app.follows.followers(UserId::new(404)).await.expect_error_json();
        assert_eq!(error["code"], "not_found");
    }

    #[tokio::test]
    async fn should_not_follow_themselves() {
        let app = test_utils::build_test_app();
        let ids = test_utils::users::register_all(&app, &["alfonso"]).await;

        let error = app.follows.follow(ids[0], ids[0]).await.expect_error_json();
        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "invalid_argument",
                "message": "User can't follow itself",
            }),
        );

        let error = app.follows.unfollow(ids[0], ids[0]).await.expect_error_json();
        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "invalid_argument",
                "message": "User can't unfollow itself",
            }),
        );

        let error = app.follows.is_following(ids[0], ids[0]).await.expect_error_json();
        assert_eq!(error["code"], "invalid_argument");
    }

    #[tokio::test]
    async fn should_reject_following_twice() {
        let app = test_utils::build_test_app();
        let ids = test_utils::users::register_all(&app, &["alfonso", "ivan"]).await;

        app.follows.follow(ids[0], ids[1]).await.unwrap();

        let error = app.follows.follow(ids[0], ids[1]).await.expect_error_json();
        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "conflict",
                "message": "Already following user",
            }),
        );

        // the graph is untouched by the failed attempt
        assert_eq!(app.follows.followers(ids[1]).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_unfollow_user() {
        let app = test_utils::build_test_app();
        let ids = test_utils::users::register_all(&app, &["alfonso", "ivan"]).await;

        let error = app.follows.unfollow(ids[0], ids[1]).await.expect_error_json();
        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "conflict",
                "message": "Not following user",
            }),
        );

        app.follows.follow(ids[0], ids[1]).await.unwrap();
        app.follows.unfollow(ids[0], ids[1]).await.unwrap();

        assert!(!app.follows.is_following(ids[0], ids[1]).await.unwrap());
        assert!(app.follows.following(ids[0]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_report_storage_failures_as_internal() {
        let store = FlakyStore::default();
        let app = test_utils::build_test_app_with(store.clone());
        let ids = test_utils::users::register_all(&app, &["alfonso", "ivan"]).await;

        store.fail_follows(true);
        let error = app.follows.follow(ids[0], ids[1]).await.unwrap_err();
        assert_eq!(error.category(), ErrorCategory::Internal);
        assert!(error.message().contains(test_utils::FAILURE_CAUSE));
    }
}
