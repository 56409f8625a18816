use std::sync::Arc;

use crate::entity::User;
use crate::store::{ReportExt, UserDirectory};
use crate::types::UserId;
use crate::{Error, ErrorCategory, Result};

const USER_EXISTS_MSG: &str = "User already exists";
const USER_NOT_FOUND_MSG: &str = "User does not exist";

#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserDirectory>,
}

impl UserService {
    #[must_use]
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    #[tracing::instrument(skip(self), name = "services.users.create")]
    pub async fn create(&self, username: &str) -> Result<UserId> {
        if self.users.find_user_by_name(username).await?.is_some() {
            return Err(Error::conflict(USER_EXISTS_MSG));
        }

        // someone might have taken it in the meantime
        match self.users.create_user(username).await {
            Ok(id) => {
                tracing::info!(%id, "created user");
                Ok(id)
            }
            Err(report) if report.is_unique_violation() => {
                Err(Error::from_report(ErrorCategory::Conflict, report)
                    .with_message(USER_EXISTS_MSG))
            }
            Err(report) => Err(report.into()),
        }
    }

    #[tracing::instrument(skip(self), name = "services.users.get")]
    pub async fn get(&self, id: UserId) -> Result<User> {
        self.users
            .find_user(id)
            .await?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND_MSG))
    }

    #[tracing::instrument(skip(self), name = "services.users.get_by_username")]
    pub async fn get_by_username(&self, username: &str) -> Result<User> {
        self.users
            .find_user_by_name(username)
            .await?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND_MSG))
    }

    #[tracing::instrument(skip(self), name = "services.users.list")]
    pub async fn list(&self) -> Result<Vec<User>> {
        Ok(self.users.list_users().await?)
    }

    #[tracing::instrument(skip(self), name = "services.users.rename")]
    pub async fn rename(&self, id: UserId, username: &str) -> Result<()> {
        let user = self.get(id).await?;
        if user.username == username {
            return Err(Error::invalid_argument("User already has this username"));
        }

        match self.users.rename_user(id, username).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::not_found(USER_NOT_FOUND_MSG)),
            Err(report) if report.is_unique_violation() => {
                Err(Error::from_report(ErrorCategory::Conflict, report)
                    .with_message("Username is already taken"))
            }
            Err(report) => Err(report.into()),
        }
    }

    /// Deleting a user also removes their follow edges and posts.
    #[tracing::instrument(skip(self), name = "services.users.delete")]
    pub async fn delete(&self, id: UserId) -> Result<()> {
        if self.users.delete_user(id).await? {
            tracing::info!(%id, "deleted user");
            Ok(())
        } else {
            Err(Error::not_found(USER_NOT_FOUND_MSG))
        }
    }
}
