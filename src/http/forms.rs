use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::UserId;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub id: UserId,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RenameUser {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct FollowStatus {
    pub following: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PublishPost {
    pub author_id: UserId,
    #[validate(length(min = 1, max = 255))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditPost {
    #[validate(length(min = 1, max = 255))]
    pub content: String,
}
