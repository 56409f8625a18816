use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::types::{PostId, UserId};

#[derive(Debug, Clone, FromRow, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub created_at: NaiveDateTime,
    pub username: String,
}

/// Directed relationship: `follower_id` receives the posts
/// of `followed_id` in their dashboard feed.
#[derive(Debug, Clone, FromRow, PartialEq, Eq, Serialize)]
pub struct FollowEdge {
    pub follower_id: UserId,
    pub followed_id: UserId,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, FromRow, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: PostId,
    pub created_at: NaiveDateTime,
    pub author_id: UserId,
    pub content: String,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy)]
pub struct NewPost<'a> {
    pub author_id: UserId,
    pub content: &'a str,
}
