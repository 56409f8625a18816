use async_trait::async_trait;

use super::{PgStore, SqlxResultExt};
use crate::entity::{FollowEdge, User};
use crate::store::{FollowGraphStore, Result};
use crate::types::UserId;

#[async_trait]
impl FollowGraphStore for PgStore {
    #[tracing::instrument(skip(self), name = "db.follows.find")]
    async fn find_edge(
        &self,
        follower_id: UserId,
        followed_id: UserId,
    ) -> Result<Option<FollowEdge>> {
        let mut conn = self.db_read().await?;
        sqlx::query_as::<_, FollowEdge>(
            "SELECT * FROM follows WHERE follower_id = $1 AND followed_id = $2",
        )
        .bind(follower_id)
        .bind(followed_id)
        .fetch_optional(&mut *conn)
        .await
        .into_store_error()
    }

    #[tracing::instrument(skip(self), name = "db.follows.insert")]
    async fn insert_edge(&self, follower_id: UserId, followed_id: UserId) -> Result<bool> {
        let mut conn = self.db_write().await?;
        let result = sqlx::query(
            "INSERT INTO follows (follower_id, followed_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(follower_id)
        .bind(followed_id)
        .execute(&mut *conn)
        .await
        .into_store_error()?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), name = "db.follows.delete")]
    async fn delete_edge(&self, edge: &FollowEdge) -> Result<bool> {
        let mut conn = self.db_write().await?;
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
            .bind(edge.follower_id)
            .bind(edge.followed_id)
            .execute(&mut *conn)
            .await
            .into_store_error()?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), name = "db.follows.followers_of")]
    async fn followers_of(&self, id: UserId) -> Result<Vec<User>> {
        let mut conn = self.db_read().await?;
        sqlx::query_as::<_, User>(
            r#"SELECT users.* FROM users
            JOIN follows ON follows.follower_id = users.id
            WHERE follows.followed_id = $1
            ORDER BY users.id"#,
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await
        .into_store_error()
    }

    #[tracing::instrument(skip(self), name = "db.follows.following_of")]
    async fn following_of(&self, id: UserId) -> Result<Vec<User>> {
        let mut conn = self.db_read().await?;
        sqlx::query_as::<_, User>(
            r#"SELECT users.* FROM users
            JOIN follows ON follows.followed_id = users.id
            WHERE follows.follower_id = $1
            ORDER BY users.id"#,
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await
        .into_store_error()
    }

    #[tracing::instrument(skip(self), name = "db.follows.followee_ids")]
    async fn followee_ids(&self, id: UserId) -> Result<Option<Vec<UserId>>> {
        let mut conn = self.db_read().await?;
        sqlx::query_scalar::<_, Vec<UserId>>(
            r#"SELECT ARRAY(
                SELECT followed_id FROM follows
                WHERE follower_id = users.id
                ORDER BY followed_id
            ) FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .into_store_error()
    }
}
