use async_trait::async_trait;

use super::{PgStore, SqlxResultExt};
use crate::entity::User;
use crate::store::{Result, UserDirectory};
use crate::types::UserId;

#[async_trait]
impl UserDirectory for PgStore {
    #[tracing::instrument(skip(self), name = "db.users.find")]
    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        let mut conn = self.db_read().await?;
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .into_store_error()
    }

    #[tracing::instrument(skip(self), name = "db.users.find_by_name")]
    async fn find_user_by_name(&self, username: &str) -> Result<Option<User>> {
        let mut conn = self.db_read().await?;
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&mut *conn)
            .await
            .into_store_error()
    }

    #[tracing::instrument(skip(self), name = "db.users.create")]
    async fn create_user(&self, username: &str) -> Result<UserId> {
        let mut conn = self.db_write().await?;
        sqlx::query_scalar::<_, UserId>("INSERT INTO users (username) VALUES ($1) RETURNING id")
            .bind(username)
            .fetch_one(&mut *conn)
            .await
            .into_store_error()
    }

    #[tracing::instrument(skip(self), name = "db.users.rename")]
    async fn rename_user(&self, id: UserId, username: &str) -> Result<bool> {
        let mut conn = self.db_write().await?;
        let result = sqlx::query("UPDATE users SET username = $2 WHERE id = $1")
            .bind(id)
            .bind(username)
            .execute(&mut *conn)
            .await
            .into_store_error()?;

        Ok(result.rows_affected() > 0)
    }

    // follows and posts are removed by `ON DELETE CASCADE`
    #[tracing::instrument(skip(self), name = "db.users.delete")]
    async fn delete_user(&self, id: UserId) -> Result<bool> {
        let mut conn = self.db_write().await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .into_store_error()?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), name = "db.users.list")]
    async fn list_users(&self) -> Result<Vec<User>> {
        let mut conn = self.db_read().await?;
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&mut *conn)
            .await
            .into_store_error()
    }
}
