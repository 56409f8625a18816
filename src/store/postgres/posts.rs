use async_trait::async_trait;
use std::collections::BTreeSet;

use super::{PgStore, SqlxResultExt};
use crate::entity::{NewPost, Post};
use crate::store::{PostStore, Result};
use crate::types::{PostId, UserId};

#[async_trait]
impl PostStore for PgStore {
    #[tracing::instrument(skip_all, fields(author_id = %post.author_id), name = "db.posts.create")]
    async fn create_post(&self, post: NewPost<'_>) -> Result<Post> {
        let mut conn = self.db_write().await?;
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (author_id, content) VALUES ($1, $2) RETURNING *",
        )
        .bind(post.author_id)
        .bind(post.content)
        .fetch_one(&mut *conn)
        .await
        .into_store_error()
    }

    #[tracing::instrument(skip(self), name = "db.posts.find")]
    async fn find_post(&self, id: PostId) -> Result<Option<Post>> {
        let mut conn = self.db_read().await?;
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .into_store_error()
    }

    #[tracing::instrument(skip(self, content), name = "db.posts.update")]
    async fn update_post(&self, id: PostId, content: &str) -> Result<Option<Post>> {
        let mut conn = self.db_write().await?;
        sqlx::query_as::<_, Post>(
            r#"UPDATE posts SET content = $2, updated_at = timezone('utc', now())
            WHERE id = $1 RETURNING *"#,
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&mut *conn)
        .await
        .into_store_error()
    }

    #[tracing::instrument(skip(self), name = "db.posts.delete")]
    async fn delete_post(&self, id: PostId) -> Result<bool> {
        let mut conn = self.db_write().await?;
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .into_store_error()?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), name = "db.posts.by_author")]
    async fn posts_by_author(&self, author_id: UserId) -> Result<Vec<Post>> {
        let mut conn = self.db_read().await?;
        sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE author_id = $1 ORDER BY created_at DESC, id ASC",
        )
        .bind(author_id)
        .fetch_all(&mut *conn)
        .await
        .into_store_error()
    }

    #[tracing::instrument(skip(self), name = "db.posts.by_authors")]
    async fn posts_by_authors(&self, author_ids: &BTreeSet<UserId>) -> Result<Vec<Post>> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let author_ids = author_ids.iter().copied().collect::<Vec<_>>();
        let mut conn = self.db_read().await?;
        sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE author_id = ANY($1) ORDER BY created_at DESC, id ASC",
        )
        .bind(author_ids)
        .fetch_all(&mut *conn)
        .await
        .into_store_error()
    }
}
