use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{validate_new_post, PostStore};
use crate::error::StoreResult;
use crate::types::{NewPost, Post, PostId};

/// PostgreSQL-backed post store
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    author: String,
    title: String,
    message: String,
    created_at: OffsetDateTime,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: PostId(row.id),
            author: row.author,
            title: row.title,
            message: row.message,
            created_at: row.created_at,
        }
    }
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn insert(&self, post: NewPost) -> StoreResult<Post> {
        validate_new_post(&post)?;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, author, title, message, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, author, title, message, created_at
            "#,
        )
        .bind(PostId::new().0)
        .bind(post.author_or_default())
        .bind(post.title_or_empty())
        .bind(&post.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete_by_id(&self, id: PostId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(post_id = %id, "Delete matched no post");
        }

        Ok(())
    }

    async fn find_recent(&self, limit: Option<usize>) -> StoreResult<Vec<Post>> {
        // LIMIT NULL returns every row
        let limit = limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX));

        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, author, title, message, created_at
            FROM posts
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        crate::db::check_connection(&self.pool).await?;
        Ok(())
    }
}
