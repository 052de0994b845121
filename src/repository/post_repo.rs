//! Post repository (Postgres access layer)

use crate::{
    error::AppError,
    models::post::{Post, UpdatePostRequest},
};
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct PostRepository {
    db: PgPool,
}

impl PostRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create(&self, post: &Post) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, title, body, cover_image_url, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.body)
        .bind(&post.cover_image_url)
        .bind(post.created_by)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(post)
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(posts)
    }

    pub async fn update(&self, id: Uuid, req: &UpdatePostRequest) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET
                title = COALESCE($2, title),
                body = COALESCE($3, body),
                cover_image_url = COALESCE($4, cover_image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.body)
        .bind(&req.cover_image_url)
        .fetch_optional(&self.db)
        .await?;

        Ok(post)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.db)
            .await?
            .get(0);

        Ok(count)
    }

    // ==================== Likes ====================

    /// Toggle a user's like on a post. Returns true if the post is liked
    /// after the call.
    ///
    /// The insert attempt comes first and rides on the `(post_id, user_id)`
    /// primary key via `ON CONFLICT DO NOTHING`, so concurrent toggles for
    /// the same pair never trip the key constraint; the losing side falls
    /// through to the delete branch.
    pub async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO post_likes (post_id, user_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (post_id, user_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.db)
        .await?
        .rows_affected();

        if inserted > 0 {
            return Ok(true);
        }

        sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(false)
    }

    pub async fn count_likes(&self, post_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.db)
            .await?
            .get(0);

        Ok(count)
    }
}
