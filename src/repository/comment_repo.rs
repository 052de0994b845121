//! Comment repository (Postgres access layer)

use crate::{error::AppError, models::comment::Comment};
use sqlx::PgPool;
use uuid::Uuid;

pub struct CommentRepository {
    db: PgPool,
}

impl CommentRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create(&self, comment: &Comment) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, content, post_id, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.id)
        .bind(&comment.content)
        .bind(comment.post_id)
        .bind(comment.created_by)
        .bind(comment.created_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, AppError> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE post_id = $1 ORDER BY created_at ASC",
        )
        .bind(post_id)
        .fetch_all(&self.db)
        .await?;

        Ok(comments)
    }
}
