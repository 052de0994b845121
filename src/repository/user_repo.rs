//! User repository.
//!
//! The auth core only depends on the `UserRepository` trait; Postgres is the
//! production implementation and tests substitute an in-memory one.

use crate::{error::AppError, models::user::User};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Abstract user storage collaborator.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Email comparison is exact (case-sensitive), matching the uniqueness
    /// constraint of the stored column.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn create(&self, user: &User) -> Result<(), AppError>;

    /// Replace the credential material for a user.
    ///
    /// This is the only write path that touches `salt` or `password_hash`;
    /// both are always replaced together.
    async fn update_password(
        &self,
        id: Uuid,
        salt: &str,
        password_hash: &str,
    ) -> Result<bool, AppError>;
}

pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn create(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, full_name, email, password_hash, salt, profile_image_url,
                role, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.salt)
        .bind(&user.profile_image_url)
        .bind(&user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn update_password(
        &self,
        id: Uuid,
        salt: &str,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET
                password_hash = $2,
                salt = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .bind(salt)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
