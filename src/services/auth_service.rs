//! Authentication service: registration, credential verification, sign-in,
//! password change.
//!
//! This is the only place passwords are hashed. Hashing is triggered by the
//! two password-write operations below, never by a plain save, so re-saving
//! a user record cannot accidentally rehash an already-hashed value.

use crate::{
    auth::{password::PasswordHasher, session::SessionService},
    config::AppConfig,
    error::AppError,
    models::user::{ChangePasswordRequest, CreateUserRequest, Role, User, DEFAULT_PROFILE_IMAGE_URL},
    repository::user_repo::UserRepository,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<SessionService>,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<SessionService>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            users,
            sessions,
            config,
        }
    }

    /// Register a new user. This is a password-write operation: it salts and
    /// hashes the supplied password exactly once.
    pub async fn register(&self, req: CreateUserRequest) -> Result<User, AppError> {
        req.validate()?;

        if req.password.len() < self.config.security.password_min_length {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {} characters",
                self.config.security.password_min_length
            )));
        }

        if self.users.find_by_email(&req.email).await?.is_some() {
            return Err(AppError::BadRequest(
                "Email is already registered".to_string(),
            ));
        }

        let hasher = PasswordHasher::new();
        let hashed = hasher.hash(&req.password)?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            full_name: req.full_name,
            email: req.email,
            password_hash: hashed.hash,
            salt: hashed.salt,
            profile_image_url: req
                .profile_image_url
                .unwrap_or_else(|| DEFAULT_PROFILE_IMAGE_URL.to_string()),
            role: Role::User.into(),
            created_at: now,
            updated_at: now,
        };

        self.users.create(&user).await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    /// Look up a user by email and verify a plaintext password against the
    /// stored salt and digest. Read-only: never mutates the record.
    ///
    /// `NotFound` and `InvalidCredentials` stay distinct here for logging;
    /// the sign-in route collapses them before anything reaches the wire.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("user"))?;

        let hasher = PasswordHasher::new();
        hasher.verify(password, &user.salt, &user.password_hash)?;

        Ok(user)
    }

    /// Verify credentials and issue a session token.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let user = self.verify_credentials(email, password).await?;
        let token = self.sessions.issue(&user)?;

        tracing::info!(user_id = %user.id, "User signed in");

        Ok((user, token))
    }

    /// Change a user's password. The second password-write operation: the
    /// old password must verify, then a fresh salt and digest replace the
    /// stored pair.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        req: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user"))?;

        let hasher = PasswordHasher::new();
        hasher.verify(&req.old_password, &user.salt, &user.password_hash)?;

        if req.new_password.len() < self.config.security.password_min_length {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {} characters",
                self.config.security.password_min_length
            )));
        }

        let hashed = hasher.hash(&req.new_password)?;
        self.users
            .update_password(user_id, &hashed.salt, &hashed.hash)
            .await?;

        tracing::info!(user_id = %user_id, "Password changed");

        Ok(())
    }
}
