//! Shared test helpers: test configuration and an in-memory user repository
//! standing in for Postgres.

use async_trait::async_trait;
use blogify::{
    config::{AppConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig},
    error::AppError,
    models::user::User,
    repository::user_repo::UserRepository,
};
use secrecy::Secret;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 5,
        },
        database: DatabaseConfig {
            url: Secret::new("postgresql://localhost/blogify_test".to_string()),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            session_secret: Secret::new(TEST_SECRET.to_string()),
            session_ttl_secs: 3600,
            session_cookie_name: "token".to_string(),
            password_min_length: 8,
        },
    }
}

/// In-memory `UserRepository` implementation.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate account deletion after token issuance.
    pub fn remove(&self, id: Uuid) {
        self.users.lock().unwrap().remove(&id);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), AppError> {
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(())
    }

    async fn update_password(
        &self,
        id: Uuid,
        salt: &str,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&id) {
            Some(user) => {
                user.salt = salt.to_string();
                user.password_hash = password_hash.to_string();
                user.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
