//! Blog post domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A published blog post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    /// Cover images are stored by an external upload service; we only keep
    /// the URL.
    pub cover_image_url: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub body: String,
    pub cover_image_url: Option<String>,
}

/// Partial update: `None` fields keep their stored value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub body: Option<String>,
    /// `None` leaves the stored URL unchanged; a cover image cannot be
    /// cleared back to null through this request, only replaced.
    pub cover_image_url: Option<String>,
}

/// Pagination query for post listing
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub cover_image_url: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            cover_image_url: post.cover_image_url,
            created_by: post.created_by,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Result of a like toggle
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub post_id: Uuid,
    pub liked: bool,
    pub likes: i64,
}
