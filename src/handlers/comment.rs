//! Comment HTTP handlers

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::AppState,
    models::comment::{Comment, CommentResponse, CreateCommentRequest},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    // 404 for comments on a nonexistent post, not an empty list
    state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::not_found("post"))?;

    let comments = state.comments.list_for_post(post_id).await?;

    Ok(Json(
        comments
            .into_iter()
            .map(CommentResponse::from)
            .collect::<Vec<_>>(),
    ))
}

pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::not_found("post"))?;

    let comment = Comment {
        id: Uuid::new_v4(),
        content: req.content,
        post_id,
        created_by: user.id,
        created_at: Utc::now(),
    };

    state.comments.create(&comment).await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}
