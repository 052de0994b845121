//! Post HTTP handlers

use crate::{
    auth::{authorize_owner, middleware::CurrentUser, middleware::MaybeUser},
    error::AppError,
    middleware::AppState,
    models::post::{
        CreatePostRequest, LikeResponse, ListPostsQuery, Post, PostResponse, UpdatePostRequest,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListPostsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let posts = state.posts.list(limit, offset).await?;
    let total = state.posts.count().await?;

    Ok(Json(json!({
        "posts": posts.into_iter().map(PostResponse::from).collect::<Vec<_>>(),
        "total": total,
        "limit": limit,
        "offset": offset,
    })))
}

pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("post"))?;

    let likes = state.posts.count_likes(id).await?;

    Ok(Json(json!({
        "post": PostResponse::from(post),
        "likes": likes,
    })))
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let now = Utc::now();
    let post = Post {
        id: Uuid::new_v4(),
        title: req.title,
        body: req.body,
        cover_image_url: req.cover_image_url,
        created_by: user.id,
        created_at: now,
        updated_at: now,
    };

    state.posts.create(&post).await?;

    tracing::info!(post_id = %post.id, user_id = %user.id, "Post created");

    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

/// Edit a post. Only the recorded owner may mutate it.
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("post"))?;

    authorize_owner(user.as_ref(), post.created_by).into_result()?;

    let updated = state
        .posts
        .update(id, &req)
        .await?
        .ok_or_else(|| AppError::not_found("post"))?;

    Ok(Json(PostResponse::from(updated)))
}

/// Delete a post. Only the recorded owner may mutate it.
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("post"))?;

    authorize_owner(user.as_ref(), post.created_by).into_result()?;

    state.posts.delete(id).await?;

    tracing::info!(post_id = %id, "Post deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Toggle the current user's like on a post. The like always belongs to the
/// user toggling it, so the `CurrentUser` extractor is the whole guard here;
/// anonymous requests are rejected with `Unauthenticated` before this runs.
pub async fn toggle_like(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("post"))?;

    let liked = state.posts.toggle_like(post.id, user.id).await?;
    let likes = state.posts.count_likes(post.id).await?;

    Ok(Json(LikeResponse {
        post_id: post.id,
        liked,
        likes,
    }))
}
