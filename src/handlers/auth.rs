//! Authentication HTTP handlers

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::AppState,
    models::user::{ChangePasswordRequest, CreateUserRequest, LoginRequest, UserResponse},
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Register a new account.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.register(req).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Sign in and receive a session cookie.
///
/// "No such email" and "wrong password" deliberately produce the same
/// response; the distinct variants are only kept server-side for logs so a
/// caller cannot enumerate registered addresses.
pub async fn signin(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (user, token) = state
        .auth_service
        .sign_in(&req.email, &req.password)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) | AppError::InvalidCredentials => {
                tracing::info!(reason = %e, "Sign-in rejected");
                AppError::InvalidCredentials
            }
            other => other,
        })?;

    let cookie = session_cookie(
        &state.config.security.session_cookie_name,
        &token,
        state.config.security.session_ttl_secs as i64,
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "token": token,
            "user": UserResponse::from(user),
        })),
    ))
}

/// Sign out by expiring the session cookie.
///
/// The token itself stays valid until its embedded expiry; there is no
/// server-side session state to revoke.
pub async fn signout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cookie = session_cookie(&state.config.security.session_cookie_name, "", 0);

    (
        [(header::SET_COOKIE, cookie)],
        Json(json!({"message": "Signed out"})),
    )
}

/// Current user info.
pub async fn me(CurrentUser(user): CurrentUser) -> Result<impl IntoResponse, AppError> {
    Ok(Json(UserResponse::from(user)))
}

/// Change the current user's password. Takes effect for credential checks
/// immediately; already-issued tokens remain valid until they expire.
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.change_password(user.id, req).await?;

    Ok(Json(json!({"message": "Password changed"})))
}

fn session_cookie(name: &str, token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        name, token, max_age_secs
    )
}
