//! Session authentication middleware.
//!
//! Runs once per request, before any handler, and only ever *annotates* the
//! request: a missing cookie, a forged or expired token, and a token whose
//! account has since been deleted all result in the same anonymous request.
//! The middleware never produces an error response itself (fail-open), so a
//! holder of a bad cookie is indistinguishable from an unauthenticated
//! visitor.

use crate::{
    auth::session::SessionService, error::AppError, models::user::User,
    repository::user_repo::UserRepository,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// State for the session middleware: the token service plus the user
/// repository used for the single identity lookup per request.
pub struct SessionLayer {
    pub sessions: Arc<SessionService>,
    pub users: Arc<dyn UserRepository>,
    pub cookie_name: String,
}

/// The resolved identity for the current request, attached to request
/// extensions. Exists only for the lifetime of one request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}

/// Optional identity extractor; never rejects.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(
            parts.extensions.get::<CurrentUser>().map(|c| c.0.clone()),
        ))
    }
}

/// Extract the session token from the request's Cookie header.
pub fn extract_session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let cookies = headers.get("cookie")?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == cookie_name && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Resolve an inbound session cookie to a full user record.
///
/// Performs exactly one repository lookup, and only when the token
/// validates. A lookup error is logged and treated as anonymous; caller
/// cancellation propagates through the lookup's await point.
pub async fn session_auth_middleware(
    State(layer): State<Arc<SessionLayer>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_session_cookie(req.headers(), &layer.cookie_name) {
        if let Some(claims) = layer.sessions.validate(&token) {
            match Uuid::parse_str(&claims.id) {
                Ok(user_id) => match layer.users.find_by_id(user_id).await {
                    Ok(Some(user)) => {
                        req.extensions_mut().insert(CurrentUser(user));
                    }
                    Ok(None) => {
                        // account deleted after token issuance
                        tracing::debug!(user_id = %user_id, "Session resolved to no user");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "User lookup failed during session resolution");
                    }
                },
                Err(_) => {
                    tracing::debug!("Session claims carry a malformed user id");
                }
            }
        }
        // validation failure already logged at debug level by the session
        // service; treat exactly like an absent cookie
    }

    next.run(req).await
}
