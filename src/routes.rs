//! Route registration.

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

use crate::{
    auth::middleware::{session_auth_middleware, SessionLayer},
    handlers,
    middleware::AppState,
};

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let session_layer = Arc::new(SessionLayer {
        sessions: state.sessions.clone(),
        users: state.users.clone(),
        cookie_name: state.config.security.session_cookie_name.clone(),
    });

    // Probes stay outside the session middleware
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // Everything under /api/v1 sees the session middleware. Routes that
    // require an identity enforce it themselves via the CurrentUser
    // extractor or the authorization guard; the middleware never blocks.
    let api_routes = Router::new()
        .route("/api/v1/auth/signup", post(handlers::auth::signup))
        .route("/api/v1/auth/signin", post(handlers::auth::signin))
        .route("/api/v1/auth/signout", post(handlers::auth::signout))
        .route("/api/v1/auth/me", get(handlers::auth::me))
        .route("/api/v1/auth/password", put(handlers::auth::change_password))
        .route(
            "/api/v1/posts",
            get(handlers::post::list_posts).post(handlers::post::create_post),
        )
        .route(
            "/api/v1/posts/{id}",
            get(handlers::post::get_post)
                .put(handlers::post::update_post)
                .delete(handlers::post::delete_post),
        )
        .route("/api/v1/posts/{id}/like", post(handlers::post::toggle_like))
        .route(
            "/api/v1/posts/{id}/comments",
            get(handlers::comment::list_comments).post(handlers::comment::create_comment),
        )
        .layer(axum::middleware::from_fn_with_state(
            session_layer,
            session_auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(
            crate::middleware::request_tracking_middleware,
        ))
        .with_state(state)
}
