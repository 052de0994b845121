//! HTTP handler modules

pub mod auth;
pub mod comment;
pub mod health;
pub mod post;
