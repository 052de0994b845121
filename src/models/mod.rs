//! Domain models

pub mod comment;
pub mod post;
pub mod user;
