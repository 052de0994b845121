//! Authentication and authorization module

pub mod authorize;
pub mod middleware;
pub mod password;
pub mod session;

pub use authorize::{authorize_owner, Decision, DenyReason};
pub use middleware::{
    extract_session_cookie, session_auth_middleware, CurrentUser, MaybeUser, SessionLayer,
};
pub use password::{PasswordHasher, SaltedHash};
pub use session::{SessionClaims, SessionService};
