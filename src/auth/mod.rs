//! Local authentication
//!
//! Handles:
//! - Local accounts (sign-up, login, logout)
//! - Session tokens
//! - The login guard for protected views

mod accounts;
mod login;
mod middleware;
pub mod session;

pub use accounts::{AccountService, Credentials, SignUp};
pub use login::auth_router;
pub use middleware::{AuthContext, CurrentUser, MaybeUser, SESSION_COOKIE, protect, require_login};
pub use session::{Session, create_session_token, verify_session_token};
