//! Login, sign-up and logout
//!
//! Routes:
//! - GET /login - Login page
//! - POST /login - Check credentials, write marker, set session cookie
//! - GET /signup - Sign-up page
//! - POST /signup - Register a local account
//! - POST /logout - Remove the caller's marker, clear cookie

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::Serialize;

use super::accounts::{AccountService, Credentials, SignUp};
use super::middleware::{MaybeUser, SESSION_COOKIE};
use super::session::{Session, create_session_token};
use crate::AppState;
use crate::data::LoggedInUser;
use crate::error::AppError;

/// Create authentication router
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/signup", get(signup_page).post(signup))
        .route("/logout", post(logout))
}

// =============================================================================
// Pages
// =============================================================================

/// GET /login
async fn login_page() -> impl IntoResponse {
    Html(
        r#"
        <!DOCTYPE html>
        <html>
        <head><title>Login - Placeboard</title></head>
        <body>
            <h1>Placeboard</h1>
            <p>Sign in with your username and password (POST /login).</p>
            <a href="/signup">Create an account</a>
        </body>
        </html>
    "#,
    )
}

/// GET /signup
async fn signup_page() -> impl IntoResponse {
    Html(
        r#"
        <!DOCTYPE html>
        <html>
        <head><title>Sign up - Placeboard</title></head>
        <body>
            <h1>Create an account</h1>
            <p>POST /signup with name, username, email and password.</p>
            <a href="/login">Already registered? Sign in</a>
        </body>
        </html>
    "#,
    )
}

// =============================================================================
// Actions
// =============================================================================

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    user: LoggedInUser,
}

/// POST /signup
async fn signup(
    State(state): State<AppState>,
    Json(form): Json<SignUp>,
) -> Result<impl IntoResponse, AppError> {
    let user = AccountService::new(state.store.clone()).sign_up(form).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /login
///
/// # Steps
/// 1. Verify credentials against the local accounts
/// 2. Write the `loggedInUser` marker
/// 3. Sign a session token and set it as cookie
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    let user = AccountService::new(state.store.clone())
        .log_in(&credentials)
        .await?;

    let session = Session::start(&user.username, user.id, state.config.auth.session_max_age);
    let token = create_session_token(&session, &state.config.auth.session_secret)?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.should_use_secure_cookies())
        .build();

    Ok((jar.add(cookie), Json(LoginResponse { token, user })))
}

/// POST /logout
///
/// Removes the marker when the caller holds the live session, which
/// invalidates every outstanding token, and clears the session cookie.
/// An anonymous request only clears its own cookie.
async fn logout(
    State(state): State<AppState>,
    MaybeUser(auth): MaybeUser,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    // Without a live session there is nothing of the caller's to end
    if let Some(auth) = auth {
        let username = auth.user.username;
        AccountService::new(state.store.clone())
            .log_out(&username)
            .await?;
        state.view_states.remove(&username).await;
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    Ok((jar, Redirect::to("/login")))
}
