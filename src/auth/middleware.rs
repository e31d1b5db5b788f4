//! Authentication middleware
//!
//! Protects views that require the logged-in marker.

use axum::{
    Router, async_trait,
    extract::{FromRef, FromRequestParts, State},
    http::{HeaderMap, Request, request::Parts},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use super::session::{Session, verify_session_token};
use crate::AppState;
use crate::data::{LOGGED_IN_USER_KEY, LoggedInUser};
use crate::error::AppError;
use crate::navigation::{LOGIN_PATH, RouteDecision, resolve_route};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Authenticated request context
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub session: Session,
    pub user: LoggedInUser,
}

fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(ToOwned::to_owned)
        .or_else(|| {
            let jar = CookieJar::from_headers(headers);
            jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_owned())
        })
}

/// Verify the request's session against the logged-in marker
///
/// A valid token is only honored while the marker names the same user.
async fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<AuthContext, AppError> {
    let token = extract_token_from_headers(headers).ok_or(AppError::Unauthorized)?;
    let session = verify_session_token(&token, &state.config.auth.session_secret)?;

    let marker: LoggedInUser = state
        .store
        .read_json(LOGGED_IN_USER_KEY)
        .await
        .ok_or(AppError::Unauthorized)?;

    if marker.username != session.username {
        tracing::debug!(
            session_user = %session.username,
            marker_user = %marker.username,
            "Session does not match logged-in marker"
        );
        return Err(AppError::Unauthorized);
    }

    Ok(AuthContext {
        session,
        user: marker,
    })
}

/// Middleware to require the logged-in marker
///
/// Resolves the request path against the navigation surface. Protected
/// views, and unparsable paths under a protected route, are redirected to
/// `/login` when there is no login.
///
/// # Usage
/// ```ignore
/// let views = protect(Router::new().route("/dashboard", get(dashboard)), state);
/// ```
pub async fn require_login(
    State(state): State<AppState>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth = authenticate(request.headers(), &state).await.ok();

    match resolve_route(request.uri().path(), &auth) {
        RouteDecision::RedirectToLogin => {
            tracing::debug!(path = %request.uri().path(), "Redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
        RouteDecision::Render(route) => {
            request.extensions_mut().insert(route);
            if let Some(auth) = auth {
                request.extensions_mut().insert(auth);
            }
            next.run(request).await
        }
        // Malformed paths under a guarded prefix still need a login first
        RouteDecision::NotFound if auth.is_none() => {
            tracing::debug!(path = %request.uri().path(), "Redirecting unknown path to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
        RouteDecision::NotFound => {
            if let Some(auth) = auth {
                request.extensions_mut().insert(auth);
            }
            next.run(request).await
        }
    }
}

/// Wrap every route of `router` in the login guard
pub fn protect(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, require_login))
}

/// Extractor for the current authenticated user
///
/// # Usage
/// ```ignore
/// async fn handler(CurrentUser(auth): CurrentUser) -> impl IntoResponse {
///     format!("Hello, {}", auth.user.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthContext);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<AuthContext>().cloned() {
            return Ok(CurrentUser(auth));
        }

        let state = AppState::from_ref(state);
        let auth = authenticate(&parts.headers, &state).await?;
        parts.extensions.insert(auth.clone());

        Ok(CurrentUser(auth))
    }
}

/// Optional current user extractor
///
/// Returns None if not authenticated, instead of error.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthContext>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<AuthContext>().cloned() {
            return Ok(MaybeUser(Some(auth)));
        }

        let app_state = AppState::from_ref(state);
        Ok(MaybeUser(authenticate(&parts.headers, &app_state).await.ok()))
    }
}
