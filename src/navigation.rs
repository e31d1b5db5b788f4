//! Navigation surface
//!
//! Maps request paths to views and decides, given an auth check, whether a
//! view is rendered or the client is sent to the login page.

/// Every view reachable by path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    SignUp,
    Dashboard,
    Posts,
    CreatePost,
    PostDetail(u64),
    Albums,
    Photos,
    Comments,
    PostComments(u64),
    Users,
    UserDetail(u64),
    /// Non-view pages that still need a login (view state, metrics, ...)
    Protected,
}

impl Route {
    /// Parse a request path
    ///
    /// Returns `None` for paths with no view, including `/posts/abc`.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        let route = match segments.as_slice() {
            [] | [""] => Route::Home,
            ["login"] => Route::Login,
            ["signup"] => Route::SignUp,
            ["dashboard"] => Route::Dashboard,
            ["posts"] => Route::Posts,
            ["posts", "create"] => Route::CreatePost,
            ["posts", "local"] => Route::Protected,
            ["posts", id] => Route::PostDetail(id.parse().ok()?),
            ["albums"] => Route::Albums,
            ["photos"] => Route::Photos,
            ["comments"] => Route::Comments,
            ["comments", post_id] => Route::PostComments(post_id.parse().ok()?),
            ["users"] => Route::Users,
            ["users", id] => Route::UserDetail(id.parse().ok()?),
            ["view-state", ..] | ["metrics"] => Route::Protected,
            _ => return None,
        };
        Some(route)
    }

    /// Whether the route needs the logged-in marker
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Home | Route::Login | Route::SignUp)
    }
}

/// Something that can tell whether a user is logged in
pub trait AuthCheck {
    fn is_logged_in(&self) -> bool;
}

impl AuthCheck for bool {
    fn is_logged_in(&self) -> bool {
        *self
    }
}

impl<T> AuthCheck for Option<T> {
    fn is_logged_in(&self) -> bool {
        self.is_some()
    }
}

/// Outcome of resolving a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Route),
    RedirectToLogin,
    NotFound,
}

/// Path of the login view
pub const LOGIN_PATH: &str = "/login";

/// Decide what to do with a request for `path`
pub fn resolve_route(path: &str, auth: &dyn AuthCheck) -> RouteDecision {
    match Route::parse(path) {
        None => RouteDecision::NotFound,
        Some(route) if route.is_protected() && !auth.is_logged_in() => {
            RouteDecision::RedirectToLogin
        }
        Some(route) => RouteDecision::Render(route),
    }
}
