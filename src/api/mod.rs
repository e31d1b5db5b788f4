//! API layer
//!
//! HTTP handlers for:
//! - Dashboard views (one per navigation route)
//! - Local post management
//! - View state
//! - Metrics (Prometheus)

mod dto;
mod metrics;
mod posts;
mod view_state;
mod views;

pub use dto::*;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::AppState;
use crate::auth::protect;

/// Public views
pub fn public_router() -> Router<AppState> {
    Router::new().route("/", get(views::home))
}

/// Views behind the login guard
///
/// Unauthenticated requests are redirected to `/login`.
pub fn protected_router(state: AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/dashboard", get(views::dashboard))
        .route("/posts", get(views::posts_index))
        .route("/posts/create", get(posts::create_form).post(posts::create))
        .route("/posts/local", delete(posts::clear_local))
        .route("/posts/:id", get(views::post_detail))
        .route("/albums", get(views::albums_index))
        .route("/photos", get(views::photos_index))
        .route("/comments", get(views::comments_index))
        .route("/comments/:post_id", get(views::post_comments))
        .route("/users", get(views::users_index))
        .route("/users/:id", get(views::user_detail))
        .route("/view-state", get(view_state::show))
        .route("/view-state/sidebar", put(view_state::set_sidebar))
        .route("/view-state/theme", put(view_state::set_theme))
        .route("/view-state/theme/toggle", post(view_state::toggle_theme))
        .route("/metrics", get(metrics::metrics_handler));

    protect(router, state)
}
