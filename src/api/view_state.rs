//! View state endpoints

use axum::{
    extract::State,
    response::Json,
};

use super::dto::{SidebarUpdate, ThemeUpdate};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::view_state::ViewStateSnapshot;

/// GET /view-state
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Json<ViewStateSnapshot> {
    let view = state.view_states.for_user(&auth.user.username).await;
    Json(view.snapshot())
}

/// PUT /view-state/sidebar
pub async fn set_sidebar(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Json(update): Json<SidebarUpdate>,
) -> Json<ViewStateSnapshot> {
    let view = state.view_states.for_user(&auth.user.username).await;
    view.sidebar_collapsed().set(update.collapsed);
    Json(view.snapshot())
}

/// PUT /view-state/theme
pub async fn set_theme(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Json(update): Json<ThemeUpdate>,
) -> Json<ViewStateSnapshot> {
    let view = state.view_states.for_user(&auth.user.username).await;
    view.theme().set(update.theme);
    Json(view.snapshot())
}

/// POST /view-state/theme/toggle
pub async fn toggle_theme(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Json<ViewStateSnapshot> {
    let view = state.view_states.for_user(&auth.user.username).await;
    let theme = view.theme().get().toggled();
    view.theme().set(theme);
    tracing::debug!(user = %auth.user.username, ?theme, "Theme toggled");
    Json(view.snapshot())
}
