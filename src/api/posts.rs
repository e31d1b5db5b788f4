//! Local post endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json},
};

use super::dto::ClearedResponse;
use crate::AppState;
use crate::auth::CurrentUser;
use crate::data::NewPost;
use crate::error::AppError;

/// GET /posts/create
pub async fn create_form(CurrentUser(auth): CurrentUser) -> impl IntoResponse {
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>New post - Placeboard</title></head>
<body>
    <h1>New post</h1>
    <p>Posting as {}. POST /posts/create with a title and a body.</p>
</body>
</html>"#,
        html_escape::encode_text(&auth.user.name)
    ))
}

/// POST /posts/create
///
/// Stores the post locally; nothing is sent to the remote API.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Json(new_post): Json<NewPost>,
) -> Result<impl IntoResponse, AppError> {
    let post = state.post_service().create(&auth.user, new_post).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// DELETE /posts/local
pub async fn clear_local(
    State(state): State<AppState>,
    CurrentUser(_auth): CurrentUser,
) -> Result<Json<ClearedResponse>, AppError> {
    let removed = state.post_service().clear_local().await?;
    Ok(Json(ClearedResponse { removed }))
}
