//! View endpoints
//!
//! One handler per navigation route. Every handler runs its fetches under a
//! `ViewActivation` and returns the view model as JSON.

use std::future::Future;

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Json},
};

use super::dto::{PageParams, PhotoCard, PostCommentsResponse, PostDetailResponse};
use crate::AppState;
use crate::auth::{AuthContext, CurrentUser, MaybeUser};
use crate::data::{Album, Comment, Post, User};
use crate::error::AppError;
use crate::metrics::HTTP_REQUESTS_TOTAL;
use crate::remote::Resource;
use crate::service::{DashboardService, DashboardView, Page, UserDetail};
use crate::view_state::ViewActivation;

/// Count a view request under the status it is answered with
fn record<T>(view: &str, result: Result<T, AppError>) -> Result<T, AppError> {
    let status = match &result {
        Ok(_) => axum::http::StatusCode::OK,
        Err(error) => error.status_code(),
    };
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[view, status.as_str()])
        .inc();
    result
}

/// Activation tied to the user's view state; cancelled on logout
async fn activate(state: &AppState, auth: &AuthContext) -> ViewActivation {
    state
        .view_states
        .for_user(&auth.user.username)
        .await
        .activate()
}

/// Load one page of a listing for the current user
///
/// An explicit `?page=` wins over the remembered page; the page actually
/// shown is written back only while the view is still live.
async fn load_page<T, F, Fut>(
    state: &AppState,
    auth: &AuthContext,
    resource: Resource,
    params: PageParams,
    load: F,
) -> Result<Page<T>, AppError>
where
    F: FnOnce(usize) -> Fut,
    Fut: Future<Output = Page<T>>,
{
    let view = state.view_states.for_user(&auth.user.username).await;
    let page = params.page.unwrap_or_else(|| view.page(resource).get());

    let activation = view.activate();
    let result = activation
        .run(load(page))
        .await
        .ok_or(AppError::Cancelled)?;
    activation.apply(|| view.page(resource).set(result.page));

    Ok(result)
}

/// GET /
pub async fn home(MaybeUser(auth): MaybeUser) -> impl IntoResponse {
    let greeting = match auth {
        Some(auth) => format!(
            r#"<p>Welcome back, {}.</p><a href="/dashboard">Open dashboard</a>"#,
            html_escape::encode_text(&auth.user.name)
        ),
        None => r#"<a href="/login">Sign in</a> or <a href="/signup">sign up</a>"#.to_string(),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Placeboard</title></head>
<body>
    <h1>Placeboard</h1>
    {greeting}
</body>
</html>"#
    ))
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<DashboardView>, AppError> {
    let posts = state.post_service();
    let catalog = state.catalog_service();
    let dashboard = DashboardService::new(&posts, &catalog, state.config.dashboard.preview_count);

    let activation = activate(&state, &auth).await;
    let view = activation
        .run(dashboard.load(Some(auth.user)))
        .await
        .ok_or(AppError::Cancelled)
        .map(Json);

    record("dashboard", view)
}

/// GET /posts
pub async fn posts_index(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Post>>, AppError> {
    let posts = state.post_service();
    let page_size = state.config.pagination.posts;
    let page = load_page(&state, &auth, Resource::Posts, params, |page| {
        posts.page(page, page_size)
    })
    .await
    .map(Json);

    record("posts", page)
}

/// GET /posts/:id
pub async fn post_detail(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Json<PostDetailResponse>, AppError> {
    let posts = state.post_service();
    let catalog = state.catalog_service();

    let activation = activate(&state, &auth).await;
    let detail = activation
        .run(async { tokio::join!(posts.find(id), catalog.comments_for_post(id)) })
        .await
        .ok_or(AppError::Cancelled)
        .and_then(|(post, comments)| {
            let post = post.ok_or(AppError::NotFound)?;
            Ok(Json(PostDetailResponse { post, comments }))
        });

    record("post_detail", detail)
}

/// GET /albums
pub async fn albums_index(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Album>>, AppError> {
    let catalog = state.catalog_service();
    let page_size = state.config.pagination.albums;
    let page = load_page(&state, &auth, Resource::Albums, params, |page| {
        catalog.albums_page(page, page_size)
    })
    .await
    .map(Json);

    record("albums", page)
}

/// GET /photos
pub async fn photos_index(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<PhotoCard>>, AppError> {
    let catalog = state.catalog_service();
    let page_size = state.config.pagination.photos;
    let page = load_page(&state, &auth, Resource::Photos, params, |page| {
        catalog.photos_page(page, page_size)
    })
    .await
    .map(|page| {
        Json(Page {
            items: page.items.into_iter().map(PhotoCard::from).collect(),
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            total_pages: page.total_pages,
        })
    });

    record("photos", page)
}

/// GET /comments
pub async fn comments_index(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Comment>>, AppError> {
    let catalog = state.catalog_service();
    let page_size = state.config.pagination.comments;
    let page = load_page(&state, &auth, Resource::Comments, params, |page| {
        catalog.comments_page(page, page_size)
    })
    .await
    .map(Json);

    record("comments", page)
}

/// GET /comments/:postId
pub async fn post_comments(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(post_id): Path<u64>,
) -> Result<Json<PostCommentsResponse>, AppError> {
    let catalog = state.catalog_service();

    let activation = activate(&state, &auth).await;
    let comments = activation
        .run(catalog.comments_for_post(post_id))
        .await
        .ok_or(AppError::Cancelled)
        .map(|comments| Json(PostCommentsResponse { post_id, comments }));

    record("post_comments", comments)
}

/// GET /users
pub async fn users_index(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<User>>, AppError> {
    let catalog = state.catalog_service();
    let page_size = state.config.pagination.users;
    let page = load_page(&state, &auth, Resource::Users, params, |page| {
        catalog.users_page(page, page_size)
    })
    .await
    .map(Json);

    record("users", page)
}

/// GET /users/:id
pub async fn user_detail(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Json<UserDetail>, AppError> {
    let catalog = state.catalog_service();

    let activation = activate(&state, &auth).await;
    let detail = activation
        .run(catalog.user_detail(id))
        .await
        .ok_or(AppError::Cancelled)
        .and_then(|detail| detail.ok_or(AppError::NotFound))
        .map(Json);

    record("user_detail", detail)
}
