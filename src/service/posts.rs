//! Post service
//!
//! Combines locally stored posts with remote ones through the list
//! synchronizer. Local posts are never sent to the remote API.

use std::sync::Arc;

use crate::data::{LocalStore, LoggedInUser, NewPost, POSTS_KEY, Post};
use crate::error::AppError;
use crate::metrics::LOCAL_POSTS_TOTAL;
use crate::remote::{RemoteApi, RemoteQuery, Resource};

use super::pagination::{Page, paginate};
use super::sync::{ListSynchronizer, MergePolicy};

/// Highest post id served by the remote API; local ids start above it
pub const REMOTE_POST_ID_CEILING: u64 = 100;

/// Post service
pub struct PostService {
    remote: RemoteApi,
    store: Arc<LocalStore>,
    synchronizer: ListSynchronizer,
}

impl PostService {
    /// Create new post service
    pub fn new(remote: RemoteApi, store: Arc<LocalStore>, synchronizer: ListSynchronizer) -> Self {
        Self {
            remote,
            store,
            synchronizer,
        }
    }

    /// Locally stored posts; `None` if absent or malformed
    pub async fn local_posts(&self) -> Option<Vec<Post>> {
        self.store.read_json(POSTS_KEY).await
    }

    /// Merged posts for the dashboard, capped at `count`
    ///
    /// Only `count` remote posts are requested.
    pub async fn preview(&self, count: usize) -> Vec<Post> {
        let query = RemoteQuery::new().limit(count);
        let (local, remote) = tokio::join!(
            self.local_posts(),
            self.remote.list_or_empty::<Post>(Resource::Posts, &query),
        );
        self.synchronizer.preview(local, remote, count)
    }

    /// All merged posts, untruncated
    pub async fn all(&self) -> Vec<Post> {
        let query = RemoteQuery::new();
        let (local, remote) = tokio::join!(
            self.local_posts(),
            self.remote.list_or_empty::<Post>(Resource::Posts, &query),
        );
        self.synchronizer.synchronize(local, remote)
    }

    /// One page of merged posts
    pub async fn page(&self, page: usize, page_size: usize) -> Page<Post> {
        let posts = self.all().await;
        paginate(&posts, page, page_size)
    }

    /// Look up a post in both sources, honoring the merge policy
    pub async fn find(&self, id: u64) -> Option<Post> {
        let local = self
            .local_posts()
            .await
            .and_then(|posts| posts.into_iter().find(|post| post.id == id));

        if local.is_some() && self.synchronizer.policy() == MergePolicy::LocalWins {
            return local;
        }

        let remote = self.remote.get_or_none::<Post>(Resource::Posts, id).await;
        remote.or(local)
    }

    /// Append a new local post
    ///
    /// The id is one past the highest known id, and never inside the
    /// remote id range.
    ///
    /// # Errors
    /// Returns `Validation` for an empty title or body
    pub async fn create(&self, author: &LoggedInUser, new_post: NewPost) -> Result<Post, AppError> {
        let title = new_post.title.trim();
        let body = new_post.body.trim();
        if title.is_empty() {
            return Err(AppError::Validation("title must not be empty".to_string()));
        }
        if body.is_empty() {
            return Err(AppError::Validation("body must not be empty".to_string()));
        }

        let (post, total) = self
            .store
            .update_json(POSTS_KEY, |posts: &mut Vec<Post>| {
                let next_id = posts
                    .iter()
                    .map(|post| post.id)
                    .max()
                    .unwrap_or(0)
                    .max(REMOTE_POST_ID_CEILING)
                    + 1;

                let post = Post {
                    id: next_id,
                    user_id: author.id,
                    title: title.to_string(),
                    body: body.to_string(),
                };
                posts.push(post.clone());
                Ok((post, posts.len()))
            })
            .await?;

        LOCAL_POSTS_TOTAL.set(total as i64);
        tracing::info!(post_id = post.id, author = %author.username, "Local post created");

        Ok(post)
    }

    /// Remove every local post, returning how many there were
    pub async fn clear_local(&self) -> Result<usize, AppError> {
        let removed = self.local_posts().await.map_or(0, |posts| posts.len());
        self.store.remove_item(POSTS_KEY).await?;
        LOCAL_POSTS_TOTAL.set(0);
        tracing::info!(removed, "Local posts cleared");
        Ok(removed)
    }
}
