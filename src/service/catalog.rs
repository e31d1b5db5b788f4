//! Catalog service
//!
//! Read-only views over remote albums, photos, comments and users. Every
//! fetch failure degrades to an empty listing.

use serde::Serialize;

use crate::data::{Album, Comment, Photo, PhotoWithAlbum, Post, User};
use crate::remote::{RemoteApi, RemoteQuery, Resource};

use super::join::join_photos_with_albums;
use super::pagination::{Page, paginate};

/// A user together with the records they own
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    pub user: User,
    pub posts: Vec<Post>,
    pub albums: Vec<Album>,
}

/// Catalog service
pub struct CatalogService {
    remote: RemoteApi,
}

impl CatalogService {
    pub fn new(remote: RemoteApi) -> Self {
        Self { remote }
    }

    pub async fn albums_page(&self, page: usize, page_size: usize) -> Page<Album> {
        let albums: Vec<Album> = self
            .remote
            .list_or_empty(Resource::Albums, &RemoteQuery::new())
            .await;
        paginate(&albums, page, page_size)
    }

    /// First `count` albums
    pub async fn album_preview(&self, count: usize) -> Vec<Album> {
        let mut albums: Vec<Album> = self
            .remote
            .list_or_empty(Resource::Albums, &RemoteQuery::new().limit(count))
            .await;
        albums.truncate(count);
        albums
    }

    /// One page of photos, each joined with its album
    ///
    /// Only the visible slice is joined.
    pub async fn photos_page(&self, page: usize, page_size: usize) -> Page<PhotoWithAlbum> {
        let all = RemoteQuery::new();
        let (photos, albums) = tokio::join!(
            self.remote.list_or_empty::<Photo>(Resource::Photos, &all),
            self.remote.list_or_empty::<Album>(Resource::Albums, &all),
        );

        let page = paginate(&photos, page, page_size);
        let joined = join_photos_with_albums(page.items, &albums);
        Page {
            items: joined,
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            total_pages: page.total_pages,
        }
    }

    /// First `count` photos
    pub async fn photo_preview(&self, count: usize) -> Vec<Photo> {
        let mut photos: Vec<Photo> = self
            .remote
            .list_or_empty(Resource::Photos, &RemoteQuery::new().limit(count))
            .await;
        photos.truncate(count);
        photos
    }

    pub async fn comments_page(&self, page: usize, page_size: usize) -> Page<Comment> {
        let comments: Vec<Comment> = self
            .remote
            .list_or_empty(Resource::Comments, &RemoteQuery::new())
            .await;
        paginate(&comments, page, page_size)
    }

    /// Comments attached to one post
    pub async fn comments_for_post(&self, post_id: u64) -> Vec<Comment> {
        let comments: Vec<Comment> = self
            .remote
            .list_or_empty(
                Resource::Comments,
                &RemoteQuery::new().owned_by("postId", post_id),
            )
            .await;
        // Remote filtering is advisory; keep only matching records.
        comments
            .into_iter()
            .filter(|comment| comment.post_id == post_id)
            .collect()
    }

    pub async fn users_page(&self, page: usize, page_size: usize) -> Page<User> {
        let users: Vec<User> = self
            .remote
            .list_or_empty(Resource::Users, &RemoteQuery::new())
            .await;
        paginate(&users, page, page_size)
    }

    /// A user with their posts and albums; `None` if the user is unknown
    /// or the lookup failed
    pub async fn user_detail(&self, id: u64) -> Option<UserDetail> {
        let owned = RemoteQuery::new().owned_by("userId", id);
        let (user, posts, albums) = tokio::join!(
            self.remote.get_or_none::<User>(Resource::Users, id),
            self.remote.list_or_empty::<Post>(Resource::Posts, &owned),
            self.remote.list_or_empty::<Album>(Resource::Albums, &owned),
        );

        user.map(|user| UserDetail {
            posts: posts.into_iter().filter(|p| p.user_id == id).collect(),
            albums: albums.into_iter().filter(|a| a.user_id == id).collect(),
            user,
        })
    }
}
