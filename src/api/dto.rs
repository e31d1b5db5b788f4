//! View response DTOs
//!
//! Shapes returned by the view handlers where they differ from the plain
//! records.

use serde::{Deserialize, Serialize};

use crate::data::{Comment, Photo, PhotoWithAlbum, Post};
use crate::view_state::Theme;

/// Query string of paginated listings
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// 1-indexed page; omitted means "the page I was last on"
    pub page: Option<usize>,
}

/// Photo card with the album placeholder already resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoCard {
    #[serde(flatten)]
    pub photo: Photo,
    pub album: Option<crate::data::Album>,
    pub album_label: String,
}

impl From<PhotoWithAlbum> for PhotoCard {
    fn from(entry: PhotoWithAlbum) -> Self {
        let album_label = entry.album_label();
        Self {
            photo: entry.photo,
            album: entry.album,
            album_label,
        }
    }
}

/// Post detail view
#[derive(Debug, Clone, Serialize)]
pub struct PostDetailResponse {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// Comments of one post
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCommentsResponse {
    pub post_id: u64,
    pub comments: Vec<Comment>,
}

/// Result of clearing local posts
#[derive(Debug, Clone, Serialize)]
pub struct ClearedResponse {
    pub removed: usize,
}

#[derive(Debug, Deserialize)]
pub struct SidebarUpdate {
    pub collapsed: bool,
}

#[derive(Debug, Deserialize)]
pub struct ThemeUpdate {
    pub theme: Theme,
}
