//! Dashboard service
//!
//! Builds the landing view: a preview of merged posts, albums and photos
//! plus the logged-in user.

use serde::Serialize;

use crate::data::{Album, LoggedInUser, Photo, Post};

use super::catalog::CatalogService;
use super::posts::PostService;

/// Words kept per preview text (3 lines of 10 words)
pub const PREVIEW_WORDS: usize = 30;

/// Dashboard view model
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub user: Option<LoggedInUser>,
    pub posts: Vec<Post>,
    pub albums: Vec<Album>,
    pub photos: Vec<Photo>,
}

/// Keep the first `max_words` words of `text`, marking a cut with `...`
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split(' ').collect();
    if words.len() <= max_words {
        return text.to_string();
    }
    format!("{}...", words[..max_words].join(" "))
}

/// Dashboard service
pub struct DashboardService<'a> {
    posts: &'a PostService,
    catalog: &'a CatalogService,
    preview_count: usize,
}

impl<'a> DashboardService<'a> {
    pub fn new(posts: &'a PostService, catalog: &'a CatalogService, preview_count: usize) -> Self {
        Self {
            posts,
            catalog,
            preview_count,
        }
    }

    /// Load every dashboard section concurrently
    ///
    /// Sections whose fetch fails are empty; the post section still shows
    /// local posts.
    pub async fn load(&self, user: Option<LoggedInUser>) -> DashboardView {
        let (posts, albums, photos) = tokio::join!(
            self.posts.preview(self.preview_count),
            self.catalog.album_preview(self.preview_count),
            self.catalog.photo_preview(self.preview_count),
        );

        DashboardView {
            user,
            posts: posts
                .into_iter()
                .map(|post| Post {
                    body: truncate_words(&post.body, PREVIEW_WORDS),
                    ..post
                })
                .collect(),
            albums: albums
                .into_iter()
                .map(|album| Album {
                    title: truncate_words(&album.title, PREVIEW_WORDS),
                    ..album
                })
                .collect(),
            photos: photos
                .into_iter()
                .map(|photo| Photo {
                    title: truncate_words(&photo.title, PREVIEW_WORDS),
                    ..photo
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_words("a b c", 3), "a b c");
    }

    #[test]
    fn long_text_is_cut_with_ellipsis() {
        let text = (1..=35).map(|n| n.to_string()).collect::<Vec<_>>().join(" ");
        let cut = truncate_words(&text, PREVIEW_WORDS);

        assert!(cut.ends_with("30..."));
        assert_eq!(cut.trim_end_matches("...").split(' ').count(), 30);
    }
}
