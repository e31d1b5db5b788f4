//! Photo/album join

use std::collections::HashMap;

use crate::data::{Album, Photo, PhotoWithAlbum};

/// Annotate each photo with its owning album
///
/// Albums are indexed once; when two albums share an id the first one
/// wins. A photo whose `album_id` matches nothing carries `album: None`.
pub fn join_photos_with_albums(photos: Vec<Photo>, albums: &[Album]) -> Vec<PhotoWithAlbum> {
    let mut index: HashMap<u64, &Album> = HashMap::with_capacity(albums.len());
    for album in albums {
        index.entry(album.id).or_insert(album);
    }

    photos
        .into_iter()
        .map(|photo| {
            let album = index.get(&photo.album_id).map(|album| (*album).clone());
            PhotoWithAlbum { photo, album }
        })
        .collect()
}
