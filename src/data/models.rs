//! Data models
//!
//! Flat records as served by the placeholder API. Field names follow the
//! API's camelCase wire format; no referential integrity is enforced
//! between them.

use serde::{Deserialize, Serialize};

// =============================================================================
// Posts
// =============================================================================

/// A post, either fetched from the remote API or created locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

/// Payload for creating a local post
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
}

// =============================================================================
// Albums and Photos
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: u64,
    pub album_id: u64,
    pub title: String,
    pub url: String,
    pub thumbnail_url: String,
}

/// A photo annotated with its owning album
///
/// `album` is `None` when the album lookup found nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoWithAlbum {
    #[serde(flatten)]
    pub photo: Photo,
    pub album: Option<Album>,
}

impl PhotoWithAlbum {
    /// Text shown in place of the album details
    pub fn album_label(&self) -> String {
        match &self.album {
            Some(album) => format!("Album Id: {} | Album Title: {}", album.id, album.title),
            None => "No album data available".to_string(),
        }
    }
}

// =============================================================================
// Comments
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub post_id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub company: Company,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

// =============================================================================
// Local accounts
// =============================================================================

/// Value of the `loggedInUser` marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedInUser {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
}

/// Locally registered account, stored under the `accounts` key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    /// Base64 salt used for the password digest
    pub salt: String,
    /// Base64 HMAC-SHA256 of the password
    pub password_digest: String,
}

impl Account {
    pub fn marker(&self) -> LoggedInUser {
        LoggedInUser {
            id: self.id,
            name: self.name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}
