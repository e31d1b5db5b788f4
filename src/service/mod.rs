//! Service layer
//!
//! Contains the view logic separated from HTTP handlers.
//! Services combine the remote API, the local store and the list
//! synchronizer into view models.

mod catalog;
mod dashboard;
mod join;
mod pagination;
mod posts;
mod sync;

pub use catalog::{CatalogService, UserDetail};
pub use dashboard::{DashboardService, DashboardView, PREVIEW_WORDS, truncate_words};
pub use join::join_photos_with_albums;
pub use pagination::{Page, page_slice, paginate};
pub use posts::{PostService, REMOTE_POST_ID_CEILING};
pub use sync::{Identified, ListSynchronizer, MergePolicy, dedup_by_id, sentinel_last};
