//! List synchronizer
//!
//! Merges locally stored posts with remote ones into a single display
//! order:
//! 1. scan both sources in priority order (see `MergePolicy`)
//! 2. keep the first record seen for each id
//! 3. move the sentinel record to the end ("sentinel-last ordering")
//!
//! Records other than the sentinel are never reordered.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::data::Post;

/// Records that carry a unique numeric identifier
pub trait Identified {
    fn id(&self) -> u64;
}

impl Identified for Post {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Which source wins when a local and a remote record share an id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Remote records are scanned first and win collisions
    #[default]
    RemoteWins,
    /// Local records are scanned first and win collisions
    LocalWins,
}

/// Keep the first record for each id, preserving encounter order
pub fn dedup_by_id<T, I>(records: I) -> Vec<T>
where
    T: Identified,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.id()))
        .collect()
}

/// Move records with the sentinel id to the end
///
/// Stable: relative order among the other records is unchanged.
pub fn sentinel_last<T: Identified>(records: Vec<T>, sentinel: u64) -> Vec<T> {
    let (mut ordered, tail): (Vec<T>, Vec<T>) =
        records.into_iter().partition(|record| record.id() != sentinel);
    ordered.extend(tail);
    ordered
}

/// Merges local and remote posts for display
#[derive(Debug, Clone, Copy)]
pub struct ListSynchronizer {
    policy: MergePolicy,
    sentinel_id: u64,
}

impl ListSynchronizer {
    pub fn new(policy: MergePolicy, sentinel_id: u64) -> Self {
        Self {
            policy,
            sentinel_id,
        }
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Produce the full display sequence
    ///
    /// `local` absent and empty are equivalent. A failed remote fetch is
    /// passed in as an empty `remote`.
    pub fn synchronize(&self, local: Option<Vec<Post>>, remote: Vec<Post>) -> Vec<Post> {
        let local = local.unwrap_or_default();
        let merged = match self.policy {
            MergePolicy::RemoteWins => dedup_by_id(remote.into_iter().chain(local)),
            MergePolicy::LocalWins => dedup_by_id(local.into_iter().chain(remote)),
        };
        sentinel_last(merged, self.sentinel_id)
    }

    /// Synchronize, then keep the first `count` records
    pub fn preview(&self, local: Option<Vec<Post>>, remote: Vec<Post>, count: usize) -> Vec<Post> {
        let mut posts = self.synchronize(local, remote);
        posts.truncate(count);
        posts
    }
}
