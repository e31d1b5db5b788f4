//! View state
//!
//! Small named cells holding UI state (current page per listing, sidebar
//! collapsed flag, theme). Each cell has a single writer and any number of
//! subscribers, built on `tokio::sync::watch`.
//!
//! State is kept per logged-in user in a `ViewStateRegistry` and handed to
//! handlers explicitly.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, watch};
use tokio_util::sync::CancellationToken;

use crate::remote::Resource;

// =============================================================================
// Cells
// =============================================================================

/// A mutable value with change notification
#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone + PartialEq> StateCell<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Replace the value; subscribers are only notified on change
    ///
    /// Returns `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

/// Color theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

// =============================================================================
// Per-user view state
// =============================================================================

/// View state of one user
///
/// Every listing has its own current-page cell, so switching resource
/// type never carries a page number over. Activations started from this
/// state are cancelled together when the user logs out.
#[derive(Debug)]
pub struct ViewState {
    pages: HashMap<Resource, StateCell<usize>>,
    sidebar_collapsed: StateCell<bool>,
    theme: StateCell<Theme>,
    lifetime: CancellationToken,
}

/// Serializable copy of a `ViewState`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewStateSnapshot {
    pub sidebar_collapsed: bool,
    pub theme: Theme,
    pub pages: HashMap<Resource, usize>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::with_lifetime(CancellationToken::new())
    }

    fn with_lifetime(lifetime: CancellationToken) -> Self {
        Self {
            pages: Resource::ALL
                .into_iter()
                .map(|resource| (resource, StateCell::new(1)))
                .collect(),
            sidebar_collapsed: StateCell::new(false),
            theme: StateCell::new(Theme::default()),
            lifetime,
        }
    }

    /// Start a view activation bound to this state's lifetime
    pub fn activate(&self) -> ViewActivation {
        ViewActivation::child_of(&self.lifetime)
    }

    /// Cancel every activation of this state, in flight or future
    pub fn close(&self) {
        self.lifetime.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    pub fn page(&self, resource: Resource) -> &StateCell<usize> {
        // Every resource gets a cell in `new`.
        &self.pages[&resource]
    }

    pub fn sidebar_collapsed(&self) -> &StateCell<bool> {
        &self.sidebar_collapsed
    }

    pub fn theme(&self) -> &StateCell<Theme> {
        &self.theme
    }

    pub fn snapshot(&self) -> ViewStateSnapshot {
        ViewStateSnapshot {
            sidebar_collapsed: self.sidebar_collapsed.get(),
            theme: self.theme.get(),
            pages: self
                .pages
                .iter()
                .map(|(resource, cell)| (*resource, cell.get()))
                .collect(),
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

/// View states keyed by username
///
/// Every state's lifetime is a child of the registry's, so `shutdown`
/// cancels all in-flight activations at once.
#[derive(Default)]
pub struct ViewStateRegistry {
    states: RwLock<HashMap<String, Arc<ViewState>>>,
    root: CancellationToken,
}

impl ViewStateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// View state for `username`, created on first use
    pub async fn for_user(&self, username: &str) -> Arc<ViewState> {
        {
            let states = self.states.read().await;
            if let Some(state) = states.get(username) {
                return state.clone();
            }
        }

        let mut states = self.states.write().await;
        states
            .entry(username.to_string())
            .or_insert_with(|| Arc::new(ViewState::with_lifetime(self.root.child_token())))
            .clone()
    }

    /// Drop the state of a user that logged out
    ///
    /// Activations still running for that user are cancelled and their
    /// pending state writes are skipped.
    pub async fn remove(&self, username: &str) {
        if let Some(state) = self.states.write().await.remove(username) {
            state.close();
            tracing::debug!(user = %username, "View state closed");
        }
    }

    /// Cancel every activation of every user
    pub fn shutdown(&self) {
        self.root.cancel();
    }
}

// =============================================================================
// Activation
// =============================================================================

/// Lifetime of one view activation
///
/// Fetches run under `run` and are abandoned once the activation is
/// cancelled, either directly or through its parent (logout, shutdown);
/// state writes go through `apply` and are skipped after teardown.
/// Dropping the activation cancels it but never its parent.
pub struct ViewActivation {
    token: CancellationToken,
}

impl ViewActivation {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Activation cancelled together with `parent`
    pub fn child_of(parent: &CancellationToken) -> Self {
        Self {
            token: parent.child_token(),
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Await `fut` unless the activation is torn down first
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                tracing::debug!("View torn down before fetch completed");
                None
            }
            output = fut => Some(output),
        }
    }

    /// Run a state update only while the activation is live
    pub fn apply<R>(&self, update: impl FnOnce() -> R) -> Option<R> {
        if self.is_live() {
            Some(update())
        } else {
            None
        }
    }
}

impl Default for ViewActivation {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewActivation {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_changes_only() {
        let cell = StateCell::new(false);
        let mut rx = cell.subscribe();

        assert!(!cell.set(false));
        assert!(!rx.has_changed().unwrap());

        assert!(cell.set(true));
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());
    }

    #[test]
    fn page_cells_are_per_resource() {
        let state = ViewState::new();
        state.page(Resource::Photos).set(5);

        assert_eq!(state.page(Resource::Photos).get(), 5);
        assert_eq!(state.page(Resource::Albums).get(), 1);
    }

    #[tokio::test]
    async fn registry_returns_same_state_for_user() {
        let registry = ViewStateRegistry::new();
        registry.for_user("bret").await.theme().set(Theme::Dark);

        assert_eq!(registry.for_user("bret").await.theme().get(), Theme::Dark);
        assert_eq!(
            registry.for_user("antonette").await.theme().get(),
            Theme::Light
        );

        registry.remove("bret").await;
        assert_eq!(registry.for_user("bret").await.theme().get(), Theme::Light);
    }

    #[tokio::test]
    async fn cancelled_activation_abandons_fetch_and_skips_update() {
        let activation = ViewActivation::new();
        activation.cancel();

        let fetched = activation.run(std::future::pending::<u32>()).await;
        assert!(fetched.is_none());

        let state = ViewState::new();
        let applied = activation.apply(|| state.page(Resource::Posts).set(3));
        assert!(applied.is_none());
        assert_eq!(state.page(Resource::Posts).get(), 1);
    }

    #[tokio::test]
    async fn live_activation_completes_fetch() {
        let activation = ViewActivation::new();
        assert_eq!(activation.run(async { 7 }).await, Some(7));

        let token = activation.token();
        drop(activation);
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn logout_cancels_in_flight_activation() {
        let registry = Arc::new(ViewStateRegistry::new());
        let state = registry.for_user("bret").await;
        let activation = state.activate();

        let pending = {
            let registry = registry.clone();
            async move {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                registry.remove("bret").await;
            }
        };
        let (fetched, ()) = tokio::join!(activation.run(std::future::pending::<u32>()), pending);

        assert!(fetched.is_none());
        assert!(activation.apply(|| state.page(Resource::Posts).set(4)).is_none());
        assert_eq!(state.page(Resource::Posts).get(), 1);
        assert!(state.is_closed());
    }

    #[tokio::test]
    async fn other_users_survive_logout() {
        let registry = ViewStateRegistry::new();
        let bret = registry.for_user("bret").await;
        let antonette = registry.for_user("antonette").await;

        registry.remove("bret").await;

        assert!(!bret.activate().is_live());
        assert!(antonette.activate().is_live());
    }

    #[tokio::test]
    async fn shutdown_cancels_every_user() {
        let registry = ViewStateRegistry::new();
        let bret = registry.for_user("bret").await;
        let activation = bret.activate();

        registry.shutdown();

        assert!(!activation.is_live());
        assert!(activation.run(async { 1 }).await.is_none());
    }

    #[test]
    fn dropping_activation_keeps_parent_alive() {
        let state = ViewState::new();
        drop(state.activate());
        assert!(!state.is_closed());
        assert!(state.activate().is_live());
    }

    #[test]
    fn theme_toggles() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }
}
