use crate::client::document::Document;
use crate::domain::{NavItem, Post};
use crate::services::snapshot::{NAVIGATION_SCRIPT_ID, POSTS_SCRIPT_ID};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct StoreState {
    posts: Vec<Post>,
    navigation: Vec<NavItem>,
}

/// The one holder of client state per session.
///
/// Written by [`PostStore::initialize`] and by broadcast handlers only;
/// everything else reads. Create one at the composition root and share it.
#[derive(Debug, Default)]
pub struct PostStore {
    state: RwLock<StoreState>,
    initialized: AtomicBool,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Populate from the embedded snapshot of `document`.
    ///
    /// Runs at most once, and never after a broadcast already filled the
    /// store. Missing or broken blocks leave that half empty. Returns whether
    /// anything was done.
    pub fn initialize(&self, document: &dyn Document) -> bool {
        let posts: Vec<Post> = read_block(document, POSTS_SCRIPT_ID).unwrap_or_default();
        let navigation: Vec<NavItem> =
            read_block(document, NAVIGATION_SCRIPT_ID).unwrap_or_default();

        self.seed(posts, navigation)
    }

    /// Initial state from any source, under the same once-only guard as
    /// [`PostStore::initialize`].
    pub fn seed(&self, posts: Vec<Post>, navigation: Vec<NavItem>) -> bool {
        // hold the write lock so a concurrent broadcast cannot be overwritten
        let mut state = self.state.write();
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!("Client store already holds newer data, skipping seed");
            return false;
        }

        debug!(
            "Initialized client store with {} posts, {} nav groups",
            posts.len(),
            navigation.len()
        );

        state.posts = posts;
        state.navigation = navigation;
        true
    }

    pub fn replace_posts(&self, posts: Vec<Post>) {
        let mut state = self.state.write();
        self.initialized.store(true, Ordering::SeqCst);
        state.posts = posts;
    }

    pub fn replace_navigation(&self, navigation: Vec<NavItem>) {
        let mut state = self.state.write();
        self.initialized.store(true, Ordering::SeqCst);
        state.navigation = navigation;
    }

    pub fn posts(&self) -> Vec<Post> {
        self.state.read().posts.clone()
    }

    pub fn navigation(&self) -> Vec<NavItem> {
        self.state.read().navigation.clone()
    }

    pub fn post_count(&self) -> usize {
        self.state.read().posts.len()
    }
}

fn read_block<T: DeserializeOwned>(document: &dyn Document, id: &str) -> Option<T> {
    let text = document.script_text(id)?;
    match serde_json::from_str(text.trim()) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring unparsable snapshot block #{}: {}", id, e);
            None
        }
    }
}
