use crate::config::PostsConfig;
use crate::domain::{NavItem, Post};
use crate::io::{has_extension, is_editor_temp_file};
use crate::services::channel::{UpdateChannel, NAVIGATION_UPDATE_EVENT, POSTS_UPDATE_EVENT};
use crate::services::snapshot::{ResourceCache, SnapshotPublisher};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastState {
    Idle,
    Scanning,
}

/// What one rescan pushed to clients.
#[derive(Debug, Clone)]
pub struct Broadcast {
    pub posts: Vec<Post>,
    pub navigation: Option<Vec<NavItem>>,
    pub invalidated: Vec<String>,
}

/// Rescans on qualifying file changes and pushes full replacement payloads.
pub struct ChangeBroadcaster {
    publisher: Arc<SnapshotPublisher>,
    channel: Arc<dyn UpdateChannel>,
    cache: Option<Arc<dyn ResourceCache>>,
    state: Mutex<BroadcastState>,
}

impl ChangeBroadcaster {
    pub fn new(publisher: Arc<SnapshotPublisher>, channel: Arc<dyn UpdateChannel>) -> Self {
        Self {
            publisher,
            channel,
            cache: None,
            state: Mutex::new(BroadcastState::Idle),
        }
    }

    pub fn with_resource_cache(mut self, cache: Arc<dyn ResourceCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn state(&self) -> BroadcastState {
        *self.state.lock()
    }

    pub fn publisher(&self) -> &Arc<SnapshotPublisher> {
        &self.publisher
    }

    pub fn config(&self) -> &PostsConfig {
        self.publisher.scanner().config()
    }

    pub fn is_qualifying(&self, path: &Path) -> bool {
        is_qualifying_path(self.config(), path)
    }

    /// React to a batch of changed paths.
    ///
    /// Returns `None` when nothing in the batch is a post.
    pub async fn handle_changes(&self, paths: &[PathBuf]) -> Result<Option<Broadcast>> {
        let qualifying: Vec<&PathBuf> = paths.iter().filter(|p| self.is_qualifying(p)).collect();

        if qualifying.is_empty() {
            debug!("Ignoring {} non-post change(s)", paths.len());
            return Ok(None);
        }

        for path in &qualifying {
            debug!("Post changed: {}", path.display());
        }

        self.broadcast_now().await.map(Some)
    }

    /// Rescan unconditionally and push the result.
    pub async fn broadcast_now(&self) -> Result<Broadcast> {
        *self.state.lock() = BroadcastState::Scanning;
        let result = self.rescan_and_publish().await;
        *self.state.lock() = BroadcastState::Idle;
        result
    }

    async fn rescan_and_publish(&self) -> Result<Broadcast> {
        let posts = self
            .publisher
            .scanner()
            .scan()
            .await
            .context("Rescan after file change failed")?;
        let navigation = self.publisher.navigation_for(&posts);

        // stale loadable snapshots must go before clients start asking again
        let invalidated = self.publisher.invalidate(self.cache.as_deref());

        let posts_payload = serde_json::to_value(&posts).context("Failed to encode posts update")?;
        if let Err(e) = self.channel.publish(POSTS_UPDATE_EVENT, posts_payload) {
            warn!("Failed to publish {}: {:#}", POSTS_UPDATE_EVENT, e);
        }

        if let Some(navigation) = &navigation {
            let nav_payload =
                serde_json::to_value(navigation).context("Failed to encode navigation update")?;
            if let Err(e) = self.channel.publish(NAVIGATION_UPDATE_EVENT, nav_payload) {
                warn!("Failed to publish {}: {:#}", NAVIGATION_UPDATE_EVENT, e);
            }
        }

        info!("Broadcast {} posts to connected clients", posts.len());

        Ok(Broadcast {
            posts,
            navigation,
            invalidated,
        })
    }
}

/// `true` when `path` is a content file inside the posts directory.
///
/// Separators are normalized before comparing, so `blog\posts\a.md` and
/// `blog/posts/a.md` classify the same way.
pub fn is_qualifying_path(config: &PostsConfig, path: &Path) -> bool {
    if !has_extension(path, &config.extension) || is_editor_temp_file(path) {
        return false;
    }

    let relative = relative_to_root(&config.root_dir, path);
    let posts_prefix = format!("{}/", config.posts_dir.trim_end_matches('/'));

    relative.starts_with(&posts_prefix)
}

fn relative_to_root(root: &Path, path: &Path) -> String {
    let relative = match path.strip_prefix(root) {
        Ok(rel) => rel.to_path_buf(),
        // notify reports canonical paths, the configured root may be relative
        Err(_) => match root.canonicalize() {
            Ok(canonical) => path
                .strip_prefix(&canonical)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.to_path_buf()),
            Err(_) => path.to_path_buf(),
        },
    };

    let normalized = relative.to_string_lossy().replace('\\', "/");
    normalized.trim_start_matches("./").to_string()
}
