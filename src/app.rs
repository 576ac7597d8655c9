use crate::config::PostsConfig;
use crate::io::ContentReader;
use crate::services::snapshot::{ResourceCache, Snapshot};
use crate::services::{ChangeBroadcaster, PostScanner, SnapshotPublisher, UpdateChannel};
use crate::watcher::{start_watching, WatchHandle};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Composition root for the build side.
///
/// [`PostSync::new`] only wires components; [`PostSync::start`] performs the
/// first scan and begins watching. Nothing happens at construction time.
pub struct PostSync {
    config: Arc<PostsConfig>,
    publisher: Arc<SnapshotPublisher>,
    broadcaster: Arc<ChangeBroadcaster>,
    channel: Arc<dyn UpdateChannel>,
    watch: Option<WatchHandle>,
}

impl PostSync {
    pub fn new(
        config: Arc<PostsConfig>,
        reader: Arc<dyn ContentReader>,
        channel: Arc<dyn UpdateChannel>,
        cache: Option<Arc<dyn ResourceCache>>,
    ) -> Self {
        let scanner = PostScanner::new(reader, config.clone());
        let publisher = Arc::new(SnapshotPublisher::new(scanner));

        let mut broadcaster = ChangeBroadcaster::new(publisher.clone(), channel.clone());
        if let Some(cache) = cache {
            broadcaster = broadcaster.with_resource_cache(cache);
        }

        Self {
            config,
            publisher,
            broadcaster: Arc::new(broadcaster),
            channel,
            watch: None,
        }
    }

    pub fn config(&self) -> &Arc<PostsConfig> {
        &self.config
    }

    pub fn publisher(&self) -> &Arc<SnapshotPublisher> {
        &self.publisher
    }

    pub fn broadcaster(&self) -> &Arc<ChangeBroadcaster> {
        &self.broadcaster
    }

    pub fn channel(&self) -> &Arc<dyn UpdateChannel> {
        &self.channel
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    /// First scan, then watch the content root when `watch` is set.
    ///
    /// A root that does not exist yet is scanned as empty and not watched.
    pub async fn start(&mut self, watch: bool) -> Result<Snapshot> {
        let snapshot = self.publisher.snapshot().await?;
        info!("Initial scan found {} posts", snapshot.posts.len());

        if watch && self.watch.is_none() {
            if self.config.root_dir.is_dir() {
                self.watch = Some(start_watching(
                    self.broadcaster.clone(),
                    &self.config.root_dir,
                )?);
            } else {
                warn!(
                    "Content root {} does not exist, not watching",
                    self.config.root_dir.display()
                );
            }
        }

        Ok(snapshot)
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.watch.take() {
            handle.stop();
        }
    }
}
