use crate::services::ChangeBroadcaster;
use anyhow::{Context, Result};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    FileChanged(PathBuf),
    FileRemoved(PathBuf),
    FullRescan,
}

/// Keeps the OS watcher and its worker alive. Dropping it stops watching.
pub struct WatchHandle {
    _watcher: RecommendedWatcher,
    sender: mpsc::Sender<WatchCommand>,
    worker: JoinHandle<()>,
}

impl WatchHandle {
    /// Queue a command as if the OS had reported it.
    pub async fn send(&self, command: WatchCommand) -> Result<()> {
        self.sender
            .send(command)
            .await
            .context("Watch worker is no longer running")
    }

    pub fn stop(self) {
        self.worker.abort();
    }
}

/// Watch `root` recursively and feed every create/modify/remove into the
/// broadcaster. Must be called from inside a tokio runtime.
pub fn start_watching(broadcaster: Arc<ChangeBroadcaster>, root: &Path) -> Result<WatchHandle> {
    let (tx, rx) = mpsc::channel::<WatchCommand>(CHANNEL_CAPACITY);
    let tx_watcher = tx.clone();

    // set when the queue overflowed; the worker then rescans everything
    let needs_full_rescan = Arc::new(AtomicBool::new(false));
    let needs_full_rescan_watcher = needs_full_rescan.clone();

    let worker = tokio::spawn(run_watch_worker(broadcaster, rx, needs_full_rescan));

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                warn!("File watcher error: {}", e);
                return;
            }
        };

        for path in event.paths {
            let command = match event.kind {
                EventKind::Create(_) | EventKind::Modify(_) => WatchCommand::FileChanged(path),
                EventKind::Remove(_) => WatchCommand::FileRemoved(path),
                _ => continue,
            };

            if let Err(mpsc::error::TrySendError::Full(_)) = tx_watcher.try_send(command) {
                needs_full_rescan_watcher.store(true, Ordering::SeqCst);
                warn!("File event dropped due to high traffic, scheduling full rescan");
            }
        }
    })
    .context("Failed to initialize file watcher")?;

    watcher
        .watch(root, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", root.display()))?;

    info!("Watching {} for post changes", root.display());

    Ok(WatchHandle {
        _watcher: watcher,
        sender: tx,
        worker,
    })
}

/// The worker loop: sleep until an event arrives, drain whatever else is
/// already queued, then rescan once for the whole burst.
pub async fn run_watch_worker(
    broadcaster: Arc<ChangeBroadcaster>,
    mut receiver: mpsc::Receiver<WatchCommand>,
    needs_full_rescan: Arc<AtomicBool>,
) {
    while let Some(first) = receiver.recv().await {
        let mut batch = vec![first];
        while let Ok(command) = receiver.try_recv() {
            batch.push(command);
        }

        let full_rescan = needs_full_rescan.swap(false, Ordering::SeqCst)
            || batch.contains(&WatchCommand::FullRescan);

        let result = if full_rescan {
            broadcaster.broadcast_now().await.map(Some)
        } else {
            // removals and edits both end in a full rescan, only the paths matter
            let paths: Vec<PathBuf> = batch
                .into_iter()
                .filter_map(|command| match command {
                    WatchCommand::FileChanged(p) | WatchCommand::FileRemoved(p) => Some(p),
                    WatchCommand::FullRescan => None,
                })
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            broadcaster.handle_changes(&paths).await
        };

        match result {
            Ok(Some(broadcast)) => debug!(
                "Pushed {} posts, invalidated {} resource(s)",
                broadcast.posts.len(),
                broadcast.invalidated.len()
            ),
            Ok(None) => {}
            Err(e) => error!("Failed to broadcast post changes: {:#}", e),
        }
    }

    debug!("Watch worker stopped");
}
