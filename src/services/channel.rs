use anyhow::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub const POSTS_UPDATE_EVENT: &str = "postsync:posts-update";
pub const NAVIGATION_UPDATE_EVENT: &str = "postsync:navigation-update";

pub type EventHandler = Arc<dyn Fn(&serde_json::Value) + Send + Sync>;

// the push channel between the watching process and running clients.
// the real transport belongs to the host dev server; anything that can
// publish and subscribe by event name fits here
pub trait UpdateChannel: Send + Sync {
    fn publish(&self, event: &str, payload: serde_json::Value) -> Result<()>;
    fn subscribe(&self, event: &str, handler: EventHandler);
}

/// In-process channel. Handlers run synchronously, in subscription order.
#[derive(Clone, Default)]
pub struct LocalChannel {
    handlers: Arc<RwLock<HashMap<String, Vec<EventHandler>>>>,
}

impl LocalChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber_count(&self, event: &str) -> usize {
        self.handlers.read().get(event).map_or(0, |h| h.len())
    }
}

impl UpdateChannel for LocalChannel {
    fn publish(&self, event: &str, payload: serde_json::Value) -> Result<()> {
        // release the lock before dispatch so handlers may subscribe
        let handlers = self.handlers.read().get(event).cloned().unwrap_or_default();
        for handler in handlers {
            handler(&payload);
        }
        Ok(())
    }

    fn subscribe(&self, event: &str, handler: EventHandler) {
        self.handlers
            .write()
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }
}
