use crate::client::store::PostStore;
use crate::domain::{NavItem, Post};
use crate::services::channel::{UpdateChannel, NAVIGATION_UPDATE_EVENT, POSTS_UPDATE_EVENT};
use crate::services::navigation::find_group;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Opaque reference to a rendered navigation group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupHandle(pub usize);

/// What a rendered line item currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLink {
    pub text: String,
    pub link: Option<String>,
}

/// Capability over navigation output rendered by the presentation layer.
///
/// Implementations should match groups with
/// [`label_matches`](crate::domain::nav::label_matches).
pub trait RenderedNav: Send {
    fn find_rendered_group(&self, label: &str) -> Option<GroupHandle>;
    fn rendered_items(&self, group: GroupHandle) -> Vec<RenderedLink>;
    /// `None` leaves that attribute untouched.
    fn patch_item(&mut self, group: GroupHandle, index: usize, text: Option<&str>, link: Option<&str>);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub group_found: bool,
    pub patched: usize,
    pub unchanged: usize,
    /// rendered and new item counts differ; only the overlap was patched
    pub length_mismatch: bool,
}

/// Patch the rendered recent group in place so it shows `navigation`.
///
/// Only items whose text or link differ are touched. A missing group is not
/// an error: the held state is already correct, the visual patch is skipped.
pub fn reconcile_navigation(
    rendered: &mut dyn RenderedNav,
    navigation: &[NavItem],
    recent_label: &str,
) -> PatchReport {
    let Some(handle) = rendered.find_rendered_group(recent_label) else {
        debug!("No rendered '{}' group, skipping navigation patch", recent_label);
        return PatchReport::default();
    };

    let new_items: &[NavItem] = find_group(navigation, recent_label)
        .and_then(|group| group.items.as_deref())
        .unwrap_or(&[]);
    let current_items = rendered.rendered_items(handle);

    let mut report = PatchReport {
        group_found: true,
        length_mismatch: current_items.len() != new_items.len(),
        ..Default::default()
    };

    for (index, (current, next)) in current_items.iter().zip(new_items).enumerate() {
        let text = (current.text != next.text).then_some(next.text.as_str());
        let link = match next.link.as_deref() {
            Some(link) if current.link.as_deref() != Some(link) => Some(link),
            _ => None,
        };

        if text.is_none() && link.is_none() {
            report.unchanged += 1;
            continue;
        }

        rendered.patch_item(handle, index, text, link);
        report.patched += 1;
    }

    report
}

/// Applies broadcast events to the session store and the rendered tree.
#[derive(Clone)]
pub struct ClientReconciler {
    store: Arc<PostStore>,
    rendered: Option<Arc<Mutex<dyn RenderedNav>>>,
    recent_label: String,
}

impl ClientReconciler {
    pub fn new(store: Arc<PostStore>, recent_label: impl Into<String>) -> Self {
        Self {
            store,
            rendered: None,
            recent_label: recent_label.into(),
        }
    }

    pub fn with_rendered_nav(mut self, rendered: Arc<Mutex<dyn RenderedNav>>) -> Self {
        self.rendered = Some(rendered);
        self
    }

    pub fn store(&self) -> &Arc<PostStore> {
        &self.store
    }

    /// Subscribe to both update events on `channel`.
    pub fn attach(&self, channel: &dyn UpdateChannel) {
        let posts_reconciler = self.clone();
        channel.subscribe(
            POSTS_UPDATE_EVENT,
            Arc::new(move |payload: &serde_json::Value| {
                posts_reconciler.apply_posts_event(payload);
            }),
        );

        let nav_reconciler = self.clone();
        channel.subscribe(
            NAVIGATION_UPDATE_EVENT,
            Arc::new(move |payload: &serde_json::Value| {
                nav_reconciler.apply_navigation_event(payload);
            }),
        );
    }

    /// Replace the held posts wholesale. Malformed payloads are dropped.
    pub fn apply_posts_event(&self, payload: &serde_json::Value) -> bool {
        match serde_json::from_value::<Vec<Post>>(payload.clone()) {
            Ok(posts) => {
                debug!("Applying posts update with {} posts", posts.len());
                self.store.replace_posts(posts);
                true
            }
            Err(e) => {
                warn!("Ignoring malformed {} payload: {}", POSTS_UPDATE_EVENT, e);
                false
            }
        }
    }

    /// Replace the held navigation, then patch the rendered tree if one is attached.
    pub fn apply_navigation_event(&self, payload: &serde_json::Value) -> Option<PatchReport> {
        let navigation = match serde_json::from_value::<Vec<NavItem>>(payload.clone()) {
            Ok(navigation) => navigation,
            Err(e) => {
                warn!("Ignoring malformed {} payload: {}", NAVIGATION_UPDATE_EVENT, e);
                return None;
            }
        };

        self.store.replace_navigation(navigation.clone());

        let rendered = self.rendered.as_ref()?;
        let mut rendered = rendered.lock();
        Some(reconcile_navigation(
            &mut *rendered,
            &navigation,
            &self.recent_label,
        ))
    }
}
