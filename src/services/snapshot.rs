//! Publishes the current post index in two forms.
//!
//! ```text
//! ┌──────────────┐   scan + nav   ┌──────────────────────────────────────────┐
//! │ PostScanner  │ ─────────────► │ Snapshot { posts, navigation }           │
//! └──────────────┘                └──────────────────────────────────────────┘
//!                                     │                          │
//!                  embed_tags / inject_into_html          resolve(resource id)
//!                                     ▼                          ▼
//!                  <script type="application/json">     virtual:postsync/posts
//!                  id="postsync-posts" / "postsync-nav"  virtual:postsync/navigation
//! ```
//!
//! The embedded form is written into every generated document so the first
//! render (crawlers included) has data. The loadable form is resolved on
//! demand and rescans on every request; the publisher only remembers which
//! resources it has handed out so the broadcaster can invalidate them.

use crate::domain::{NavItem, Post};
use crate::services::navigation::{generate_navigation, SourcePattern};
use crate::services::scan::PostScanner;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

pub const POSTS_SCRIPT_ID: &str = "postsync-posts";
pub const NAVIGATION_SCRIPT_ID: &str = "postsync-nav";

pub const POSTS_RESOURCE: &str = "virtual:postsync/posts";
pub const NAVIGATION_RESOURCE: &str = "virtual:postsync/navigation";

/// Point-in-time view of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub posts: Vec<Post>,
    /// `None` when navigation generation is disabled.
    pub navigation: Option<Vec<NavItem>>,
}

/// Host-side cache of resolved resources (a module graph, an HTTP cache...).
pub trait ResourceCache: Send + Sync {
    fn invalidate(&self, resource_id: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resource {
    Posts,
    Navigation,
}

impl Resource {
    fn from_id(id: &str) -> Option<Self> {
        match id {
            POSTS_RESOURCE => Some(Resource::Posts),
            NAVIGATION_RESOURCE => Some(Resource::Navigation),
            _ => None,
        }
    }
}

pub struct SnapshotPublisher {
    scanner: PostScanner,
    // None when the configured glob did not compile; every post then qualifies
    nav_source: Option<SourcePattern>,
    served: Mutex<BTreeSet<String>>,
}

impl SnapshotPublisher {
    pub fn new(scanner: PostScanner) -> Self {
        let nav_pattern = scanner.config().effective_nav_pattern();
        let nav_source = match SourcePattern::new(&nav_pattern) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("Ignoring navigation pattern {:?}: {}", nav_pattern, e);
                None
            }
        };

        Self {
            scanner,
            nav_source,
            served: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn scanner(&self) -> &PostScanner {
        &self.scanner
    }

    pub fn resource_ids(&self) -> Vec<&'static str> {
        if self.scanner.config().navigation_enabled {
            vec![POSTS_RESOURCE, NAVIGATION_RESOURCE]
        } else {
            vec![POSTS_RESOURCE]
        }
    }

    /// Fresh scan plus navigation (when enabled).
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let posts = self.scanner.scan().await?;
        let navigation = self.navigation_for(&posts);
        Ok(Snapshot { posts, navigation })
    }

    /// Navigation over the posts matching the navigation pattern, `None` when
    /// navigation is disabled.
    pub fn navigation_for(&self, posts: &[Post]) -> Option<Vec<NavItem>> {
        let config = self.scanner.config();
        if !config.navigation_enabled {
            return None;
        }

        let navigation = match &self.nav_source {
            Some(pattern) => {
                let sources: Vec<Post> = posts
                    .iter()
                    .filter(|post| pattern.matches(&post.source))
                    .cloned()
                    .collect();
                generate_navigation(&sources, &config.nav)
            }
            None => generate_navigation(posts, &config.nav),
        };
        Some(navigation)
    }

    /// Resolve a loadable resource to JSON.
    ///
    /// Returns `None` for ids this publisher does not own. Every call rescans,
    /// so a request that arrives before any broadcast still gets real data.
    pub async fn resolve(&self, resource_id: &str) -> Option<Result<String>> {
        let resource = Resource::from_id(resource_id)?;
        if resource == Resource::Navigation && !self.scanner.config().navigation_enabled {
            return None;
        }

        let result = self.resolve_resource(resource).await;
        if result.is_ok() {
            self.served.lock().insert(resource_id.to_string());
        }
        Some(result)
    }

    async fn resolve_resource(&self, resource: Resource) -> Result<String> {
        let posts = self.scanner.scan().await?;
        let json = match resource {
            Resource::Posts => serde_json::to_string(&posts),
            Resource::Navigation => {
                serde_json::to_string(&self.navigation_for(&posts).unwrap_or_default())
            }
        };
        json.context("Failed to serialize loadable snapshot")
    }

    /// Drop every served resource from `cache` and forget it.
    ///
    /// Returns the ids that were invalidated.
    pub fn invalidate(&self, cache: Option<&dyn ResourceCache>) -> Vec<String> {
        let served: Vec<String> = std::mem::take(&mut *self.served.lock())
            .into_iter()
            .collect();

        if let Some(cache) = cache {
            for id in &served {
                debug!("Invalidating loadable snapshot {}", id);
                cache.invalidate(id);
            }
        }

        served
    }

    /// Scan and embed the result into an HTML document.
    pub async fn embed_into(&self, html: &str) -> Result<String> {
        let snapshot = self.snapshot().await?;
        inject_into_html(html, &snapshot)
    }
}

/// The two `<script type="application/json">` blocks for a snapshot.
pub fn embed_tags(snapshot: &Snapshot) -> Result<String> {
    let posts_json =
        serde_json::to_string(&snapshot.posts).context("Failed to serialize posts snapshot")?;
    let mut tags = script_tag(POSTS_SCRIPT_ID, &posts_json);

    if let Some(navigation) = &snapshot.navigation {
        let nav_json =
            serde_json::to_string(navigation).context("Failed to serialize navigation snapshot")?;
        tags.push_str(&script_tag(NAVIGATION_SCRIPT_ID, &nav_json));
    }

    Ok(tags)
}

/// Insert the snapshot blocks before `</head>`, or at the top when the
/// document has no head.
pub fn inject_into_html(html: &str, snapshot: &Snapshot) -> Result<String> {
    let tags = embed_tags(snapshot)?;

    let head_end = html.to_ascii_lowercase().find("</head>");
    let mut output = String::with_capacity(html.len() + tags.len());
    match head_end {
        Some(index) => {
            output.push_str(&html[..index]);
            output.push_str(&tags);
            output.push_str(&html[index..]);
        }
        None => {
            output.push_str(&tags);
            output.push_str(html);
        }
    }

    Ok(output)
}

fn script_tag(id: &str, json: &str) -> String {
    format!(
        "<script type=\"application/json\" id=\"{}\">{}</script>",
        id,
        escape_json_for_html(json)
    )
}

// `<`, `>` and `&` only occur inside JSON strings, where the \u escapes are
// equivalent, so `</script>` can never terminate the block early
fn escape_json_for_html(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}
