use crate::config::PostsConfig;
use crate::domain::Post;
use crate::error::PostError;
use crate::io::ContentReader;
use crate::parser::excerpt::excerpt_of;
use crate::parser::frontmatter::{build_post, split_front_matter, PostLocation};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Walks the posts directory and turns every content file into a [`Post`].
pub struct PostScanner {
    reader: Arc<dyn ContentReader>,
    config: Arc<PostsConfig>,
}

impl PostScanner {
    pub fn new(reader: Arc<dyn ContentReader>, config: Arc<PostsConfig>) -> Self {
        Self { reader, config }
    }

    pub fn config(&self) -> &PostsConfig {
        &self.config
    }

    /// Performs one complete scan. Never cached; every call reads the tree again.
    pub async fn scan(&self) -> Result<Vec<Post>> {
        scan_posts(
            self.reader.as_ref(),
            &self.config.root_dir,
            &self.config.posts_dir,
            &self.config.extension,
            self.config.words_per_minute,
        )
        .await
    }
}

pub async fn scan_posts(
    reader: &dyn ContentReader,
    root: &Path,
    posts_dir: &str,
    extension: &str,
    words_per_minute: u32,
) -> Result<Vec<Post>> {
    let posts_path = root.join(posts_dir);

    // nothing written yet is a normal state, not an error
    if !reader.dir_exists(&posts_path).await {
        debug!("Posts directory {} does not exist yet", posts_path.display());
        return Ok(Vec::new());
    }

    let files = reader
        .list_content_files(&posts_path, extension)
        .await
        .with_context(|| format!("Failed to list posts under {}", posts_path.display()))?;

    let mut posts = Vec::with_capacity(files.len());
    let mut seen_urls = HashSet::new();

    for path in &files {
        let post = match discover_post(reader, root, path, extension, words_per_minute).await {
            Ok(post) => post,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        if !post.published {
            debug!("Skipping unpublished post {}", post.source);
            continue;
        }

        if !seen_urls.insert(post.url.clone()) {
            warn!(
                "Collision: url '{}' already claimed, skipping {}",
                post.url, post.source
            );
            continue;
        }

        posts.push(post);
    }

    sort_posts(&mut posts);

    info!("Scanned {} posts from {}", posts.len(), posts_path.display());

    Ok(posts)
}

async fn discover_post(
    reader: &dyn ContentReader,
    root: &Path,
    path: &Path,
    extension: &str,
    words_per_minute: u32,
) -> Result<Post, PostError> {
    let relative_path = path.strip_prefix(root).unwrap_or(path);
    let source = relative_path.to_string_lossy().replace('\\', "/");

    let raw = reader
        .read_to_string(path)
        .await
        .map_err(|e| PostError::Read {
            source_path: source.clone(),
            message: format!("{:#}", e),
        })?;

    let (front_matter, body) = split_front_matter(&raw, &source)?;
    let excerpt = excerpt_of(&body);

    let location = PostLocation {
        url: url_for_source(&source, extension),
        source,
    };

    Ok(build_post(
        front_matter,
        &body,
        excerpt.as_deref(),
        location,
        words_per_minute,
    ))
}

/// Site-relative url for a `/` separated source path.
///
/// `blog/posts/hello.md` -> `/blog/posts/hello`, `blog/posts/series/index.md` -> `/blog/posts/series/`.
pub fn url_for_source(source: &str, extension: &str) -> String {
    let normalized = source.replace('\\', "/");
    let normalized = normalized.trim_start_matches('/');
    let suffix = format!(".{}", extension);
    let stem = normalized.strip_suffix(&suffix).unwrap_or(normalized);

    if stem == "index" {
        return "/".to_string();
    }

    match stem.strip_suffix("/index") {
        Some(dir) => format!("/{}/", dir),
        None => format!("/{}", stem),
    }
}

fn date_key(post: &Post) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&post.date, "%Y-%m-%d").ok()
}

/// Newest first. Undated posts go last, keeping their walk order.
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| date_key(b).cmp(&date_key(a)));
}
