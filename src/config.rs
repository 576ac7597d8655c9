use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_POSTS_DIR: &str = "blog/posts";
pub const DEFAULT_EXTENSION: &str = "md";
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 220;
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Options for the generated navigation tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavOptions {
    /// link target of the "all posts" entry
    pub base_path: String,
    pub recent_count: usize,
    pub section_label: String,
    pub all_label: String,
    pub recent_label: String,
    pub recent_collapsed: bool,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            base_path: "/blog/".to_string(),
            recent_count: 5,
            section_label: "Blog".to_string(),
            all_label: "All Posts".to_string(),
            recent_label: "Recent Posts".to_string(),
            recent_collapsed: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PostsConfig {
    pub root_dir: PathBuf,
    /// posts location relative to `root_dir`, always `/` separated
    pub posts_dir: String,
    pub extension: String,
    pub words_per_minute: u32,
    pub navigation_enabled: bool,
    pub nav: NavOptions,
    /// glob over post sources feeding the navigation; `None` derives it
    /// from `posts_dir` and `extension`
    pub nav_pattern: Option<String>,
    pub listen_addr: String,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            posts_dir: DEFAULT_POSTS_DIR.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            navigation_enabled: true,
            nav: NavOptions::default(),
            nav_pattern: None,
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

impl PostsConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let nav_defaults = NavOptions::default();

        let root_dir = std::env::var("POSTSYNC_ROOT")
            .map(PathBuf::from)
            .unwrap_or(defaults.root_dir);

        let posts_dir = std::env::var("POSTSYNC_POSTS_DIR")
            .map(|dir| normalize_posts_dir(&dir))
            .unwrap_or(defaults.posts_dir);

        let extension = std::env::var("POSTSYNC_EXTENSION")
            .map(|ext| ext.trim_start_matches('.').to_string())
            .unwrap_or(defaults.extension);

        let words_per_minute = parse_var("POSTSYNC_WORDS_PER_MINUTE", defaults.words_per_minute);

        let nav = NavOptions {
            base_path: std::env::var("POSTSYNC_NAV_BASE_PATH").unwrap_or(nav_defaults.base_path),
            recent_count: parse_var("POSTSYNC_NAV_RECENT_COUNT", nav_defaults.recent_count),
            section_label: std::env::var("POSTSYNC_NAV_SECTION_LABEL")
                .unwrap_or(nav_defaults.section_label),
            all_label: std::env::var("POSTSYNC_NAV_ALL_LABEL").unwrap_or(nav_defaults.all_label),
            recent_label: std::env::var("POSTSYNC_NAV_RECENT_LABEL")
                .unwrap_or(nav_defaults.recent_label),
            recent_collapsed: parse_var("POSTSYNC_NAV_COLLAPSED", nav_defaults.recent_collapsed),
        };

        let nav_pattern = std::env::var("POSTSYNC_NAV_PATTERN").ok();

        Self {
            root_dir,
            posts_dir,
            extension,
            words_per_minute,
            navigation_enabled: parse_var("POSTSYNC_NAV_ENABLED", defaults.navigation_enabled),
            nav,
            nav_pattern,
            listen_addr: std::env::var("POSTSYNC_LISTEN").unwrap_or(defaults.listen_addr),
        }
    }

    /// Absolute-or-relative path of the scanned posts directory.
    pub fn posts_path(&self) -> PathBuf {
        self.root_dir.join(&self.posts_dir)
    }

    pub fn effective_nav_pattern(&self) -> String {
        self.nav_pattern
            .clone()
            .unwrap_or_else(|| default_nav_pattern(&self.posts_dir, &self.extension))
    }
}

pub fn default_nav_pattern(posts_dir: &str, extension: &str) -> String {
    format!("{}/**/*.{}", posts_dir.trim_end_matches('/'), extension)
}

pub fn normalize_posts_dir(dir: &str) -> String {
    dir.replace('\\', "/")
        .trim_start_matches("./")
        .trim_matches('/')
        .to_string()
}

fn parse_var<T: FromStr + Copy>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {}={:?}, using default", name, raw);
            default
        }),
        Err(_) => default,
    }
}
