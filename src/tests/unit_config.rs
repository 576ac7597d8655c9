use crate::config::{default_nav_pattern, normalize_posts_dir, NavOptions, PostsConfig};
use std::path::PathBuf;

#[test]
fn test_defaults() {
    let config = PostsConfig::default();

    assert_eq!(config.posts_dir, "blog/posts");
    assert_eq!(config.extension, "md");
    assert_eq!(config.words_per_minute, 220);
    assert!(config.navigation_enabled);
    assert_eq!(config.nav_pattern, None);
    assert_eq!(config.effective_nav_pattern(), "blog/posts/**/*.md");
    assert_eq!(config.posts_path(), PathBuf::from("./blog/posts"));

    let nav = NavOptions::default();
    assert_eq!(nav.base_path, "/blog/");
    assert_eq!(nav.recent_count, 5);
    assert_eq!(nav.section_label, "Blog");
    assert_eq!(nav.all_label, "All Posts");
    assert_eq!(nav.recent_label, "Recent Posts");
    assert!(!nav.recent_collapsed);
}

#[test]
fn test_default_nav_pattern() {
    assert_eq!(default_nav_pattern("notes", "mdx"), "notes/**/*.mdx");
    assert_eq!(default_nav_pattern("blog/posts/", "md"), "blog/posts/**/*.md");
}

#[test]
fn test_normalize_posts_dir() {
    assert_eq!(normalize_posts_dir("blog/posts"), "blog/posts");
    assert_eq!(normalize_posts_dir("./blog/posts/"), "blog/posts");
    assert_eq!(normalize_posts_dir("/blog/posts"), "blog/posts");
    assert_eq!(normalize_posts_dir("blog\\posts"), "blog/posts");
}

// an unset pattern follows the configured posts location
#[test]
fn test_nav_pattern_follows_posts_dir() {
    let config = PostsConfig {
        posts_dir: "content/posts".to_string(),
        extension: "mdx".to_string(),
        ..PostsConfig::default()
    };
    assert_eq!(config.effective_nav_pattern(), "content/posts/**/*.mdx");

    let explicit = PostsConfig {
        nav_pattern: Some("content/**/*.mdx".to_string()),
        ..config
    };
    assert_eq!(explicit.effective_nav_pattern(), "content/**/*.mdx");
}
