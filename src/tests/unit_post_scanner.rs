use crate::services::scan::{scan_posts, sort_posts, url_for_source};
use crate::services::PostScanner;
use crate::tests::mocks::{mock_config, post_source, MockContentReader};
use std::path::Path;
use std::sync::Arc;

async fn scan(reader: &MockContentReader) -> Vec<crate::domain::Post> {
    scan_posts(reader, Path::new("/content"), "blog/posts", "md", 220)
        .await
        .expect("scan should succeed")
}

// the landmark scenario: one post with tags and a 440 word body
#[tokio::test]
async fn test_scan_single_post() {
    let reader = MockContentReader::new();
    let body = "word ".repeat(440);
    reader.add_file(
        "/content/blog/posts/hello.md",
        &format!("---\ntitle: Hello\ndate: 2024-01-15\ntags: [a, b]\n---\n{}", body),
    );

    let posts = scan(&reader).await;

    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert_eq!(post.title, "Hello");
    assert_eq!(post.date, "2024-01-15");
    assert_eq!(post.tags, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(post.reading_time, 2);
    assert_eq!(post.url, "/blog/posts/hello");
    assert_eq!(post.slug, "hello");
    assert_eq!(post.source, "blog/posts/hello.md");
}

#[tokio::test]
async fn test_unpublished_posts_are_filtered() {
    let reader = MockContentReader::new();
    reader.add_file("/content/blog/posts/a.md", &post_source("Visible", Some("2024-01-01"), "a"));
    reader.add_file(
        "/content/blog/posts/b.md",
        "---\ntitle: Hidden\ndate: 2024-06-01\npublished: false\n---\nsecret",
    );

    let posts = scan(&reader).await;

    assert_eq!(posts.len(), 1);
    assert!(posts.iter().all(|p| p.title != "Hidden"));
    assert!(posts.iter().all(|p| p.published));
}

#[tokio::test]
async fn test_posts_sorted_newest_first() {
    let reader = MockContentReader::new();
    reader.add_file("/content/blog/posts/old.md", &post_source("Old", Some("2024-01-01"), "x"));
    reader.add_file("/content/blog/posts/new.md", &post_source("New", Some("2024-02-01"), "x"));

    let posts = scan(&reader).await;
    let dates: Vec<&str> = posts.iter().map(|p| p.date.as_str()).collect();

    assert_eq!(dates, vec!["2024-02-01", "2024-01-01"]);
}

// undated and unparsable dates sink to the bottom, keeping walk order
#[tokio::test]
async fn test_undated_posts_sort_last_in_walk_order() {
    let reader = MockContentReader::new();
    reader.add_file("/content/blog/posts/a.md", &post_source("A", None, "x"));
    reader.add_file("/content/blog/posts/b.md", &post_source("B", Some("2023-05-05"), "x"));
    reader.add_file("/content/blog/posts/c.md", &post_source("C", Some("not-a-date"), "x"));
    reader.add_file("/content/blog/posts/d.md", &post_source("D", Some("2024-05-05"), "x"));

    let posts = scan(&reader).await;
    let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();

    assert_eq!(titles, vec!["D", "B", "A", "C"]);
    assert_eq!(posts[3].date, "");
}

#[test]
fn test_sort_is_stable_for_equal_dates() {
    let mut posts: Vec<crate::domain::Post> = ["first", "second", "third"]
        .iter()
        .map(|title| crate::domain::Post {
            title: title.to_string(),
            description: String::new(),
            date: "2024-01-01".to_string(),
            tags: vec![],
            author: "Anonymous".to_string(),
            url: format!("/{}", title),
            slug: title.to_string(),
            reading_time: 1,
            cover: None,
            source: format!("{}.md", title),
            published: true,
        })
        .collect();

    sort_posts(&mut posts);

    let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
}

// one broken header must not take the rest of the tree down with it
#[tokio::test]
async fn test_malformed_file_is_skipped() {
    let reader = MockContentReader::new();
    reader.add_file("/content/blog/posts/broken.md", "---\ntags: ['broken!]\n---\nbody");
    reader.add_file("/content/blog/posts/fine.md", &post_source("Fine", Some("2024-01-01"), "ok"));

    let posts = scan(&reader).await;

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "Fine");
}

#[tokio::test]
async fn test_missing_posts_dir_is_empty() {
    let reader = MockContentReader::new();
    reader.add_file("/content/docs/readme.md", "# not a post");

    let posts = scan(&reader).await;

    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_only_posts_dir_and_extension_are_scanned() {
    let reader = MockContentReader::new();
    reader.add_file("/content/blog/posts/a.md", &post_source("A", None, "x"));
    reader.add_file("/content/blog/posts/notes.txt", "not markdown");
    reader.add_file("/content/blog/drafts/b.md", &post_source("B", None, "x"));

    let posts = scan(&reader).await;

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "A");
}

#[tokio::test]
async fn test_scan_is_idempotent() {
    let reader = MockContentReader::new();
    reader.add_file("/content/blog/posts/a.md", &post_source("A", Some("2024-01-01"), "x y z"));
    reader.add_file("/content/blog/posts/b/index.md", &post_source("B", None, "x"));

    let scanner = PostScanner::new(Arc::new(reader.clone()), Arc::new(mock_config()));

    let first = scanner.scan().await.unwrap();
    let second = scanner.scan().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn test_index_files_collapse_to_directory_url() {
    let reader = MockContentReader::new();
    reader.add_file("/content/blog/posts/series/index.md", &post_source("Series", None, "x"));

    let posts = scan(&reader).await;

    assert_eq!(posts[0].url, "/blog/posts/series/");
    assert_eq!(posts[0].slug, "series");
}

#[test]
fn test_url_for_source() {
    assert_eq!(url_for_source("blog/posts/hello.md", "md"), "/blog/posts/hello");
    assert_eq!(url_for_source("blog\\posts\\hello.md", "md"), "/blog/posts/hello");
    assert_eq!(url_for_source("blog/posts/series/index.md", "md"), "/blog/posts/series/");
    assert_eq!(url_for_source("index.md", "md"), "/");
    // only a whole trailing segment named index collapses
    assert_eq!(url_for_source("blog/posts/reindex.md", "md"), "/blog/posts/reindex");
}
