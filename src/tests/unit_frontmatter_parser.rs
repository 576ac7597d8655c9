use crate::domain::post::slug_from_url;
use crate::error::PostError;
use crate::parser::excerpt::excerpt_of;
use crate::parser::frontmatter::{
    build_post, clean_text, normalize_date, reading_time, split_front_matter, PostLocation,
};
use crate::parser::model::PostFrontMatter;

fn location(url: &str) -> PostLocation {
    PostLocation {
        url: url.to_string(),
        source: "blog/posts/test.md".to_string(),
    }
}

// the header is the "identity" of a post: title, date, tags...
#[test]
fn test_split_front_matter_valid() {
    let input = "---\ntitle: Hello\ndate: 2024-01-15\ntags:\n  - a\n  - b\n---\n# Hello World";
    let (fm, body) = split_front_matter(input, "test.md").expect("Should parse valid header");

    assert_eq!(fm.title, Some("Hello".to_string()));
    assert_eq!(normalize_date(fm.date.as_ref()), "2024-01-15");
    assert_eq!(fm.tags.map(|t| t.into_vec()), Some(vec!["a".to_string(), "b".to_string()]));
    assert_eq!(body.trim(), "# Hello World");
}

// a writer forgetting the header is fine, the file is just a plain post
#[test]
fn test_split_front_matter_missing_header() {
    let input = "# Just Content";
    let (fm, body) = split_front_matter(input, "test.md").expect("Should handle missing header");

    assert_eq!(fm, PostFrontMatter::default());
    assert_eq!(body.trim(), "# Just Content");
}

#[test]
fn test_split_front_matter_empty_header() {
    let input = "---\n---\nHello world!";
    let (fm, body) = split_front_matter(input, "test.md").unwrap();

    assert_eq!(fm, PostFrontMatter::default());
    assert_eq!(body.trim(), "Hello world!");
}

// broken YAML must surface so the scanner can skip the file
#[test]
fn test_split_front_matter_malformed_yaml() {
    let input = "---\ntags: ['broken!]\n---\nhello world!";
    let result = split_front_matter(input, "broken.md");

    match result {
        Err(PostError::MalformedHeader { source_path, .. }) => assert_eq!(source_path, "broken.md"),
        other => panic!("expected MalformedHeader, got {:?}", other.map(|(fm, _)| fm)),
    }
}

#[test]
fn test_split_front_matter_wrong_field_type() {
    let input = "---\npublished: maybe\n---\nbody";
    assert!(split_front_matter(input, "test.md").is_err());
}

#[test]
fn test_single_tag_string_becomes_list() {
    let input = "---\ntags: rust\n---\nbody";
    let (fm, _) = split_front_matter(input, "test.md").unwrap();
    assert_eq!(fm.tags.map(|t| t.into_vec()), Some(vec!["rust".to_string()]));
}

#[test]
fn test_build_post_defaults() {
    let post = build_post(
        PostFrontMatter::default(),
        "",
        None,
        location("/blog/posts/test"),
        220,
    );

    assert_eq!(post.title, "Untitled");
    assert_eq!(post.author, "Anonymous");
    assert_eq!(post.description, "");
    assert_eq!(post.date, "");
    assert!(post.tags.is_empty());
    assert_eq!(post.slug, "test");
    assert_eq!(post.reading_time, 1);
    assert!(post.cover.is_none());
    assert!(post.published);
    assert_eq!(post.source, "blog/posts/test.md");
}

// with no description in the header the excerpt is used as is
#[test]
fn test_description_falls_back_to_excerpt() {
    let post = build_post(
        PostFrontMatter::default(),
        "Hello world",
        Some("Hello world and more"),
        location("/blog/posts/test"),
        220,
    );
    assert_eq!(post.description, "Hello world and more");
}

#[test]
fn test_header_description_wins_over_excerpt() {
    let fm = PostFrontMatter {
        description: Some("  Written <b>by hand</b> ".to_string()),
        ..Default::default()
    };
    let post = build_post(fm, "", Some("excerpt"), location("/blog/posts/test"), 220);
    assert_eq!(post.description, "Written by hand");
}

#[test]
fn test_slug_override_and_derivation() {
    let fm = PostFrontMatter {
        slug: Some("custom".to_string()),
        ..Default::default()
    };
    let post = build_post(fm, "", None, location("/blog/posts/test"), 220);
    assert_eq!(post.slug, "custom");

    assert_eq!(slug_from_url("/blog/posts/hello"), "hello");
    assert_eq!(slug_from_url("/blog/posts/hello.html"), "hello");
    assert_eq!(slug_from_url("/blog/posts/series/"), "series");
}

#[test]
fn test_reading_time_rounds_and_never_zero() {
    assert_eq!(reading_time("", 220), 1);
    assert_eq!(reading_time("   \n\t ", 220), 1);
    assert_eq!(reading_time(&"word ".repeat(440), 220), 2);
    assert_eq!(reading_time(&"word ".repeat(329), 220), 1);
    assert_eq!(reading_time(&"word ".repeat(331), 220), 2);
    assert_eq!(reading_time(&"word ".repeat(1000), 100), 10);
    // a zero rate falls back to the default instead of dividing by zero
    assert_eq!(reading_time(&"word ".repeat(440), 0), 2);
}

#[test]
fn test_normalize_date_variants() {
    let value = |s: &str| serde_yaml::Value::String(s.to_string());

    assert_eq!(normalize_date(Some(&value("2024-01-15"))), "2024-01-15");
    assert_eq!(normalize_date(Some(&value("2024-01-15T10:30:00Z"))), "2024-01-15");
    assert_eq!(normalize_date(Some(&value("2024-01-15 10:30:00"))), "2024-01-15");
    assert_eq!(normalize_date(Some(&value("next tuesday"))), "");
    assert_eq!(normalize_date(Some(&value("2024-13-45"))), "");
    assert_eq!(normalize_date(Some(&serde_yaml::Value::Bool(true))), "");
    assert_eq!(normalize_date(None), "");
}

#[test]
fn test_clean_text() {
    assert_eq!(clean_text("<p>a</p><p>b</p>"), "a b");
    assert_eq!(clean_text("  plain\n\ntext  "), "plain text");
    assert_eq!(clean_text(""), "");
}

#[test]
fn test_excerpt_first_paragraph() {
    let body = "# Heading\n\nFirst *paragraph* here.\n\nSecond paragraph.";
    let excerpt = excerpt_of(body).expect("Should find a paragraph");

    assert_eq!(excerpt, "First paragraph here.");
}

#[test]
fn test_excerpt_more_marker() {
    let body = "Intro one.\n\nIntro two.\n\n<!-- more -->\n\nRest of the post.";
    let excerpt = excerpt_of(body).unwrap();

    assert_eq!(excerpt, "Intro one. Intro two.");
}

#[test]
fn test_excerpt_none_without_paragraphs() {
    assert!(excerpt_of("").is_none());
    assert!(excerpt_of("# Only a heading").is_none());
}

// entities and quotes come through literally, not HTML-escaped
#[test]
fn test_excerpt_keeps_special_characters() {
    let excerpt = excerpt_of("Tom & Jerry \"hi\" use `a < b`.\n\nSecond.").unwrap();
    assert_eq!(excerpt, "Tom & Jerry \"hi\" use a < b.");

    let post = build_post(
        PostFrontMatter::default(),
        "",
        Some(&excerpt),
        location("/blog/posts/test"),
        220,
    );
    assert_eq!(post.description, "Tom & Jerry \"hi\" use a < b.");
}

#[test]
fn test_excerpt_drops_inline_html() {
    let excerpt = excerpt_of("Some <span>wrapped</span> *word*s\nacross lines.").unwrap();
    assert_eq!(excerpt, "Some wrapped words across lines.");
}
