use crate::config::DEFAULT_WORDS_PER_MINUTE;
use crate::domain::post::{slug_from_url, DEFAULT_AUTHOR, DEFAULT_TITLE};
use crate::domain::Post;
use crate::error::PostError;
use crate::parser::model::PostFrontMatter;
use gray_matter::{engine::YAML, Matter, ParsedEntity};
use regex::Regex;
use std::sync::LazyLock;

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Where a post lives, computed by the scanner.
#[derive(Debug, Clone)]
pub struct PostLocation {
    pub url: String,
    pub source: String,
}

// splits the YAML header from the markdown body.
// gray_matter finds the delimiters, serde_yaml validates the header strictly so
// broken syntax surfaces as an error instead of silently becoming defaults
pub fn split_front_matter(raw: &str, source: &str) -> Result<(PostFrontMatter, String), PostError> {
    let matter = Matter::<YAML>::new();

    let parsed: ParsedEntity = matter
        .parse(raw)
        .map_err(|e| PostError::MalformedHeader {
            source_path: source.to_string(),
            message: e.to_string(),
        })?;

    if parsed.matter.trim().is_empty() {
        return Ok((PostFrontMatter::default(), parsed.content));
    }

    let front_matter = serde_yaml::from_str::<Option<PostFrontMatter>>(&parsed.matter)
        .map_err(|e| PostError::MalformedHeader {
            source_path: source.to_string(),
            message: e.to_string(),
        })?
        .unwrap_or_default();

    Ok((front_matter, parsed.content))
}

/// Apply defaults and derivations to a parsed header.
///
/// `excerpt` is plain text from [`excerpt_of`](crate::parser::excerpt::excerpt_of),
/// only consulted when the header carries no description.
pub fn build_post(
    front_matter: PostFrontMatter,
    body: &str,
    excerpt: Option<&str>,
    location: PostLocation,
    words_per_minute: u32,
) -> Post {
    // the excerpt is already plain text; only hand-written descriptions carry markup
    let description = match front_matter.description.as_deref() {
        Some(description) => clean_text(description),
        None => excerpt.unwrap_or_default().to_string(),
    };

    let slug = front_matter
        .slug
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| slug_from_url(&location.url));

    Post {
        title: front_matter
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description,
        date: normalize_date(front_matter.date.as_ref()),
        tags: front_matter.tags.map(|t| t.into_vec()).unwrap_or_default(),
        author: front_matter
            .author
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        url: location.url,
        slug,
        reading_time: reading_time(body, words_per_minute),
        cover: front_matter.cover,
        source: location.source,
        published: front_matter.published.unwrap_or(true),
    }
}

/// Strip HTML-like tags and collapse whitespace.
pub fn clean_text(text: &str) -> String {
    let stripped = TAG_PATTERN.replace_all(text, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn count_words(body: &str) -> usize {
    body.split_whitespace().count()
}

/// Minutes to read `body`, never less than one.
pub fn reading_time(body: &str, words_per_minute: u32) -> u32 {
    let wpm = if words_per_minute == 0 {
        DEFAULT_WORDS_PER_MINUTE
    } else {
        words_per_minute
    };
    let minutes = (count_words(body) as f64 / wpm as f64).round() as u32;
    minutes.max(1)
}

// accepts RFC3339 timestamps and plain YYYY-MM-DD, everything else is treated as undated
pub fn normalize_date(value: Option<&serde_yaml::Value>) -> String {
    let raw = match value {
        Some(serde_yaml::Value::String(s)) => s.trim().to_string(),
        Some(serde_yaml::Value::Number(n)) => n.to_string(),
        _ => return String::new(),
    };

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&raw) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }

    if let Ok(date) = chrono::NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }

    // `2024-01-15 10:30:00` style timestamps
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S") {
        return dt.date().format("%Y-%m-%d").to_string();
    }

    String::new()
}
