use derive_more::derive::Display;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// One discovered post. Recomputed wholesale on every scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[display("{}", url)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub title: String,
    pub description: String,
    // normalized YYYY-MM-DD, empty when absent or unparsable
    pub date: String,
    pub tags: Vec<String>,
    pub author: String,
    pub url: String,
    pub slug: String,
    pub reading_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    pub source: String,
    pub published: bool,
}

/// Derive a slug from a site-relative url.
///
/// `/blog/posts/hello.html` -> `hello`, `/blog/posts/series/` -> `series`.
pub fn slug_from_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed.rsplit('/').next().unwrap_or("");
    last.strip_suffix(".html").unwrap_or(last).to_string()
}
