use crate::config::NavOptions;
use crate::domain::nav::label_matches;
use crate::domain::{NavItem, Post};
use regex::Regex;

/// Build the navigation tree for an already date-sorted post list.
///
/// The all-posts group always comes first; the recent group only exists when
/// there is at least one post.
pub fn generate_navigation(posts: &[Post], options: &NavOptions) -> Vec<NavItem> {
    let mut navigation = vec![NavItem::group(
        options.section_label.clone(),
        vec![NavItem::link(
            options.all_label.clone(),
            options.base_path.clone(),
        )],
    )];

    if posts.is_empty() {
        return navigation;
    }

    let recent = posts
        .iter()
        .take(options.recent_count)
        .map(|post| NavItem::link(post.title.clone(), post.url.clone()))
        .collect();

    navigation.push(NavItem {
        text: options.recent_label.clone(),
        link: None,
        items: Some(recent),
        collapsed: Some(options.recent_collapsed),
    });

    navigation
}

/// Top-level group whose text matches `label`.
pub fn find_group<'a>(navigation: &'a [NavItem], label: &str) -> Option<&'a NavItem> {
    navigation
        .iter()
        .find(|item| item.items.is_some() && label_matches(&item.text, label))
}

/// Glob over post sources selecting which posts feed the navigation.
///
/// `**/` spans any number of directories, `*` and `?` stay within one segment.
#[derive(Debug, Clone)]
pub struct SourcePattern {
    regex: Regex,
}

impl SourcePattern {
    pub fn new(glob: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(&glob_to_regex(glob))?,
        })
    }

    pub fn matches(&self, source: &str) -> bool {
        self.regex.is_match(&source.replace('\\', "/"))
    }
}

fn glob_to_regex(glob: &str) -> String {
    let normalized = glob.replace('\\', "/");
    let mut chars = normalized.trim_start_matches("./").chars().peekable();
    let mut pattern = String::from("^");

    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    pattern.push_str("(?:.*/)?");
                } else {
                    pattern.push_str(".*");
                }
            }
            '*' => pattern.push_str("[^/]*"),
            '?' => pattern.push_str("[^/]"),
            other => pattern.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }

    pattern.push('$');
    pattern
}
