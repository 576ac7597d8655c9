use serde::{Deserialize, Serialize};

/// A node of the generated navigation tree.
///
/// The same shape doubles as a static site-navigation value when no live
/// channel is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<NavItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

impl NavItem {
    pub fn link(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: Some(link.into()),
            items: None,
            collapsed: None,
        }
    }

    pub fn group(text: impl Into<String>, items: Vec<NavItem>) -> Self {
        Self {
            text: text.into(),
            link: None,
            items: Some(items),
            collapsed: None,
        }
    }
}

/// Case-insensitive whole-label comparison, ignoring surrounding whitespace.
///
/// Substring matching would also hit site labels like "Not Recent Posts".
pub fn label_matches(rendered: &str, label: &str) -> bool {
    let label = label.trim();
    !label.is_empty() && rendered.trim().to_lowercase() == label.to_lowercase()
}
