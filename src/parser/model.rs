use serde::Deserialize;

// header fields recognized in a post; anything else is ignored
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct PostFrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    // kept loose so both `2024-01-15` and quoted/timestamp forms survive deserialization
    pub date: Option<serde_yaml::Value>,
    pub tags: Option<TagList>,
    pub author: Option<String>,
    pub slug: Option<String>,
    pub cover: Option<String>,
    pub published: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TagList {
    One(String),
    Many(Vec<String>),
}

impl TagList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            TagList::One(tag) => vec![tag],
            TagList::Many(tags) => tags,
        }
    }
}
