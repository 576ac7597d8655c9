pub mod excerpt;
pub mod frontmatter;
pub mod model;
