pub mod nav;
pub mod post;

pub use nav::NavItem;
pub use post::Post;
