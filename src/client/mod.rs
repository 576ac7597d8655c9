//! Client-side state: the session store, embedded snapshot reading, and the
//! in-place navigation patcher.

pub mod document;
pub mod reconcile;
pub mod store;

pub use self::document::{Document, HtmlDocument};
pub use self::reconcile::{
    reconcile_navigation, ClientReconciler, GroupHandle, PatchReport, RenderedLink, RenderedNav,
};
pub use self::store::PostStore;
