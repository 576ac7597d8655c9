//! postsync: discovers blog posts in a content tree, derives sorted metadata
//! and navigation, and keeps running clients in sync as files change.

pub mod app;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod features;
pub mod io;
pub mod parser;
pub mod services;
pub mod watcher;

#[cfg(test)]
mod tests;

pub use app::PostSync;
pub use config::{NavOptions, PostsConfig};
pub use domain::{NavItem, Post};
