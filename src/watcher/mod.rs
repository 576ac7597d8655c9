#[allow(clippy::module_inception)]
pub mod watcher;

pub use self::watcher::{run_watch_worker, start_watching, WatchCommand, WatchHandle};
