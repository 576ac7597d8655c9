pub mod broadcast;
pub mod channel;
pub mod navigation;
pub mod scan;
pub mod snapshot;

pub use self::broadcast::ChangeBroadcaster;
pub use self::channel::{LocalChannel, UpdateChannel};
pub use self::scan::PostScanner;
pub use self::snapshot::SnapshotPublisher;
