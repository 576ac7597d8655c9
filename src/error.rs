//! Typed errors for per-file extraction.
//!
//! Everything above the extractor uses `anyhow`; these exist so the scanner
//! can tell a skippable file apart from a broken walk.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PostError {
    #[error("Malformed header in {source_path}: {message}")]
    MalformedHeader {
        source_path: String,
        message: String,
    },

    #[error("Failed to read {source_path}: {message}")]
    Read {
        source_path: String,
        message: String,
    },
}
