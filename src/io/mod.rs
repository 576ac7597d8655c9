use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub mod local;

// the file system seam; the scanner only ever reads through this
#[async_trait]
pub trait ContentReader: Send + Sync {
    async fn read_to_string(&self, path: &Path) -> Result<String>;
    async fn dir_exists(&self, path: &Path) -> bool;
    // every file under `root` with the given extension, in a stable order
    async fn list_content_files(&self, root: &Path, extension: &str) -> Result<Vec<PathBuf>>;
}

/// Resolve `path` and make sure it stays inside `root` (symlinks included).
pub fn verify_within_root(root: &Path, path: &Path) -> Result<PathBuf> {
    let canonical_root = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve content root {}", root.display()))?;
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", path.display()))?;

    if !canonical.starts_with(&canonical_root) {
        bail!(
            "{} resolves outside of content root {}",
            path.display(),
            root.display()
        );
    }

    Ok(canonical)
}

/// `true` for dotfiles and editor backups (`foo.md~`).
pub fn is_editor_temp_file(path: &Path) -> bool {
    let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    filename.starts_with('.') || filename.ends_with('~')
}

pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some(extension)
}
