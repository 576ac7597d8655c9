use crate::io::{has_extension, is_editor_temp_file, verify_within_root, ContentReader};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub struct LocalContentReader {
    pub root_path: PathBuf,
}

impl LocalContentReader {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
        }
    }
}

#[async_trait]
impl ContentReader for LocalContentReader {
    async fn read_to_string(&self, path: &Path) -> Result<String> {
        let verified = verify_within_root(&self.root_path, path)?;
        std::fs::read_to_string(&verified)
            .with_context(|| format!("Failed to read {}", path.display()))
    }

    async fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    async fn list_content_files(&self, root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        // sorted walk keeps scans deterministic across platforms
        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if entry.file_type().is_file()
                && has_extension(path, extension)
                && !is_editor_temp_file(path)
            {
                entries.push(entry.into_path());
            }
        }
        Ok(entries)
    }
}
