//! SourceCache: tracks the trail file's modification time so watcher
//! noise (editors touching the file, duplicate events) doesn't trigger
//! needless reloads.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Caches file modification times to decide whether a reload is needed.
#[derive(Debug, Default)]
pub struct SourceCache {
    mtimes: HashMap<PathBuf, SystemTime>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if any of the changed paths refers to the watched trail file.
    pub fn touches(&self, source: &Path, paths: &[PathBuf]) -> bool {
        let Some(name) = source.file_name() else {
            return false;
        };
        paths.iter().any(|p| p.file_name() == Some(name))
    }

    /// Update cached mtime for a path.
    pub fn update_mtime(&mut self, path: &Path) {
        if let Ok(metadata) = std::fs::metadata(path) {
            if let Ok(mtime) = metadata.modified() {
                self.mtimes.insert(path.to_path_buf(), mtime);
            }
        }
    }

    /// Check if a path has changed since last cached mtime.
    pub fn has_changed(&self, path: &Path) -> bool {
        let current = std::fs::metadata(path)
            .ok()
            .and_then(|m| m.modified().ok());

        match (self.mtimes.get(path), current) {
            (Some(cached), Some(current)) => current > *cached,
            (None, Some(_)) => true,
            _ => false,
        }
    }
}
