use std::{fs, path::Path};

use serde::Serialize;

/// Snapshot of an extraction run, written after every saved image.
#[derive(Debug, Serialize)]
pub struct Progress<'a> {
    pub container: &'a str,
    /// Offset table entries visited so far, including skipped ones.
    pub current: usize,
    pub total: usize,
    pub saved: usize,
    pub skipped: usize,
    pub status: &'a str,
}

/// Best effort: a progress file that cannot be written never fails the extraction.
pub fn write_progress(path: &Path, progress: &Progress<'_>) {
    if let Ok(json) = serde_json::to_string(progress) {
        let _ = fs::write(path, json);
    }
}
