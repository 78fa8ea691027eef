//! Background sweep of leftover upload files.
//!
//! Uploads are deleted as soon as they are analyzed; this only catches files
//! orphaned by a crash or an aborted request.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::debug;

pub const STALE_UPLOAD_AGE: Duration = Duration::from_secs(60 * 60);
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Spawns a task that sweeps `dir` every `interval`, for the life of the process.
pub fn spawn_upload_sweeper(dir: PathBuf, max_age: Duration, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let removed = sweep_stale_uploads(&dir, max_age).await;
            if removed > 0 {
                debug!("Removed {removed} stale uploads from {}", dir.display());
            }
        }
    });
}

/// Deletes `.pdf` files in `dir` last modified at least `max_age` ago.
/// Errors are swallowed; returns how many files were removed.
pub async fn sweep_stale_uploads(dir: &Path, max_age: Duration) -> usize {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Skipping upload sweep of {}: {e}", dir.display());
            return 0;
        }
    };

    let now = SystemTime::now();
    let mut removed = 0;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            continue;
        }

        let age = match entry.metadata().await.and_then(|m| m.modified()) {
            Ok(modified) => now.duration_since(modified).unwrap_or_default(),
            Err(_) => continue,
        };
        if age >= max_age && tokio::fs::remove_file(&path).await.is_ok() {
            removed += 1;
        }
    }
    removed
}
