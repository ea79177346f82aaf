//! Recursive directory scanner
//!
//! Walks a photo library, picks candidate images by extension and runs the
//! metadata reader on each. Per-file problems are recorded as skips. Only a
//! missing or unlistable root is fatal.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::data::{PhotoRecord, ScanResult, SkippedFile};
use crate::error::{ScanError, SkipReason};
use crate::metadata::{read_photo, ImageKind};

/// Upper bound on metadata reads in flight
pub const MAX_JOBS: usize = 1024;

/// Walk behaviour
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ScanOptions {
    /// Follow symbolic links to files and directories.
    /// When false, symlink entries are ignored entirely.
    pub follow_links: bool,
}

/// Scans a root directory into a ScanResult
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Scan sequentially on the calling thread
    pub fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        check_root(root)?;
        info!("🔍 Scanning folder: {}", root.display());

        let mut result = ScanResult::new(root);
        let candidates = self.collect_candidates(root, &mut result.skipped);

        for (index, path) in candidates.into_iter().enumerate() {
            let outcome = read_photo(&path);
            absorb(&mut result, path, outcome);

            if (index + 1) % 100 == 0 {
                info!("⏳ Read {} files...", index + 1);
            }
        }

        result.finish();
        info!(
            "✅ Scan complete: {} photos, {} skipped",
            result.processed(),
            result.skipped_count()
        );
        Ok(result)
    }

    /// Scan with up to `jobs` metadata reads in flight on the blocking pool
    ///
    /// The walk itself stays on the caller. All reads are joined before the
    /// result is returned, and the result is sorted, so it matches `scan`.
    pub async fn scan_concurrent(&self, root: &Path, jobs: usize) -> Result<ScanResult, ScanError> {
        check_root(root)?;
        let jobs = jobs.clamp(1, MAX_JOBS);
        info!("🔍 Scanning folder: {} ({} parallel reads)", root.display(), jobs);

        let mut result = ScanResult::new(root);
        let candidates = self.collect_candidates(root, &mut result.skipped);

        let permits = Arc::new(Semaphore::new(jobs));
        let mut reads = JoinSet::new();

        for path in candidates {
            // Semaphore is never closed, so acquiring only waits
            let permit = Arc::clone(&permits).acquire_owned().await.ok();
            reads.spawn_blocking(move || {
                let outcome = read_photo(&path);
                drop(permit);
                (path, outcome)
            });
        }

        while let Some(joined) = reads.join_next().await {
            let (path, outcome) = joined?;
            absorb(&mut result, path, outcome);
        }

        result.finish();
        info!(
            "✅ Scan complete: {} photos, {} skipped",
            result.processed(),
            result.skipped_count()
        );
        Ok(result)
    }

    /// Walk the tree and return candidate image paths in file-name order.
    /// Walk errors are recorded into `skipped`.
    fn collect_candidates(&self, root: &Path, skipped: &mut Vec<SkippedFile>) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(self.options.follow_links)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                    let reason = if err.loop_ancestor().is_some() {
                        SkipReason::SymlinkLoop
                    } else {
                        let detail = err
                            .io_error()
                            .map(|e| e.to_string())
                            .unwrap_or_else(|| err.to_string());
                        SkipReason::UnreadableDirectory(detail)
                    };
                    warn!("⚠️  Skipping {}: {}", path.display(), reason);
                    skipped.push(SkippedFile { path, reason });
                    continue;
                }
            };

            if entry.path_is_symlink() && !self.options.follow_links {
                debug!("Not following symlink {}", entry.path().display());
                continue;
            }

            if !entry.file_type().is_file() {
                continue;
            }

            if ImageKind::from_path(entry.path()).is_some() {
                candidates.push(entry.into_path());
            }
        }

        debug!("Found {} candidate images", candidates.len());
        candidates
    }
}

/// Route one read outcome into the records or the skips
fn absorb(result: &mut ScanResult, path: PathBuf, outcome: Result<PhotoRecord, SkipReason>) {
    match outcome {
        Ok(record) => {
            debug!(
                "📷 {}: {} at {} mm",
                record.path().display(),
                record.lens(),
                record.focal_length()
            );
            result.records.push(record);
        }
        Err(reason) => {
            debug!("Skipping {}: {}", path.display(), reason);
            result.skipped.push(SkippedFile { path, reason });
        }
    }
}

/// Root must be an existing, listable directory
fn check_root(root: &Path) -> Result<(), ScanError> {
    if !root.is_dir() {
        return Err(ScanError::PathNotFound(root.to_path_buf()));
    }

    std::fs::read_dir(root).map_err(|source| ScanError::UnreadableRoot {
        path: root.to_path_buf(),
        source,
    })?;

    Ok(())
}
