//! Error types for focal-usage
//!
//! Only `ScanError`, `ChartError` and `SettingsError` ever reach `main`.
//! `SkipReason` is per-file and gets recorded in the scan result instead.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while setting up or running a directory scan
#[derive(Error, Debug)]
pub enum ScanError {
    /// Root path does not exist or is not a directory
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Root directory exists but cannot be listed
    #[error("cannot read directory {}: {source}", path.display())]
    UnreadableRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A background metadata read panicked or was cancelled
    #[error("metadata read task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Why a single file was left out of the aggregate
///
/// These never abort a scan. The display string is what users see in the
/// skipped-files breakdown.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("unsupported format")]
    UnsupportedFormat,

    #[error("no embedded metadata")]
    NoMetadata,

    #[error("corrupt metadata: {0}")]
    CorruptMetadata(String),

    #[error("missing focal length")]
    MissingFocalLength,

    #[error("invalid focal length: {0}")]
    InvalidFocalLength(f64),

    #[error("unreadable file: {0}")]
    UnreadableFile(String),

    #[error("unreadable directory: {0}")]
    UnreadableDirectory(String),

    #[error("symlink loop")]
    SymlinkLoop,
}

impl SkipReason {
    /// Stable label without the per-file detail, used to group skips
    pub fn category(&self) -> &'static str {
        match self {
            SkipReason::UnsupportedFormat => "unsupported format",
            SkipReason::NoMetadata => "no embedded metadata",
            SkipReason::CorruptMetadata(_) => "corrupt metadata",
            SkipReason::MissingFocalLength => "missing focal length",
            SkipReason::InvalidFocalLength(_) => "invalid focal length",
            SkipReason::UnreadableFile(_) => "unreadable file",
            SkipReason::UnreadableDirectory(_) => "unreadable directory",
            SkipReason::SymlinkLoop => "symlink loop",
        }
    }
}

/// Errors raised while persisting chart artifacts
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode chart image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to serialize chart data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while loading or validating settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bucket width must be a positive number of millimetres, got {0}")]
    InvalidBucketWidth(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_messages() {
        assert_eq!(SkipReason::MissingFocalLength.to_string(), "missing focal length");
        assert_eq!(SkipReason::UnsupportedFormat.to_string(), "unsupported format");
        assert_eq!(
            SkipReason::UnreadableFile("permission denied".into()).to_string(),
            "unreadable file: permission denied"
        );
    }

    #[test]
    fn test_category_drops_detail() {
        let reason = SkipReason::InvalidFocalLength(-3.0);
        assert_eq!(reason.category(), "invalid focal length");
        assert_eq!(SkipReason::CorruptMetadata("bad IFD".into()).category(), "corrupt metadata");
    }

    #[test]
    fn test_path_not_found_message() {
        let err = ScanError::PathNotFound(PathBuf::from("/no/such/dir"));
        assert_eq!(err.to_string(), "path not found: /no/such/dir");
    }
}
