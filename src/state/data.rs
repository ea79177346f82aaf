/// Shared data structures for the scan pipeline
///
/// These structs represent the data model that flows from the
/// scanner into the aggregator and the lens summaries.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::SkipReason;

/// Lens identifier used when a photo does not record its lens
pub const UNKNOWN_LENS: &str = "unknown";

/// Smallest focal length that still keys to a non-zero tenth of a millimetre
pub const MIN_FOCAL_MM: f64 = 0.05;

/// Largest focal length whose tenths still fit a focal key
pub const MAX_FOCAL_MM: f64 = (u32::MAX / 10) as f64;

/// One photo that yielded usable metadata
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRecord {
    path: PathBuf,
    lens: String,
    focal_length: f64,
    aperture: Option<f64>,
}

impl PhotoRecord {
    /// Build a record, rejecting focal lengths outside
    /// `MIN_FOCAL_MM..=MAX_FOCAL_MM` (which also covers zero, negative and NaN)
    pub fn new(
        path: PathBuf,
        lens: impl Into<String>,
        focal_length: f64,
        aperture: Option<f64>,
    ) -> Result<Self, SkipReason> {
        if !(MIN_FOCAL_MM..=MAX_FOCAL_MM).contains(&focal_length) {
            return Err(SkipReason::InvalidFocalLength(focal_length));
        }

        Ok(Self {
            path,
            lens: lens.into(),
            focal_length,
            aperture: aperture.filter(|a| a.is_finite() && *a > 0.0),
        })
    }

    /// Full path to the image file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lens identifier ("unknown" when the file had none)
    pub fn lens(&self) -> &str {
        &self.lens
    }

    /// Focal length in millimetres, always > 0
    pub fn focal_length(&self) -> f64 {
        self.focal_length
    }

    /// Aperture f-number, if recorded
    pub fn aperture(&self) -> Option<f64> {
        self.aperture
    }
}

/// A candidate file that was left out, and why
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Everything one scan produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResult {
    /// Directory the scan started from
    pub root: PathBuf,
    /// Photos with usable focal-length metadata, ordered by path
    pub records: Vec<PhotoRecord>,
    /// Files and directories that could not be used, ordered by path
    pub skipped: Vec<SkippedFile>,
}

impl ScanResult {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Sort both lists by path so output does not depend on walk or read order
    pub fn finish(&mut self) {
        self.records.sort_by(|a, b| a.path.cmp(&b.path));
        self.skipped.sort_by(|a, b| a.path.cmp(&b.path));
    }

    pub fn processed(&self) -> usize {
        self.records.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.skipped.is_empty()
    }

    /// Number of skips per reason category
    pub fn skip_breakdown(&self) -> BTreeMap<&'static str, usize> {
        let mut breakdown = BTreeMap::new();
        for skipped in &self.skipped {
            *breakdown.entry(skipped.reason.category()).or_insert(0) += 1;
        }
        breakdown
    }

    /// Directory of a record relative to the scan root ("." for the root itself)
    pub fn relative_dir(&self, record: &PhotoRecord) -> String {
        let parent = record.path.parent().unwrap_or(self.root.as_path());

        match parent.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel.to_string_lossy().to_string(),
            Err(_) => parent.to_string_lossy().to_string(),
        }
    }
}
