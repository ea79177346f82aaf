//! Single-file metadata reader
//!
//! Failures are returned as a `SkipReason`, never raised, so one bad file
//! cannot abort a scan.

use std::path::Path;

use super::kind::ImageKind;
use super::source::{ExifSource, MetadataSource};
use crate::error::SkipReason;
use crate::state::data::{PhotoRecord, UNKNOWN_LENS};

/// Read one image file into a PhotoRecord
pub fn read_photo(path: &Path) -> Result<PhotoRecord, SkipReason> {
    let kind = ImageKind::from_path(path).ok_or(SkipReason::UnsupportedFormat)?;

    match kind.looks_like_image(path) {
        Ok(true) => {}
        Ok(false) => return Err(SkipReason::UnsupportedFormat),
        Err(e) => return Err(SkipReason::UnreadableFile(e.to_string())),
    }

    let source = ExifSource::open(path, kind)?;
    record_from_source(path, &source)
}

/// Build a record from any metadata source
pub fn record_from_source(path: &Path, source: &dyn MetadataSource) -> Result<PhotoRecord, SkipReason> {
    let focal_length = source.focal_length().ok_or(SkipReason::MissingFocalLength)?;
    let lens = source.lens_model().unwrap_or_else(|| UNKNOWN_LENS.to_string());

    PhotoRecord::new(path.to_path_buf(), lens, focal_length, source.aperture())
}
