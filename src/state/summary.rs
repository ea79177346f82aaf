//! Lens usage statistics
//!
//! Per lens: how many photos, and which focal lengths and apertures were
//! used most. Computed over the whole library and per directory.

use std::collections::BTreeMap;
use std::fmt;

use super::aggregate::{fmt_tenths, FocalKey, GroupingPolicy};
use super::data::{PhotoRecord, ScanResult};

/// How many top values to list per lens
pub const TOP_N: usize = 5;

/// Aperture f-number in tenths
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApertureKey(u32);

impl ApertureKey {
    pub fn from_f_number(f_number: f64) -> Self {
        Self((f_number * 10.0).round().max(0.0) as u32)
    }
}

impl fmt::Display for ApertureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f/")?;
        fmt_tenths(self.0, f)
    }
}

/// Usage statistics for one lens
#[derive(Debug, Clone, PartialEq)]
pub struct LensStats {
    pub lens: String,
    pub total_images: usize,
    pub top_focal_lengths: Vec<(FocalKey, usize)>,
    pub top_apertures: Vec<(ApertureKey, usize)>,
}

/// Lens statistics for one directory of the library
#[derive(Debug, Clone, PartialEq)]
pub struct DirectorySummary {
    /// Path relative to the scan root, "." for the root itself
    pub directory: String,
    pub lenses: Vec<LensStats>,
}

/// Statistics for every lens among `records`, busiest lens first
pub fn summarize<'a>(
    records: impl IntoIterator<Item = &'a PhotoRecord>,
    policy: &GroupingPolicy,
) -> Vec<LensStats> {
    let mut by_lens: BTreeMap<&str, Vec<&PhotoRecord>> = BTreeMap::new();
    for record in records {
        by_lens.entry(record.lens()).or_default().push(record);
    }

    let mut stats: Vec<LensStats> = by_lens
        .into_iter()
        .map(|(lens, records)| {
            let mut focals = BTreeMap::new();
            let mut apertures = BTreeMap::new();

            for record in &records {
                *focals.entry(policy.key(record.focal_length())).or_insert(0) += 1;
                if let Some(f_number) = record.aperture() {
                    *apertures.entry(ApertureKey::from_f_number(f_number)).or_insert(0) += 1;
                }
            }

            LensStats {
                lens: lens.to_string(),
                total_images: records.len(),
                top_focal_lengths: top_values(focals, TOP_N),
                top_apertures: top_values(apertures, TOP_N),
            }
        })
        .collect();

    stats.sort_by(|a, b| b.total_images.cmp(&a.total_images).then_with(|| a.lens.cmp(&b.lens)));
    stats
}

/// Statistics grouped by each record's directory, directories in path order
pub fn summarize_by_directory(scan: &ScanResult, policy: &GroupingPolicy) -> Vec<DirectorySummary> {
    let mut by_dir: BTreeMap<String, Vec<&PhotoRecord>> = BTreeMap::new();
    for record in &scan.records {
        by_dir.entry(scan.relative_dir(record)).or_default().push(record);
    }

    by_dir
        .into_iter()
        .map(|(directory, records)| DirectorySummary {
            directory,
            lenses: summarize(records, policy),
        })
        .collect()
}

/// Most frequent values, highest count first
///
/// Keeps at least `n` entries when available. Every value tied with the
/// n-th count is kept as well, so the list can run longer than `n`.
pub fn top_values<K: Ord + Copy>(counts: BTreeMap<K, usize>, n: usize) -> Vec<(K, usize)> {
    let mut items: Vec<(K, usize)> = counts.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    if n == 0 {
        return Vec::new();
    }
    if items.len() <= n {
        return items;
    }

    let cutoff = items[n - 1].1;
    items.into_iter().filter(|(_, count)| *count >= cutoff).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn record(path: &str, lens: &str, focal: f64, aperture: Option<f64>) -> PhotoRecord {
        PhotoRecord::new(PathBuf::from(path), lens, focal, aperture).unwrap()
    }

    #[test]
    fn test_top_values_keeps_ties_at_cutoff() {
        let counts: BTreeMap<u32, usize> =
            [(1, 9), (2, 7), (3, 5), (4, 3), (5, 2), (6, 2), (7, 1)].into_iter().collect();

        let top = top_values(counts, 5);
        assert_eq!(top, vec![(1, 9), (2, 7), (3, 5), (4, 3), (5, 2), (6, 2)]);
    }

    #[test]
    fn test_top_values_short_list() {
        let counts: BTreeMap<u32, usize> = [(10, 1), (20, 4)].into_iter().collect();
        assert_eq!(top_values(counts, 5), vec![(20, 4), (10, 1)]);
        assert!(top_values(BTreeMap::<u32, usize>::new(), 5).is_empty());
    }

    #[test]
    fn test_summarize_orders_by_usage() {
        let records = vec![
            record("/p/1.jpg", "Prime", 35.0, Some(1.4)),
            record("/p/2.jpg", "Zoom", 24.0, Some(4.0)),
            record("/p/3.jpg", "Zoom", 70.0, Some(4.0)),
            record("/p/4.jpg", "Zoom", 24.0, None),
        ];

        let stats = summarize(&records, &GroupingPolicy::default());

        assert_eq!(stats[0].lens, "Zoom");
        assert_eq!(stats[0].total_images, 3);
        assert_eq!(stats[0].top_focal_lengths[0], (FocalKey::from_tenths(240), 2));
        assert_eq!(stats[0].top_apertures, vec![(ApertureKey::from_f_number(4.0), 2)]);
        assert_eq!(stats[1].lens, "Prime");
    }

    #[test]
    fn test_summarize_by_directory() {
        let mut scan = ScanResult::new(Path::new("/p"));
        scan.records = vec![
            record("/p/a.jpg", "Prime", 35.0, None),
            record("/p/2024/b.jpg", "Zoom", 24.0, None),
            record("/p/2024/c.jpg", "Prime", 35.0, None),
        ];

        let dirs = summarize_by_directory(&scan, &GroupingPolicy::default());

        assert_eq!(dirs.len(), 2);
        assert_eq!(dirs[0].directory, ".");
        assert_eq!(dirs[1].directory, "2024");
        assert_eq!(dirs[1].lenses.len(), 2);
    }

    #[test]
    fn test_aperture_display() {
        assert_eq!(ApertureKey::from_f_number(2.8).to_string(), "f/2.8");
        assert_eq!(ApertureKey::from_f_number(8.0).to_string(), "f/8");
    }
}
