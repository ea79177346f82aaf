//! Per-lens focal-length counts
//!
//! Records are grouped by lens, then by focal key. Focal lengths are keyed at
//! 0.1 mm resolution as reported, so 50.0 mm and 50.1 mm stay apart unless a
//! bucket width is configured.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use super::data::{PhotoRecord, ScanResult};
use crate::error::SettingsError;

/// How focal lengths are folded into chart keys
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(default)]
pub struct GroupingPolicy {
    /// Bucket width in millimetres. `None` keys by the reported value.
    pub bucket_width: Option<f64>,
}

impl GroupingPolicy {
    /// Group every value into `floor(v / width) * width`
    pub fn bucketed(width: f64) -> Result<Self, SettingsError> {
        let policy = Self { bucket_width: Some(width) };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        match self.bucket_width {
            Some(w) if !w.is_finite() || w <= 0.0 => Err(SettingsError::InvalidBucketWidth(w)),
            _ => Ok(()),
        }
    }

    pub fn key(&self, focal_mm: f64) -> FocalKey {
        let value = match self.bucket_width {
            Some(width) => (focal_mm / width).floor() * width,
            None => focal_mm,
        };
        FocalKey::from_tenths((value * 10.0).round().max(0.0) as u32)
    }
}

/// Focal length in tenths of a millimetre
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FocalKey(u32);

impl FocalKey {
    pub fn from_tenths(tenths: u32) -> Self {
        Self(tenths)
    }

    pub fn millimetres(self) -> f64 {
        self.0 as f64 / 10.0
    }
}

impl fmt::Display for FocalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_tenths(self.0, f)
    }
}

impl Serialize for FocalKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Write a tenths value as `24` or `50.1`
pub(crate) fn fmt_tenths(tenths: u32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if tenths % 10 == 0 {
        write!(f, "{}", tenths / 10)
    } else {
        write!(f, "{}.{}", tenths / 10, tenths % 10)
    }
}

/// Lens identifier → focal key → number of photos
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LensAggregate {
    lenses: BTreeMap<String, BTreeMap<FocalKey, u32>>,
}

impl LensAggregate {
    /// Build the aggregate for every successful record of a scan
    pub fn build(scan: &ScanResult, policy: &GroupingPolicy) -> Self {
        Self::from_records(&scan.records, policy)
    }

    pub fn from_records(records: &[PhotoRecord], policy: &GroupingPolicy) -> Self {
        let mut lenses: BTreeMap<String, BTreeMap<FocalKey, u32>> = BTreeMap::new();

        for record in records {
            // PhotoRecord already guarantees this; never count a bad value
            if record.focal_length() <= 0.0 {
                continue;
            }

            let key = policy.key(record.focal_length());
            *lenses
                .entry(record.lens().to_string())
                .or_default()
                .entry(key)
                .or_insert(0) += 1;
        }

        Self { lenses }
    }

    pub fn is_empty(&self) -> bool {
        self.lenses.is_empty()
    }

    pub fn lens_count(&self) -> usize {
        self.lenses.len()
    }

    /// Counts for one lens, ordered by focal length
    pub fn counts(&self, lens: &str) -> Option<&BTreeMap<FocalKey, u32>> {
        self.lenses.get(lens)
    }

    pub fn lens_total(&self, lens: &str) -> usize {
        self.counts(lens)
            .map(|counts| counts.values().map(|&c| c as usize).sum())
            .unwrap_or(0)
    }

    /// Sum of all counts across lenses
    pub fn total(&self) -> usize {
        self.lenses.keys().map(|lens| self.lens_total(lens)).sum()
    }

    /// Lenses in name order with their focal counts
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<FocalKey, u32>)> {
        self.lenses.iter().map(|(lens, counts)| (lens.as_str(), counts))
    }

    /// Smallest and largest focal key across all lenses
    pub fn focal_range(&self) -> Option<(FocalKey, FocalKey)> {
        let min = self.lenses.values().filter_map(|c| c.keys().next()).min()?;
        let max = self.lenses.values().filter_map(|c| c.keys().next_back()).max()?;
        Some((*min, *max))
    }
}
