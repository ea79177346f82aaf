//! Text and JSON reports of a scan

use serde::Serialize;
use std::fmt::Write;

use crate::state::aggregate::LensAggregate;
use crate::state::data::ScanResult;
use crate::state::summary::{DirectorySummary, LensStats};

/// Machine-readable run report for `--json`
#[derive(Serialize, Debug)]
pub struct JsonReport<'a> {
    pub processed: usize,
    pub skipped: usize,
    pub skipped_files: Vec<SkippedEntry>,
    pub lenses: &'a LensAggregate,
}

#[derive(Serialize, Debug)]
pub struct SkippedEntry {
    pub path: String,
    pub reason: String,
}

impl<'a> JsonReport<'a> {
    pub fn new(scan: &ScanResult, aggregate: &'a LensAggregate) -> Self {
        Self {
            processed: scan.processed(),
            skipped: scan.skipped_count(),
            skipped_files: scan
                .skipped
                .iter()
                .map(|s| SkippedEntry {
                    path: s.path.to_string_lossy().to_string(),
                    reason: s.reason.to_string(),
                })
                .collect(),
            lenses: aggregate,
        }
    }
}

fn join_values<K: std::fmt::Display>(values: &[(K, usize)], unit: &str) -> String {
    values
        .iter()
        .map(|(value, count)| format!("{value}{unit} ({count})"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_lens(out: &mut String, stats: &LensStats) {
    let _ = writeln!(out, "Lens: {}", stats.lens);
    let _ = writeln!(out, "Total Images: {}", stats.total_images);
    let _ = writeln!(out, "Top Apertures: {}", join_values(&stats.top_apertures, ""));
    let _ = writeln!(out, "Top Focal Lengths: {}", join_values(&stats.top_focal_lengths, "mm"));
}

/// Per-directory lens usage
pub fn directory_summary(dirs: &[DirectorySummary]) -> String {
    let mut out = String::from("\n=== Lens Usage Summary ===\n");

    for dir in dirs {
        let heading = format!("Directory: {}", dir.directory);
        let _ = writeln!(out, "\n{heading}\n{}", "=".repeat(heading.len()));
        for stats in &dir.lenses {
            out.push('\n');
            write_lens(&mut out, stats);
        }
        let _ = writeln!(out, "\n{}", "-".repeat(70));
    }

    out
}

/// Lens usage across the whole library
pub fn overall_overview(lenses: &[LensStats]) -> String {
    let mut out = String::from("\nOVERALL LENS OVERVIEW (All Directories)\n");
    let _ = writeln!(out, "{}", "=".repeat(45));

    let total: usize = lenses.iter().map(|l| l.total_images).sum();
    let _ = writeln!(out, "\nTotal Images Analysed: {total}\n");

    for stats in lenses {
        write_lens(&mut out, stats);
        let _ = writeln!(out, "{}", "-".repeat(60));
    }

    out
}

/// Closing line with counts and a breakdown of skip reasons
pub fn counts_line(scan: &ScanResult) -> String {
    let mut line = format!(
        "{} photos processed, {} skipped",
        scan.processed(),
        scan.skipped_count()
    );

    let breakdown = scan.skip_breakdown();
    if !breakdown.is_empty() {
        let parts: Vec<String> = breakdown
            .iter()
            .map(|(reason, count)| format!("{reason}: {count}"))
            .collect();
        let _ = write!(line, " ({})", parts.join(", "));
    }

    line
}
