//! In-terminal charts
//!
//! Used when plots are not saved: one horizontal bar chart per lens,
//! focal lengths ascending.

use console::style;
use std::fmt::Write;

use super::chart::ChartArtifact;

/// Width of the longest bar in characters
const BAR_WIDTH: usize = 40;

pub fn render(artifact: &ChartArtifact) -> String {
    let mut out = String::new();

    for chart in &artifact.lens_charts {
        let _ = writeln!(
            out,
            "\n{} ({} images)",
            style(&chart.lens).bold(),
            chart.total()
        );

        let peak = chart.points.iter().map(|(_, count)| *count).max().unwrap_or(1).max(1);
        for (focal, count) in &chart.points {
            let len = ((*count as usize * BAR_WIDTH) / peak as usize).max(1);
            let _ = writeln!(
                out,
                "{:>8} │{} {}",
                format!("{focal} mm"),
                style("█".repeat(len)).cyan(),
                count
            );
        }
    }

    out
}
