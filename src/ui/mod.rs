/// Output module
///
/// This module handles everything the user sees:
/// - Shaping aggregates into charts and persisting them (chart.rs)
/// - The interactive Plotly document (html.rs)
/// - The static PNG raster (bitmap.rs)
/// - Bar charts drawn in the terminal (terminal.rs)
/// - Text and JSON summaries (report.rs)

pub mod chart;
pub mod html;
pub mod bitmap;
pub mod terminal;
pub mod report;
