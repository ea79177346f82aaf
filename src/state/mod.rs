/// Scan pipeline state
///
/// This module handles everything between the filesystem and the charts:
/// - Shared data structures (data.rs)
/// - Walking the library into a ScanResult (scanner.rs)
/// - Per-lens focal-length counts (aggregate.rs)
/// - Top focal lengths and apertures per lens (summary.rs)

pub mod data;
pub mod scanner;
pub mod aggregate;
pub mod summary;
