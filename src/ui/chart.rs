//! Chart Builder
//!
//! Shapes a LensAggregate into one chart per lens plus a combined bubble
//! view, and optionally persists them as an HTML document and a PNG image.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use super::{bitmap, html};
use crate::error::ChartError;
use crate::state::aggregate::{FocalKey, LensAggregate};

/// Output settings for persisted charts
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    /// Directory the files are written to
    pub output_dir: PathBuf,
    /// Interactive document name
    pub html_file_name: String,
    /// Static image name
    pub png_file_name: String,
    pub title: String,
    pub png_width: u32,
    pub png_height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            html_file_name: "focal_length_usage_per_lens.html".to_string(),
            png_file_name: "focal_length_usage_per_lens.png".to_string(),
            title: "Focal Length Usage per Lens".to_string(),
            png_width: 1600,
            png_height: 900,
        }
    }
}

impl ChartConfig {
    pub fn html_path(&self) -> PathBuf {
        self.output_dir.join(&self.html_file_name)
    }

    pub fn png_path(&self) -> PathBuf {
        self.output_dir.join(&self.png_file_name)
    }
}

/// Focal length vs count for one lens, ascending focal length
#[derive(Debug, Clone, PartialEq)]
pub struct LensChart {
    pub lens: String,
    pub points: Vec<(FocalKey, u32)>,
}

impl LensChart {
    pub fn total(&self) -> u32 {
        self.points.iter().map(|(_, count)| count).sum()
    }
}

/// One marker of the combined view
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub lens: String,
    pub focal: FocalKey,
    pub count: u32,
    /// Marker diameter, grows with the square root of the count
    pub size: f64,
}

/// Linear x-axis ticks in whole millimetres
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisTicks {
    pub start: u32,
    pub end: u32,
    pub step: u32,
}

impl AxisTicks {
    const STEP_MM: u32 = 10;
    /// Most intervals between `start` and `end`; wide ranges get a coarser step
    pub const MAX_INTERVALS: u32 = 50;

    /// Ticks every 10 mm (or a multiple of 10 mm for wide ranges), from the
    /// step at or below `min` to the step above `max`
    pub fn covering(min: FocalKey, max: FocalKey) -> Self {
        let low = min.millimetres() as u64;
        let high = max.millimetres() as u64;
        let base = Self::STEP_MM as u64;

        let span = high.saturating_sub(low);
        let step = base * (span / (base * Self::MAX_INTERVALS as u64) + 1);
        let start = (low / step) * step;
        let end = (high / step + 1) * step;

        Self {
            start: start as u32,
            end: u32::try_from(end).unwrap_or(u32::MAX),
            step: step as u32,
        }
    }

    pub fn values(&self) -> impl Iterator<Item = u32> {
        (self.start..=self.end).step_by(self.step as usize)
    }
}

/// Everything rendered for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    pub lens_charts: Vec<LensChart>,
    pub bubbles: Vec<Bubble>,
    pub ticks: AxisTicks,
    /// Height of the combined view in pixels
    pub height: u32,
    pub html_path: Option<PathBuf>,
    pub png_path: Option<PathBuf>,
}

/// Result of a chart run
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    /// The aggregate had no photos; nothing was rendered or written
    NothingToChart,
    Built(ChartArtifact),
}

pub struct ChartBuilder {
    config: ChartConfig,
}

impl ChartBuilder {
    const BUBBLE_SCALE: f64 = 8.0;
    const MIN_HEIGHT: u32 = 400;
    const ROW_HEIGHT: u32 = 80;

    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Turn the aggregate into chart data without touching the filesystem
    pub fn shape(&self, aggregate: &LensAggregate) -> Option<ChartArtifact> {
        let (min, max) = aggregate.focal_range()?;

        let lens_charts: Vec<LensChart> = aggregate
            .iter()
            .map(|(lens, counts)| LensChart {
                lens: lens.to_string(),
                points: counts.iter().map(|(&focal, &count)| (focal, count)).collect(),
            })
            .collect();

        let bubbles = lens_charts
            .iter()
            .flat_map(|chart| {
                chart.points.iter().map(move |&(focal, count)| Bubble {
                    lens: chart.lens.clone(),
                    focal,
                    count,
                    size: (count as f64).sqrt() * Self::BUBBLE_SCALE,
                })
            })
            .collect();

        let height = Self::MIN_HEIGHT.max(Self::ROW_HEIGHT * lens_charts.len() as u32);

        Some(ChartArtifact {
            lens_charts,
            bubbles,
            ticks: AxisTicks::covering(min, max),
            height,
            html_path: None,
            png_path: None,
        })
    }

    /// Shape the charts and, when `save` is set, write the HTML and PNG files
    pub fn build(&self, aggregate: &LensAggregate, save: bool) -> Result<ChartOutcome, ChartError> {
        let Some(mut artifact) = self.shape(aggregate) else {
            info!("No focal length data to plot");
            return Ok(ChartOutcome::NothingToChart);
        };

        if save {
            artifact.html_path = Some(html::write_document(&self.config, &artifact)?);
            artifact.png_path = Some(bitmap::write_png(&self.config, &artifact)?);
            info!(
                "📊 Plots saved as {} and {}",
                self.config.html_file_name, self.config.png_file_name
            );
        }

        Ok(ChartOutcome::Built(artifact))
    }
}
