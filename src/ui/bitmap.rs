//! Static raster of the combined bubble view
//!
//! Gridlines at the axis ticks, one row per lens, and a translucent bubble per
//! (lens, focal length) pair sized by frequency.

use image::{ImageFormat, Rgb, RgbImage};
use std::path::PathBuf;

use super::chart::{ChartArtifact, ChartConfig};
use crate::error::ChartError;

/// Plotly's default qualitative palette, so the PNG matches the HTML
const PALETTE: [[u8; 3]; 10] = [
    [0x63, 0x6e, 0xfa],
    [0xef, 0x55, 0x3b],
    [0x00, 0xcc, 0x96],
    [0xab, 0x63, 0xfa],
    [0xff, 0xa1, 0x5a],
    [0x19, 0xd3, 0xf3],
    [0xff, 0x66, 0x92],
    [0xb6, 0xe8, 0x80],
    [0xff, 0x97, 0xff],
    [0xfe, 0xcb, 0x52],
];

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([225, 229, 236]);
const AXIS: Rgb<u8> = Rgb([68, 68, 68]);
const BUBBLE_OPACITY: f32 = 0.7;

/// Pixel layout of the plotting area
struct Frame {
    left: u32,
    right: u32,
    top: u32,
    bottom: u32,
}

impl Frame {
    fn new(width: u32, height: u32) -> Self {
        // Wide left margin mirrors the lens-label gutter of the HTML view
        Self {
            left: width / 8,
            right: width - width / 32,
            top: height / 12,
            bottom: height - height / 10,
        }
    }

    fn x_for(&self, mm: f64, start: f64, end: f64) -> f64 {
        let span = (end - start).max(1.0);
        self.left as f64 + (mm - start) / span * (self.right - self.left) as f64
    }

    /// First lens sits at the bottom, like a categorical y axis
    fn y_for_row(&self, row: usize, rows: usize) -> f64 {
        let row_height = (self.bottom - self.top) as f64 / rows.max(1) as f64;
        self.bottom as f64 - (row as f64 + 0.5) * row_height
    }
}

/// Draw the combined view into an RGB image
pub fn render(config: &ChartConfig, artifact: &ChartArtifact) -> RgbImage {
    let width = config.png_width.max(64);
    let height = config.png_height.max(64);
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    let frame = Frame::new(width, height);

    let start = artifact.ticks.start as f64;
    let end = artifact.ticks.end as f64;

    // Vertical gridlines and tick marks
    for tick in artifact.ticks.values() {
        let x = frame.x_for(tick as f64, start, end).round() as u32;
        vertical_line(&mut img, x, frame.top, frame.bottom, GRID);
        vertical_line(&mut img, x, frame.bottom, frame.bottom + 6, AXIS);
    }

    // One faint row line per lens
    let rows = artifact.lens_charts.len();
    for row in 0..rows {
        let y = frame.y_for_row(row, rows).round() as u32;
        horizontal_line(&mut img, frame.left, frame.right, y, GRID);
    }

    horizontal_line(&mut img, frame.left, frame.right, frame.bottom, AXIS);
    vertical_line(&mut img, frame.left, frame.top, frame.bottom, AXIS);

    // Scale markers with the image so 1600x900 matches the on-screen size
    let scale = height as f64 / artifact.height.max(1) as f64;

    for (row, chart) in artifact.lens_charts.iter().enumerate() {
        let color = PALETTE[row % PALETTE.len()];
        let cy = frame.y_for_row(row, rows);

        for bubble in artifact.bubbles.iter().filter(|b| b.lens == chart.lens) {
            let cx = frame.x_for(bubble.focal.millimetres(), start, end);
            let radius = (bubble.size * scale / 2.0).max(2.0);
            fill_circle(&mut img, cx, cy, radius, color);
        }
    }

    img
}

/// Render and save the PNG to the configured location
pub fn write_png(config: &ChartConfig, artifact: &ChartArtifact) -> Result<PathBuf, ChartError> {
    let path = config.png_path();
    render(config, artifact).save_with_format(&path, ImageFormat::Png)?;
    Ok(path)
}

fn vertical_line(img: &mut RgbImage, x: u32, y0: u32, y1: u32, color: Rgb<u8>) {
    if x >= img.width() {
        return;
    }
    for y in y0..=y1.min(img.height() - 1) {
        img.put_pixel(x, y, color);
    }
}

fn horizontal_line(img: &mut RgbImage, x0: u32, x1: u32, y: u32, color: Rgb<u8>) {
    if y >= img.height() {
        return;
    }
    for x in x0..=x1.min(img.width() - 1) {
        img.put_pixel(x, y, color);
    }
}

/// Alpha-blend a filled disc onto the image
fn fill_circle(img: &mut RgbImage, cx: f64, cy: f64, radius: f64, color: [u8; 3]) {
    let x0 = (cx - radius).floor().max(0.0) as u32;
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let x1 = ((cx + radius).ceil() as u32).min(img.width() - 1);
    let y1 = ((cy + radius).ceil() as u32).min(img.height() - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            if dx * dx + dy * dy > radius * radius {
                continue;
            }

            let pixel = img.get_pixel_mut(x, y);
            for channel in 0..3 {
                let under = pixel.0[channel] as f32;
                let over = color[channel] as f32;
                pixel.0[channel] = (under * (1.0 - BUBBLE_OPACITY) + over * BUBBLE_OPACITY).round() as u8;
            }
        }
    }
}
