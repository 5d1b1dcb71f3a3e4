//! Render the Rank/Peak scatter plot as a base64 PNG data URI.
//!
//! Drawn with the plotters bitmap backend into an RGB buffer, then PNG
//! encoded with `image`. No font stack is linked, so the two axis labels
//! are stamped straight onto the bitmap from an 8x8 pixel font.

use crate::error::AnalysisError;
use base64::Engine;
use plotters::prelude::*;
use std::io::Cursor;

pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Hard cap on the data URI length. Over the cap the base64 payload is
/// cut so the whole string fits, which corrupts the encoded image; the
/// render below stays far under the cap in practice.
pub const MAX_DATA_URI_LEN: usize = 100_000;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const FIT_LINE_DOTS: usize = 90;

/// Render a scatter of `points` (Rank on x, Peak on y) with a dotted
/// least-squares fit line, and return it as a PNG data URI.
pub fn scatter_data_uri(
    points: &[(f64, f64)],
    slope: f64,
    intercept: f64,
) -> Result<String, AnalysisError> {
    let (x_min, x_max) = padded_range(points.iter().map(|p| p.0));
    let (y_min, y_max) = padded_range(points.iter().map(|p| p.1));

    let mut buf = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(12)
            .x_label_area_size(26)
            .y_label_area_size(30)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(render_err)?;

        // Tick labels need a font provider, so they stay off; the axis
        // names are stamped onto the pixels after the chart is done.
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(0)
            .y_labels(0)
            .axis_style(BLACK.stroke_width(1))
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())),
            )
            .map_err(render_err)?;

        // Dotted best-fit line, clipped to the plot area by plotters.
        let step = (x_max - x_min) / FIT_LINE_DOTS as f64;
        chart
            .draw_series((0..=FIT_LINE_DOTS).map(|i| {
                let x = x_min + step * i as f64;
                Circle::new((x, slope * x + intercept), 1, RED.filled())
            }))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    stamp_text(&mut buf, WIDTH as i32 / 2 - 16, HEIGHT as i32 - 18, "Rank");
    stamp_text_up(&mut buf, 4, HEIGHT as i32 / 2 + 16, "Peak");

    let image = image::RgbImage::from_raw(WIDTH, HEIGHT, buf)
        .ok_or_else(|| AnalysisError::Render("pixel buffer size mismatch".to_string()))?;
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| AnalysisError::Render(e.to_string()))?;

    Ok(to_data_uri(&png))
}

/// Base64-encode PNG bytes into a data URI, applying the length cap.
///
/// When the cap bites, the payload is cut to `MAX_DATA_URI_LEN` minus the
/// prefix length and the prefix re-applied.
pub fn to_data_uri(png: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(png);
    let uri = format!("{DATA_URI_PREFIX}{payload}");
    if uri.len() > MAX_DATA_URI_LEN {
        let cut = MAX_DATA_URI_LEN - DATA_URI_PREFIX.len();
        format!("{DATA_URI_PREFIX}{}", &payload[..cut])
    } else {
        uri
    }
}

fn render_err<E: std::fmt::Display>(e: E) -> AnalysisError {
    AnalysisError::Render(e.to_string())
}

/// Axis range with 5% padding, or a unit pad when all values coincide.
fn padded_range<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    let pad = if span == 0.0 { 1.0 } else { span * 0.05 };
    (lo - pad, hi + pad)
}

// ── Pixel-font label stamping ───────────────────────────────────────────────

/// Stamp horizontal text starting at (x0, y0), 8px per glyph.
fn stamp_text(buf: &mut [u8], x0: i32, y0: i32, text: &str) {
    for (i, c) in text.chars().enumerate() {
        stamp_glyph(buf, c, |gx, gy| (x0 + i as i32 * 8 + gx, y0 + gy));
    }
}

/// Stamp text rotated 90° counter-clockwise (reads bottom-to-top),
/// starting at the bottom character position (x0, y0).
fn stamp_text_up(buf: &mut [u8], x0: i32, y0: i32, text: &str) {
    for (i, c) in text.chars().enumerate() {
        stamp_glyph(buf, c, |gx, gy| (x0 + gy, y0 - i as i32 * 8 - gx));
    }
}

fn stamp_glyph(buf: &mut [u8], c: char, place: impl Fn(i32, i32) -> (i32, i32)) {
    let glyph = match font8x8::legacy::BASIC_LEGACY.get(c as usize) {
        Some(g) => *g,
        None => return,
    };
    for (gy, row) in glyph.iter().enumerate() {
        let bits = *row;
        for gx in 0..8 {
            if bits & (1u8 << gx) != 0 {
                let (x, y) = place(gx as i32, gy as i32);
                put_pixel(buf, x, y);
            }
        }
    }
}

fn put_pixel(buf: &mut [u8], x: i32, y: i32) {
    if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
        return;
    }
    let idx = ((y as usize * WIDTH as usize) + x as usize) * 3;
    if idx + 2 < buf.len() {
        buf[idx] = 0;
        buf[idx + 1] = 0;
        buf[idx + 2] = 0;
    }
}
