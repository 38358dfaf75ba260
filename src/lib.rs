//! img2path: raster image → layered color vector paths.
//!
//! Reduces an image to a small palette, traces the boundary of every color
//! region and fits each boundary with straight lines and quadratic curves.
//! The result is a draw-ordered list of filled paths that can be written
//! out as SVG.
//!
//! # Example
//!
//! ```no_run
//! use img2path::{trace, TracingConfig};
//! use std::path::Path;
//!
//! let config = TracingConfig::default();
//! let result = trace(Path::new("photo.png"), &config)?;
//! let svg = img2path::output::svg::to_svg(&result, &config);
//! # Ok::<(), img2path::TraceError>(())
//! ```

#![forbid(unsafe_code)]

pub mod bitmap;
pub mod compose;
pub mod config;
pub mod error;
pub mod geom;
pub mod output;
pub mod quantize;
pub mod render;
pub mod vectorize;

// Re-export the geometry and color crates used in the public types.
pub use kurbo;
pub use rgb;

pub use compose::DrawablePath;
pub use config::TracingConfig;
pub use error::TraceError;
pub use geom::Segment;

use image::RgbaImage;
use rgb::RGBA8;
use std::path::Path;
use std::time::Instant;

/// The result of tracing: palette plus draw-ordered paths.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceResult {
    /// Source image width in pixels.
    pub width: u32,
    /// Source image height in pixels.
    pub height: u32,
    /// Resolved palette; `paths[i].color == palette[paths[i].layer]`.
    pub palette: Vec<RGBA8>,
    /// Paths in back-to-front draw order, in source pixel coordinates.
    pub paths: Vec<DrawablePath>,
}

/// Full pipeline: image file → traced paths.
pub fn trace(image_path: &Path, config: &TracingConfig) -> Result<TraceResult, TraceError> {
    config.validate()?;
    let img = bitmap::load_rgba(image_path)?;
    log::info!(
        "load        {}  {}x{} px",
        image_path.display(),
        img.width(),
        img.height()
    );
    trace_pixels(&img, config)
}

/// Core pipeline on an RGBA image already in memory.
///
/// Quantize, build edge layers, trace and fit every layer, then merge the
/// layers into draw order.
pub fn trace_pixels(img: &RgbaImage, config: &TracingConfig) -> Result<TraceResult, TraceError> {
    let t_start = Instant::now();

    // ── Quantize ──────────────────────────────────────────
    let quantized = quantize::quantize(img, config)?;
    log::info!(
        "quantize    {} colors, {} cycles{}",
        quantized.palette.len(),
        config.quant_cycles,
        if config.blur_radius > 0 {
            format!(", blur r={}", config.blur_radius.min(config::MAX_BLUR_RADIUS))
        } else {
            String::new()
        }
    );

    // ── Trace + fit ───────────────────────────────────────
    let layers = vectorize::vectorize(&quantized, config)?;
    let (lines, quads) = count_segments(&layers);
    log::info!(
        "trace       {} paths → {} lines + {} quadratics",
        layers.iter().map(Vec::len).sum::<usize>(),
        lines,
        quads
    );

    // ── Compose ───────────────────────────────────────────
    let paths = compose::compose(&layers, &quantized.palette, img.width());
    log::info!(
        "result      {} paths in draw order  ({}ms)",
        paths.len(),
        t_start.elapsed().as_millis()
    );

    Ok(TraceResult {
        width: img.width(),
        height: img.height(),
        palette: quantized.palette,
        paths,
    })
}

/// Count (lines, quadratics) across all layers.
fn count_segments(layers: &[vectorize::LayerPaths]) -> (usize, usize) {
    let mut lines = 0;
    let mut quads = 0;
    for seg in layers.iter().flatten().flatten() {
        if seg.is_line() {
            lines += 1;
        } else {
            quads += 1;
        }
    }
    (lines, quads)
}
