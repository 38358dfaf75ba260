//! Color quantization: RGBA pixels → fixed palette + index grid.
//!
//! Iterative nearest-color assignment with centroid refinement:
//!
//! 1. Optional selective blur (`blur`)
//! 2. Initial palette, sampled from the image or generated (`palette`)
//! 3. `quant_cycles` assignment passes. Between passes every palette entry
//!    moves to the mean of the pixels assigned to it.
//!
//! The palette returned is the one used by the last pass, so every index in
//! the grid refers to the color it was matched against.

pub mod blur;
pub mod palette;

use image::RgbaImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rgb::RGBA8;

use crate::bitmap::check_dimensions;
use crate::config::TracingConfig;
use crate::error::TraceError;

/// Border value of the index grid. Never a valid palette index.
pub const NO_COLOR: u32 = u32::MAX;

/// Palette index per pixel, padded with a one-cell `NO_COLOR` border.
///
/// Stored row-major with shape `(height + 2) x (width + 2)`; pixel (x, y)
/// lives at padded cell (x + 1, y + 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexGrid {
    width: usize,
    height: usize,
    cells: Vec<u32>,
}

impl IndexGrid {
    /// Build a padded grid from one palette index per pixel (row-major).
    pub fn from_indices(width: usize, height: usize, indices: &[u32]) -> Self {
        debug_assert_eq!(indices.len(), width * height);
        let stride = width + 2;
        let mut cells = vec![NO_COLOR; stride * (height + 2)];
        for (row, src) in indices.chunks_exact(width.max(1)).enumerate().take(height) {
            let start = (row + 1) * stride + 1;
            cells[start..start + width].copy_from_slice(src);
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Image width in pixels (without border).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels (without border).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Width including the border.
    pub fn padded_width(&self) -> usize {
        self.width + 2
    }

    /// Height including the border.
    pub fn padded_height(&self) -> usize {
        self.height + 2
    }

    /// Cell at padded coordinates (row, col).
    pub fn cell(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.padded_width() + col]
    }

    /// Palette index of pixel (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.cell(y + 1, x + 1)
    }

    /// Raw padded cells, row-major.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }
}

/// Output of the quantizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantized {
    /// Exactly `color_count` entries.
    pub palette: Vec<RGBA8>,
    pub grid: IndexGrid,
}

/// Running sums of the pixels assigned to one palette entry.
#[derive(Debug, Clone, Copy, Default)]
struct ClusterSum {
    r: u64,
    g: u64,
    b: u64,
    a: u64,
    count: u64,
}

impl ClusterSum {
    fn add(&mut self, px: &[u8]) {
        self.r += u64::from(px[0]);
        self.g += u64::from(px[1]);
        self.b += u64::from(px[2]);
        self.a += u64::from(px[3]);
        self.count += 1;
    }

    /// Truncating mean. Caller guarantees `count > 0`.
    fn mean(&self) -> RGBA8 {
        RGBA8::new(
            (self.r / self.count) as u8,
            (self.g / self.count) as u8,
            (self.b / self.count) as u8,
            (self.a / self.count) as u8,
        )
    }
}

/// Quantize an image to `config.color_count` colors.
pub fn quantize(img: &RgbaImage, config: &TracingConfig) -> Result<Quantized, TraceError> {
    config.validate()?;
    check_dimensions(img)?;

    let blurred;
    let img = if config.blur_radius > 0 {
        blurred = blur::selective_blur(img, config.blur_radius, config.blur_delta);
        &blurred
    } else {
        img
    };

    let mut rng = StdRng::seed_from_u64(config.seed);
    let palette = if config.color_sampling {
        palette::sampled(img, config.color_count)
    } else {
        palette::generated(config.color_count, &mut rng)
    };

    Ok(refine(img, palette, config, &mut rng))
}

/// Run the assignment passes starting from `palette`.
///
/// Deterministic unless `config.reseed_sparse_colors` is set, and even then
/// reproducible for a fixed RNG state.
pub fn refine(
    img: &RgbaImage,
    mut palette: Vec<RGBA8>,
    config: &TracingConfig,
    rng: &mut impl Rng,
) -> Quantized {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let pixels = img.as_raw();
    let total = (w * h) as f64;
    let cycles = config.quant_cycles;

    let mut sums = vec![ClusterSum::default(); palette.len()];
    let mut indices: Vec<u32> = Vec::new();

    for cycle in 0..cycles {
        if cycle > 0 {
            for (entry, sum) in palette.iter_mut().zip(&sums) {
                if sum.count > 0 {
                    *entry = sum.mean();
                }
                let sparse = (sum.count as f64 / total) < config.min_color_ratio;
                if config.reseed_sparse_colors && sparse && cycle < cycles - 1 {
                    *entry = RGBA8::new(rng.random(), rng.random(), rng.random(), rng.random());
                }
            }
        }

        // Assignment is independent per pixel; the reduction below is the
        // barrier before the next pass may re-average the palette.
        indices = pixels
            .par_chunks_exact(4)
            .map(|px| nearest(&palette, px))
            .collect();

        sums.iter_mut().for_each(|s| *s = ClusterSum::default());
        for (px, &k) in pixels.chunks_exact(4).zip(&indices) {
            sums[k as usize].add(px);
        }

        log::debug!(
            "quantize pass {}/{}: {} of {} colors in use",
            cycle + 1,
            cycles,
            sums.iter().filter(|s| s.count > 0).count(),
            palette.len()
        );
    }

    Quantized {
        palette,
        grid: IndexGrid::from_indices(w, h, &indices),
    }
}

/// Rectilinear RGBA distance with alpha weighted 4x.
pub fn color_distance(c: RGBA8, px: &[u8]) -> u32 {
    let d = |a: u8, b: u8| u32::from(a.abs_diff(b));
    d(c.r, px[0]) + d(c.g, px[1]) + d(c.b, px[2]) + 4 * d(c.a, px[3])
}

/// Index of the closest palette entry. Ties go to the lowest index.
fn nearest(palette: &[RGBA8], px: &[u8]) -> u32 {
    let mut best = u32::MAX;
    let mut best_idx = 0;
    for (k, &c) in palette.iter().enumerate() {
        let d = color_distance(c, px);
        if d < best {
            best = d;
            best_idx = k;
        }
    }
    best_idx as u32
}
