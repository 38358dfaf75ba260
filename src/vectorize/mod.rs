//! Vectorization pipeline: index grid → fitted paths per palette color.
//!
//! 1. Edge-node layers, one per color (`layers`)
//! 2. Boundary tracing on each layer (`scan`)
//! 3. Edge midpoints with headings (`interpolate`)
//! 4. Line / quadratic fitting (`fit`)
//!
//! Steps 2-4 touch nothing outside their own layer, so layers are processed
//! in parallel with rayon. Each worker owns its edge grid.

pub mod fit;
pub mod interpolate;
pub mod layers;
pub mod scan;

use rayon::prelude::*;

use crate::config::TracingConfig;
use crate::error::TraceError;
use crate::geom::Segment;
use crate::quantize::Quantized;

/// Fitted closed paths of one palette color, in scan order.
pub type LayerPaths = Vec<Vec<Segment>>;

/// Trace and fit every palette color of `quantized`.
///
/// The result has one entry per palette index, in palette order, regardless
/// of how the layers were scheduled.
pub fn vectorize(quantized: &Quantized, config: &TracingConfig) -> Result<Vec<LayerPaths>, TraceError> {
    let grids = layers::build_layers(&quantized.grid, quantized.palette.len());

    grids
        .into_par_iter()
        .enumerate()
        .map(|(layer, mut grid)| {
            let paths = scan::scan_paths(&mut grid, config.path_omit)?;
            let fitted: LayerPaths = paths
                .iter()
                .map(|path| {
                    let points = interpolate::interpolate(path);
                    fit::trace_path(
                        &points,
                        config.line_error_threshold,
                        config.curve_error_threshold,
                    )
                })
                .filter(|segments| !segments.is_empty())
                .collect();

            if !fitted.is_empty() {
                log::debug!(
                    "layer {}: {} paths, {} segments",
                    layer,
                    fitted.len(),
                    fitted.iter().map(Vec::len).sum::<usize>()
                );
            }
            Ok(fitted)
        })
        .collect()
}
