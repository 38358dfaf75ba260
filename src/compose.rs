//! Draw order across palette layers.
//!
//! Paths from all layers are merged into one list sorted by the raster
//! position of their start point, so regions appear back to front in the
//! order a top-to-bottom scan would meet them.

use kurbo::BezPath;
use rgb::RGBA8;

use crate::geom::Segment;
use crate::vectorize::LayerPaths;

/// One filled, closed contour ready for output.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawablePath {
    /// Chained segments; the last ends where the first starts.
    pub segments: Vec<Segment>,
    /// Palette index the path was traced from.
    pub layer: usize,
    /// Position of the path within its layer's scan order.
    pub path: usize,
    pub color: RGBA8,
    label: f64,
}

impl DrawablePath {
    /// Sort key: `y * width + x` of the first segment's start point.
    pub fn label(&self) -> f64 {
        self.label
    }

    /// The path as a closed kurbo `BezPath` (source pixel coordinates).
    pub fn to_bezpath(&self) -> BezPath {
        let mut bez = BezPath::new();
        if let Some(first) = self.segments.first() {
            bez.move_to(first.start());
            for seg in &self.segments {
                bez.push(seg.to_path_el());
            }
            bez.close_path();
        }
        bez
    }
}

/// Merge the fitted layers into one draw list.
///
/// `layers[k]` holds the paths of palette entry `k`. Paths are visited
/// layer by layer, then sorted by label with a stable sort, so equal labels
/// keep that order. Empty paths are skipped.
pub fn compose(layers: &[LayerPaths], palette: &[RGBA8], width: u32) -> Vec<DrawablePath> {
    let width = f64::from(width);
    let mut out: Vec<DrawablePath> = layers
        .iter()
        .zip(palette)
        .enumerate()
        .flat_map(|(layer, (paths, &color))| {
            paths.iter().enumerate().filter_map(move |(path, segments)| {
                let start = segments.first()?.start();
                Some(DrawablePath {
                    segments: segments.clone(),
                    layer,
                    path,
                    color,
                    label: start.y * width + start.x,
                })
            })
        })
        .collect();

    out.sort_by(|a, b| a.label.total_cmp(&b.label));
    out
}
