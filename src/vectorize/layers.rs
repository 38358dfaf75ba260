//! Layer separation and edge-node classification.
//!
//! Every grid corner touches four pixels. For one palette color, the corner's
//! edge-node code records which of those pixels have that color:
//!
//! ```text
//!   1 │ 2        bit 1 = top-left     bit 2 = top-right
//!  ───┼───       bit 8 = bottom-left  bit 4 = bottom-right
//!   8 │ 4
//! ```
//!
//! Codes 0 and 15 are uniform corners with no boundary. The grid shares the
//! padded index grid's shape: edge cell (row, col) is the corner at pixel-space
//! coordinate (col - 1, row - 1).

use crate::quantize::IndexGrid;

/// Edge-node codes for one palette color, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeGrid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl EdgeGrid {
    /// All-zero grid of `width x height` cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.width + col]
    }

    pub fn set(&mut self, row: usize, col: usize, code: u8) {
        self.cells[row * self.width + col] = code;
    }

    /// Cells that still describe a boundary (neither 0 nor 15).
    pub fn boundary_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| is_boundary(c)).count()
    }
}

/// True for codes the path scanner traces.
pub fn is_boundary(code: u8) -> bool {
    code != 0 && code != 15
}

/// Build one edge grid per palette index in a single raster pass.
///
/// Each pixel writes its bottom-right corner and, when the pixel sharing
/// the corner's top-left slot has another color, its other three corners.
/// Corners whose top-left slot holds the same color are owned by that pixel,
/// so a later write never contradicts an earlier one.
pub fn build_layers(grid: &IndexGrid, colors: usize) -> Vec<EdgeGrid> {
    let (aw, ah) = (grid.padded_width(), grid.padded_height());
    let mut layers = vec![EdgeGrid::new(aw, ah); colors];

    for j in 1..ah - 1 {
        for i in 1..aw - 1 {
            let val = grid.cell(j, i);
            let same = |row: usize, col: usize| u8::from(grid.cell(row, col) == val);

            let nw = same(j - 1, i - 1);
            let n = same(j - 1, i);
            let ne = same(j - 1, i + 1);
            let w = same(j, i - 1);
            let e = same(j, i + 1);
            let sw = same(j + 1, i - 1);
            let s = same(j + 1, i);
            let se = same(j + 1, i + 1);

            let layer = &mut layers[val as usize];
            layer.set(j + 1, i + 1, corner_code(1, e, se, s));
            if w == 0 {
                layer.set(j + 1, i, corner_code(0, 1, s, sw));
            }
            if n == 0 {
                layer.set(j, i + 1, corner_code(0, ne, e, 1));
            }
            if nw == 0 {
                layer.set(j, i, corner_code(0, n, 1, w));
            }
        }
    }

    layers
}

/// Pack the four corner slots into a code: `tl + 2*tr + 4*br + 8*bl`.
pub fn corner_code(top_left: u8, top_right: u8, bottom_right: u8, bottom_left: u8) -> u8 {
    top_left | (top_right << 1) | (bottom_right << 2) | (bottom_left << 3)
}
