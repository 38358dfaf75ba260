//! Boundary tracing on an edge-node grid.
//!
//! A 16-state automaton walks the grid corners. At each cell, the cell's
//! code and the incoming direction select a table entry giving the cell's
//! replacement code, the outgoing direction and the step to the next cell.
//! Replacement codes are 0, except for the two saddle codes (5 and 10),
//! which are split into the half the walk did not take so a second walk can
//! consume it. Every cell is therefore traced at most once per boundary
//! it lies on, and a full raster scan leaves only codes 0 and 15 behind.

use crate::error::TraceError;

use super::layers::{is_boundary, EdgeGrid};

/// Walk direction on the corner grid (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    East = 0,
    North = 1,
    West = 2,
    South = 3,
}

/// One automaton transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Step {
    next_code: u8,
    dir: Direction,
    dx: i8,
    dy: i8,
}

const fn step(next_code: u8, dir: Direction, dx: i8, dy: i8) -> Option<Step> {
    Some(Step {
        next_code,
        dir,
        dx,
        dy,
    })
}

use Direction::{East as E, North as N, South as S, West as W};

/// Starting direction for a path that begins at a cell with this code.
const INITIAL_DIRECTION: [Direction; 16] = [E, E, S, E, N, E, S, E, E, S, S, N, E, S, E, E];

/// Whether a path starting at this code encloses background (a hole).
const HOLE_PATH: [bool; 16] = [
    false, false, false, false, false, false, false, true, false, false, false, true, false,
    true, true, false,
];

/// `TRANSITIONS[code][direction]`. `None` marks pairs a well-formed grid
/// never produces.
const TRANSITIONS: [[Option<Step>; 4]; 16] = [
    [None, None, None, None],
    [step(0, N, 0, -1), None, None, step(0, W, -1, 0)],
    [None, None, step(0, N, 0, -1), step(0, E, 1, 0)],
    [step(0, E, 1, 0), None, step(0, W, -1, 0), None],
    [None, step(0, E, 1, 0), step(0, S, 0, 1), None],
    [step(13, S, 0, 1), step(13, W, -1, 0), step(7, N, 0, -1), step(7, E, 1, 0)],
    [None, step(0, N, 0, -1), None, step(0, S, 0, 1)],
    [step(0, S, 0, 1), step(0, W, -1, 0), None, None],
    [step(0, S, 0, 1), step(0, W, -1, 0), None, None],
    [None, step(0, N, 0, -1), None, step(0, S, 0, 1)],
    [step(11, N, 0, -1), step(14, E, 1, 0), step(14, S, 0, 1), step(11, W, -1, 0)],
    [None, step(0, E, 1, 0), step(0, S, 0, 1), None],
    [step(0, E, 1, 0), None, step(0, W, -1, 0), None],
    [None, None, step(0, N, 0, -1), step(0, E, 1, 0)],
    [step(0, N, 0, -1), None, None, step(0, W, -1, 0)],
    [None, None, None, None],
];

/// A corner visited by a traced path, in pixel-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgePoint {
    pub x: i32,
    pub y: i32,
    /// Edge-node code of the cell when it was visited.
    pub code: u8,
}

/// A closed boundary on the corner grid. The last point connects back to
/// the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgePath {
    pub points: Vec<EdgePoint>,
}

impl EdgePath {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Trace every boundary in `grid`, consuming it.
///
/// Cells are visited in raster order; each untraced boundary cell starts a
/// new walk. Hole paths and paths with fewer than `path_omit` points are
/// traced (to clear their cells) but not returned.
pub fn scan_paths(grid: &mut EdgeGrid, path_omit: usize) -> Result<Vec<EdgePath>, TraceError> {
    let mut paths = Vec::new();
    let mut holes = 0usize;
    let mut short = 0usize;

    for row in 0..grid.height() {
        for col in 0..grid.width() {
            if !is_boundary(grid.get(row, col)) {
                continue;
            }
            let (path, is_hole) = walk(grid, row, col)?;
            if is_hole {
                holes += 1;
            } else if path.len() < path_omit {
                short += 1;
            } else {
                paths.push(path);
            }
        }
    }

    log::trace!(
        "scan: {} paths kept, {} holes, {} shorter than {}",
        paths.len(),
        holes,
        short,
        path_omit
    );
    Ok(paths)
}

/// Follow one boundary from (row, col) until it returns to the start.
fn walk(grid: &mut EdgeGrid, row0: usize, col0: usize) -> Result<(EdgePath, bool), TraceError> {
    let start_code = grid.get(row0, col0) as usize;
    let mut dir = INITIAL_DIRECTION[start_code];
    let is_hole = HOLE_PATH[start_code];

    let (mut row, mut col) = (row0, col0);
    let mut points = Vec::new();
    loop {
        let code = grid.get(row, col);
        points.push(EdgePoint {
            x: col as i32 - 1,
            y: row as i32 - 1,
            code,
        });

        let invalid = || TraceError::InvalidTransition {
            x: col,
            y: row,
            code,
            direction: dir as u8,
        };
        let next = TRANSITIONS[code as usize][dir as usize].ok_or_else(invalid)?;
        let next_col = offset(col, next.dx, grid.width()).ok_or_else(invalid)?;
        let next_row = offset(row, next.dy, grid.height()).ok_or_else(invalid)?;

        grid.set(row, col, next.next_code);
        dir = next.dir;
        col = next_col;
        row = next_row;

        if row == row0 && col == col0 {
            break;
        }
    }

    Ok((EdgePath { points }, is_hole))
}

fn offset(pos: usize, delta: i8, limit: usize) -> Option<usize> {
    pos.checked_add_signed(isize::from(delta))
        .filter(|&p| p < limit)
}
