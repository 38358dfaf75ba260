//! Edge midpoints with an 8-way heading.
//!
//! Corner paths zig-zag along pixel edges. Taking the midpoint of every
//! edge cuts each stair step diagonally, and the heading from one midpoint
//! to the next tells the fitter where straight and curved runs begin.

use super::scan::EdgePath;

/// Compass octant from one midpoint to the next (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Heading {
    East = 0,
    SouthEast = 1,
    South = 2,
    SouthWest = 3,
    West = 4,
    NorthWest = 5,
    North = 6,
    NorthEast = 7,
    /// Both points coincide. Not produced by well-formed paths.
    Degenerate = 8,
}

impl Heading {
    /// Classify the step from (x0, y0) to (x1, y1).
    pub fn between(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        use std::cmp::Ordering::*;
        match (x0.total_cmp(&x1), y0.total_cmp(&y1)) {
            (Less, Less) => Heading::SouthEast,
            (Less, Greater) => Heading::NorthEast,
            (Less, Equal) => Heading::East,
            (Greater, Less) => Heading::SouthWest,
            (Greater, Greater) => Heading::NorthWest,
            (Greater, Equal) => Heading::West,
            (Equal, Less) => Heading::South,
            (Equal, Greater) => Heading::North,
            (Equal, Equal) => Heading::Degenerate,
        }
    }
}

/// One midpoint of an interpolated path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolatedPoint {
    pub x: f64,
    pub y: f64,
    /// Heading towards the next point of the path.
    pub heading: Heading,
}

/// Replace each corner with the midpoint of the edge that leaves it.
///
/// Point k of the result lies halfway between corners k and k+1; its
/// heading points at midpoint k+1. Both indices wrap, so the output is
/// closed like the input and has the same length.
pub fn interpolate(path: &EdgePath) -> Vec<InterpolatedPoint> {
    let pts = &path.points;
    let n = pts.len();
    let midpoint = |k: usize| {
        let a = pts[k % n];
        let b = pts[(k + 1) % n];
        (
            f64::from(a.x + b.x) / 2.0,
            f64::from(a.y + b.y) / 2.0,
        )
    };

    (0..n)
        .map(|k| {
            let (x, y) = midpoint(k);
            let (nx, ny) = midpoint(k + 1);
            InterpolatedPoint {
                x,
                y,
                heading: Heading::between(x, y, nx, ny),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorize::scan::EdgePoint;

    fn path(coords: &[(i32, i32)]) -> EdgePath {
        EdgePath {
            points: coords
                .iter()
                .map(|&(x, y)| EdgePoint { x, y, code: 0 })
                .collect(),
        }
    }

    #[test]
    fn unit_square_midpoints() {
        let out = interpolate(&path(&[(0, 0), (1, 0), (1, 1), (0, 1)]));
        let got: Vec<(f64, f64, Heading)> = out.iter().map(|p| (p.x, p.y, p.heading)).collect();
        assert_eq!(
            got,
            vec![
                (0.5, 0.0, Heading::SouthEast),
                (1.0, 0.5, Heading::SouthWest),
                (0.5, 1.0, Heading::NorthWest),
                (0.0, 0.5, Heading::NorthEast),
            ]
        );
    }

    #[test]
    fn straight_edges_get_pure_headings() {
        // 2x1 rectangle: the top and bottom edges have a midpoint each side.
        let out = interpolate(&path(&[(0, 0), (1, 0), (2, 0), (2, 1), (1, 1), (0, 1)]));
        let headings: Vec<Heading> = out.iter().map(|p| p.heading).collect();
        assert_eq!(
            headings,
            vec![
                Heading::East,
                Heading::SouthEast,
                Heading::SouthWest,
                Heading::West,
                Heading::NorthWest,
                Heading::NorthEast,
            ]
        );
    }

    #[test]
    fn heading_octants() {
        assert_eq!(Heading::between(0.0, 0.0, 0.0, -1.0), Heading::North);
        assert_eq!(Heading::between(0.0, 0.0, 0.0, 1.0), Heading::South);
        assert_eq!(Heading::between(1.0, 1.0, 1.0, 1.0), Heading::Degenerate);
        assert_eq!(Heading::Degenerate as u8, 8);
    }
}
