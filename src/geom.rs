//! Shared geometry types.

use kurbo::{Line, ParamCurve, PathEl, Point, QuadBez};

/// One drawing primitive of a fitted path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Line),
    Quad(QuadBez),
}

impl Segment {
    pub fn line(p0: Point, p1: Point) -> Self {
        Segment::Line(Line::new(p0, p1))
    }

    pub fn quad(p0: Point, p1: Point, p2: Point) -> Self {
        Segment::Quad(QuadBez::new(p0, p1, p2))
    }

    pub fn start(&self) -> Point {
        match self {
            Segment::Line(l) => l.p0,
            Segment::Quad(q) => q.p0,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Line(l) => l.p1,
            Segment::Quad(q) => q.p2,
        }
    }

    /// Point at parameter `t` in [0, 1].
    pub fn eval(&self, t: f64) -> Point {
        match self {
            Segment::Line(l) => l.eval(t),
            Segment::Quad(q) => q.eval(t),
        }
    }

    /// Path element that draws this segment from the current point.
    pub fn to_path_el(&self) -> PathEl {
        match *self {
            Segment::Line(l) => PathEl::LineTo(l.p1),
            Segment::Quad(q) => PathEl::QuadTo(q.p1, q.p2),
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Segment::Line(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_and_elements() {
        let q = Segment::quad(Point::new(0.0, 0.0), Point::new(1.0, 2.0), Point::new(2.0, 0.0));
        assert_eq!(q.start(), Point::new(0.0, 0.0));
        assert_eq!(q.end(), Point::new(2.0, 0.0));
        assert_eq!(q.eval(0.5), Point::new(1.0, 1.0));
        assert_eq!(q.to_path_el(), PathEl::QuadTo(Point::new(1.0, 2.0), Point::new(2.0, 0.0)));
        assert!(!q.is_line());

        let l = Segment::line(Point::new(0.0, 0.0), Point::new(4.0, 2.0));
        assert_eq!(l.eval(0.5), Point::new(2.0, 1.0));
        assert_eq!(l.to_path_el(), PathEl::LineTo(Point::new(4.0, 2.0)));
    }
}
