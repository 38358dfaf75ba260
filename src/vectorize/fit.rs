//! Line and quadratic fitting over interpolated paths.
//!
//! A closed path is cut into runs that contain at most two distinct
//! headings. Each run is fitted with a straight line if every point stays
//! within the line threshold, else with a single quadratic through the
//! worst line-fit point, else it is split and both halves are fitted on
//! their own. Thresholds are squared distances.

use kurbo::Point;

use crate::geom::Segment;

use super::interpolate::{Heading, InterpolatedPoint};

/// A fitted segment together with the stretch of path it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FittedSpan {
    pub segment: Segment,
    /// Index of the first path point covered.
    pub start: usize,
    /// Number of steps from `start` to the segment's end point.
    pub len: usize,
}

/// Fit a whole closed path. Segments come out in path order and chain end
/// to start, the last one ending where the first begins.
///
/// Paths with fewer than two points produce no segments.
pub fn trace_path(
    path: &[InterpolatedPoint],
    line_threshold: f64,
    curve_threshold: f64,
) -> Vec<Segment> {
    trace_spans(path, line_threshold, curve_threshold)
        .into_iter()
        .map(|span| span.segment)
        .collect()
}

pub(crate) fn trace_spans(
    path: &[InterpolatedPoint],
    line_threshold: f64,
    curve_threshold: f64,
) -> Vec<FittedSpan> {
    let n = path.len();
    let mut out = Vec::new();
    if n < 2 {
        return out;
    }

    let mut start = 0;
    while start < n {
        let end = run_end(path, start);
        let len = match (end + n - start) % n {
            0 => n,
            len => len,
        };
        fit_run(path, start, len, line_threshold, curve_threshold, &mut out);
        start = if end > 0 { end } else { n };
    }
    out
}

/// End index of the run beginning at `start`.
///
/// The run grows while it sees at most two headings. A run that reaches the
/// last point is closed onto point 0 instead.
fn run_end(path: &[InterpolatedPoint], start: usize) -> usize {
    let n = path.len();
    let first = path[start].heading;
    let mut second: Option<Heading> = None;
    let mut end = start + 1;
    while end < n - 1 {
        let h = path[end].heading;
        if h != first {
            match second {
                None => second = Some(h),
                Some(s) if s == h => {}
                Some(_) => break,
            }
        }
        end += 1;
    }
    if end >= n - 1 {
        0
    } else {
        end
    }
}

/// Fit the run of `len` steps from `start`, appending spans to `out` in
/// path order.
///
/// Splits are handled with an explicit stack. The right half is pushed
/// first so the left half is always fitted (and emitted) before it.
fn fit_run(
    path: &[InterpolatedPoint],
    start: usize,
    len: usize,
    line_threshold: f64,
    curve_threshold: f64,
    out: &mut Vec<FittedSpan>,
) {
    let n = path.len();
    let at = |offset: usize| {
        let p = path[offset % n];
        Point::new(p.x, p.y)
    };

    let mut stack = vec![(start, len)];
    while let Some((s, tl)) = stack.pop() {
        let p0 = at(s);
        let p2 = at(s + tl);
        let span = |segment| FittedSpan {
            segment,
            start: s,
            len: tl,
        };

        // Straight line, points spaced evenly along it.
        let step = (p2 - p0) / tl as f64;
        let mut fits = true;
        let mut worst = 0.0;
        let mut line_err_at = 0;
        for o in 1..tl {
            let d2 = (at(s + o) - (p0 + step * o as f64)).hypot2();
            if d2 > line_threshold {
                fits = false;
            }
            if d2 > worst {
                worst = d2;
                line_err_at = o;
            }
        }
        if fits {
            out.push(span(Segment::line(p0, p2)));
            continue;
        }

        // Quadratic forced through the worst line-fit point.
        let fit_at = line_err_at;
        let ctrl = control_point(p0, at(s + fit_at), p2, fit_at as f64 / tl as f64);
        let mut fits = true;
        let mut worst = 0.0;
        let mut curve_err_at = fit_at;
        for o in 1..tl {
            let t = o as f64 / tl as f64;
            let d2 = (at(s + o) - quad_point(p0, ctrl, p2, t)).hypot2();
            if d2 > curve_threshold {
                fits = false;
            }
            if d2 > worst {
                worst = d2;
                curve_err_at = o;
            }
        }
        if fits {
            out.push(span(Segment::quad(p0, ctrl, p2)));
            continue;
        }

        let split = (fit_at + curve_err_at) / 2;
        stack.push(((s + split) % n, tl - split));
        stack.push((s, split));
    }
}

/// Control point of the quadratic from `p0` to `p2` that passes through
/// `through` at parameter `t`.
fn control_point(p0: Point, through: Point, p2: Point, t: f64) -> Point {
    let (b0, b1, b2) = bernstein(t);
    let v = (p0.to_vec2() * b0 + p2.to_vec2() * b2 - through.to_vec2()) / -b1;
    v.to_point()
}

fn quad_point(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let (b0, b1, b2) = bernstein(t);
    (p0.to_vec2() * b0 + p1.to_vec2() * b1 + p2.to_vec2() * b2).to_point()
}

fn bernstein(t: f64) -> (f64, f64, f64) {
    let mt = 1.0 - t;
    (mt * mt, 2.0 * mt * t, t * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantize::IndexGrid;
    use crate::vectorize::interpolate::interpolate;
    use crate::vectorize::layers::build_layers;
    use crate::vectorize::scan::scan_paths;

    /// Interpolated paths of every layer of an index grid.
    fn interpolated(width: usize, height: usize, indices: &[u32], colors: usize) -> Vec<Vec<Vec<InterpolatedPoint>>> {
        build_layers(&IndexGrid::from_indices(width, height, indices), colors)
            .into_iter()
            .map(|mut layer| {
                scan_paths(&mut layer, 0)
                    .unwrap()
                    .iter()
                    .map(interpolate)
                    .collect()
            })
            .collect()
    }

    fn endpoints(segments: &[Segment]) -> Vec<((f64, f64), (f64, f64))> {
        segments
            .iter()
            .map(|s| ((s.start().x, s.start().y), (s.end().x, s.end().y)))
            .collect()
    }

    fn disc(size: usize, r: f64) -> Vec<u32> {
        let c = size as f64 / 2.0;
        (0..size * size)
            .map(|i| {
                let (x, y) = ((i % size) as f64 + 0.5, (i / size) as f64 + 0.5);
                u32::from((x - c).hypot(y - c) > r)
            })
            .collect()
    }

    #[test]
    fn unit_square_is_two_lines() {
        let layers = interpolated(1, 1, &[0], 1);
        let segments = trace_path(&layers[0][0], 1.0, 1.0);
        assert!(segments.iter().all(Segment::is_line));
        assert_eq!(
            endpoints(&segments),
            vec![((0.5, 0.0), (0.5, 1.0)), ((0.5, 1.0), (0.5, 0.0))]
        );
    }

    #[test]
    fn solid_block_is_four_lines() {
        let layers = interpolated(10, 10, &[0; 100], 1);
        assert_eq!(layers[0].len(), 1);
        assert_eq!(layers[0][0].len(), 40);
        let segments = trace_path(&layers[0][0], 1.0, 1.0);
        assert!(segments.iter().all(Segment::is_line));
        assert_eq!(
            endpoints(&segments),
            vec![
                ((0.5, 0.0), (10.0, 0.5)),
                ((10.0, 0.5), (9.5, 10.0)),
                ((9.5, 10.0), (0.0, 9.5)),
                ((0.0, 9.5), (0.5, 0.0)),
            ]
        );
    }

    #[test]
    fn diamond_fits_two_quadratics() {
        // Checkerboard cells of color 1 join into one diamond.
        let indices = [0, 1, 0, 1, 0, 1, 0, 1, 0];
        let layers = interpolated(3, 3, &indices, 2);
        assert_eq!(layers[1].len(), 1);
        let segments = trace_path(&layers[1][0], 1.0, 1.0);
        assert_eq!(
            segments,
            vec![
                Segment::quad(Point::new(1.5, 0.0), Point::new(4.5, 1.5), Point::new(1.5, 3.0)),
                Segment::quad(Point::new(1.5, 3.0), Point::new(-1.5, 1.5), Point::new(1.5, 0.0)),
            ]
        );
    }

    #[test]
    fn segments_chain_and_close() {
        let layers = interpolated(24, 24, &disc(24, 9.0), 2);
        for path in layers.iter().flatten() {
            let segments = trace_path(path, 1.0, 1.0);
            assert!(!segments.is_empty());
            for pair in segments.windows(2) {
                assert_eq!(pair[0].end(), pair[1].start());
            }
            let first = segments[0].start();
            assert_eq!(first, Point::new(path[0].x, path[0].y));
            assert_eq!(segments[segments.len() - 1].end(), first);
        }
    }

    #[test]
    fn fitted_points_stay_within_threshold() {
        for (lt, qt) in [(1.0, 1.0), (0.5, 0.25), (4.0, 2.0)] {
            let layers = interpolated(24, 24, &disc(24, 9.0), 2);
            for path in layers.iter().flatten() {
                let n = path.len();
                let spans = trace_spans(path, lt, qt);
                let covered: usize = spans.iter().map(|s| s.len).sum();
                assert_eq!(covered, n, "spans must cover the path once");
                for span in &spans {
                    let limit = if span.segment.is_line() { lt } else { qt };
                    for o in 1..span.len {
                        let p = path[(span.start + o) % n];
                        let t = o as f64 / span.len as f64;
                        let d2 = (Point::new(p.x, p.y) - span.segment.eval(t)).hypot2();
                        assert!(d2 <= limit + 1e-9, "deviation {d2} over {limit}");
                    }
                }
            }
        }
    }

    #[test]
    fn round_shapes_use_curves() {
        let layers = interpolated(24, 24, &disc(24, 9.0), 2);
        let segments = trace_path(&layers[0][0], 1.0, 1.0);
        assert!(segments.iter().any(|s| !s.is_line()));
    }

    #[test]
    fn tiny_paths_are_skipped() {
        assert!(trace_path(&[], 1.0, 1.0).is_empty());
        let one = InterpolatedPoint {
            x: 0.0,
            y: 0.0,
            heading: Heading::Degenerate,
        };
        assert!(trace_path(&[one], 1.0, 1.0).is_empty());
    }
}
