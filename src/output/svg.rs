//! SVG serialization of a `TraceResult`.
//!
//! One `<path>` per drawable path, in draw order. Scaling, coordinate
//! rounding and the optional control-point markers are applied here; the
//! traced geometry itself stays in source pixel space.

use kurbo::Point;
use rgb::RGBA8;

use crate::compose::DrawablePath;
use crate::config::TracingConfig;
use crate::geom::Segment;
use crate::TraceResult;

/// Render `result` as a complete SVG document.
pub fn to_svg(result: &TraceResult, config: &TracingConfig) -> String {
    let w = (f64::from(result.width) * config.scale) as u64;
    let h = (f64::from(result.height) * config.scale) as u64;

    let mut svg = String::from("<svg ");
    if config.view_box {
        svg.push_str(&format!("viewBox=\"0 0 {} {}\" ", w, h));
    } else {
        svg.push_str(&format!("width=\"{}\" height=\"{}\" ", w, h));
    }
    svg.push_str("version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\" ");
    if config.include_descriptions {
        svg.push_str(&format!(
            "desc=\"Created with img2path version {}\" ",
            env!("CARGO_PKG_VERSION")
        ));
    }
    svg.push('>');

    for path in &result.paths {
        path_element(&mut svg, path, config);
    }

    svg.push_str("</svg>");
    svg
}

/// Append one `<path>` element plus any control-point markers.
fn path_element(svg: &mut String, path: &DrawablePath, config: &TracingConfig) {
    let Some(first) = path.segments.first() else {
        return;
    };
    let fmt = Coords::new(config);

    svg.push_str("<path ");
    if config.include_descriptions {
        svg.push_str(&format!("desc=\"l {} p {}\" ", path.layer, path.path));
    }
    svg.push_str(&color_attributes(path.color));
    svg.push_str(&format!("d=\"M {} ", fmt.point(first.start())));
    for seg in &path.segments {
        match seg {
            Segment::Line(l) => svg.push_str(&format!("L {} ", fmt.point(l.p1))),
            Segment::Quad(q) => {
                svg.push_str(&format!("Q {} {} ", fmt.point(q.p1), fmt.point(q.p2)))
            }
        }
    }
    svg.push_str("Z\" />");

    for seg in &path.segments {
        match seg {
            Segment::Line(l) if config.line_control_radius > 0.0 => {
                svg.push_str(&marker(&fmt, l.p1, config.line_control_radius, "white"));
            }
            Segment::Quad(q) if config.curve_control_radius > 0.0 => {
                let r = config.curve_control_radius;
                svg.push_str(&marker(&fmt, q.p1, r, "cyan"));
                svg.push_str(&marker(&fmt, q.p2, r, "white"));
                svg.push_str(&guide(&fmt, q.p0, q.p1, r));
                svg.push_str(&guide(&fmt, q.p1, q.p2, r));
            }
            _ => {}
        }
    }
}

/// `fill`, `stroke`, `stroke-width` and `opacity` for a palette color.
fn color_attributes(c: RGBA8) -> String {
    format!(
        "fill=\"rgb({r},{g},{b})\" stroke=\"rgb({r},{g},{b})\" stroke-width=\"1\" opacity=\"{}\" ",
        f64::from(c.a) / 255.0,
        r = c.r,
        g = c.g,
        b = c.b,
    )
}

fn marker(fmt: &Coords, at: Point, r: f64, fill: &str) -> String {
    let at = fmt.scaled(at);
    format!(
        "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" stroke-width=\"{}\" stroke=\"black\" />",
        at.x,
        at.y,
        r,
        fill,
        r * 0.2
    )
}

fn guide(fmt: &Coords, from: Point, to: Point, r: f64) -> String {
    let (a, b) = (fmt.scaled(from), fmt.scaled(to));
    format!(
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke-width=\"{}\" stroke=\"cyan\" />",
        a.x,
        a.y,
        b.x,
        b.y,
        r * 0.2
    )
}

/// Scale + round for output coordinates.
struct Coords {
    scale: f64,
    /// `10^decimals`, or `None` to keep full precision.
    factor: Option<f64>,
}

impl Coords {
    fn new(config: &TracingConfig) -> Self {
        Self {
            scale: config.scale,
            factor: config.round_coords.map(|d| 10f64.powi(d.min(15) as i32)),
        }
    }

    fn round(&self, v: f64) -> f64 {
        let v = match self.factor {
            Some(f) => (v * f).round() / f,
            None => v,
        };
        // Normalize -0 so it prints as "0".
        v + 0.0
    }

    fn scaled(&self, p: Point) -> Point {
        Point::new(self.round(p.x * self.scale), self.round(p.y * self.scale))
    }

    fn point(&self, p: Point) -> String {
        let p = self.scaled(p);
        format!("{} {}", p.x, p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::compose;

    fn result() -> TraceResult {
        let a = Point::new(0.5, 0.0);
        let b = Point::new(2.0, 0.5);
        let c = Point::new(0.5, 1.0);
        let layers = vec![vec![vec![
            Segment::line(a, b),
            Segment::quad(b, Point::new(1.25, 1.333333), c),
            Segment::line(c, a),
        ]]];
        let palette = vec![RGBA8::new(255, 0, 0, 255)];
        TraceResult {
            width: 3,
            height: 2,
            paths: compose(&layers, &palette, 3),
            palette,
        }
    }

    #[test]
    fn document_structure() {
        let svg = to_svg(&result(), &TracingConfig::default());
        assert!(svg.starts_with("<svg width=\"3\" height=\"2\" version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\" desc=\"Created with img2path version"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(
            "<path desc=\"l 0 p 0\" fill=\"rgb(255,0,0)\" stroke=\"rgb(255,0,0)\" stroke-width=\"1\" opacity=\"1\" d=\"M 0.5 0 L 2 0.5 Q 1.3 1.3 0.5 1 L 0.5 0 Z\" />"
        ), "{svg}");
    }

    #[test]
    fn scale_view_box_and_no_descriptions() {
        let cfg = TracingConfig {
            scale: 2.0,
            round_coords: None,
            view_box: true,
            include_descriptions: false,
            ..TracingConfig::default()
        };
        let svg = to_svg(&result(), &cfg);
        assert!(svg.starts_with("<svg viewBox=\"0 0 6 4\" version=\"1.1\""));
        assert!(!svg.contains("desc="));
        assert!(svg.contains("d=\"M 1 0 L 4 1 Q 2.5 2.666666 1 2 L 1 0 Z\""), "{svg}");
    }

    #[test]
    fn control_point_markers() {
        let plain = to_svg(&result(), &TracingConfig::default());
        assert!(!plain.contains("<circle"));

        let cfg = TracingConfig {
            line_control_radius: 1.0,
            curve_control_radius: 2.0,
            ..TracingConfig::default()
        };
        let svg = to_svg(&result(), &cfg);
        assert_eq!(svg.matches("fill=\"white\"").count(), 3);
        assert_eq!(svg.matches("fill=\"cyan\"").count(), 1);
        assert_eq!(svg.matches("<line ").count(), 2);
        assert!(svg.contains("<circle cx=\"1.3\" cy=\"1.3\" r=\"2\" fill=\"cyan\" stroke-width=\"0.4\" stroke=\"black\" />"));
    }

    #[test]
    fn translucent_colors_set_opacity() {
        assert_eq!(
            color_attributes(RGBA8::new(1, 2, 3, 0)),
            "fill=\"rgb(1,2,3)\" stroke=\"rgb(1,2,3)\" stroke-width=\"1\" opacity=\"0\" "
        );
    }
}
