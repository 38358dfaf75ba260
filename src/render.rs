//! Raster rendering of traced paths for visual comparison.
//!
//! Draws a `TraceResult` back to pixels with tiny-skia, the same way the
//! SVG output describes it (fill plus a 1px stroke in the path color,
//! element opacity from the palette alpha), and measures how close the
//! rendering is to the source image.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::RgbaImage;
use kurbo::{BezPath, PathEl};
use tiny_skia::{FillRule, Paint, Pixmap, PixmapPaint, Stroke, Transform};

use crate::error::TraceError;
use crate::TraceResult;

/// Per-pixel agreement between a source image and a rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterDiff {
    /// Mean absolute difference per RGBA channel, 0-255.
    pub mean_abs_error: f64,
    /// Fraction of pixels whose four channels all match exactly.
    pub exact_match: f64,
}

/// Convert a kurbo `BezPath` to a `tiny_skia::Path`.
fn to_skia_path(bezpath: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for el in bezpath.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Render every path of `result` in draw order onto a transparent canvas
/// of `scale` times the source size.
pub fn rasterize(result: &TraceResult, scale: f64) -> Result<Pixmap, TraceError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(TraceError::InvalidConfig(format!(
            "render scale must be positive and finite, got {scale}"
        )));
    }
    let w = (f64::from(result.width) * scale).ceil() as u32;
    let h = (f64::from(result.height) * scale).ceil() as u32;
    let canvas_error = || {
        TraceError::InvalidConfig(format!("cannot allocate a {w}x{h} canvas at scale {scale}"))
    };
    let mut canvas = Pixmap::new(w, h).ok_or_else(canvas_error)?;
    // Translucent paths are drawn opaque here, then composited as a group.
    let mut scratch = Pixmap::new(w, h).ok_or_else(canvas_error)?;

    let transform = Transform::from_scale(scale as f32, scale as f32);
    let stroke = Stroke {
        width: 1.0,
        ..Stroke::default()
    };

    for path in &result.paths {
        let Some(sk_path) = to_skia_path(&path.to_bezpath()) else {
            continue;
        };
        let c = path.color;
        let mut paint = Paint::default();
        paint.set_color_rgba8(c.r, c.g, c.b, 255);
        paint.anti_alias = true;

        let target = if c.a == 255 {
            &mut canvas
        } else {
            scratch.fill(tiny_skia::Color::TRANSPARENT);
            &mut scratch
        };
        target.fill_path(&sk_path, &paint, FillRule::Winding, transform, None);
        target.stroke_path(&sk_path, &paint, &stroke, transform, None);

        if c.a != 255 {
            let group = PixmapPaint {
                opacity: f32::from(c.a) / 255.0,
                ..PixmapPaint::default()
            };
            canvas.draw_pixmap(0, 0, scratch.as_ref(), &group, Transform::identity(), None);
        }
    }

    log::debug!("rasterized {} paths at {}x{}", result.paths.len(), w, h);
    Ok(canvas)
}

/// Compare a rendering against the source image, pixel by pixel.
///
/// Both must have the same size (render at scale 1).
pub fn compare(source: &RgbaImage, rendered: &Pixmap) -> Result<RasterDiff, TraceError> {
    let expected = source.dimensions();
    let actual = (rendered.width(), rendered.height());
    if expected != actual {
        return Err(TraceError::SizeMismatch { expected, actual });
    }

    let mut total_error = 0u64;
    let mut exact = 0u64;
    for (src, px) in source.pixels().zip(rendered.pixels()) {
        let px = px.demultiply();
        let out = [px.red(), px.green(), px.blue(), px.alpha()];
        let err: u64 = src
            .0
            .iter()
            .zip(&out)
            .map(|(&a, &b)| u64::from(a.abs_diff(b)))
            .sum();
        total_error += err;
        if err == 0 {
            exact += 1;
        }
    }

    let pixels = (expected.0 as u64 * expected.1 as u64).max(1) as f64;
    Ok(RasterDiff {
        mean_abs_error: total_error as f64 / (pixels * 4.0),
        exact_match: exact as f64 / pixels,
    })
}

/// Write a pixmap as an 8-bit RGBA PNG (straight alpha).
pub fn save_png(pixmap: &Pixmap, path: &Path) -> Result<(), TraceError> {
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    let file = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(file, pixmap.width(), pixmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|e| TraceError::PngEncode(e.to_string()))?;
    writer
        .write_image_data(&data)
        .map_err(|e| TraceError::PngEncode(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| TraceError::PngEncode(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{trace_pixels, TracingConfig};
    use image::Rgba;

    fn solid(color: [u8; 4]) -> (RgbaImage, TraceResult) {
        let img = RgbaImage::from_pixel(10, 10, Rgba(color));
        let cfg = TracingConfig {
            color_count: 1,
            path_omit: 0,
            ..TracingConfig::default()
        };
        let result = trace_pixels(&img, &cfg).unwrap();
        (img, result)
    }

    #[test]
    fn solid_image_renders_back() {
        let (img, result) = solid([200, 30, 30, 255]);
        let pixmap = rasterize(&result, 1.0).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (10, 10));
        let diff = compare(&img, &pixmap).unwrap();
        assert!(diff.exact_match >= 0.64, "{:?}", diff);
        let center = pixmap.pixel(5, 5).unwrap().demultiply();
        assert_eq!((center.red(), center.green(), center.blue(), center.alpha()), (200, 30, 30, 255));
    }

    #[test]
    fn translucent_paths_keep_their_alpha() {
        let (_, result) = solid([0, 0, 255, 128]);
        let pixmap = rasterize(&result, 1.0).unwrap();
        let center = pixmap.pixel(5, 5).unwrap();
        assert!((127..=129).contains(&center.alpha()), "alpha {}", center.alpha());
    }

    #[test]
    fn scale_grows_canvas() {
        let (_, result) = solid([0, 0, 0, 255]);
        let pixmap = rasterize(&result, 2.5).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (25, 25));
    }

    #[test]
    fn unusable_scales_are_config_errors() {
        let (_, result) = solid([0, 0, 0, 255]);
        for scale in [0.0, -1.0, f64::NAN, 1e9] {
            let err = rasterize(&result, scale).unwrap_err();
            assert!(matches!(err, TraceError::InvalidConfig(_)), "scale {scale}: {err}");
        }
    }

    #[test]
    fn compare_rejects_size_mismatch() {
        let (_, result) = solid([0, 0, 0, 255]);
        let pixmap = rasterize(&result, 2.0).unwrap();
        let small = RgbaImage::new(10, 10);
        assert!(matches!(
            compare(&small, &pixmap),
            Err(TraceError::SizeMismatch { expected: (10, 10), actual: (20, 20) })
        ));
    }

    #[test]
    fn identical_images_match_exactly() {
        let (_, result) = solid([10, 20, 30, 255]);
        let pixmap = rasterize(&result, 1.0).unwrap();
        let copy = RgbaImage::from_fn(10, 10, |x, y| {
            let c = pixmap.pixel(x, y).unwrap().demultiply();
            Rgba([c.red(), c.green(), c.blue(), c.alpha()])
        });
        let diff = compare(&copy, &pixmap).unwrap();
        assert_eq!(diff.mean_abs_error, 0.0);
        assert_eq!(diff.exact_match, 1.0);
    }
}
