//! Initial palettes for the quantizer.

use image::RgbaImage;
use rand::Rng;
use rgb::RGBA8;

/// Number of generated colors below which a grayscale ramp is used.
const GRAYSCALE_LIMIT: usize = 8;

/// Sample `count` colors from a lattice of points inside the image.
///
/// The lattice is `ni x nj` with `ni = ceil(sqrt(count))` and
/// `nj = ceil(count / ni)`, spaced evenly so no point touches the image
/// border. Points are taken row by row until `count` colors are collected.
pub fn sampled(img: &RgbaImage, count: usize) -> Vec<RGBA8> {
    let (w, h) = (img.width(), img.height());
    let ni = (count as f64).sqrt().ceil() as usize;
    let nj = count.div_ceil(ni.max(1));
    let vx = f64::from(w) / (ni + 1) as f64;
    let vy = f64::from(h) / (nj + 1) as f64;

    let mut palette = Vec::with_capacity(count);
    'rows: for j in 0..nj {
        for i in 0..ni {
            if palette.len() == count {
                break 'rows;
            }
            let x = (((i + 1) as f64 * vx) as u32).min(w - 1);
            let y = (((j + 1) as f64 * vy) as u32).min(h - 1);
            let [r, g, b, a] = img.get_pixel(x, y).0;
            palette.push(RGBA8::new(r, g, b, a));
        }
    }
    palette
}

/// Generate `count` opaque colors without looking at the image.
///
/// Fewer than 8 colors: an evenly spaced grayscale ramp from black to white.
/// Otherwise: the largest RGB cube with at most `count` points, then random
/// colors from `rng` for the remainder.
pub fn generated(count: usize, rng: &mut impl Rng) -> Vec<RGBA8> {
    if count < GRAYSCALE_LIMIT {
        let step = if count > 1 { 255.0 / (count - 1) as f64 } else { 0.0 };
        return (0..count)
            .map(|k| {
                let v = (k as f64 * step).round() as u8;
                RGBA8::new(v, v, v, 255)
            })
            .collect();
    }

    let levels = cube_levels(count);
    let step = 255 / (levels - 1);
    let mut palette = Vec::with_capacity(count);
    for r in 0..levels {
        for g in 0..levels {
            for b in 0..levels {
                palette.push(RGBA8::new(
                    (r * step) as u8,
                    (g * step) as u8,
                    (b * step) as u8,
                    255,
                ));
            }
        }
    }
    while palette.len() < count {
        palette.push(RGBA8::new(rng.random(), rng.random(), rng.random(), rng.random()));
    }
    palette
}

/// Largest `q` with `q^3 <= count`. Integer search avoids cube-root rounding.
fn cube_levels(count: usize) -> usize {
    let mut q = 2;
    while (q + 1) * (q + 1) * (q + 1) <= count {
        q += 1;
    }
    q
}
