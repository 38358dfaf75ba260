use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Checkerboard of `cell`-sized squares; the top-left square is `even`.
pub fn checkerboard(width: u32, height: u32, cell: u32, even: Rgba<u8>, odd: Rgba<u8>) -> RgbaImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");
    RgbaImage::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            even
        } else {
            odd
        }
    })
}

/// Filled disc of `fg` on `bg` in a `size x size` image.
pub fn disc(size: u32, center: (f64, f64), radius: f64, fg: Rgba<u8>, bg: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        let (px, py) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
        if (px - center.0).hypot(py - center.1) <= radius {
            fg
        } else {
            bg
        }
    })
}

/// Opaque random noise, reproducible for a given seed.
pub fn noise(width: u32, height: u32, seed: u64) -> RgbaImage {
    let mut rng = StdRng::seed_from_u64(seed);
    RgbaImage::from_fn(width, height, |_, _| {
        let [r, g, b] = rng.random::<[u8; 3]>();
        Rgba([r, g, b, 255])
    })
}
