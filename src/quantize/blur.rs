//! Selective Gaussian blur.
//!
//! Smooths gradients and noise before quantization while leaving strong
//! edges alone: after a separable blur, any pixel that moved by more than
//! `delta` (summed absolute RGBA difference) is restored.

use image::RgbaImage;

use crate::config::MAX_BLUR_RADIUS;

/// Normalized Gaussian kernels for radius 1..=5.
const KERNELS: [&[f64]; 5] = [
    &[0.27901, 0.44198, 0.27901],
    &[0.135336, 0.228569, 0.272192, 0.228569, 0.135336],
    &[0.086776, 0.136394, 0.178908, 0.195843, 0.178908, 0.136394, 0.086776],
    &[
        0.063327, 0.093095, 0.122589, 0.144599, 0.152781, 0.144599, 0.122589, 0.093095, 0.063327,
    ],
    &[
        0.049692, 0.069304, 0.089767, 0.107988, 0.120651, 0.125194, 0.120651, 0.107988, 0.089767,
        0.069304, 0.049692,
    ],
];

/// Blur `img` with the kernel for `radius`, keeping pixels whose change
/// exceeds `delta`. Radius 0 returns a copy; radii above 5 are clamped.
pub fn selective_blur(img: &RgbaImage, radius: u32, delta: f64) -> RgbaImage {
    if radius == 0 {
        return img.clone();
    }
    let radius = if radius > MAX_BLUR_RADIUS {
        log::warn!("blur radius {} clamped to {}", radius, MAX_BLUR_RADIUS);
        MAX_BLUR_RADIUS
    } else {
        radius
    };
    let kernel = KERNELS[radius as usize - 1];
    let delta = delta.abs().min(1024.0);

    let (w, h) = (img.width() as usize, img.height() as usize);
    let src = img.as_raw();

    let horizontal = convolve(src, w, h, kernel, 4, w);
    let vertical = convolve(&horizontal, h, w, kernel, 4 * w, 1);

    let mut out = vertical;
    for (blurred, original) in out.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let d: u32 = blurred
            .iter()
            .zip(original)
            .map(|(&b, &o)| u32::from(b.abs_diff(o)))
            .sum();
        if f64::from(d) > delta {
            blurred.copy_from_slice(original);
        }
    }

    // Dimensions are unchanged, so the buffer always fits.
    RgbaImage::from_raw(img.width(), img.height(), out).unwrap_or_else(|| img.clone())
}

/// One 1-D pass along lines of length `len`.
///
/// `step` is the byte distance between neighbors along a line and
/// `line_step` the pixel offset between the first pixels of consecutive
/// lines. Taps that fall off the image are dropped and the remaining weights
/// renormalized.
fn convolve(
    src: &[u8],
    len: usize,
    lines: usize,
    kernel: &[f64],
    step: usize,
    line_step: usize,
) -> Vec<u8> {
    let radius = kernel.len() / 2;
    let mut out = vec![0u8; src.len()];
    for line in 0..lines {
        let base = line * line_step * 4;
        for pos in 0..len {
            let mut acc = [0.0f64; 4];
            let mut weight = 0.0;
            for (k, &wk) in kernel.iter().enumerate() {
                let Some(p) = (pos + k).checked_sub(radius) else {
                    continue;
                };
                if p >= len {
                    continue;
                }
                let idx = base + p * step;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += f64::from(src[idx + c]) * wk;
                }
                weight += wk;
            }
            let idx = base + pos * step;
            for (c, a) in acc.iter().enumerate() {
                out[idx + c] = (a / weight).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    out
}
