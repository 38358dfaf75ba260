use std::path::Path;

use image::{ImageReader, RgbaImage};

use crate::error::TraceError;

/// Load an image file and convert it to 8-bit RGBA.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, TraceError> {
    let img = ImageReader::open(path)
        .map_err(|e| TraceError::ImageLoad(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| TraceError::ImageLoad(e.to_string()))?
        .decode()
        .map_err(|e| TraceError::ImageLoad(e.to_string()))?
        .into_rgba8();
    check_dimensions(&img)?;
    Ok(img)
}

/// Wrap a flat row-major RGBA byte buffer (4 bytes per pixel).
///
/// Components are raw 0-255 samples; the length must match the declared
/// dimensions exactly.
pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<RgbaImage, TraceError> {
    let expected = width as usize * height as usize * 4;
    let actual = data.len();
    let img = RgbaImage::from_raw(width, height, data).ok_or(TraceError::BufferSize {
        width,
        height,
        expected,
        actual,
    })?;
    // `from_raw` accepts oversized buffers.
    if actual != expected {
        return Err(TraceError::BufferSize {
            width,
            height,
            expected,
            actual,
        });
    }
    check_dimensions(&img)?;
    Ok(img)
}

/// Reject images the quantizer cannot sample.
pub fn check_dimensions(img: &RgbaImage) -> Result<(), TraceError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(TraceError::EmptyImage);
    }
    Ok(())
}
