//! Output formats for traced images.

pub mod svg;

use std::path::Path;

use crate::config::TracingConfig;
use crate::error::TraceError;
use crate::TraceResult;

/// Write `result` as an SVG file.
pub fn write_svg(path: &Path, result: &TraceResult, config: &TracingConfig) -> Result<(), TraceError> {
    std::fs::write(path, svg::to_svg(result, config))?;
    Ok(())
}
