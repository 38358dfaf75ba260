use crate::error::TraceError;

/// Largest supported selective blur radius.
pub const MAX_BLUR_RADIUS: u32 = 5;

/// All tracing parameters in one struct.
///
/// The first group drives the vectorization pipeline. The output group
/// is only read by the SVG writer and the renderer; coordinates in a
/// `TraceResult` are always in source pixel space.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    // -- Curve fitting --
    /// Squared-distance error allowed for a straight line fit.
    pub line_error_threshold: f64,
    /// Squared-distance error allowed for a quadratic fit.
    pub curve_error_threshold: f64,

    // -- Path scanning --
    /// Traced paths with fewer points than this are dropped. 0 keeps all.
    pub path_omit: usize,

    // -- Color quantization --
    /// Seed the palette by sampling the image (true) or generate a fixed
    /// grayscale ramp / RGB cube (false).
    pub color_sampling: bool,
    /// Number of palette entries.
    pub color_count: usize,
    /// Share of pixels below which a cluster counts as sparse.
    /// Only used with `reseed_sparse_colors`.
    pub min_color_ratio: f64,
    /// Assignment passes. Palette entries are re-averaged between passes.
    pub quant_cycles: usize,
    /// Selective blur radius in pixels. 0 = no blur, max 5.
    pub blur_radius: u32,
    /// Pixels whose blurred color differs from the original by more than
    /// this (summed RGBA) keep their original color.
    pub blur_delta: f64,
    /// Replace sparse clusters with random colors between passes.
    pub reseed_sparse_colors: bool,
    /// Seed for every random choice (reseeding, generated palette tail).
    pub seed: u64,

    // -- Output --
    /// Multiplier applied to every output coordinate.
    pub scale: f64,
    /// Decimal places kept in output coordinates. `None` = no rounding.
    pub round_coords: Option<u32>,
    /// Emit a `viewBox` instead of `width`/`height`.
    pub view_box: bool,
    /// Emit provenance `desc` attributes.
    pub include_descriptions: bool,
    /// Radius of the markers drawn on line end points. 0 = off.
    pub line_control_radius: f64,
    /// Radius of the markers drawn on quadratic control points. 0 = off.
    pub curve_control_radius: f64,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            line_error_threshold: 1.0,
            curve_error_threshold: 1.0,
            path_omit: 8,
            color_sampling: true,
            color_count: 16,
            min_color_ratio: 0.02,
            quant_cycles: 3,
            blur_radius: 0,
            blur_delta: 20.0,
            reseed_sparse_colors: false,
            seed: 0,
            scale: 1.0,
            round_coords: Some(1),
            view_box: false,
            include_descriptions: true,
            line_control_radius: 0.0,
            curve_control_radius: 0.0,
        }
    }
}

impl TracingConfig {
    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), TraceError> {
        if self.color_count == 0 {
            return Err(invalid("color_count must be at least 1"));
        }
        if self.quant_cycles == 0 {
            return Err(invalid("quant_cycles must be at least 1"));
        }
        positive("line_error_threshold", self.line_error_threshold)?;
        positive("curve_error_threshold", self.curve_error_threshold)?;
        positive("scale", self.scale)?;
        if !(0.0..=1.0).contains(&self.min_color_ratio) {
            return Err(invalid(format!(
                "min_color_ratio must be within [0, 1], got {}",
                self.min_color_ratio
            )));
        }
        non_negative("blur_delta", self.blur_delta)?;
        non_negative("line_control_radius", self.line_control_radius)?;
        non_negative("curve_control_radius", self.curve_control_radius)?;
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> TraceError {
    TraceError::InvalidConfig(msg.into())
}

fn positive(name: &str, value: f64) -> Result<(), TraceError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a positive number, got {value}")))
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), TraceError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must not be negative, got {value}")))
    }
}
