use thiserror::Error;

/// Errors that can occur while vectorizing an image.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TraceError {
    #[error("failed to load image: {0}")]
    ImageLoad(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("image has zero width or height")]
    EmptyImage,

    /// The path scanner reached a (code, direction) pair with no transition.
    /// Edge layers built by this crate never produce one, so this is a bug.
    #[error("edge grid walk reached invalid transition: code {code}, direction {direction} at ({x}, {y})")]
    InvalidTransition {
        x: usize,
        y: usize,
        code: u8,
        direction: u8,
    },

    #[error("cannot compare {expected:?} px image with {actual:?} px rendering")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("png encoding failed: {0}")]
    PngEncode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
