// One error type for the whole crate.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /* --- configuration: rejected before any stage runs --- */
    #[error("Invalid dimensions: {width}x{height} (both must be > 0)")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Pass count {passes} is too large (max {max}, jump size would overflow)")]
    PassCountTooLarge { passes: u32, max: u32 },

    #[error("Invalid shape width: {0} (must be finite and >= 0)")]
    InvalidShapeWidth(f32),

    #[error("Invalid smooth falloff softness: {0} (must be finite and > 0)")]
    InvalidSoftness(f32),

    #[error("Size mismatch in {stage}: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        stage: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Malformed buffer in {stage}: {actual} entries for {expected} pixels")]
    GridLength {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    /* --- resources --- */
    #[error("Buffer allocation failed ({bytes} bytes)")]
    Allocation { bytes: usize },

    /* --- viewer I/O --- */
    #[error("Image load error: {0}")]
    ImageLoad(String),
    #[error("Window init error: {0}")]
    WindowInit(String),
    #[error("Window update error: {0}")]
    WindowUpdate(String),
    #[error("Camera init error: {0}")]
    CameraInit(String),
    #[error("Camera frame error: {0}")]
    CameraFrame(String),
}

pub type Result<T> = std::result::Result<T, Error>;
