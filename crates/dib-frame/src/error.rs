use thiserror::Error;

/// Frame conversion and bitmap packaging errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("invalid buffer size for {width}x{height}: expected {expected} bytes, got {actual}")]
    InvalidBufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("invalid frame dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("out of memory allocating {requested} bytes")]
    OutOfMemory { requested: usize },

    #[error("native surface query failed: {0}")]
    NativeQueryFailure(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, FrameError>;
