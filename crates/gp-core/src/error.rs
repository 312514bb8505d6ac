use thiserror::Error;

/// Violations of the buffer invariants every image stage relies on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("out of bounds")]
    OutOfBounds,
    #[error("invalid stride")]
    InvalidStride,
    #[error("image has a zero dimension")]
    EmptyImage,
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
